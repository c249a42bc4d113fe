//! Template content payloads
//!
//! Owned by the caller. Only presence/count rules used by layout are
//! interpreted here; business values (star counts, dates) pass through.

use serde::{Deserialize, Serialize};

use crate::templates::TemplateKey;

pub const MAX_SPEAKERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoCard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stars: Option<u32>,
    #[serde(default)]
    pub forks: Option<u32>,
    #[serde(default)]
    pub pr_merged: Option<u32>,
    #[serde(default)]
    pub open_issues: Option<u32>,
    #[serde(default)]
    pub good_first_issues: Option<u32>,
}

impl RepoCard {
    fn sample(name: &str, description: &str, stars: u32, forks: u32) -> Self {
        Self {
            name: name.to_string(),
            description: Some(description.to_string()),
            stars: Some(stars),
            forks: Some(forks),
            pr_merged: None,
            open_issues: None,
            good_first_issues: None,
        }
    }

    /// One-line summary of whichever counters are set.
    pub fn stats_line(&self) -> String {
        [
            self.stars.map(|n| format!("⭐ {}", n)),
            self.forks.map(|n| format!("🍴 {}", n)),
            self.pr_merged.map(|n| format!("✅ {} PRs merged", n)),
            self.open_issues.map(|n| format!("🐛 {} open issues", n)),
            self.good_first_issues.map(|n| format!("🌱 {} good first issues", n)),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("  ·  ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Speaker {
    /// Image URL if one is actually set.
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudienceType {
    #[serde(rename = "Women only")]
    WomenOnly,
    #[serde(rename = "Allies welcome")]
    AlliesWelcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facility {
    #[serde(rename = "Private nursing room")]
    NursingRoom,
    #[serde(rename = "Parents & kids welcome")]
    ParentsAndKids,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecorVariant {
    #[default]
    Playful,
    Tech,
    Games,
    Women,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HacktoberfestContent {
    pub title_text: String,
    pub subtitle_text: String,
    pub link_text: String,
    pub repos: Vec<RepoCard>,
}

impl Default for HacktoberfestContent {
    fn default() -> Self {
        Self {
            title_text: "Hacktoberfest🎉".to_string(),
            subtitle_text: "📅1–31 October".to_string(),
            link_text: "👉github.com/orgs/Women-Devs-SG👈".to_string(),
            repos: vec![
                RepoCard::sample(
                    "🤖volunteer-telegram-bot",
                    "Telegram bot for volunteer management for Women Devs SG",
                    12,
                    13,
                ),
                RepoCard::sample(
                    "🍼bibsnbub",
                    "An app to help parents find childcare facilities in Singapore!",
                    11,
                    14,
                ),
                RepoCard::sample("👩‍💻womendevssg", "Website for womendevssg", 14, 18),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPromoContent {
    pub event_name: String,
    pub event_subtitle: Option<String>,
    pub event_description: Option<String>,
    pub event_date_time: String,
    pub event_venue: String,
    pub speakers: Vec<Speaker>,
    pub speaker_count: usize,
    pub audience_type: Option<AudienceType>,
    pub facilities: Vec<Facility>,
    pub partner_logos: Vec<String>,
    pub cta_text: String,
    pub cta_href: String,
    pub link_text: String,
}

impl Default for EventPromoContent {
    fn default() -> Self {
        let speaker = |name: &str, title: &str| Speaker {
            name: name.to_string(),
            title: Some(title.to_string()),
            image_url: None,
        };
        Self {
            event_name: "AI Workshop".to_string(),
            event_subtitle: Some("What are LLMs?".to_string()),
            event_description: Some(
                "Join us for a panel and networking session on building inclusive tech communities."
                    .to_string(),
            ),
            event_date_time: "Thu, 24 Oct · 7:00 PM".to_string(),
            event_venue: "Somewhere, Singapore".to_string(),
            speakers: vec![
                speaker("Aisha Lee", "Senior Engineer, ACME"),
                speaker("Mei Chen", "Developer Advocate, Foo"),
                speaker("Anita S.", "Product Engineer, Bar"),
            ],
            speaker_count: 1,
            audience_type: Some(AudienceType::AlliesWelcome),
            facilities: vec![Facility::NursingRoom, Facility::ParentsAndKids],
            partner_logos: vec![],
            cta_text: "Sign up on Meetup".to_string(),
            cta_href: "https://www.meetup.com/women-devs-sg/".to_string(),
            link_text: "👉meetup.com/women-devs-sg/👈".to_string(),
        }
    }
}

impl EventPromoContent {
    /// Speakers actually shown: the first `speaker_count`, clamped to 1..=3.
    pub fn visible_speakers(&self) -> &[Speaker] {
        let n = self.speaker_count.clamp(1, MAX_SPEAKERS).min(self.speakers.len());
        &self.speakers[..n]
    }

    /// Partner logos with blank URLs dropped.
    pub fn visible_partner_logos(&self) -> Vec<&str> {
        self.partner_logos
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn has_facility(&self, facility: Facility) -> bool {
        self.facilities.contains(&facility)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "kebab-case")]
pub enum TemplateContent {
    Hacktoberfest(HacktoberfestContent),
    EventPromo(EventPromoContent),
}

impl TemplateContent {
    pub fn template(&self) -> TemplateKey {
        match self {
            TemplateContent::Hacktoberfest(_) => TemplateKey::Hacktoberfest,
            TemplateContent::EventPromo(_) => TemplateKey::EventPromo,
        }
    }

    pub fn default_for(template: TemplateKey) -> Self {
        match template {
            TemplateKey::Hacktoberfest => TemplateContent::Hacktoberfest(Default::default()),
            TemplateKey::EventPromo => TemplateContent::EventPromo(Default::default()),
        }
    }
}
