//! Template Layout Selector
//!
//! `select` is a pure function of (template, platform). Decisions that also
//! depend on how many items are shown (repo cards, speakers) hang off the
//! returned plan as methods taking the count.

use log::debug;
use serde::Serialize;

use crate::error::EngineError;
use crate::platforms::{self, PlatformKey};
use crate::templates::TemplateKey;
use crate::typography::{self, TypeScale};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Start,
    Center,
    End,
}

/// How the call-to-action block is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaPlacement {
    /// Large pill with icon, the Instagram post/story treatment.
    Featured,
    /// Plain centered pill.
    Centered,
    /// Small pill aligned to the end of the canvas.
    Compact,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaBlock {
    pub placement: CtaPlacement,
    pub alignment: Alignment,
    pub padding_x: u32,
    pub padding_y: u32,
    pub font_size: u32,
    pub show_icon: bool,
    /// Fixed label for templates whose CTA text is not user content.
    pub label: Option<&'static str>,
    pub link_font_size: u32,
}

impl CtaBlock {
    pub fn is_visible(&self) -> bool {
        self.placement != CtaPlacement::Hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    TopLeft,
    TopRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoPlacement {
    pub scale: f32,
    pub origin: Origin,
    /// Which side of the header row the logo occupies.
    pub side: Alignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderArrangement {
    /// Logo above title, both left aligned.
    Stacked,
    /// Logo and title share one row.
    Row,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecorLayout {
    Single,
    /// Decor drawn twice, once per vertical half.
    SplitHalves,
}

/// Which optional regions render at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityFlags {
    pub cta: bool,
    pub link_text: bool,
    pub badges: bool,
    pub partner_logos: bool,
}

/// Arrangement of a repeated-item list for a given item count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrangementDescriptor {
    pub columns: u32,
    pub alignment: Alignment,
    pub gap: u32,
    /// Share of the content width the list occupies.
    pub width_fraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpeakerPresentation {
    /// One speaker: large centered portrait.
    Single { portrait: u32, placeholder: u32 },
    /// Several speakers: a row of thumbnails.
    Row {
        columns: u32,
        thumbnail: u32,
        placeholder: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListRule {
    max_columns: u32,
    alignment: Alignment,
    gap: u32,
    width_fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub template: TemplateKey,
    pub platform: PlatformKey,
    pub width: u32,
    pub height: u32,
    pub type_scale: TypeScale,
    pub padding: u32,
    pub title_size: u32,
    pub header: HeaderArrangement,
    pub logo: LogoPlacement,
    pub cta: CtaBlock,
    pub decor: DecorLayout,
    pub visibility: VisibilityFlags,
    list: ListRule,
}

const SINGLE_PORTRAIT: u32 = 250;
const SINGLE_PLACEHOLDER: u32 = 200;
const THUMBNAIL: u32 = 130;
const THUMBNAIL_PLACEHOLDER: u32 = 128;

impl LayoutPlan {
    /// Arrangement for `count` repeated items (repo cards or speakers).
    pub fn arrange(&self, count: usize) -> ArrangementDescriptor {
        let count = u32::try_from(count).unwrap_or(u32::MAX).max(1);
        let (columns, alignment) = match self.template {
            TemplateKey::EventPromo if count == 1 => (1, Alignment::Center),
            _ => (count.min(self.list.max_columns), self.list.alignment),
        };
        ArrangementDescriptor {
            columns,
            alignment,
            gap: self.list.gap,
            width_fraction: self.list.width_fraction,
        }
    }

    /// Portrait treatment for `count` speakers; changes at the 1-vs-many boundary.
    pub fn speaker_presentation(&self, count: usize) -> SpeakerPresentation {
        if count <= 1 {
            SpeakerPresentation::Single {
                portrait: SINGLE_PORTRAIT,
                placeholder: SINGLE_PLACEHOLDER,
            }
        } else {
            SpeakerPresentation::Row {
                columns: self.arrange(count).columns,
                thumbnail: THUMBNAIL,
                placeholder: THUMBNAIL_PLACEHOLDER,
            }
        }
    }
}

fn hacktoberfest_plan(platform: PlatformKey, type_scale: TypeScale) -> LayoutPlan {
    use PlatformKey::*;

    let cta = match platform {
        InstagramPost | InstagramStory => CtaBlock {
            placement: CtaPlacement::Featured,
            alignment: Alignment::Center,
            padding_x: if platform == InstagramStory { 80 } else { 40 },
            padding_y: 20,
            font_size: if platform == InstagramStory { type_scale.body } else { 24 },
            show_icon: true,
            label: Some("Start Contributing on GitHub"),
            link_font_size: if platform == InstagramStory { type_scale.body } else { 30 },
        },
        MeetupBanner => CtaBlock {
            placement: CtaPlacement::Centered,
            alignment: Alignment::Center,
            padding_x: 40,
            padding_y: 20,
            font_size: 24,
            show_icon: false,
            label: Some("Start Contributing"),
            link_font_size: 18,
        },
        LinkedinCover => CtaBlock {
            placement: CtaPlacement::Compact,
            alignment: Alignment::End,
            padding_x: 28,
            padding_y: 12,
            font_size: 18,
            show_icon: false,
            label: Some("Start Contributing"),
            link_font_size: 16,
        },
    };

    let list = match platform {
        MeetupBanner => ListRule {
            max_columns: 3,
            alignment: Alignment::Start,
            gap: 12,
            width_fraction: 1.0,
        },
        LinkedinCover => ListRule {
            max_columns: 1,
            alignment: Alignment::End,
            gap: 8,
            width_fraction: 0.5,
        },
        InstagramPost | InstagramStory => ListRule {
            max_columns: 1,
            alignment: Alignment::Start,
            gap: 12,
            width_fraction: 1.0,
        },
    };

    let logo = match platform {
        InstagramStory => LogoPlacement {
            scale: 0.75,
            origin: Origin::TopLeft,
            side: Alignment::Start,
        },
        InstagramPost => LogoPlacement {
            scale: 0.9,
            origin: Origin::TopLeft,
            side: Alignment::Start,
        },
        MeetupBanner | LinkedinCover => LogoPlacement {
            scale: 1.0,
            origin: Origin::TopLeft,
            side: Alignment::Start,
        },
    };

    LayoutPlan {
        template: TemplateKey::Hacktoberfest,
        platform,
        width: 0,
        height: 0,
        type_scale,
        padding: match platform {
            LinkedinCover => 8,
            InstagramStory => 40,
            _ => 24,
        },
        title_size: match platform {
            InstagramStory => 110,
            LinkedinCover => type_scale.headline,
            _ => 70,
        },
        header: if platform == InstagramStory {
            HeaderArrangement::Stacked
        } else {
            HeaderArrangement::Row
        },
        logo,
        cta,
        decor: if platform == InstagramStory {
            DecorLayout::SplitHalves
        } else {
            DecorLayout::Single
        },
        visibility: VisibilityFlags {
            cta: cta.is_visible(),
            link_text: true,
            badges: false,
            partner_logos: false,
        },
        list,
    }
}

fn event_promo_plan(platform: PlatformKey, type_scale: TypeScale) -> LayoutPlan {
    use PlatformKey::*;

    let featured = CtaBlock {
        placement: CtaPlacement::Featured,
        alignment: Alignment::Center,
        padding_x: 40,
        padding_y: 20,
        font_size: 24,
        show_icon: false,
        label: None,
        link_font_size: 20,
    };
    let cta = match platform {
        InstagramPost | InstagramStory => featured,
        LinkedinCover => CtaBlock {
            placement: CtaPlacement::Compact,
            padding_x: 28,
            padding_y: 12,
            font_size: 18,
            link_font_size: 16,
            ..featured
        },
        // The banner carries its own sign-up button on Meetup.
        MeetupBanner => CtaBlock {
            placement: CtaPlacement::Hidden,
            ..featured
        },
    };

    let logo = match platform {
        InstagramStory => LogoPlacement {
            scale: 0.75,
            origin: Origin::TopLeft,
            side: Alignment::End,
        },
        InstagramPost => LogoPlacement {
            scale: 0.9,
            origin: Origin::TopRight,
            side: Alignment::End,
        },
        MeetupBanner | LinkedinCover => LogoPlacement {
            scale: 1.0,
            origin: Origin::TopRight,
            side: Alignment::End,
        },
    };

    LayoutPlan {
        template: TemplateKey::EventPromo,
        platform,
        width: 0,
        height: 0,
        type_scale,
        padding: if platform == LinkedinCover { 8 } else { 24 },
        title_size: type_scale.headline,
        header: HeaderArrangement::Row,
        logo,
        cta,
        decor: DecorLayout::Single,
        visibility: VisibilityFlags {
            cta: cta.is_visible(),
            link_text: true,
            badges: true,
            partner_logos: true,
        },
        list: ListRule {
            max_columns: 3,
            alignment: Alignment::Start,
            gap: 12,
            width_fraction: 0.6,
        },
    }
}

pub fn select(template: TemplateKey, platform: PlatformKey) -> Result<LayoutPlan, EngineError> {
    let spec = platforms::spec(platform)?;
    let type_scale = typography::resolve(platform)?;
    let mut plan = match template {
        TemplateKey::Hacktoberfest => hacktoberfest_plan(platform, type_scale),
        TemplateKey::EventPromo => event_promo_plan(platform, type_scale),
    };
    plan.width = spec.width;
    plan.height = spec.height;
    debug!(
        "layout {}/{}: cta {:?}, header {:?}",
        template, platform, plan.cta.placement, plan.header
    );
    Ok(plan)
}

/// String-keyed entry point; any unrecognised key is `UnknownLayoutKey`.
pub fn select_keys(template: &str, platform: &str) -> Result<LayoutPlan, EngineError> {
    let template: TemplateKey = template.parse()?;
    let platform: PlatformKey = platform
        .parse()
        .map_err(|_| EngineError::UnknownLayoutKey(platform.to_string()))?;
    select(template, platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_is_pure() {
        for t in TemplateKey::ALL {
            for p in PlatformKey::ALL {
                assert_eq!(select(t, p).unwrap(), select(t, p).unwrap());
            }
        }
    }

    #[test]
    fn test_plan_carries_canvas_size() {
        let plan = select(TemplateKey::Hacktoberfest, PlatformKey::MeetupBanner).unwrap();
        assert_eq!((plan.width, plan.height), (1200, 675));
    }

    #[test]
    fn test_event_cta_hidden_on_meetup() {
        let plan = select(TemplateKey::EventPromo, PlatformKey::MeetupBanner).unwrap();
        assert_eq!(plan.cta.placement, CtaPlacement::Hidden);
        assert!(!plan.visibility.cta);
        assert!(plan.visibility.link_text);
    }

    #[test]
    fn test_hacktoberfest_cta_per_platform() {
        let placement = |p| select(TemplateKey::Hacktoberfest, p).unwrap().cta.placement;
        assert_eq!(placement(PlatformKey::InstagramPost), CtaPlacement::Featured);
        assert_eq!(placement(PlatformKey::InstagramStory), CtaPlacement::Featured);
        assert_eq!(placement(PlatformKey::MeetupBanner), CtaPlacement::Centered);
        assert_eq!(placement(PlatformKey::LinkedinCover), CtaPlacement::Compact);
    }

    #[test]
    fn test_repo_grid_only_on_meetup() {
        let meetup = select(TemplateKey::Hacktoberfest, PlatformKey::MeetupBanner).unwrap();
        assert_eq!(meetup.arrange(3).columns, 3);
        assert_eq!(meetup.arrange(2).columns, 2);
        assert_eq!(meetup.arrange(5).columns, 3);

        let post = select(TemplateKey::Hacktoberfest, PlatformKey::InstagramPost).unwrap();
        assert_eq!(post.arrange(3).columns, 1);

        let linkedin = select(TemplateKey::Hacktoberfest, PlatformKey::LinkedinCover).unwrap();
        let arrangement = linkedin.arrange(3);
        assert_eq!(arrangement.columns, 1);
        assert_eq!(arrangement.width_fraction, 0.5);
    }

    #[test]
    fn test_speaker_boundary() {
        let plan = select(TemplateKey::EventPromo, PlatformKey::InstagramPost).unwrap();
        assert!(matches!(
            plan.speaker_presentation(1),
            SpeakerPresentation::Single { portrait: 250, .. }
        ));
        assert_eq!(
            plan.speaker_presentation(2),
            SpeakerPresentation::Row {
                columns: 2,
                thumbnail: 130,
                placeholder: 128
            }
        );
        assert_eq!(plan.arrange(1).alignment, Alignment::Center);
        assert_eq!(plan.arrange(3).columns, 3);
    }

    #[test]
    fn test_logo_placement() {
        let story = select(TemplateKey::Hacktoberfest, PlatformKey::InstagramStory).unwrap();
        assert_eq!(story.logo.scale, 0.75);
        assert_eq!(story.header, HeaderArrangement::Stacked);
        assert_eq!(story.decor, DecorLayout::SplitHalves);

        let post = select(TemplateKey::EventPromo, PlatformKey::InstagramPost).unwrap();
        assert_eq!(post.logo.scale, 0.9);
        assert_eq!(post.logo.origin, Origin::TopRight);
    }

    #[test]
    fn test_select_keys_errors() {
        assert_eq!(
            select_keys("hacktoberfest", "myspace-banner").unwrap_err(),
            EngineError::UnknownLayoutKey("myspace-banner".into())
        );
        assert_eq!(
            select_keys("zine", "instagram-post").unwrap_err(),
            EngineError::UnknownLayoutKey("zine".into())
        );
        assert!(select_keys("event-promo", "linkedin-cover").is_ok());
    }
}
