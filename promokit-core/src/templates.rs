//! Template registry
//!
//! Templates are a small fixed set. Each one owns an independent color
//! scope: one background anchor plus the dependent slots listed here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::palette::RootColor;
use crate::platforms::PlatformKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKey {
    Hacktoberfest,
    EventPromo,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 2] = [TemplateKey::Hacktoberfest, TemplateKey::EventPromo];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKey::Hacktoberfest => "hacktoberfest",
            TemplateKey::EventPromo => "event-promo",
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EngineError::UnknownLayoutKey(s.to_string()))
    }
}

/// A dependent color role within a template scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSlot {
    Cta,
    Title,
    AlliesBadge,
    NursingBadge,
    ParentsBadge,
}

impl ColorSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorSlot::Cta => "cta",
            ColorSlot::Title => "title",
            ColorSlot::AlliesBadge => "allies-badge",
            ColorSlot::NursingBadge => "nursing-badge",
            ColorSlot::ParentsBadge => "parents-badge",
        }
    }

    pub fn is_badge(&self) -> bool {
        matches!(
            self,
            ColorSlot::AlliesBadge | ColorSlot::NursingBadge | ColorSlot::ParentsBadge
        )
    }
}

impl fmt::Display for ColorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three words of the shared logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoPart {
    Women,
    Devs,
    Singapore,
}

impl LogoPart {
    pub const ALL: [LogoPart; 3] = [LogoPart::Women, LogoPart::Devs, LogoPart::Singapore];

    pub fn word(&self) -> &'static str {
        match self {
            LogoPart::Women => "WOMEN",
            LogoPart::Devs => "DEVS",
            LogoPart::Singapore => "SINGAPORE",
        }
    }
}

impl fmt::Display for LogoPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "logo-{}", self.word().to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub key: TemplateKey,
    pub label: &'static str,
    pub default_background: RootColor,
    pub default_slots: &'static [(ColorSlot, RootColor)],
}

static TEMPLATES: [TemplateInfo; 2] = [
    TemplateInfo {
        key: TemplateKey::Hacktoberfest,
        label: "Hacktoberfest Update",
        default_background: RootColor::Yellow,
        default_slots: &[
            (ColorSlot::Cta, RootColor::Coral),
            (ColorSlot::Title, RootColor::Teal),
        ],
    },
    TemplateInfo {
        key: TemplateKey::EventPromo,
        label: "Event Promotion",
        default_background: RootColor::Offwhite,
        default_slots: &[
            (ColorSlot::Cta, RootColor::Coral),
            (ColorSlot::Title, RootColor::Navy),
            (ColorSlot::AlliesBadge, RootColor::Navy),
            (ColorSlot::NursingBadge, RootColor::Navy),
            (ColorSlot::ParentsBadge, RootColor::Navy),
        ],
    },
];

pub const DEFAULT_LOGO_COLOR: RootColor = RootColor::Navy;

pub fn all() -> &'static [TemplateInfo] {
    &TEMPLATES
}

pub fn info(key: TemplateKey) -> Result<&'static TemplateInfo, EngineError> {
    TEMPLATES
        .iter()
        .find(|t| t.key == key)
        .ok_or_else(|| EngineError::UnknownLayoutKey(key.to_string()))
}

/// Default download name for a template/platform pair.
pub fn file_base(template: TemplateKey, platform: PlatformKey) -> String {
    format!("{}-{}", template, platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template_keys() {
        assert_eq!("event-promo".parse::<TemplateKey>().unwrap(), TemplateKey::EventPromo);
        assert_eq!(
            "newsletter".parse::<TemplateKey>().unwrap_err(),
            EngineError::UnknownLayoutKey("newsletter".into())
        );
    }

    #[test]
    fn test_defaults_never_collide() {
        for t in all() {
            for (slot, color) in t.default_slots {
                assert_ne!(*color, t.default_background, "{} {}", t.key, slot);
            }
        }
    }

    #[test]
    fn test_file_base() {
        assert_eq!(
            file_base(TemplateKey::Hacktoberfest, PlatformKey::InstagramPost),
            "hacktoberfest-instagram-post"
        );
    }
}
