//! Platform Size Registry
//!
//! Fixed table of target canvases. Entries never change at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformKey {
    InstagramPost,
    InstagramStory,
    MeetupBanner,
    LinkedinCover,
}

impl PlatformKey {
    pub const ALL: [PlatformKey; 4] = [
        PlatformKey::InstagramPost,
        PlatformKey::InstagramStory,
        PlatformKey::MeetupBanner,
        PlatformKey::LinkedinCover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKey::InstagramPost => "instagram-post",
            PlatformKey::InstagramStory => "instagram-story",
            PlatformKey::MeetupBanner => "meetup-banner",
            PlatformKey::LinkedinCover => "linkedin-cover",
        }
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EngineError::UnknownPlatformKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformSpec {
    pub key: PlatformKey,
    pub width: u32,
    pub height: u32,
    pub label: &'static str,
}

static PLATFORM_SIZES: [PlatformSpec; 4] = [
    PlatformSpec {
        key: PlatformKey::InstagramPost,
        width: 1080,
        height: 1080,
        label: "Instagram Post (1080×1080)",
    },
    PlatformSpec {
        key: PlatformKey::InstagramStory,
        width: 1080,
        height: 1920,
        label: "Instagram Story (1080×1920)",
    },
    PlatformSpec {
        key: PlatformKey::MeetupBanner,
        width: 1200,
        height: 675,
        label: "Meetup Banner (1200×675)",
    },
    PlatformSpec {
        key: PlatformKey::LinkedinCover,
        width: 1128,
        height: 191,
        label: "LinkedIn Cover (1128×191)",
    },
];

/// All registered platforms, in display order.
pub fn all() -> &'static [PlatformSpec] {
    &PLATFORM_SIZES
}

/// Look up a platform by its wire key, e.g. `"meetup-banner"`.
pub fn lookup(key: &str) -> Result<PlatformSpec, EngineError> {
    let key: PlatformKey = key.parse()?;
    spec(key)
}

/// Look up a platform by typed key.
pub fn spec(key: PlatformKey) -> Result<PlatformSpec, EngineError> {
    PLATFORM_SIZES
        .iter()
        .find(|p| p.key == key)
        .copied()
        .ok_or_else(|| EngineError::UnknownPlatformKey(key.to_string()))
}
