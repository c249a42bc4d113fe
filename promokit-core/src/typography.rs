//! Type Scale Resolver

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::platforms::PlatformKey;

/// Font sizes in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeScale {
    pub headline: u32,
    pub body: u32,
    pub caption: u32,
}

// Wide/short banners get compact scales; the tall story format the largest.
static TYPE_SCALES: [(PlatformKey, TypeScale); 4] = [
    (
        PlatformKey::InstagramPost,
        TypeScale { headline: 96, body: 40, caption: 28 },
    ),
    (
        PlatformKey::InstagramStory,
        TypeScale { headline: 120, body: 56, caption: 36 },
    ),
    (
        PlatformKey::MeetupBanner,
        TypeScale { headline: 72, body: 30, caption: 22 },
    ),
    (
        PlatformKey::LinkedinCover,
        TypeScale { headline: 36, body: 18, caption: 14 },
    ),
];

pub fn resolve(platform: PlatformKey) -> Result<TypeScale, EngineError> {
    TYPE_SCALES
        .iter()
        .find(|(key, _)| *key == platform)
        .map(|(_, scale)| *scale)
        .ok_or(EngineError::UnresolvedTypeScale(platform))
}
