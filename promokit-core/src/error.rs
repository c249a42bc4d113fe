//! Engine error taxonomy
//!
//! Configuration errors (unknown keys, missing table entries) are
//! programming errors and propagate. `InvalidColorChoice` is recoverable:
//! the rejected mutation is never applied.

use std::fmt;
use thiserror::Error;

use crate::palette::RootColor;
use crate::platforms::PlatformKey;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Unknown platform key: {0}")]
    UnknownPlatformKey(String),

    #[error("Unknown layout key: {0}")]
    UnknownLayoutKey(String),

    #[error("No type scale registered for platform {0}")]
    UnresolvedTypeScale(PlatformKey),

    #[error("Invalid color choice: {color} for {slot} ({reason})")]
    InvalidColorChoice {
        slot: String,
        color: RootColor,
        reason: ColorRejection,
    },

    #[error("Unknown color slot {slot} in scope {scope}")]
    UnknownSlot { scope: String, slot: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRejection {
    MatchesBackground(RootColor),
    OutsidePalette,
}

impl fmt::Display for ColorRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorRejection::MatchesBackground(bg) => write!(f, "matches background {}", bg),
            ColorRejection::OutsidePalette => f.write_str("not a themable palette color"),
        }
    }
}

impl EngineError {
    /// True for errors caused by user input rather than a broken table.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InvalidColorChoice { .. })
    }
}
