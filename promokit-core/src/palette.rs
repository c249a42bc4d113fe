//! Brand palette
//!
//! `PALETTE` fixes the canonical order used for every repair and option list.
//! Black exists for canvas use only and is never offered as a themable choice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootColor {
    Teal,
    Coral,
    Yellow,
    Navy,
    Offwhite,
    Black,
}

pub const PALETTE: [RootColor; 5] = [
    RootColor::Teal,
    RootColor::Coral,
    RootColor::Yellow,
    RootColor::Navy,
    RootColor::Offwhite,
];

pub const WHITE: &str = "#FFFFFF";
pub const GRAY_800: &str = "#1F2937";
pub const GRAY_600: &str = "#4B5563";
pub const GRAY_200: &str = "#E5E7EB";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown color: {0}")]
pub struct UnknownColor(pub String);

impl RootColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootColor::Teal => "teal",
            RootColor::Coral => "coral",
            RootColor::Yellow => "yellow",
            RootColor::Navy => "navy",
            RootColor::Offwhite => "offwhite",
            RootColor::Black => "black",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            RootColor::Teal => "#0B6E4F",
            RootColor::Coral => "#CF5333",
            RootColor::Yellow => "#FFAE03",
            RootColor::Navy => "#05299E",
            RootColor::Offwhite => "#FFFBFF",
            RootColor::Black => "#000000",
        }
    }

    /// Background utility class consumed by template markup.
    pub fn bg_class(&self) -> String {
        match self {
            RootColor::Black => "bg-black".to_string(),
            c => format!("bg-brand-{}", c.as_str()),
        }
    }

    pub fn text_class(&self) -> String {
        match self {
            RootColor::Black => "text-black".to_string(),
            c => format!("text-brand-{}", c.as_str()),
        }
    }

    /// Backgrounds that switch body copy to white.
    pub fn is_dark(&self) -> bool {
        matches!(self, RootColor::Teal | RootColor::Navy | RootColor::Coral)
    }

    pub fn in_palette(&self) -> bool {
        PALETTE.contains(self)
    }

    /// Body text color on top of this background.
    pub fn body_text_on(&self) -> &'static str {
        if self.is_dark() {
            WHITE
        } else {
            GRAY_800
        }
    }

    /// Label color for a pill filled with this color.
    pub fn label_text_on(&self) -> &'static str {
        if *self == RootColor::Offwhite {
            GRAY_800
        } else {
            WHITE
        }
    }
}

impl fmt::Display for RootColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PALETTE
            .into_iter()
            .chain(std::iter::once(RootColor::Black))
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// The palette minus `anchor`, in canonical order.
pub fn options_excluding(anchor: RootColor) -> Vec<RootColor> {
    PALETTE.into_iter().filter(|c| *c != anchor).collect()
}
