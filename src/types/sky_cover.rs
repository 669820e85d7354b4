//! Defines the `SkyCover` enum, mapping METAR/ASOS sky-condition codes
//! (the `skyc1`..`skyc3` columns) to descriptive variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount of sky covered by one reported cloud layer.
///
/// ASOS reports up to three layers per observation, lowest first. Each layer
/// carries one of these cover codes plus a base height in feet.
///
/// Convert a raw code with [`SkyCover::from_code`]; unknown codes and the
/// provider's missing marker (`M`) map to `None`, which the ceiling resolver
/// treats the same as an absent layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkyCover {
    /// `CLR`, `SKC`, `NSC` or `NCD`: no clouds detected or reported.
    Clear,
    /// `FEW`: 1-2 oktas.
    Few,
    /// `SCT`: 3-4 oktas.
    Scattered,
    /// `BKN`: 5-7 oktas. Forms a ceiling.
    Broken,
    /// `OVC`: 8 oktas. Forms a ceiling.
    Overcast,
    /// `VV`: sky obscured, the height is the vertical visibility into the obscuration.
    VerticalVisibility,
}

impl SkyCover {
    /// Attempts to convert an ASOS sky-condition code into a `SkyCover` variant.
    ///
    /// Leading and trailing whitespace is ignored and matching is case-insensitive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use station_climo::SkyCover;
    ///
    /// assert_eq!(SkyCover::from_code("OVC"), Some(SkyCover::Overcast));
    /// assert_eq!(SkyCover::from_code(" bkn "), Some(SkyCover::Broken));
    /// assert_eq!(SkyCover::from_code("VV "), Some(SkyCover::VerticalVisibility));
    /// assert_eq!(SkyCover::from_code("M"), None);
    /// assert_eq!(SkyCover::from_code(""), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "CLR" | "SKC" | "NSC" | "NCD" => Some(SkyCover::Clear),
            "FEW" => Some(SkyCover::Few),
            "SCT" => Some(SkyCover::Scattered),
            "BKN" => Some(SkyCover::Broken),
            "OVC" => Some(SkyCover::Overcast),
            "VV" => Some(SkyCover::VerticalVisibility),
            _ => None,
        }
    }

    /// The canonical three-letter (or `VV`) code for this cover.
    pub fn code(&self) -> &'static str {
        match self {
            SkyCover::Clear => "CLR",
            SkyCover::Few => "FEW",
            SkyCover::Scattered => "SCT",
            SkyCover::Broken => "BKN",
            SkyCover::Overcast => "OVC",
            SkyCover::VerticalVisibility => "VV",
        }
    }
}

impl fmt::Display for SkyCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
