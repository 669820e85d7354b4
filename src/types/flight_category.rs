//! Flight-rule categories and the per-observation set of category flags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Aviation flight-rule category, ordered from best to worst conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlightCategory {
    /// Visual Flight Rules.
    Vfr,
    /// Marginal Visual Flight Rules.
    Mvfr,
    /// Instrument Flight Rules.
    Ifr,
    /// Low Instrument Flight Rules.
    Lifr,
}

impl FlightCategory {
    /// All categories, best to worst.
    pub const ALL: [FlightCategory; 4] = [
        FlightCategory::Vfr,
        FlightCategory::Mvfr,
        FlightCategory::Ifr,
        FlightCategory::Lifr,
    ];

    /// Upper-case name as used in charts and reports, e.g. `"MVFR"`.
    pub fn name(&self) -> &'static str {
        match self {
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
        }
    }

    /// Name of the boolean column holding this flag in classified frames.
    pub(crate) fn column_name(&self) -> &'static str {
        match self {
            FlightCategory::Vfr => "vfr",
            FlightCategory::Mvfr => "mvfr",
            FlightCategory::Ifr => "ifr",
            FlightCategory::Lifr => "lifr",
        }
    }
}

impl fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Independent flight-category flags for one observation.
///
/// Each flag answers "does this observation meet category X's threshold" on its own,
/// so more than one flag can be set, or none at all (e.g. when visibility is missing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FlightRules {
    pub vfr: bool,
    pub mvfr: bool,
    pub ifr: bool,
    pub lifr: bool,
}

impl FlightRules {
    /// Returns the flag for a single category.
    pub fn get(&self, category: FlightCategory) -> bool {
        match category {
            FlightCategory::Vfr => self.vfr,
            FlightCategory::Mvfr => self.mvfr,
            FlightCategory::Ifr => self.ifr,
            FlightCategory::Lifr => self.lifr,
        }
    }

    /// Any observation not classified VFR.
    pub fn is_sub_vfr(&self) -> bool {
        !self.vfr
    }

    /// Collapses the flags into one category using LIFR > IFR > MVFR > VFR precedence.
    ///
    /// Returns `None` when no flag is set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use station_climo::{FlightCategory, FlightRules};
    ///
    /// let rules = FlightRules { vfr: false, mvfr: true, ifr: true, lifr: false };
    /// assert_eq!(rules.worst_category(), Some(FlightCategory::Ifr));
    /// assert_eq!(FlightRules::default().worst_category(), None);
    /// ```
    pub fn worst_category(&self) -> Option<FlightCategory> {
        FlightCategory::ALL
            .iter()
            .rev()
            .copied()
            .find(|category| self.get(*category))
    }
}
