//! Observation records as parsed from the provider, and their classified form.

use crate::types::flight_category::FlightRules;
use crate::types::sky_cover::SkyCover;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One reported cloud layer: a cover code and its base height in feet.
///
/// Either half may be missing. A height that could not be parsed as a number is
/// stored as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkyLayer {
    pub cover: Option<SkyCover>,
    pub height_ft: Option<f64>,
}

impl SkyLayer {
    pub fn new(cover: Option<SkyCover>, height_ft: Option<f64>) -> Self {
        Self { cover, height_ft }
    }

    /// A layer with no cover and no height, used for unreported slots.
    pub fn absent() -> Self {
        Self::default()
    }
}

/// A single meteorological report for one station at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Station identifier as reported by the provider (e.g. "MLB" for KMLB).
    pub station: String,
    /// Observation time, UTC.
    pub valid: DateTime<Utc>,
    /// Prevailing visibility in statute miles. `None` when missing, never coerced to zero.
    pub visibility_mi: Option<f64>,
    /// Up to three layers, lowest/most significant first.
    pub sky_layers: [SkyLayer; 3],
    /// Wind gust in knots.
    pub gust_kt: Option<f64>,
    /// Present-weather codes (e.g. "-RA BR").
    pub wx_codes: Option<String>,
}

/// An [`Observation`] with its resolved ceiling and flight-rule flags attached.
///
/// Ceiling and flags are computed once by [`crate::Classifier`] and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedObservation {
    observation: Observation,
    ceiling_ft: i64,
    flight_rules: FlightRules,
}

impl ClassifiedObservation {
    pub(crate) fn new(observation: Observation, ceiling_ft: i64, flight_rules: FlightRules) -> Self {
        Self {
            observation,
            ceiling_ft,
            flight_rules,
        }
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn valid(&self) -> DateTime<Utc> {
        self.observation.valid
    }

    pub fn visibility_mi(&self) -> Option<f64> {
        self.observation.visibility_mi
    }

    /// Ceiling in feet; [`crate::NO_CEILING_FT`] when no ceiling-forming layer was reported.
    pub fn ceiling_ft(&self) -> i64 {
        self.ceiling_ft
    }

    pub fn flight_rules(&self) -> FlightRules {
        self.flight_rules
    }
}
