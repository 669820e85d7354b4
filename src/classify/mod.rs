//! Ceiling resolution and flight-rule classification.
//!
//! Both steps are pure functions of an [`Observation`]'s fields; nothing here
//! touches the network, the filesystem or any shared state.

pub mod ceiling;
pub mod flight_rules;

use crate::types::observation::{ClassifiedObservation, Observation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which set of thresholds to classify with.
///
/// * `Baseline`: ceilings come from `BKN`/`OVC` layers only; MVFR and IFR are
///   "ceiling band OR visibility band".
/// * `Refined`: `VV` (obscured sky) also forms a ceiling; MVFR and IFR require
///   the ceiling band together with a matching visibility floor, or a good
///   ceiling together with the visibility band.
///
/// VFR and LIFR are identical under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClassificationPolicy {
    #[default]
    Baseline,
    Refined,
}

impl fmt::Display for ClassificationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationPolicy::Baseline => write!(f, "baseline"),
            ClassificationPolicy::Refined => write!(f, "refined"),
        }
    }
}

impl FromStr for ClassificationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" => Ok(ClassificationPolicy::Baseline),
            "refined" => Ok(ClassificationPolicy::Refined),
            other => Err(format!(
                "unknown classification policy '{}', expected 'baseline' or 'refined'",
                other
            )),
        }
    }
}

/// Attaches ceiling and flight-rule flags to observations under one policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier {
    policy: ClassificationPolicy,
}

impl Classifier {
    pub fn new(policy: ClassificationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ClassificationPolicy {
        self.policy
    }

    /// Resolves the ceiling first, then derives the flags from (ceiling, visibility).
    pub fn classify_observation(&self, observation: Observation) -> ClassifiedObservation {
        let ceiling_ft = ceiling::resolve_ceiling(&observation, self.policy);
        let rules = flight_rules::classify(ceiling_ft, observation.visibility_mi, self.policy);
        ClassifiedObservation::new(observation, ceiling_ft, rules)
    }

    pub fn classify_all(
        &self,
        observations: impl IntoIterator<Item = Observation>,
    ) -> Vec<ClassifiedObservation> {
        observations
            .into_iter()
            .map(|obs| self.classify_observation(obs))
            .collect()
    }
}
