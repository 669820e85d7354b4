//! Run configuration: which stations, which days, which thresholds, where to write.

use crate::classify::ClassificationPolicy;
use crate::types::period::{ObservationPeriod, Year};
use bon::Builder;
use std::path::PathBuf;

/// Airports processed when no station list is given.
pub const DEFAULT_STATIONS: [&str; 17] = [
    "CYEG", "CYYC", "EHAM", "EHBK", "EHEH", "EHRD", "LFPO", "LFST", "TKPK", "KMLB", "KMCN", "KVQQ",
    "CYMX", "KMZJ", "KSLN", "KINT", "KLCQ",
];

pub const DEFAULT_FIRST_YEAR: i32 = 2013;
pub const DEFAULT_LAST_YEAR: i32 = 2022;

fn default_stations() -> Vec<String> {
    DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect()
}

fn default_period() -> ObservationPeriod {
    ObservationPeriod::from_years(Year(DEFAULT_FIRST_YEAR), Year(DEFAULT_LAST_YEAR))
        .unwrap_or_else(|| ObservationPeriod::from(Year(DEFAULT_LAST_YEAR)))
}

/// Everything a [`crate::StationClimo::run`] needs to know.
///
/// Every field has a default, so the builder can be used to override only what differs.
///
/// # Examples
///
/// ```
/// use station_climo::{ClimoConfig, ClassificationPolicy, ObservationPeriod, Year};
///
/// let config = ClimoConfig::builder()
///     .stations(vec!["KMLB".to_string(), "EHAM".to_string()])
///     .period(ObservationPeriod::from(Year(2020)))
///     .policy(ClassificationPolicy::Refined)
///     .build();
/// assert_eq!(config.stations.len(), 2);
/// assert_eq!(config.output_dir.to_str(), Some("output"));
///
/// let defaults = ClimoConfig::default();
/// assert_eq!(defaults.stations.len(), 17);
/// assert_eq!(defaults.period.to_string(), "2013-01-01..2022-12-31");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClimoConfig {
    /// Station identifiers in the provider's vocabulary, processed in this order.
    #[builder(default = default_stations())]
    pub stations: Vec<String>,
    #[builder(default = default_period())]
    pub period: ObservationPeriod,
    #[builder(default)]
    pub policy: ClassificationPolicy,
    /// Directory receiving per-station CSV files, the combined frame and the summary.
    #[builder(default = PathBuf::from("output"))]
    pub output_dir: PathBuf,
    /// Directory caching raw provider responses. Falls back to the system cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for ClimoConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
