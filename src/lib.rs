mod classify;
mod climo;
mod dataset;
mod error;
mod frame_ext;
mod observations;
mod persist;
mod report;
mod types;
mod utils;

pub use climo::*;
pub use error::ClimoError;

pub use classify::ceiling::{is_ceiling_forming, resolve_ceiling, resolve_layers, NO_CEILING_FT};
pub use classify::flight_rules::classify;
pub use classify::{ClassificationPolicy, Classifier};

pub use dataset::{CombinedDataset, StationDataset};
pub use frame_ext::FlightRulesFrameExt;

pub use observations::data_loader::{ObservationLoader, ASOS_URL};
pub use observations::error::ObservationDataError;
pub use observations::parse::{parse_observations, parse_observations_blocking};

pub use persist::{raw_file_name, station_file_name, COMBINED_FILE_NAME, SUMMARY_FILE_NAME};

#[cfg(feature = "plotting")]
pub use report::plot::{chart_file_name, write_category_charts, write_sub_vfr_chart};
pub use report::stats::{
    occurrence_by_hour, occurrence_by_month, occurrence_by_station, station_summaries,
    CategoryStats, StationSummary, HOURS_PER_YEAR,
};

pub use types::config::{ClimoConfig, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR, DEFAULT_STATIONS};
pub use types::flight_category::{FlightCategory, FlightRules};
pub use types::observation::{ClassifiedObservation, Observation, SkyLayer};
pub use types::period::{ObservationPeriod, Year};
pub use types::sky_cover::SkyCover;
