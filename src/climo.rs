//! Entry point tying retrieval, classification, persistence and reporting together.

use crate::classify::{ClassificationPolicy, Classifier};
use crate::dataset::{CombinedDataset, StationDataset};
use crate::error::ClimoError;
use crate::observations::data_loader::ObservationLoader;
use crate::observations::parse::parse_observations_blocking;
use crate::persist;
use crate::report::stats::{
    occurrence_by_hour, occurrence_by_month, occurrence_by_station, station_summaries,
    StationSummary,
};
use crate::types::config::ClimoConfig;
use crate::types::period::ObservationPeriod;
use crate::utils::{ensure_dir_exists, get_cache_dir};
use bon::bon;
use log::{info, warn};
use polars::prelude::{DataFrame, IntoLazy};
use std::path::PathBuf;

/// A station that was dropped from a run, and why.
#[derive(Debug)]
pub struct SkippedStation {
    pub station: String,
    pub error: ClimoError,
}

/// Everything a [`StationClimo::run`] produced.
#[derive(Debug)]
pub struct ClimoRun {
    pub combined: CombinedDataset,
    /// Collected [`occurrence_by_station`] frame.
    pub by_station: DataFrame,
    /// Collected [`occurrence_by_hour`] frame.
    pub by_hour: DataFrame,
    /// Collected [`occurrence_by_month`] frame.
    pub by_month: DataFrame,
    pub summaries: Vec<StationSummary>,
    pub skipped: Vec<SkippedStation>,
}

/// Client for building flight-rule climatologies of airport stations.
///
/// Raw provider responses are cached per station and period, so repeated runs over
/// the same configuration never hit the network twice.
///
/// # Examples
///
/// ```rust,no_run
/// # use station_climo::{ClimoError, ObservationPeriod, StationClimo, Year};
/// # #[tokio::main]
/// # async fn main() -> Result<(), ClimoError> {
/// let climo = StationClimo::new().await?;
/// let dataset = climo
///     .station_dataset()
///     .station("KMLB")
///     .period(ObservationPeriod::from(Year(2020)))
///     .call()
///     .await?;
/// println!("{} observations", dataset.len());
/// # Ok(())
/// # }
/// ```
pub struct StationClimo {
    loader: ObservationLoader,
}

#[bon]
impl StationClimo {
    /// Creates a client caching raw responses in `cache_folder`, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ClimoError::CacheDirCreation`] if the directory cannot be created.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, ClimoError> {
        ensure_dir_exists(&cache_folder)
            .await
            .map_err(|e| ClimoError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            loader: ObservationLoader::new(&cache_folder),
        })
    }

    /// Creates a client using the system cache directory.
    ///
    /// # Errors
    ///
    /// Returns [`ClimoError::CacheDirResolution`] when the platform has no cache directory.
    pub async fn new() -> Result<Self, ClimoError> {
        let cache_folder = get_cache_dir().ok_or(ClimoError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Creates a client using `config.cache_dir`, or the system cache directory when unset.
    pub async fn for_config(config: &ClimoConfig) -> Result<Self, ClimoError> {
        match &config.cache_dir {
            Some(dir) => Self::with_cache_folder(dir.clone()).await,
            None => Self::new().await,
        }
    }

    /// Sends downloads to `base_url` instead of the default provider endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.loader = self.loader.with_base_url(base_url);
        self
    }

    pub fn loader(&self) -> &ObservationLoader {
        &self.loader
    }

    /// Fetches, parses and classifies one station's observations over `period`.
    ///
    /// * `.station(&str)`: **Required.** Provider station identifier.
    /// * `.period(ObservationPeriod)`: **Required.** Inclusive date range.
    /// * `.policy(ClassificationPolicy)`: Optional. Defaults to [`ClassificationPolicy::Baseline`].
    #[builder]
    pub async fn station_dataset(
        &self,
        station: &str,
        period: ObservationPeriod,
        policy: Option<ClassificationPolicy>,
    ) -> Result<StationDataset, ClimoError> {
        let classifier = Classifier::new(policy.unwrap_or_default());
        let (_, dataset) = self.fetch_station(station, period, classifier).await?;
        Ok(dataset)
    }

    async fn fetch_station(
        &self,
        station: &str,
        period: ObservationPeriod,
        classifier: Classifier,
    ) -> Result<(String, StationDataset), ClimoError> {
        let text = self.loader.get_text(station, period).await?;
        let observations = parse_observations_blocking(text.clone(), station).await?;
        let dataset = StationDataset::new(station, classifier.classify_all(observations)).within(period);
        Ok((text, dataset))
    }

    /// Processes every configured station in order and writes all run artifacts.
    ///
    /// A station whose download or parse fails is logged, recorded in
    /// [`ClimoRun::skipped`] and left out; the run carries on with the next one.
    /// Failing to write output is fatal.
    pub async fn run(&self, config: &ClimoConfig) -> Result<ClimoRun, ClimoError> {
        ensure_dir_exists(&config.output_dir)
            .await
            .map_err(|e| ClimoError::OutputDirCreation(config.output_dir.clone(), e))?;

        let classifier = Classifier::new(config.policy);
        let mut datasets = Vec::with_capacity(config.stations.len());
        let mut skipped = Vec::new();

        for station in &config.stations {
            info!("Processing station {} ({}, {})", station, config.period, config.policy);
            let (text, dataset) = match self.fetch_station(station, config.period, classifier).await {
                Ok(fetched) => fetched,
                Err(error) => {
                    warn!("Skipping station {}: {}", station, error);
                    skipped.push(SkippedStation {
                        station: station.clone(),
                        error,
                    });
                    continue;
                }
            };

            if dataset.is_empty() {
                warn!("Station {} has no observations in {}", station, config.period);
            }
            persist::write_raw_text(&config.output_dir, station, &text).await?;
            persist::write_station_csv(&config.output_dir, station, dataset.to_frame()?).await?;
            datasets.push(dataset);
        }

        let combined = CombinedDataset::combine(datasets);
        let frame = combined.to_frame()?;
        info!(
            "Combined {} observations from {} stations",
            combined.len(),
            combined.stations().len()
        );

        let by_station = occurrence_by_station(frame.clone().lazy()).collect()?;
        let by_hour = occurrence_by_hour(frame.clone().lazy()).collect()?;
        let by_month = occurrence_by_month(frame.clone().lazy()).collect()?;
        let summaries = station_summaries(&by_station)?;

        persist::write_combined_parquet(&config.output_dir, frame).await?;
        persist::write_summary_json(&config.output_dir, &summaries).await?;

        Ok(ClimoRun {
            combined,
            by_station,
            by_hour,
            by_month,
            summaries,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observations::error::ObservationDataError;
    use crate::types::flight_category::FlightCategory;
    use crate::types::period::Year;
    use tempfile::tempdir;

    const UNREACHABLE: &str = "http://127.0.0.1:9/asos.py";

    #[tokio::test]
    async fn test_station_dataset_from_cache() -> Result<(), Box<dyn std::error::Error>> {
        let cache = tempdir()?;
        let climo = StationClimo::with_cache_folder(cache.path().to_path_buf())
            .await?
            .with_base_url(UNREACHABLE);
        let period = ObservationPeriod::from(Year(2020));
        std::fs::write(
            climo.loader().cache_path("KLCQ", period),
            "station,valid,vsby,gust,skyc1,skyc2,skyc3,skyl1,skyl2,skyl3,wxcodes\n\
             LCQ,2020-03-01 10:56,10.00,M,VV,M,M,300.00,M,M,M\n\
             LCQ,2021-01-01 00:15,10.00,M,M,M,M,M,M,M,M\n",
        )?;

        let baseline = climo.station_dataset().station("KLCQ").period(period).call().await?;
        assert_eq!(baseline.len(), 1);
        assert!(baseline.observations()[0].flight_rules().vfr);

        let refined = climo
            .station_dataset()
            .station("KLCQ")
            .period(period)
            .policy(ClassificationPolicy::Refined)
            .call()
            .await?;
        assert_eq!(refined.observations()[0].ceiling_ft(), 300);
        assert!(refined.observations()[0].flight_rules().lifr);
        Ok(())
    }

    #[tokio::test]
    async fn test_run_skips_unreachable_station() -> Result<(), Box<dyn std::error::Error>> {
        let cache = tempdir()?;
        let output = tempdir()?;
        let climo = StationClimo::with_cache_folder(cache.path().to_path_buf())
            .await?
            .with_base_url(UNREACHABLE);
        let config = ClimoConfig::builder()
            .stations(vec!["KSLN".to_string()])
            .period(ObservationPeriod::from(Year(2019)))
            .output_dir(output.path().join("out"))
            .build();

        let run = climo.run(&config).await?;
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].station, "KSLN");
        assert!(run.combined.is_empty());
        assert_eq!(run.by_station.height(), 0);
        assert!(run.summaries.is_empty());
        assert!(output.path().join("out").join("summary.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_run_writes_artifacts_and_skips_bad_station() -> Result<(), Box<dyn std::error::Error>> {
        let cache = tempdir()?;
        let output = tempdir()?;
        let climo = StationClimo::with_cache_folder(cache.path().to_path_buf())
            .await?
            .with_base_url(UNREACHABLE);
        let period = ObservationPeriod::from(Year(2020));

        std::fs::write(
            climo.loader().cache_path("KTST", period),
            "#DEBUG: Format Typ    -> comma\n\
             station,valid,vsby,gust,skyc1,skyc2,skyc3,skyl1,skyl2,skyl3,wxcodes\n\
             TST,2020-05-01 00:53,10.00,M,FEW,M,M,4000.00,M,M,M\n\
             TST,2020-05-01 01:53,2.00,M,OVC,M,M,600.00,M,M,BR\n\
             TST,2020-05-01 02:53,M,M,M,M,M,M,M,M,M\n\
             TST,2019-12-31 23:53,10.00,M,M,M,M,M,M,M,M\n",
        )?;
        std::fs::write(climo.loader().cache_path("KBAD", period), "not,a\nvalid,file\n")?;

        let config = ClimoConfig::builder()
            .stations(vec!["KBAD".to_string(), "KTST".to_string()])
            .period(period)
            .output_dir(output.path().to_path_buf())
            .build();
        let run = climo.run(&config).await?;

        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].station, "KBAD");
        assert!(matches!(
            run.skipped[0].error,
            ClimoError::ObservationData(ObservationDataError::MissingColumn { .. })
        ));

        assert_eq!(run.combined.stations(), vec!["KTST"]);
        assert_eq!(run.combined.len(), 3);

        assert_eq!(run.summaries.len(), 1);
        let summary = &run.summaries[0];
        assert_eq!(summary.station, "KTST");
        assert_eq!(summary.observations, 3);
        assert_eq!(summary.category(FlightCategory::Vfr).map(|c| c.count), Some(1));
        assert_eq!(summary.category(FlightCategory::Ifr).map(|c| c.count), Some(1));

        for name in ["KTST_raw.csv", "KTST_data.csv", "combined.parquet", "summary.json"] {
            assert!(output.path().join(name).exists(), "missing {}", name);
        }
        assert!(!output.path().join("KBAD_data.csv").exists());
        Ok(())
    }
}
