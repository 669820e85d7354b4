//! Per-station and combined collections of classified observations.

use crate::types::flight_category::FlightCategory;
use crate::types::observation::ClassifiedObservation;
use crate::types::period::ObservationPeriod;
use chrono::{DateTime, NaiveDateTime, Utc};
use polars::prelude::*;

/// All classified observations for one station, ordered by timestamp.
///
/// Missing hours are simply absent.
#[derive(Debug, Clone, PartialEq)]
pub struct StationDataset {
    station: String,
    observations: Vec<ClassifiedObservation>,
}

impl StationDataset {
    /// Builds a dataset, sorting by timestamp. The sort is stable, so observations
    /// sharing a timestamp keep their input order.
    pub fn new(station: impl Into<String>, mut observations: Vec<ClassifiedObservation>) -> Self {
        observations.sort_by_key(|obs| obs.valid());
        Self {
            station: station.into(),
            observations,
        }
    }

    /// The station code this dataset was requested for.
    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn observations(&self) -> &[ClassifiedObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Observations with `start <= valid <= end`.
    pub fn range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> &[ClassifiedObservation] {
        let lo = self.observations.partition_point(|obs| obs.valid() < start);
        let hi = self.observations.partition_point(|obs| obs.valid() <= end);
        if lo >= hi {
            return &[];
        }
        &self.observations[lo..hi]
    }

    /// Drops every observation outside `period`.
    pub fn within(self, period: ObservationPeriod) -> Self {
        let observations = self
            .range(period.start_datetime(), period.end_datetime())
            .to_vec();
        Self {
            station: self.station,
            observations,
        }
    }

    /// This station's observations as a frame, see [`CombinedDataset::to_frame`] for the columns.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        observations_to_frame(
            self.observations
                .iter()
                .map(|obs| (self.station.as_str(), obs)),
            self.observations.len(),
        )
    }
}

/// Every station's observations, each tagged with the station it was requested for.
///
/// Stations appear in the order they were combined and each station keeps its own
/// timestamp order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CombinedDataset {
    datasets: Vec<StationDataset>,
}

impl CombinedDataset {
    pub fn combine(datasets: impl IntoIterator<Item = StationDataset>) -> Self {
        Self {
            datasets: datasets.into_iter().collect(),
        }
    }

    pub fn stations(&self) -> Vec<&str> {
        self.datasets.iter().map(StationDataset::station).collect()
    }

    pub fn datasets(&self) -> &[StationDataset] {
        &self.datasets
    }

    pub fn len(&self) -> usize {
        self.datasets.iter().map(StationDataset::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(station, observation)` pairs in combined order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassifiedObservation)> + '_ {
        self.datasets.iter().flat_map(|dataset| {
            dataset
                .observations
                .iter()
                .map(move |obs| (dataset.station.as_str(), obs))
        })
    }

    /// Flattens the dataset into one frame, one row per observation.
    ///
    /// Columns: `station`, `reported_station`, `valid`, `vsby`, `gust`,
    /// `skyc1`..`skyc3`, `skyl1`..`skyl3`, `wxcodes`, `ceiling`, `vfr`, `mvfr`,
    /// `ifr`, `lifr`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        observations_to_frame(self.iter(), self.len())
    }
}

fn observations_to_frame<'a>(
    rows: impl Iterator<Item = (&'a str, &'a ClassifiedObservation)>,
    capacity: usize,
) -> PolarsResult<DataFrame> {
    let mut station = Vec::with_capacity(capacity);
    let mut reported_station = Vec::with_capacity(capacity);
    let mut valid: Vec<NaiveDateTime> = Vec::with_capacity(capacity);
    let mut vsby = Vec::with_capacity(capacity);
    let mut gust = Vec::with_capacity(capacity);
    let mut covers: [Vec<Option<String>>; 3] = Default::default();
    let mut heights: [Vec<Option<f64>>; 3] = Default::default();
    let mut wxcodes = Vec::with_capacity(capacity);
    let mut ceiling = Vec::with_capacity(capacity);
    let mut flags: [Vec<bool>; 4] = Default::default();

    for (tag, classified) in rows {
        let obs = classified.observation();
        station.push(tag.to_string());
        reported_station.push(obs.station.clone());
        valid.push(obs.valid.naive_utc());
        vsby.push(obs.visibility_mi);
        gust.push(obs.gust_kt);
        for (i, layer) in obs.sky_layers.iter().enumerate() {
            covers[i].push(layer.cover.map(|cover| cover.code().to_string()));
            heights[i].push(layer.height_ft);
        }
        wxcodes.push(obs.wx_codes.clone());
        ceiling.push(classified.ceiling_ft());
        let rules = classified.flight_rules();
        for (i, category) in FlightCategory::ALL.iter().enumerate() {
            flags[i].push(rules.get(*category));
        }
    }

    let [skyc1, skyc2, skyc3] = covers;
    let [skyl1, skyl2, skyl3] = heights;
    let [vfr, mvfr, ifr, lifr] = flags;

    df!(
        "station" => station,
        "reported_station" => reported_station,
        "valid" => valid,
        "vsby" => vsby,
        "gust" => gust,
        "skyc1" => skyc1,
        "skyc2" => skyc2,
        "skyc3" => skyc3,
        "skyl1" => skyl1,
        "skyl2" => skyl2,
        "skyl3" => skyl3,
        "wxcodes" => wxcodes,
        "ceiling" => ceiling,
        FlightCategory::Vfr.column_name() => vfr,
        FlightCategory::Mvfr.column_name() => mvfr,
        FlightCategory::Ifr.column_name() => ifr,
        FlightCategory::Lifr.column_name() => lifr
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassificationPolicy, Classifier};
    use crate::types::observation::{Observation, SkyLayer};
    use crate::types::period::Year;
    use crate::types::sky_cover::SkyCover;
    use chrono::TimeZone;

    fn obs(station: &str, day: u32, hour: u32, vis: Option<f64>, ceiling: Option<f64>) -> Observation {
        let first_layer = match ceiling {
            Some(h) => SkyLayer::new(Some(SkyCover::Overcast), Some(h)),
            None => SkyLayer::absent(),
        };
        Observation {
            station: station.to_string(),
            valid: Utc.with_ymd_and_hms(2020, 1, day, hour, 0, 0).unwrap(),
            visibility_mi: vis,
            sky_layers: [first_layer, SkyLayer::absent(), SkyLayer::absent()],
            gust_kt: None,
            wx_codes: None,
        }
    }

    fn dataset(station: &str, observations: Vec<Observation>) -> StationDataset {
        let classifier = Classifier::new(ClassificationPolicy::Baseline);
        StationDataset::new(station, classifier.classify_all(observations))
    }

    #[test]
    fn test_station_dataset_sorts_by_timestamp() {
        let ds = dataset(
            "KMLB",
            vec![
                obs("MLB", 2, 0, Some(10.0), None),
                obs("MLB", 1, 5, Some(10.0), None),
                obs("MLB", 1, 3, Some(10.0), None),
            ],
        );
        let hours: Vec<_> = ds.observations().iter().map(|o| o.valid()).collect();
        let mut sorted = hours.clone();
        sorted.sort();
        assert_eq!(hours, sorted);
        assert_eq!(ds.station(), "KMLB");
    }

    #[test]
    fn test_range_is_inclusive() {
        let ds = dataset("EHAM", (0..24).map(|h| obs("EHAM", 3, h, Some(5.0), None)).collect());
        let start = Utc.with_ymd_and_hms(2020, 1, 3, 6, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 1, 3, 11, 0, 0).unwrap();
        assert_eq!(ds.range(start, end).len(), 6);
        assert!(ds.range(end, start).is_empty());
    }

    #[test]
    fn test_within_drops_out_of_period_rows() {
        let mut observations = vec![obs("EHBK", 1, 0, Some(10.0), None)];
        let mut late = obs("EHBK", 1, 0, Some(10.0), None);
        late.valid = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        observations.push(late);
        let ds = dataset("EHBK", observations).within(Year(2020).into());
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn test_combine_preserves_every_observation_once_in_order() {
        let a = dataset(
            "KMLB",
            vec![obs("MLB", 1, 0, Some(10.0), None), obs("MLB", 1, 1, Some(2.0), Some(600.0))],
        );
        let b = dataset(
            "EHAM",
            vec![
                obs("EHAM", 1, 0, Some(0.5), None),
                obs("EHAM", 1, 1, None, None),
                obs("EHAM", 1, 2, Some(4.0), Some(2000.0)),
            ],
        );
        let expected: Vec<(String, DateTime<Utc>)> = a
            .observations()
            .iter()
            .map(|o| ("KMLB".to_string(), o.valid()))
            .chain(b.observations().iter().map(|o| ("EHAM".to_string(), o.valid())))
            .collect();

        let combined = CombinedDataset::combine(vec![a, b]);
        assert_eq!(combined.len(), 5);
        assert_eq!(combined.stations(), vec!["KMLB", "EHAM"]);
        let actual: Vec<(String, DateTime<Utc>)> = combined
            .iter()
            .map(|(station, o)| (station.to_string(), o.valid()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_to_frame_columns_and_flags() -> PolarsResult<()> {
        let combined = CombinedDataset::combine(vec![
            dataset("KMLB", vec![obs("MLB", 1, 0, Some(10.0), None)]),
            dataset("KINT", vec![obs("INT", 1, 0, Some(2.0), Some(600.0))]),
        ]);
        let df = combined.to_frame()?;
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 17);

        let station = df.column("station")?.str()?;
        assert_eq!(station.get(0), Some("KMLB"));
        assert_eq!(station.get(1), Some("KINT"));
        assert_eq!(df.column("reported_station")?.str()?.get(1), Some("INT"));

        let ceiling = df.column("ceiling")?.i64()?;
        assert_eq!(ceiling.get(0), Some(crate::classify::ceiling::NO_CEILING_FT));
        assert_eq!(ceiling.get(1), Some(600));

        assert_eq!(df.column("vfr")?.bool()?.get(0), Some(true));
        assert_eq!(df.column("ifr")?.bool()?.get(1), Some(true));
        assert_eq!(df.column("skyc1")?.str()?.get(1), Some("OVC"));
        assert_eq!(df.column("skyc1")?.str()?.get(0), None);
        Ok(())
    }

    #[test]
    fn test_empty_combined_frame() -> PolarsResult<()> {
        let combined = CombinedDataset::default();
        assert!(combined.is_empty());
        let df = combined.to_frame()?;
        assert_eq!(df.height(), 0);
        Ok(())
    }
}
