//! Turns provider CSV text into [`Observation`] records.
//!
//! Every column is read as text and converted field by field, so a single bad
//! value only ever blanks that value: `M`, empty strings and anything that does
//! not parse as a number all become `None`.

use crate::observations::error::ObservationDataError;
use crate::types::observation::{Observation, SkyLayer};
use crate::types::sky_cover::SkyCover;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use polars::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::task;

const MISSING: &str = "M";
const VALID_FORMAT: &str = "%Y-%m-%d %H:%M";

const COVER_COLUMNS: [&str; 3] = ["skyc1", "skyc2", "skyc3"];
const HEIGHT_COLUMNS: [&str; 3] = ["skyl1", "skyl2", "skyl3"];

/// Reads CSV text into a frame where every column is a string column.
///
/// Lines starting with `#` are provider debug output and are dropped first.
/// Rows with more fields than the header are truncated to the header's width.
pub fn csv_to_dataframe(text: &str, station: &str) -> Result<DataFrame, ObservationDataError> {
    let io_error = |e| ObservationDataError::CsvReadIo {
        station: station.to_string(),
        source: e,
    };
    let polars_error = |e| ObservationDataError::CsvReadPolars {
        station: station.to_string(),
        source: e,
    };

    let mut temp_file = NamedTempFile::new().map_err(io_error)?;
    for line in text.lines().filter(|line| !line.starts_with('#')) {
        writeln!(temp_file, "{}", line).map_err(io_error)?;
    }
    temp_file.flush().map_err(io_error)?;

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_truncate_ragged_lines(true))
        .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
        .map_err(polars_error)?
        .finish()
        .map_err(polars_error)
}

fn text_column<'a>(
    df: &'a DataFrame,
    station: &str,
    name: &str,
) -> Result<&'a StringChunked, ObservationDataError> {
    df.column(name)
        .map_err(|_| ObservationDataError::MissingColumn {
            station: station.to_string(),
            column: name.to_string(),
        })?
        .str()
        .map_err(|e| ObservationDataError::CsvReadPolars {
            station: station.to_string(),
            source: e,
        })
}

fn optional_text_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    df.column(name).ok().and_then(|column| column.str().ok())
}

fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != MISSING)
}

pub(crate) fn parse_number(value: Option<&str>) -> Option<f64> {
    present(value)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

pub(crate) fn parse_visibility(value: Option<&str>) -> Option<f64> {
    parse_number(value).filter(|v| *v >= 0.0)
}

pub(crate) fn parse_valid(value: Option<&str>) -> Option<DateTime<Utc>> {
    present(value)
        .and_then(|v| NaiveDateTime::parse_from_str(v, VALID_FORMAT).ok())
        .map(|naive| naive.and_utc())
}

/// Converts a string frame (as produced by [`csv_to_dataframe`]) into observations.
///
/// Rows whose timestamp cannot be parsed are skipped with a warning; every other
/// field degrades to `None` on its own.
pub fn frame_to_observations(
    df: &DataFrame,
    station: &str,
) -> Result<Vec<Observation>, ObservationDataError> {
    let valid = text_column(df, station, "valid")?;
    let vsby = text_column(df, station, "vsby")?;
    let covers = [
        text_column(df, station, COVER_COLUMNS[0])?,
        text_column(df, station, COVER_COLUMNS[1])?,
        text_column(df, station, COVER_COLUMNS[2])?,
    ];
    let heights = [
        text_column(df, station, HEIGHT_COLUMNS[0])?,
        text_column(df, station, HEIGHT_COLUMNS[1])?,
        text_column(df, station, HEIGHT_COLUMNS[2])?,
    ];
    let reported_station = optional_text_column(df, "station");
    let gust = optional_text_column(df, "gust");
    let wx_codes = optional_text_column(df, "wxcodes");

    let mut observations = Vec::with_capacity(df.height());
    let mut skipped = 0usize;

    for idx in 0..df.height() {
        let Some(valid_at) = parse_valid(valid.get(idx)) else {
            skipped += 1;
            continue;
        };

        let layer = |i: usize| {
            SkyLayer::new(
                present(covers[i].get(idx)).and_then(SkyCover::from_code),
                parse_number(heights[i].get(idx)),
            )
        };

        observations.push(Observation {
            station: reported_station
                .and_then(|ca| present(ca.get(idx)))
                .unwrap_or(station)
                .to_string(),
            valid: valid_at,
            visibility_mi: parse_visibility(vsby.get(idx)),
            sky_layers: [layer(0), layer(1), layer(2)],
            gust_kt: gust.and_then(|ca| parse_number(ca.get(idx))),
            wx_codes: wx_codes
                .and_then(|ca| present(ca.get(idx)))
                .map(str::to_string),
        });
    }

    if skipped > 0 {
        warn!(
            "Skipped {} rows with unparseable timestamps for station {}",
            skipped, station
        );
    }
    debug!("Parsed {} observations for station {}", observations.len(), station);
    Ok(observations)
}

/// Parses provider CSV text for one station.
pub fn parse_observations(text: &str, station: &str) -> Result<Vec<Observation>, ObservationDataError> {
    let df = csv_to_dataframe(text, station)?;
    frame_to_observations(&df, station)
}

/// [`parse_observations`] on a blocking task.
pub async fn parse_observations_blocking(
    text: String,
    station: &str,
) -> Result<Vec<Observation>, ObservationDataError> {
    let station_owned = station.to_string();
    task::spawn_blocking(move || parse_observations(&text, &station_owned)).await?
}
