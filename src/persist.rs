//! Writes run artifacts (raw responses, per-station tables, combined frame, summary) to disk.

use crate::error::ClimoError;
use crate::report::stats::StationSummary;
use log::info;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::task;

pub fn raw_file_name(station: &str) -> String {
    format!("{}_raw.csv", station)
}

pub fn station_file_name(station: &str) -> String {
    format!("{}_data.csv", station)
}

pub const COMBINED_FILE_NAME: &str = "combined.parquet";
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Saves the provider response for `station` unchanged.
pub async fn write_raw_text(output_dir: &Path, station: &str, text: &str) -> Result<PathBuf, ClimoError> {
    let path = output_dir.join(raw_file_name(station));
    tokio::fs::write(&path, text.as_bytes())
        .await
        .map_err(|e| ClimoError::FileWrite(path.clone(), e))?;
    Ok(path)
}

fn write_csv(path: &Path, mut df: DataFrame) -> Result<(), ClimoError> {
    let mut file = File::create(path).map_err(|e| ClimoError::FileWrite(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| ClimoError::FrameWrite(path.to_path_buf(), e))
}

fn write_parquet(path: &Path, mut df: DataFrame) -> Result<(), ClimoError> {
    let file = File::create(path).map_err(|e| ClimoError::FileWrite(path.to_path_buf(), e))?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .finish(&mut df)
        .map_err(|e| ClimoError::FrameWrite(path.to_path_buf(), e))?;
    Ok(())
}

/// Writes one station's classified table as CSV.
pub async fn write_station_csv(
    output_dir: &Path,
    station: &str,
    df: DataFrame,
) -> Result<PathBuf, ClimoError> {
    let path = output_dir.join(station_file_name(station));
    let target = path.clone();
    let rows = df.height();
    task::spawn_blocking(move || write_csv(&target, df)).await??;
    info!("Wrote {} rows for {} to {}", rows, station, path.display());
    Ok(path)
}

/// Writes the combined frame as Snappy-compressed Parquet.
pub async fn write_combined_parquet(output_dir: &Path, df: DataFrame) -> Result<PathBuf, ClimoError> {
    let path = output_dir.join(COMBINED_FILE_NAME);
    let target = path.clone();
    task::spawn_blocking(move || write_parquet(&target, df)).await??;
    info!("Wrote combined dataset to {}", path.display());
    Ok(path)
}

pub async fn write_summary_json(
    output_dir: &Path,
    summaries: &[StationSummary],
) -> Result<PathBuf, ClimoError> {
    let path = output_dir.join(SUMMARY_FILE_NAME);
    let bytes = serde_json::to_vec_pretty(summaries)?;
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| ClimoError::FileWrite(path.clone(), e))?;
    Ok(path)
}
