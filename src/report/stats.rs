//! Occurrence statistics over a combined, classified frame.
//!
//! All functions take and return lazy frames so callers can chain filters
//! (e.g. [`crate::FlightRulesFrameExt::filter_period`]) before aggregating.

use crate::frame_ext::FlightRulesFrameExt;
use crate::types::flight_category::FlightCategory;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean hours in a year, used to turn an occurrence rate into hours per year.
pub const HOURS_PER_YEAR: f64 = 365.25 * 24.0;

fn count_column(category: FlightCategory) -> String {
    format!("{}_count", category.column_name())
}

fn rate_column(category: FlightCategory) -> String {
    format!("{}_rate", category.column_name())
}

fn hours_per_year_column(category: FlightCategory) -> String {
    format!("{}_hours_per_year", category.column_name())
}

fn rate_aggregations() -> Vec<Expr> {
    let mut aggs = vec![len().cast(DataType::Int64).alias("observations")];
    for category in FlightCategory::ALL {
        let flag = category.column_name();
        aggs.push(col(flag).cast(DataType::Int64).sum().alias(count_column(category)));
        aggs.push(col(flag).cast(DataType::Float64).mean().alias(rate_column(category)));
    }
    aggs.push(
        col("vfr")
            .not()
            .cast(DataType::Float64)
            .mean()
            .alias("sub_vfr_rate"),
    );
    aggs
}

/// Per station: observation count, per-category count and rate, sub-VFR rate,
/// and average hours per year in each category (`rate * 365.25 * 24`).
///
/// `sub_vfr_rate` counts every row whose `vfr` flag is false, including rows
/// with missing visibility.
///
/// Sorted by station.
pub fn occurrence_by_station(frame: LazyFrame) -> LazyFrame {
    let hours_per_year: Vec<Expr> = FlightCategory::ALL
        .iter()
        .map(|category| {
            (col(rate_column(*category)) * lit(HOURS_PER_YEAR))
                .alias(hours_per_year_column(*category))
        })
        .collect();

    frame
        .group_by([col("station")])
        .agg(rate_aggregations())
        .with_columns(hours_per_year)
        .sort_by_exprs([col("station")], SortMultipleOptions::default())
}

/// Per station and hour of day (UTC): observation count and per-category counts and rates.
pub fn occurrence_by_hour(frame: LazyFrame) -> LazyFrame {
    frame
        .with_time_buckets()
        .group_by([col("station"), col("hour")])
        .agg(rate_aggregations())
        .sort_by_exprs([col("station"), col("hour")], SortMultipleOptions::default())
}

/// Per station and calendar month: observation count and per-category counts and rates.
pub fn occurrence_by_month(frame: LazyFrame) -> LazyFrame {
    frame
        .with_time_buckets()
        .group_by([col("station"), col("month")])
        .agg(rate_aggregations())
        .sort_by_exprs([col("station"), col("month")], SortMultipleOptions::default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub count: i64,
    pub rate: f64,
    pub hours_per_year: f64,
}

/// One row of [`occurrence_by_station`] in serializable form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationSummary {
    pub station: String,
    pub observations: i64,
    /// Share of observations without the VFR flag. Observations with missing
    /// visibility carry no flag at all, so they count as sub-VFR here.
    pub sub_vfr_rate: f64,
    /// Keyed by category name (`"VFR"`, `"MVFR"`, ...).
    pub categories: BTreeMap<String, CategoryStats>,
}

impl StationSummary {
    pub fn category(&self, category: FlightCategory) -> Option<&CategoryStats> {
        self.categories.get(category.name())
    }
}

/// Reads a collected [`occurrence_by_station`] frame into [`StationSummary`] values.
pub fn station_summaries(by_station: &DataFrame) -> PolarsResult<Vec<StationSummary>> {
    let station = by_station.column("station")?.str()?;
    let observations = by_station.column("observations")?.i64()?;
    let sub_vfr_rate = by_station.column("sub_vfr_rate")?.f64()?;

    let mut per_category = Vec::with_capacity(FlightCategory::ALL.len());
    for category in FlightCategory::ALL {
        per_category.push((
            category,
            by_station.column(&count_column(category))?.i64()?,
            by_station.column(&rate_column(category))?.f64()?,
            by_station.column(&hours_per_year_column(category))?.f64()?,
        ));
    }

    let mut summaries = Vec::with_capacity(by_station.height());
    for idx in 0..by_station.height() {
        let categories = per_category
            .iter()
            .map(|(category, count, rate, hours)| {
                (
                    category.name().to_string(),
                    CategoryStats {
                        count: count.get(idx).unwrap_or(0),
                        rate: rate.get(idx).unwrap_or(0.0),
                        hours_per_year: hours.get(idx).unwrap_or(0.0),
                    },
                )
            })
            .collect();

        summaries.push(StationSummary {
            station: station.get(idx).unwrap_or_default().to_string(),
            observations: observations.get(idx).unwrap_or(0),
            sub_vfr_rate: sub_vfr_rate.get(idx).unwrap_or(0.0),
            categories,
        });
    }
    Ok(summaries)
}
