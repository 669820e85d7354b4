//! HTML bar charts of average hours per year spent in each flight category,
//! and of the sub-VFR rate by hour of day and by month.

use crate::report::stats::HOURS_PER_YEAR;
use crate::types::flight_category::FlightCategory;
use log::info;
use plotlars::{BarPlot, Plot, Rgb, Text};
use polars::prelude::*;
use std::path::{Path, PathBuf};

fn category_color(category: FlightCategory) -> Rgb {
    match category {
        FlightCategory::Vfr => Rgb(46, 160, 67),
        FlightCategory::Mvfr => Rgb(31, 119, 180),
        FlightCategory::Ifr => Rgb(214, 39, 40),
        FlightCategory::Lifr => Rgb(188, 64, 188),
    }
}

/// File name of the chart for `category`, e.g. `average_IFR_hours_per_year.html`.
pub fn chart_file_name(category: FlightCategory) -> String {
    format!("average_{}_hours_per_year.html", category.name())
}

/// Writes one bar chart per category (station on the x axis) into `output_dir`.
///
/// `by_station` must be a collected [`crate::occurrence_by_station`] frame.
/// Returns the paths written.
pub fn write_category_charts(by_station: &DataFrame, output_dir: &Path) -> Vec<PathBuf> {
    FlightCategory::ALL
        .iter()
        .map(|category| {
            let path = output_dir.join(chart_file_name(*category));
            let title = format!("Average {} hours per year", category.name());
            let y_title = format!("Hours per year (of {:.0})", HOURS_PER_YEAR);
            BarPlot::builder()
                .data(by_station)
                .labels("station")
                .values(&format!("{}_hours_per_year", category.column_name()))
                .colors(vec![category_color(*category)])
                .plot_title(Text::from(title.as_str()).size(18))
                .x_title("Station")
                .y_title(y_title.as_str())
                .build()
                .write_html(path.to_string_lossy().into_owned());
            info!("Wrote {} chart to {}", category, path.display());
            path
        })
        .collect()
}

/// Writes a grouped bar chart of the sub-VFR rate per `bucket` (`"hour"` or `"month"`),
/// one bar group per station.
///
/// `by_bucket` must be a collected [`crate::occurrence_by_hour`] or
/// [`crate::occurrence_by_month`] frame.
pub fn write_sub_vfr_chart(
    by_bucket: &DataFrame,
    bucket: &str,
    output_dir: &Path,
) -> PolarsResult<PathBuf> {
    // Bar labels have to be text.
    let labelled = by_bucket
        .clone()
        .lazy()
        .with_column(col(bucket).cast(DataType::String))
        .collect()?;

    let path = output_dir.join(format!("sub_vfr_rate_by_{}.html", bucket));
    let title = format!("Sub-VFR rate by {}", bucket);
    BarPlot::builder()
        .data(&labelled)
        .labels(bucket)
        .values("sub_vfr_rate")
        .group("station")
        .plot_title(Text::from(title.as_str()).size(18))
        .x_title(bucket)
        .y_title("Rate")
        .build()
        .write_html(path.to_string_lossy().into_owned());
    info!("Wrote sub-VFR by {} chart to {}", bucket, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::dataset::{CombinedDataset, StationDataset};
    use crate::report::stats::{occurrence_by_hour, occurrence_by_month, occurrence_by_station};
    use crate::types::observation::{Observation, SkyLayer};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn frame() -> PolarsResult<DataFrame> {
        let make = |hour: u32, vis: f64| Observation {
            station: "MZJ".to_string(),
            valid: Utc.with_ymd_and_hms(2019, 8, 3, hour, 56, 0).unwrap(),
            visibility_mi: Some(vis),
            sky_layers: [SkyLayer::absent(); 3],
            gust_kt: None,
            wx_codes: None,
        };
        let classifier = Classifier::default();
        CombinedDataset::combine(vec![
            StationDataset::new("KMZJ", classifier.classify_all(vec![make(6, 10.0), make(7, 0.5)])),
            StationDataset::new("CYMX", classifier.classify_all(vec![make(6, 4.0)])),
        ])
        .to_frame()
    }

    #[test]
    fn test_write_charts() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let by_station = occurrence_by_station(frame()?.lazy()).collect()?;
        let written = write_category_charts(&by_station, dir.path());
        assert_eq!(written.len(), 4);
        for category in FlightCategory::ALL {
            assert!(dir.path().join(chart_file_name(category)).exists());
        }
        assert!(dir.path().join("average_LIFR_hours_per_year.html").exists());

        let by_hour = occurrence_by_hour(frame()?.lazy()).collect()?;
        let path = write_sub_vfr_chart(&by_hour, "hour", dir.path())?;
        assert_eq!(path, dir.path().join("sub_vfr_rate_by_hour.html"));
        assert!(path.exists());

        let by_month = occurrence_by_month(frame()?.lazy()).collect()?;
        assert!(write_sub_vfr_chart(&by_month, "month", dir.path())?.exists());
        Ok(())
    }
}
