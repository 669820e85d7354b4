use chrono::NaiveDate;
use clap::Parser;
use log::{info, warn};
use station_climo::{
    ClassificationPolicy, ClimoConfig, ClimoError, ObservationPeriod, StationClimo,
    DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR, DEFAULT_STATIONS,
};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "station-climo")]
#[command(about = "Flight-rule climatology (VFR/MVFR/IFR/LIFR) of airport weather stations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Station identifier, repeatable (defaults to the built-in airport list)
    #[arg(short, long = "station", value_name = "ID")]
    stations: Vec<String>,

    /// First day of the period, inclusive (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the period, inclusive (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Threshold set: baseline or refined
    #[arg(long, default_value = "baseline")]
    policy: ClassificationPolicy,

    /// Output directory for per-station CSV files, combined.parquet and summary.json
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Cache directory for raw downloads (defaults to the system cache directory)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Write HTML charts to the output directory
    #[cfg(feature = "plotting")]
    #[arg(long)]
    plot: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn period(&self) -> Result<ObservationPeriod, ClimoError> {
        let start = self
            .start
            .or_else(|| NaiveDate::from_ymd_opt(DEFAULT_FIRST_YEAR, 1, 1))
            .unwrap_or_default();
        let end = self
            .end
            .or_else(|| NaiveDate::from_ymd_opt(DEFAULT_LAST_YEAR, 12, 31))
            .unwrap_or_default();
        ObservationPeriod::new(start, end).ok_or(ClimoError::InvalidPeriod { start, end })
    }

    fn into_config(self) -> Result<ClimoConfig, ClimoError> {
        let period = self.period()?;
        let stations = if self.stations.is_empty() {
            DEFAULT_STATIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.stations
        };
        Ok(ClimoConfig::builder()
            .stations(stations)
            .period(period)
            .policy(self.policy)
            .output_dir(self.output_dir)
            .maybe_cache_dir(self.cache_dir)
            .build())
    }
}

#[cfg(feature = "plotting")]
fn write_charts(
    run: &station_climo::ClimoRun,
    output_dir: &std::path::Path,
) -> polars::prelude::PolarsResult<()> {
    station_climo::write_category_charts(&run.by_station, output_dir);
    station_climo::write_sub_vfr_chart(&run.by_hour, "hour", output_dir)?;
    station_climo::write_sub_vfr_chart(&run.by_month, "month", output_dir)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    #[cfg(feature = "plotting")]
    let plot = args.plot;

    let config = args.into_config()?;
    let climo = StationClimo::for_config(&config).await?;
    let run = climo.run(&config).await?;

    for skipped in &run.skipped {
        warn!("{} was skipped: {}", skipped.station, skipped.error);
    }
    println!("{}", run.by_station);

    #[cfg(feature = "plotting")]
    if plot {
        write_charts(&run, &config.output_dir)?;
    }

    info!(
        "Processed {} stations ({} skipped), results in {}",
        run.combined.stations().len(),
        run.skipped.len(),
        config.output_dir.display()
    );
    Ok(())
}
