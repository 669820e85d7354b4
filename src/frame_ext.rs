use crate::types::period::ObservationPeriod;
use polars::prelude::{col, lit, DataType, LazyFrame, TimeUnit};

/// Lazy-frame helpers for frames produced by [`crate::CombinedDataset::to_frame`].
pub trait FlightRulesFrameExt {
    /// Adds `hour` (0-23) and `month` (1-12) columns derived from `valid`, both `Int32`.
    fn with_time_buckets(self) -> LazyFrame;

    /// Keeps rows whose `valid` timestamp falls inside `period` (inclusive).
    ///
    /// Potential type errors surface when the frame is collected.
    fn filter_period(self, period: ObservationPeriod) -> LazyFrame;

    /// Keeps rows tagged with `station`.
    fn filter_station(self, station: &str) -> LazyFrame;
}

impl FlightRulesFrameExt for LazyFrame {
    fn with_time_buckets(self) -> LazyFrame {
        self.with_columns([
            col("valid")
                .dt()
                .hour()
                .cast(DataType::Int32)
                .alias("hour"),
            col("valid")
                .dt()
                .month()
                .cast(DataType::Int32)
                .alias("month"),
        ])
    }

    fn filter_period(self, period: ObservationPeriod) -> LazyFrame {
        let start_naive = period.start_datetime().naive_utc();
        let end_naive = period.end_datetime().naive_utc();

        self.filter(
            col("valid")
                .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                .gt_eq(lit(start_naive))
                .and(
                    col("valid")
                        .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                        .lt_eq(lit(end_naive)),
                ),
        )
    }

    fn filter_station(self, station: &str) -> LazyFrame {
        self.filter(col("station").eq(lit(station.to_string())))
    }
}
