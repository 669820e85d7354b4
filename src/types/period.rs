//! Date-range types describing which observations to request.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Year(pub i32);

impl Year {
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A closed range of calendar days, `start..=end`, interpreted in UTC.
///
/// # Examples
///
/// ```
/// use station_climo::{ObservationPeriod, Year};
/// use chrono::NaiveDate;
///
/// let decade = ObservationPeriod::from_years(Year(2013), Year(2022)).unwrap();
/// assert_eq!(decade.start(), NaiveDate::from_ymd_opt(2013, 1, 1).unwrap());
/// assert_eq!(decade.end(), NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
/// assert_eq!(decade.to_string(), "2013-01-01..2022-12-31");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObservationPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ObservationPeriod {
    /// Creates a period, returning `None` if `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// January 1st of `first` through December 31st of `last`.
    pub fn from_years(first: Year, last: Year) -> Option<Self> {
        Self::new(
            NaiveDate::from_ymd_opt(first.0, 1, 1)?,
            NaiveDate::from_ymd_opt(last.0, 12, 31)?,
        )
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// First instant of the period.
    pub fn start_datetime(&self) -> DateTime<Utc> {
        self.start.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    /// Last instant of the period (23:59:59.999999 on the end day).
    pub fn end_datetime(&self) -> DateTime<Utc> {
        let last_micro = chrono::NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap_or(chrono::NaiveTime::MIN);
        self.end.and_time(last_micro).and_utc()
    }

    /// Day after `end`; the provider treats its end date as exclusive.
    pub(crate) fn exclusive_end(&self) -> NaiveDate {
        self.end.checked_add_days(Days::new(1)).unwrap_or(self.end)
    }

    pub fn contains(&self, datetime: DateTime<Utc>) -> bool {
        let date = datetime.date_naive();
        date >= self.start && date <= self.end
    }

    /// Number of calendar years touched by the period, counting partial years.
    pub fn year_span(&self) -> i32 {
        self.end.year() - self.start.year() + 1
    }
}

impl From<Year> for ObservationPeriod {
    fn from(year: Year) -> Self {
        // Every i32 year chrono can represent has a Jan 1st and Dec 31st.
        Self::from_years(year, year).unwrap_or(Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        })
    }
}

impl Display for ObservationPeriod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
