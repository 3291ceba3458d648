use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Requested chart window.
///
/// `1D` is served from intraday snapshots (today only); every other range
/// is served from daily snapshots bounded by a calendar offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    OneDay,
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl TimeRange {
    /// Start date for a range-bounded daily series, counting back from
    /// `today`. `OneDay` has no daily offset; it reads intraday rows.
    pub fn start_date(self, today: NaiveDate) -> NaiveDate {
        match self {
            TimeRange::OneDay => today,
            TimeRange::OneWeek => today.checked_sub_days(Days::new(7)).unwrap_or(today),
            TimeRange::OneMonth => today.checked_sub_months(Months::new(1)).unwrap_or(today),
            TimeRange::ThreeMonths => today.checked_sub_months(Months::new(3)).unwrap_or(today),
            TimeRange::SixMonths => today.checked_sub_months(Months::new(6)).unwrap_or(today),
            TimeRange::OneYear => today.checked_sub_months(Months::new(12)).unwrap_or(today),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TimeRange::OneDay => "1D",
            TimeRange::OneWeek => "1W",
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::SixMonths => "6M",
            TimeRange::OneYear => "1YR",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for TimeRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1D" => Ok(TimeRange::OneDay),
            "1W" => Ok(TimeRange::OneWeek),
            "1M" => Ok(TimeRange::OneMonth),
            "3M" => Ok(TimeRange::ThreeMonths),
            "6M" => Ok(TimeRange::SixMonths),
            "1YR" => Ok(TimeRange::OneYear),
            _ => Err(CoreError::validation_field(
                "range",
                format!("Unsupported range '{s}'. Must be one of 1D, 1W, 1M, 3M, 6M, 1YR."),
            )),
        }
    }
}

/// A single point of a wallet's value series, ready for the frontend.
///
/// Intraday points carry no label; daily points label themselves with the
/// snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Unix epoch milliseconds (UTC)
    pub timestamp: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    pub total_value: f64,
    pub total_cost_basis: f64,
}
