use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Unsupported range: {0:?} (expected one of 1d, 5d, 1mo, 6mo, ytd, 1y, 5y)")]
    Unsupported(String),
}

/// Lookback window for the historical chart.
///
/// The serialized form is the token the chart endpoint accepts for its
/// `range` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Range {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Range {
    /// Every supported range, shortest first.
    pub const ALL: [Range; 7] = [
        Range::OneDay,
        Range::FiveDays,
        Range::OneMonth,
        Range::SixMonths,
        Range::YearToDate,
        Range::OneYear,
        Range::FiveYears,
    ];

    pub fn as_token(&self) -> &'static str {
        match self {
            Range::OneDay => "1d",
            Range::FiveDays => "5d",
            Range::OneMonth => "1mo",
            Range::SixMonths => "6mo",
            Range::YearToDate => "ytd",
            Range::OneYear => "1y",
            Range::FiveYears => "5y",
        }
    }

    /// First calendar day (inclusive) of a window that ends on `end`.
    ///
    /// `5d` reaches back six calendar days so that five trading sessions are
    /// covered across a weekend.
    pub fn window_start(&self, end: NaiveDate) -> NaiveDate {
        let start = match self {
            Range::OneDay => Some(end),
            Range::FiveDays => end.checked_sub_days(Days::new(6)),
            Range::OneMonth => end.checked_sub_months(Months::new(1)),
            Range::SixMonths => end.checked_sub_months(Months::new(6)),
            Range::YearToDate => NaiveDate::from_ymd_opt(end.year(), 1, 1),
            Range::OneYear => end.checked_sub_months(Months::new(12)),
            Range::FiveYears => end.checked_sub_months(Months::new(60)),
        };
        start.unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Range::ALL
            .into_iter()
            .find(|r| r.as_token().eq_ignore_ascii_case(token))
            .ok_or_else(|| RangeError::Unsupported(s.to_string()))
    }
}
