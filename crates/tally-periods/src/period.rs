//! Reporting period tokens.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PeriodError;

/// A reporting period ending "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Last7Days,
        Period::Last30Days,
        Period::Last90Days,
        Period::YearToDate,
    ];

    /// Returns the period token (`7d`, `30d`, `90d`, `ytd`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Last90Days => "90d",
            Self::YearToDate => "ytd",
        }
    }

    /// Window length for rolling periods; `None` for year-to-date.
    pub fn rolling_days(self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::YearToDate => None,
        }
    }

    /// Start of the period for the given "now".
    ///
    /// Rolling periods start exactly `n` days before `now`; year-to-date
    /// starts at January 1, 00:00 UTC of `now`'s year.
    pub fn start_at(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.rolling_days() {
            Some(days) => now - TimeDelta::days(days),
            None => start_of_year(now),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(Self::Last7Days),
            "30d" => Ok(Self::Last30Days),
            "90d" => Ok(Self::Last90Days),
            "ytd" => Ok(Self::YearToDate),
            _ => Err(PeriodError::UnknownPeriod(s.to_string())),
        }
    }
}

fn start_of_year(now: DateTime<Utc>) -> DateTime<Utc> {
    // January 1 exists for every year a DateTime<Utc> can hold.
    NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map_or(now, |naive| naive.and_utc())
}

/// Start of `period` relative to the current time.
pub fn period_start(period: Period) -> DateTime<Utc> {
    period.start_at(Utc::now())
}

/// Start of `period` relative to `now`.
pub fn period_start_at(period: Period, now: DateTime<Utc>) -> DateTime<Utc> {
    period.start_at(now)
}
