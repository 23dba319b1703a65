//! Metric identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A column of an aligned frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Cumulative confirmed cases
    Confirmed,
    /// Cumulative deaths
    Deaths,
    /// Cumulative recoveries
    Recovered,
    /// Confirmed minus deaths minus recovered
    Active,
    /// Day-over-day new confirmed cases
    New,
    /// Trailing 7-day mean of new cases
    Rolling7d,
}

impl Metric {
    /// Column label used in long series and output frames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
            Metric::Active => "active",
            Metric::New => "new",
            Metric::Rolling7d => "rolling_7d",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
