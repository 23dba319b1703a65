//! Input snapshot.

use super::WideSeries;
use serde::{Deserialize, Serialize};

/// The three cumulative tables of one refresh, treated as immutable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub confirmed: WideSeries,
    pub deaths: WideSeries,
    pub recovered: WideSeries,
}

impl SeriesSnapshot {
    pub fn new(confirmed: WideSeries, deaths: WideSeries, recovered: WideSeries) -> Self {
        Self {
            confirmed,
            deaths,
            recovered,
        }
    }
}
