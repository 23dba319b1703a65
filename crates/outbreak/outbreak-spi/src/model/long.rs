//! Long (one record per date, country, metric) series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Join key shared by long records and aligned rows.
pub type SeriesKey = (NaiveDate, Option<String>);

/// A single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    pub date: NaiveDate,
    /// Absent for single-country series keyed by date alone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub metric: String,
    pub value: f64,
}

impl LongRecord {
    pub fn new(date: NaiveDate, country: Option<String>, metric: &str, value: f64) -> Self {
        Self {
            date,
            country,
            metric: metric.to_string(),
            value,
        }
    }

    /// The `(date, country)` join key.
    pub fn key(&self) -> SeriesKey {
        (self.date, self.country.clone())
    }
}

/// Ordered sequence of long records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LongSeries {
    pub records: Vec<LongRecord>,
}

impl LongSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<LongRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LongRecord> {
        self.records.iter()
    }

    /// Values in record order.
    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }
}

impl<'a> IntoIterator for &'a LongSeries {
    type Item = &'a LongRecord;
    type IntoIter = std::slice::Iter<'a, LongRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
