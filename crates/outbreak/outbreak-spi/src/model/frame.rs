//! Aligned frames: confirmed, deaths and recovered joined per date (and country).

use super::Metric;
use crate::error::{OutbreakError, Result};
use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// One joined observation.
///
/// `active` is not stored; it is derived from the three counts on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub country: Option<String>,
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
    /// Day-over-day new confirmed cases (undefined on a country's first date)
    pub new: Option<f64>,
    /// Trailing 7-calendar-day mean of `new`
    pub rolling_7d: Option<f64>,
    /// Cases per 100,000 population
    pub per_capita: Option<f64>,
}

impl AlignedRow {
    pub fn new(
        date: NaiveDate,
        country: Option<String>,
        confirmed: f64,
        deaths: f64,
        recovered: f64,
    ) -> Self {
        Self {
            date,
            country,
            confirmed,
            deaths,
            recovered,
            new: None,
            rolling_7d: None,
            per_capita: None,
        }
    }

    /// Confirmed minus deaths minus recovered. Not floored at zero.
    pub fn active(&self) -> f64 {
        self.confirmed - (self.deaths + self.recovered)
    }

    /// Read a metric column. Optional columns yield `None` until filled.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Confirmed => Some(self.confirmed),
            Metric::Deaths => Some(self.deaths),
            Metric::Recovered => Some(self.recovered),
            Metric::Active => Some(self.active()),
            Metric::New => self.new,
            Metric::Rolling7d => self.rolling_7d,
        }
    }

    /// Human-readable key for error messages.
    pub fn label(&self) -> String {
        match &self.country {
            Some(country) => format!("{} {}", country, self.date),
            None => self.date.to_string(),
        }
    }
}

impl Serialize for AlignedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AlignedRow", 9)?;
        state.serialize_field("date", &self.date)?;
        match &self.country {
            Some(country) => state.serialize_field("country", country)?,
            None => state.skip_field("country")?,
        }
        state.serialize_field("confirmed", &self.confirmed)?;
        state.serialize_field("deaths", &self.deaths)?;
        state.serialize_field("recovered", &self.recovered)?;
        state.serialize_field("active", &self.active())?;
        state.serialize_field("new", &self.new)?;
        state.serialize_field("rolling_7d", &self.rolling_7d)?;
        state.serialize_field("per_capita", &self.per_capita)?;
        state.end()
    }
}

/// Rows produced by joining the three cumulative series.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct AlignedFrame {
    pub rows: Vec<AlignedRow>,
}

impl AlignedFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<AlignedRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Turn an empty frame into [`OutbreakError::EmptyJoin`].
    pub fn non_empty(self) -> Result<Self> {
        if self.rows.is_empty() {
            Err(OutbreakError::EmptyJoin)
        } else {
            Ok(self)
        }
    }

    /// Distinct country keys in first-seen order.
    pub fn countries(&self) -> Vec<Option<&str>> {
        let mut seen: Vec<Option<&str>> = Vec::new();
        for row in &self.rows {
            let key = row.country.as_deref();
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen
    }

    /// Column values in row order; unfilled optional cells become `NaN`.
    pub fn column(&self, metric: Metric) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.value(metric).unwrap_or(f64::NAN))
            .collect()
    }

    /// Most recent date in the frame.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|r| r.date).max()
    }
}
