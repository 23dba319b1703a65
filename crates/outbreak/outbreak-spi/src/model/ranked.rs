//! Ranking and ratio outputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A country's latest observation with its per-capita value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub country: String,
    /// Date of the latest observation
    pub date: NaiveDate,
    /// Population in millions
    pub population_millions: f64,
    /// Raw metric value
    pub value: f64,
    /// Cases per 100,000 population, unrounded
    pub per_capita: f64,
    /// `per_capita` rounded to 2 decimals for display
    pub per_capita_display: f64,
}

/// Countries sorted by descending per-capita value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedFrame {
    pub rows: Vec<RankedRow>,
}

impl RankedFrame {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, country: &str) -> Option<&RankedRow> {
        self.rows.iter().find(|r| r.country == country)
    }

    /// Country names in rank order.
    pub fn countries(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.country.as_str()).collect()
    }
}

/// Case-fatality ratio (percent) at one date.
///
/// `ratio` is `NaN` when no cases were confirmed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatalityPoint {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub ratio: f64,
}
