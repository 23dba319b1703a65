//! Wide (country x date) tables.

use super::header::canonical_header;
use crate::error::{OutbreakError, Result};
use serde::{Deserialize, Serialize};

/// One country's cumulative counts, one cell per date column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WideRow {
    /// Country name
    pub country: String,
    /// Cumulative counts in column order
    pub values: Vec<u64>,
}

/// A table with one row per country and one column per date.
///
/// Headers that name a date are stored in canonical `m/d/yy` form, so two
/// spellings of the same day compare equal. Other headers are kept verbatim
/// and rejected when the table is reshaped. Identifier columns (province,
/// coordinates) are never part of a `WideSeries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WideSeriesData")]
pub struct WideSeries {
    columns: Vec<String>,
    rows: Vec<WideRow>,
}

impl WideSeries {
    /// Create an empty table with the given date column headers.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.into_iter().map(canonical_header).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from headers and `(country, values)` rows.
    pub fn from_rows<S: Into<String>>(
        columns: Vec<String>,
        rows: impl IntoIterator<Item = (S, Vec<u64>)>,
    ) -> Result<Self> {
        let mut series = Self::new(columns);
        for (country, values) in rows {
            series.push_row(country, values)?;
        }
        Ok(series)
    }

    /// Append a country row.
    ///
    /// Fails when the row width differs from the column count or the country
    /// already has a row.
    pub fn push_row(&mut self, country: impl Into<String>, values: Vec<u64>) -> Result<()> {
        let country = country.into();
        if values.len() != self.columns.len() {
            return Err(OutbreakError::Parse(format!(
                "row '{}' has {} cells, expected {}",
                country,
                values.len(),
                self.columns.len()
            )));
        }
        if self.row(&country).is_some() {
            return Err(OutbreakError::Parse(format!(
                "duplicate row for country '{}'",
                country
            )));
        }
        self.rows.push(WideRow { country, values });
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    /// Look up a country's row.
    pub fn row(&self, country: &str) -> Option<&WideRow> {
        self.rows.iter().find(|r| r.country == country)
    }

    /// Country names in row order.
    pub fn countries(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.country.as_str()).collect()
    }

    /// Number of country rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep only the selected countries, preserving row order.
    ///
    /// Selected names without a row are ignored.
    pub fn select<S: AsRef<str>>(&self, countries: &[S]) -> WideSeries {
        let rows = self
            .rows
            .iter()
            .filter(|r| countries.iter().any(|c| c.as_ref() == r.country))
            .cloned()
            .collect();
        WideSeries {
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// Unchecked serialized form, validated through [`WideSeries::push_row`].
#[derive(Deserialize)]
struct WideSeriesData {
    columns: Vec<String>,
    rows: Vec<WideRow>,
}

impl TryFrom<WideSeriesData> for WideSeries {
    type Error = OutbreakError;

    fn try_from(data: WideSeriesData) -> Result<Self> {
        Self::from_rows(
            data.columns,
            data.rows.into_iter().map(|row| (row.country, row.values)),
        )
    }
}
