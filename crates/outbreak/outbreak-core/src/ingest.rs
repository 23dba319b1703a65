//! Reading upstream time-series CSV files into wide tables.

use outbreak_api::SourceConfig;
use outbreak_spi::{OutbreakError, Result, SeriesSnapshot, SeriesSource, WideSeries};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

/// Column naming the country of each row.
pub const COUNTRY_COLUMN: &str = "Country/Region";

/// Identifier columns dropped before reshaping.
pub const IDENTIFIER_COLUMNS: [&str; 4] = ["Province/State", COUNTRY_COLUMN, "Lat", "Long"];

/// Read a cumulative table, summing subregion rows into country totals.
///
/// Every non-identifier column is kept as a date column; headers are parsed
/// later by the reshaper. Blank cells count as zero. Rows come out sorted by
/// country name.
pub fn read_wide<R: Read>(reader: R) -> Result<WideSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| OutbreakError::Parse(format!("failed to read headers: {}", e)))?
        .clone();

    let country_idx = headers
        .iter()
        .position(|h| h == COUNTRY_COLUMN)
        .ok_or_else(|| OutbreakError::Parse(format!("missing '{}' column", COUNTRY_COLUMN)))?;

    let date_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !IDENTIFIER_COLUMNS.contains(h))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut totals: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    let mut subregions = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line
        let line = idx + 2;
        let record = result.map_err(|e| OutbreakError::Parse(format!("line {}: {}", line, e)))?;

        let country = record.get(country_idx).unwrap_or_default();
        if country.is_empty() {
            return Err(OutbreakError::Parse(format!("line {}: empty country", line)));
        }

        let sums = totals
            .entry(country.to_string())
            .or_insert_with(|| vec![0; date_columns.len()]);
        for (sum, (col, header)) in sums.iter_mut().zip(&date_columns) {
            let cell = record.get(*col).unwrap_or_default();
            let count = parse_count(cell).ok_or_else(|| {
                OutbreakError::Parse(format!(
                    "line {}, column {}: invalid count '{}'",
                    line, header, cell
                ))
            })?;
            *sum = sum.checked_add(count).ok_or_else(|| {
                OutbreakError::Parse(format!(
                    "line {}, column {}: count overflow",
                    line, header
                ))
            })?;
        }
        subregions += 1;
    }

    tracing::debug!(
        rows = subregions,
        countries = totals.len(),
        dates = date_columns.len(),
        "summed subregions into country totals"
    );

    WideSeries::from_rows(date_columns.into_iter().map(|(_, h)| h).collect(), totals)
}

/// Parse a cumulative count cell. Whole-valued decimals such as `12.0` are accepted.
fn parse_count(cell: &str) -> Option<u64> {
    if cell.is_empty() {
        return Some(0);
    }
    if let Ok(count) = cell.parse::<u64>() {
        return Some(count);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
        Some(value as u64)
    } else {
        None
    }
}

/// Series source backed by three CSV files on disk.
#[derive(Debug, Clone)]
pub struct CsvSeriesSource {
    config: SourceConfig,
}

impl CsvSeriesSource {
    pub fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Read one table from disk.
    pub fn read_file(path: &Path) -> Result<WideSeries> {
        let file = File::open(path).map_err(|e| {
            OutbreakError::Io(format!("failed to open '{}': {}", path.display(), e))
        })?;
        read_wide(BufReader::new(file)).map_err(|e| match e {
            OutbreakError::Parse(msg) => {
                OutbreakError::Parse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }
}

impl SeriesSource for CsvSeriesSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<Arc<SeriesSnapshot>> {
        let confirmed = Self::read_file(&self.config.confirmed)?;
        let deaths = Self::read_file(&self.config.deaths)?;
        let recovered = Self::read_file(&self.config.recovered)?;

        tracing::info!(
            countries = confirmed.len(),
            dates = confirmed.columns().len(),
            "loaded cumulative tables"
        );
        Ok(Arc::new(SeriesSnapshot::new(confirmed, deaths, recovered)))
    }
}
