//! Per-capita normalization.

use outbreak_spi::{AlignedFrame, LongSeries, Metric, OutbreakError, PopulationLookup, Result};

/// Population base of per-capita rates.
pub const PER_CAPITA_BASE: f64 = 100_000.0;

const MILLION: f64 = 1_000_000.0;

/// Scale a count to cases per 100,000 population.
pub fn per_100k(value: f64, population_millions: f64) -> f64 {
    value / (population_millions * MILLION) * PER_CAPITA_BASE
}

/// Rescale every `metric` record of `series` by `country`'s population.
///
/// `country == None` returns the series unchanged under the same metric name.
/// Records of other metrics pass through untouched. The result is not rounded,
/// and applying it twice divides twice.
pub fn normalize<L: PopulationLookup + ?Sized>(
    series: &LongSeries,
    metric: &str,
    country: Option<&str>,
    lookup: &L,
) -> Result<LongSeries> {
    let country = match country {
        Some(country) => country,
        None => return Ok(series.clone()),
    };
    let population = lookup.require(country)?;

    let records = series
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if record.metric == metric {
                record.value = per_100k(record.value, population);
            }
            record
        })
        .collect();

    tracing::debug!(metric, country, population, "normalized series per 100k");
    Ok(LongSeries::from_records(records))
}

/// Fill `per_capita` from each row's own country and `metric` value.
///
/// Rows whose metric is not filled yet keep `per_capita == None`.
pub fn with_per_capita<L: PopulationLookup + ?Sized>(
    mut frame: AlignedFrame,
    metric: Metric,
    lookup: &L,
) -> Result<AlignedFrame> {
    for row in &mut frame.rows {
        let country = row
            .country
            .as_deref()
            .ok_or_else(|| OutbreakError::MissingCountry(row.label()))?;
        let population = lookup.require(country)?;
        row.per_capita = row.value(metric).map(|v| per_100k(v, population));
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use outbreak_spi::{AlignedRow, LongRecord};
    use std::collections::BTreeMap;

    fn lookup() -> BTreeMap<String, f64> {
        BTreeMap::from([("Atlantis".to_string(), 10.0), ("Spain".to_string(), 46.75)])
    }

    fn series(values: &[f64]) -> LongSeries {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        LongSeries::from_records(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    LongRecord::new(start + chrono::Duration::days(i as i64), None, "confirmed", *v)
                })
                .collect(),
        )
    }

    #[test]
    fn test_per_100k() {
        assert_eq!(per_100k(50_000.0, 10.0), 500.0);
        assert_eq!(per_100k(0.0, 46.75), 0.0);
    }

    #[test]
    fn test_normalize_exact_formula() {
        let result = normalize(&series(&[50_000.0, 4675.0]), "confirmed", Some("Spain"), &lookup())
            .unwrap();
        assert_eq!(result.records[0].value, 50_000.0 / (46.75 * 1e6) * 1e5);
        assert_eq!(result.records[1].value, 4675.0 / (46.75 * 1e6) * 1e5);
    }

    #[test]
    fn test_normalize_identity_without_target() {
        let input = series(&[1.0, 2.0, 3.0]);
        let result = normalize(&input, "confirmed", None, &lookup()).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_normalize_other_metric_untouched() {
        let input = series(&[1000.0]);
        let result = normalize(&input, "deaths", Some("Atlantis"), &lookup()).unwrap();
        assert_eq!(result.records[0].value, 1000.0);
    }

    #[test]
    fn test_normalize_unknown_country() {
        let result = normalize(&series(&[1.0]), "confirmed", Some("Narnia"), &lookup());
        assert_eq!(result, Err(OutbreakError::UnknownCountry("Narnia".to_string())));
    }

    #[test]
    fn test_normalize_is_not_idempotent() {
        let once = normalize(&series(&[50_000.0]), "confirmed", Some("Atlantis"), &lookup()).unwrap();
        let twice = normalize(&once, "confirmed", Some("Atlantis"), &lookup()).unwrap();

        assert_eq!(once.records[0].value, 500.0);
        assert_eq!(twice.records[0].value, 500.0 / (10.0 * 1e6) * 1e5);
        assert_ne!(once, twice);
    }

    #[test]
    fn test_with_per_capita() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let frame = AlignedFrame::from_rows(vec![AlignedRow::new(
            date,
            Some("Atlantis".to_string()),
            50_000.0,
            0.0,
            0.0,
        )]);
        let frame = with_per_capita(frame, Metric::Confirmed, &lookup()).unwrap();
        assert_eq!(frame.rows[0].per_capita, Some(500.0));
    }

    #[test]
    fn test_with_per_capita_requires_country_key() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let frame = AlignedFrame::from_rows(vec![AlignedRow::new(date, None, 1.0, 0.0, 0.0)]);
        assert!(matches!(
            with_per_capita(frame, Metric::Confirmed, &lookup()),
            Err(OutbreakError::MissingCountry(_))
        ));
    }
}
