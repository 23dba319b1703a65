//! Wide to long reshaping and the inverse pivot.

use chrono::NaiveDate;
use outbreak_spi::{LongRecord, LongSeries, OutbreakError, Result, WideSeries};
use std::collections::BTreeSet;

pub use outbreak_spi::{
    format_header_date, parse_header_date, HEADER_DATE_FORMAT, HEADER_DATE_WRITE_FORMAT,
};

/// Melt a wide table into long records labelled `value_label`.
///
/// With `country_keyed == false` the table must hold at most one country and
/// records are keyed by date alone. Records come out in ascending date order,
/// ties in table row order. Every header is parsed before any record is
/// produced, so a bad header yields no partial output.
pub fn reshape(wide: &WideSeries, value_label: &str, country_keyed: bool) -> Result<LongSeries> {
    if !country_keyed && wide.len() > 1 {
        return Err(OutbreakError::Config(format!(
            "reshape without country keys needs a single country, got {}",
            wide.len()
        )));
    }

    let mut dated = wide
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, header)| parse_header_date(header).map(|date| (date, idx)))
        .collect::<Result<Vec<_>>>()?;
    dated.sort_by_key(|(date, _)| *date);

    if let Some(pair) = dated.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(OutbreakError::DuplicateDate(pair[1].0.to_string()));
    }

    let mut records = Vec::with_capacity(dated.len() * wide.len());
    for (date, idx) in &dated {
        for row in wide.rows() {
            let country = country_keyed.then(|| row.country.clone());
            records.push(LongRecord::new(
                *date,
                country,
                value_label,
                row.values[*idx] as f64,
            ));
        }
    }

    tracing::debug!(
        metric = value_label,
        countries = wide.len(),
        dates = dated.len(),
        records = records.len(),
        "reshaped wide series"
    );
    Ok(LongSeries::from_records(records))
}

/// Pivot a single-metric long series back into a wide table.
///
/// Countries keep first-seen order, dates are ascending. Records without a
/// country fold into one row with an empty name. Missing cells read as zero.
pub fn widen(long: &LongSeries) -> Result<WideSeries> {
    let dates: Vec<NaiveDate> = long
        .iter()
        .map(|r| r.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut rows: Vec<(String, Vec<u64>)> = Vec::new();
    for record in long {
        let country = record.country.clone().unwrap_or_default();
        let pos = match rows.iter().position(|(c, _)| *c == country) {
            Some(pos) => pos,
            None => {
                rows.push((country, vec![0; dates.len()]));
                rows.len() - 1
            }
        };
        // dates were collected from these same records
        if let Ok(col) = dates.binary_search(&record.date) {
            rows[pos].1[col] = record.value.max(0.0).round() as u64;
        }
    }

    let columns = dates.into_iter().map(format_header_date).collect();
    WideSeries::from_rows(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> WideSeries {
        WideSeries::from_rows(
            headers(&["1/22/20", "1/23/20", "1/24/20"]),
            vec![("Italy", vec![0, 2, 5]), ("Spain", vec![1, 1, 3])],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_header_date() {
        assert_eq!(
            parse_header_date("1/22/20").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 22).unwrap()
        );
        assert_eq!(
            parse_header_date("12/31/21").unwrap(),
            NaiveDate::from_ymd_opt(2021, 12, 31).unwrap()
        );
        assert!(matches!(
            parse_header_date("2020-01-22"),
            Err(OutbreakError::MalformedDate(_))
        ));
        assert!(parse_header_date("13/01/20").is_err());
    }

    #[test]
    fn test_format_header_date() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 5).unwrap();
        assert_eq!(format_header_date(date), "3/5/20");
    }

    #[test]
    fn test_reshape_keyed_order() {
        let long = reshape(&sample(), "confirmed", true).unwrap();
        assert_eq!(long.len(), 6);

        let keys: Vec<(u32, &str, f64)> = long
            .iter()
            .map(|r| {
                use chrono::Datelike;
                (r.date.day(), r.country.as_deref().unwrap(), r.value)
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                (22, "Italy", 0.0),
                (22, "Spain", 1.0),
                (23, "Italy", 2.0),
                (23, "Spain", 1.0),
                (24, "Italy", 5.0),
                (24, "Spain", 3.0),
            ]
        );
        assert!(long.iter().all(|r| r.metric == "confirmed"));
    }

    #[test]
    fn test_reshape_sorts_unordered_columns() {
        let wide = WideSeries::from_rows(
            headers(&["2/1/20", "1/31/20"]),
            vec![("Japan", vec![20, 15])],
        )
        .unwrap();
        let long = reshape(&wide, "deaths", false).unwrap();
        assert_eq!(long.values(), vec![15.0, 20.0]);
        assert!(long.iter().all(|r| r.country.is_none()));
    }

    #[test]
    fn test_reshape_unkeyed_requires_single_country() {
        assert!(matches!(
            reshape(&sample(), "confirmed", false),
            Err(OutbreakError::Config(_))
        ));
    }

    #[test]
    fn test_reshape_malformed_header_is_fatal() {
        let wide = WideSeries::from_rows(
            headers(&["1/22/20", "Lat"]),
            vec![("Italy", vec![0, 41])],
        )
        .unwrap();
        let result = reshape(&wide, "confirmed", true);
        assert!(matches!(result, Err(OutbreakError::MalformedDate(_))));
    }

    #[test]
    fn test_reshape_duplicate_date() {
        let wide = WideSeries::from_rows(
            headers(&["1/22/20", "01/22/20"]),
            vec![("Italy", vec![0, 1])],
        )
        .unwrap();
        assert!(matches!(
            reshape(&wide, "confirmed", true),
            Err(OutbreakError::DuplicateDate(_))
        ));
    }

    #[test]
    fn test_reshape_empty() {
        let wide = WideSeries::new(headers(&["1/22/20"]));
        assert!(reshape(&wide, "confirmed", true).unwrap().is_empty());
    }

    #[test]
    fn test_widen_recovers_original() {
        let wide = sample();
        let long = reshape(&wide, "confirmed", true).unwrap();
        assert_eq!(widen(&long).unwrap(), wide);
    }

    #[test]
    fn test_widen_recovers_padded_headers() {
        let wide = WideSeries::from_rows(
            headers(&["01/22/20", "01/23/20", "02/01/20"]),
            vec![("Italy", vec![0, 2, 5])],
        )
        .unwrap();
        let back = widen(&reshape(&wide, "confirmed", true).unwrap()).unwrap();
        assert_eq!(back, wide);
        assert_eq!(back.columns(), &headers(&["1/22/20", "1/23/20", "2/1/20"])[..]);
    }
}
