//! Case-fatality ratios and latest-value rankings.

use crate::normalize::per_100k;
use outbreak_spi::{
    AlignedFrame, FatalityPoint, LongSeries, Metric, OutbreakError, PopulationLookup,
    RankedFrame, RankedRow, Result, SeriesKey,
};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Deaths as a percentage of confirmed cases; `NaN` when nothing is confirmed.
pub fn case_fatality(confirmed: f64, deaths: f64) -> f64 {
    if confirmed == 0.0 {
        f64::NAN
    } else {
        deaths / confirmed * 100.0
    }
}

/// Case-fatality ratio per date and country.
///
/// The two series are inner-joined on `(date, country)` in `confirmed` order.
/// Zero denominators produce `NaN` points rather than errors.
pub fn fatality_ratio(confirmed: &LongSeries, deaths: &LongSeries) -> Vec<FatalityPoint> {
    let deaths_by_key: HashMap<SeriesKey, f64> =
        deaths.iter().map(|r| (r.key(), r.value)).collect();

    confirmed
        .iter()
        .filter_map(|c| {
            let deaths = deaths_by_key.get(&c.key())?;
            Some(FatalityPoint {
                date: c.date,
                country: c.country.clone(),
                ratio: case_fatality(c.value, *deaths),
            })
        })
        .collect()
}

/// Case-fatality ratio for every row of an aligned frame.
pub fn fatality_from_frame(frame: &AlignedFrame) -> Vec<FatalityPoint> {
    frame
        .rows
        .iter()
        .map(|row| FatalityPoint {
            date: row.date,
            country: row.country.clone(),
            ratio: case_fatality(row.confirmed, row.deaths),
        })
        .collect()
}

/// Rank countries by the per-capita value of `metric` on their latest date.
///
/// Sorting uses the unrounded per-capita value, highest first, with `NaN`
/// last; ties keep first-seen order. Only `per_capita_display` is rounded.
pub fn rank_latest<L: PopulationLookup + ?Sized>(
    frame: &AlignedFrame,
    metric: Metric,
    lookup: &L,
) -> Result<RankedFrame> {
    let mut latest: Vec<usize> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for (i, row) in frame.rows.iter().enumerate() {
        let country = row
            .country
            .as_deref()
            .ok_or_else(|| OutbreakError::MissingCountry(row.label()))?;
        match slots.get(country) {
            Some(&slot) => {
                if row.date > frame.rows[latest[slot]].date {
                    latest[slot] = i;
                }
            }
            None => {
                slots.insert(country, latest.len());
                latest.push(i);
            }
        }
    }

    let mut rows = Vec::with_capacity(latest.len());
    for i in latest {
        let row = &frame.rows[i];
        let country = row.country.clone().unwrap_or_default();
        let population_millions = lookup.require(&country)?;
        let value = row.value(metric).unwrap_or(f64::NAN);
        let per_capita = per_100k(value, population_millions);
        rows.push(RankedRow {
            country,
            date: row.date,
            population_millions,
            value,
            per_capita,
            per_capita_display: round2(per_capita),
        });
    }

    rows.sort_by(|a, b| descending_nan_last(a.per_capita, b.per_capita));
    Ok(RankedFrame { rows })
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
