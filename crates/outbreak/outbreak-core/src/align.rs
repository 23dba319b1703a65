//! Joining confirmed, deaths and recovered series into one frame.

use outbreak_spi::{AlignedFrame, AlignedRow, LongSeries, SeriesKey};
use std::collections::HashMap;

/// Inner-join the three series on `(date, country)`.
///
/// Keys missing from any series are dropped rather than filled, so `active`
/// is never computed from a missing count. Row order follows `confirmed`.
/// Empty input yields an empty frame.
pub fn align(confirmed: &LongSeries, deaths: &LongSeries, recovered: &LongSeries) -> AlignedFrame {
    let deaths_by_key = index(deaths);
    let recovered_by_key = index(recovered);

    let rows: Vec<AlignedRow> = confirmed
        .iter()
        .filter_map(|c| {
            let key = c.key();
            let deaths = deaths_by_key.get(&key)?;
            let recovered = recovered_by_key.get(&key)?;
            Some(AlignedRow::new(
                c.date,
                c.country.clone(),
                c.value,
                *deaths,
                *recovered,
            ))
        })
        .collect();

    let dropped = confirmed.len() - rows.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = rows.len(), "inner join dropped unmatched keys");
    }

    AlignedFrame::from_rows(rows)
}

fn index(series: &LongSeries) -> HashMap<SeriesKey, f64> {
    series.iter().map(|r| (r.key(), r.value)).collect()
}
