//! Daily deltas and trailing calendar-window means.

use chrono::{Duration, NaiveDate};
use outbreak_spi::AlignedFrame;
use std::collections::HashMap;

/// Length of the smoothing window in calendar days.
pub const ROLLING_WINDOW_DAYS: i64 = 7;

/// Day-over-day differences of a cumulative series.
///
/// The first element has no predecessor and is `None`. Negative differences,
/// which come from downward revisions upstream, are clamped to zero.
pub fn daily_delta(values: &[f64]) -> Vec<Option<f64>> {
    let mut deltas = Vec::with_capacity(values.len());
    if values.is_empty() {
        return deltas;
    }
    deltas.push(None);
    deltas.extend(values.windows(2).map(|w| Some((w[1] - w[0]).max(0.0))));
    deltas
}

/// Trailing mean over a calendar window of `window_days` days ending at each date.
///
/// `dates` must be ascending. The window for date `t` is `(t - window_days, t]`,
/// so gaps in the series shrink the sample count rather than stretch the
/// window. Missing values are skipped; a window with no values yields `None`.
pub fn rolling_mean(dates: &[NaiveDate], values: &[Option<f64>], window_days: i64) -> Vec<Option<f64>> {
    let n = dates.len().min(values.len());
    let span = Duration::days(window_days);
    let mut result = Vec::with_capacity(n);
    let mut start = 0;

    for i in 0..n {
        while dates[start] + span <= dates[i] {
            start += 1;
        }
        let (sum, count) = values[start..=i]
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        result.push((count > 0).then(|| sum / count as f64));
    }

    result
}

/// Trailing 7-calendar-day mean.
pub fn rolling_mean_7d(dates: &[NaiveDate], values: &[Option<f64>]) -> Vec<Option<f64>> {
    rolling_mean(dates, values, ROLLING_WINDOW_DAYS)
}

/// Fill the `new` column from `confirmed`, each country on its own.
pub fn with_daily_delta(mut frame: AlignedFrame) -> AlignedFrame {
    let mut clamped = 0usize;
    for indices in country_groups(&frame) {
        let confirmed: Vec<f64> = indices.iter().map(|&i| frame.rows[i].confirmed).collect();
        clamped += confirmed.windows(2).filter(|w| w[1] < w[0]).count();
        for (&i, new) in indices.iter().zip(daily_delta(&confirmed)) {
            frame.rows[i].new = new;
        }
    }
    if clamped > 0 {
        tracing::debug!(clamped, "clamped negative daily deltas to zero");
    }
    frame
}

/// Fill the `rolling_7d` column from `new`, each country on its own.
pub fn with_rolling_mean(mut frame: AlignedFrame) -> AlignedFrame {
    for indices in country_groups(&frame) {
        let dates: Vec<NaiveDate> = indices.iter().map(|&i| frame.rows[i].date).collect();
        let new: Vec<Option<f64>> = indices.iter().map(|&i| frame.rows[i].new).collect();
        for (&i, mean) in indices.iter().zip(rolling_mean_7d(&dates, &new)) {
            frame.rows[i].rolling_7d = mean;
        }
    }
    frame
}

/// Row indices per country, each group in date order.
fn country_groups(frame: &AlignedFrame) -> Vec<Vec<usize>> {
    let mut slots: HashMap<Option<&str>, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (i, row) in frame.rows.iter().enumerate() {
        let slot = *slots.entry(row.country.as_deref()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }
    for group in &mut groups {
        group.sort_by_key(|&i| frame.rows[i].date);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbreak_spi::AlignedRow;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    #[test]
    fn test_daily_delta_clamps_revisions() {
        assert_eq!(
            daily_delta(&[100.0, 150.0, 140.0]),
            vec![None, Some(50.0), Some(0.0)]
        );
    }

    #[test]
    fn test_daily_delta_short_input() {
        assert!(daily_delta(&[]).is_empty());
        assert_eq!(daily_delta(&[7.0]), vec![None]);
    }

    #[test]
    fn test_daily_delta_never_negative() {
        let values = [5.0, 3.0, 9.0, 1.0, 1.0, 20.0, 0.0];
        assert!(daily_delta(&values).iter().flatten().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_rolling_mean_partial_history() {
        let dates: Vec<NaiveDate> = (1..=3).map(day).collect();
        let values = vec![None, Some(4.0), Some(8.0)];
        assert_eq!(rolling_mean_7d(&dates, &values), vec![None, Some(4.0), Some(6.0)]);
    }

    #[test]
    fn test_rolling_mean_constant_series() {
        let dates: Vec<NaiveDate> = (1..=20).map(day).collect();
        let values = vec![Some(3.5); 20];
        assert!(rolling_mean_7d(&dates, &values).iter().all(|m| *m == Some(3.5)));
    }

    #[test]
    fn test_rolling_mean_window_slides() {
        let dates: Vec<NaiveDate> = (1..=8).map(day).collect();
        let values: Vec<Option<f64>> = (1..=8).map(|v| Some(v as f64)).collect();
        let means = rolling_mean_7d(&dates, &values);
        // day 7 averages 1..=7, day 8 averages 2..=8
        assert_eq!(means[6], Some(4.0));
        assert_eq!(means[7], Some(5.0));
    }

    #[test]
    fn test_rolling_mean_calendar_window_with_gaps() {
        let dates = vec![day(1), day(2), day(9), day(10)];
        let values = vec![Some(10.0), Some(20.0), Some(30.0), Some(50.0)];
        let means = rolling_mean_7d(&dates, &values);
        // day 9's window is (2, 9], so day 1 and day 2 fall out
        assert_eq!(means, vec![Some(10.0), Some(15.0), Some(30.0), Some(40.0)]);
    }

    #[test]
    fn test_with_daily_delta_per_country() {
        let row = |d: u32, c: &str, v: f64| AlignedRow::new(day(d), Some(c.to_string()), v, 0.0, 0.0);
        let frame = AlignedFrame::from_rows(vec![
            row(1, "Italy", 10.0),
            row(1, "Spain", 100.0),
            row(2, "Italy", 15.0),
            row(2, "Spain", 90.0),
        ]);

        let frame = with_rolling_mean(with_daily_delta(frame));
        let new: Vec<Option<f64>> = frame.rows.iter().map(|r| r.new).collect();
        assert_eq!(new, vec![None, None, Some(5.0), Some(0.0)]);

        let rolling: Vec<Option<f64>> = frame.rows.iter().map(|r| r.rolling_7d).collect();
        assert_eq!(rolling, vec![None, None, Some(5.0), Some(0.0)]);
    }

    #[test]
    fn test_with_daily_delta_unordered_rows() {
        let frame = AlignedFrame::from_rows(vec![
            AlignedRow::new(day(3), None, 30.0, 0.0, 0.0),
            AlignedRow::new(day(1), None, 10.0, 0.0, 0.0),
            AlignedRow::new(day(2), None, 12.0, 0.0, 0.0),
        ]);
        let frame = with_daily_delta(frame);
        assert_eq!(frame.rows[1].new, None);
        assert_eq!(frame.rows[2].new, Some(2.0));
        assert_eq!(frame.rows[0].new, Some(18.0));
    }
}
