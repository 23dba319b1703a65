//! Log-scale axis domains.

use outbreak_spi::LogDomain;

/// Shift applied to every value before it reaches a log axis, so zero counts
/// stay plottable.
pub const LOG_EPSILON: f64 = 1e-5;

/// Domain of a log-scale axis over `values`.
///
/// Each value is shifted by [`LOG_EPSILON`]. The lower bound is `floor`, the
/// upper bound the integer part of the largest shifted value, and every shifted
/// value is clamped into the bounds. When nothing reaches the floor the domain
/// collapses to `(floor, floor)`.
pub fn log_domain(values: &[f64], floor: f64) -> LogDomain {
    let shifted: Vec<f64> = values.iter().map(|v| v + LOG_EPSILON).collect();
    let max = shifted
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let high = if max.is_finite() { max.trunc().max(floor) } else { floor };

    let clamped = shifted.iter().map(|v| v.max(floor).min(high)).collect();

    LogDomain {
        low: floor,
        high,
        values: clamped,
    }
}
