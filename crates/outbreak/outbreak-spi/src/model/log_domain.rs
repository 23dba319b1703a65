//! Log-scale axis domain.

use serde::{Deserialize, Serialize};

/// Axis bounds for a logarithmic chart plus the values forced into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDomain {
    pub low: f64,
    pub high: f64,
    /// Input values after the epsilon shift, clamped into `[low, high]`
    pub values: Vec<f64>,
}

impl LogDomain {
    /// Bounds as a tuple.
    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// Clamp an arbitrary value into the domain.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }
}
