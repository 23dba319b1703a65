//! Error types.

mod outbreak_error;

pub use outbreak_error::{OutbreakError, Result};
