//! Series source trait definition.

use std::sync::Arc;

use crate::error::Result;
use crate::model::SeriesSnapshot;

/// Trait for sources of the three cumulative wide tables.
///
/// Sources are expected to return country totals: administrative subdivisions
/// already summed and identifier columns already dropped.
pub trait SeriesSource: Send + Sync {
    /// Source name.
    fn name(&self) -> &str;

    /// Load a snapshot of confirmed, deaths and recovered tables.
    fn load(&self) -> Result<Arc<SeriesSnapshot>>;
}
