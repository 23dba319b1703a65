//! Contracts implemented by sources and lookup tables.

mod population_lookup;
mod series_source;

pub use population_lookup::PopulationLookup;
pub use series_source::SeriesSource;
