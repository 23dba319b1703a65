//! Outbreak Facade
//!
//! Epidemiological time series metrics for visualization: per-capita rates,
//! daily deltas, weekly means, case-fatality ratios and log-safe axis domains.
//!
//! This facade provides a single entry point:
//! - `outbreak_spi` - data model, errors and contracts
//! - `outbreak_api` - configuration and the population registry
//! - `outbreak_core` - transforms, ingestion, caching and the pipeline driver
//!
//! # Example
//!
//! ```rust,no_run
//! use outbreak::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let source = CsvSeriesSource::new(SourceConfig::from_dir(Path::new("data")));
//!     let snapshot = source.load()?;
//!
//!     let config = PipelineConfigBuilder::new()
//!         .countries(["Spain", "Italy"])
//!         .metric_mode(MetricMode::DailyNew)
//!         .build()?;
//!
//!     let output = run(&snapshot, &config, &CountryRegistry::default())?;
//!     for row in &output.ranking.rows {
//!         println!("{}: {:.2} per 100k", row.country, row.per_capita_display);
//!     }
//!     Ok(())
//! }
//! ```

// Re-export everything from SPI
pub use outbreak_spi::*;

// Re-export everything from API
pub use outbreak_api::*;

// Re-export everything from Core
pub use outbreak_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use outbreak_api::{
        CountryRegistry, MetricMode, PipelineConfig, PipelineConfigBuilder, SourceConfig,
    };
    pub use outbreak_core::{run, CachedSource, CsvSeriesSource, PipelineOutput};
    pub use outbreak_spi::{
        AlignedFrame, Metric, OutbreakError, PopulationLookup, RankedFrame, Result, SeriesSource,
        WideSeries,
    };
}
