//! Outbreak API
//!
//! Configuration surface and the country population registry.
//!
//! - [`PipelineConfig`]: the selection a request is computed for
//! - [`SourceConfig`]: where cumulative tables come from and how long to cache them
//! - [`CountryRegistry`]: country to population (millions) lookup

mod config;
mod registry;

pub use config::{
    default_log_cutoff, MetricMode, PipelineConfig, PipelineConfigBuilder, SourceConfig,
    CONFIRMED_FILE, DEATHS_FILE, DEFAULT_CACHE_TTL_SECS, DEFAULT_LOG_FLOOR, RECOVERED_FILE,
};
pub use registry::CountryRegistry;
