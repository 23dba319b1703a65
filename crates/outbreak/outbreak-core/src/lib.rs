//! Outbreak Core
//!
//! Transformations from cumulative wide tables to chart-ready frames:
//!
//! - [`reshape`]: wide (country x date) to long records, and back with [`widen`]
//! - [`align`]: inner join of confirmed, deaths and recovered
//! - [`normalize`]: cases per 100,000 population
//! - [`daily_delta`] / [`rolling_mean_7d`]: new cases and their weekly mean
//! - [`fatality_ratio`] / [`rank_latest`] / [`log_domain`]: ratios, rankings, axis domains
//! - [`CsvSeriesSource`] / [`CachedSource`]: ingestion with a time-to-live cache
//! - [`run`]: the whole pipeline for one configuration

pub mod align;
pub mod cache;
pub mod delta;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod rank;
pub mod reshape;
pub mod scale;

pub use outbreak_spi::{OutbreakError, Result};

pub use align::align;
pub use cache::CachedSource;
pub use delta::{
    daily_delta, rolling_mean, rolling_mean_7d, with_daily_delta, with_rolling_mean,
    ROLLING_WINDOW_DAYS,
};
pub use ingest::{read_wide, CsvSeriesSource, COUNTRY_COLUMN, IDENTIFIER_COLUMNS};
pub use normalize::{normalize, per_100k, with_per_capita, PER_CAPITA_BASE};
pub use pipeline::{country_frame, run, PipelineOutput};
pub use rank::{case_fatality, fatality_from_frame, fatality_ratio, rank_latest};
pub use reshape::{
    format_header_date, parse_header_date, reshape, widen, HEADER_DATE_FORMAT,
    HEADER_DATE_WRITE_FORMAT,
};
pub use scale::{log_domain, LOG_EPSILON};
