//! Data models for outbreak time series.

mod frame;
mod header;
mod log_domain;
mod long;
mod metric;
mod ranked;
mod snapshot;
mod wide;

pub use frame::{AlignedFrame, AlignedRow};
pub use header::{
    format_header_date, parse_header_date, HEADER_DATE_FORMAT, HEADER_DATE_WRITE_FORMAT,
};
pub use log_domain::LogDomain;
pub use long::{LongRecord, LongSeries, SeriesKey};
pub use metric::Metric;
pub use ranked::{FatalityPoint, RankedFrame, RankedRow};
pub use snapshot::SeriesSnapshot;
pub use wide::{WideRow, WideSeries};
