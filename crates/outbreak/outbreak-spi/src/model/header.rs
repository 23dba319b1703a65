//! Date column headers of wide tables.

use crate::error::{OutbreakError, Result};
use chrono::NaiveDate;

/// Format of date column headers (month/day/two-digit year, e.g. `1/22/20`).
pub const HEADER_DATE_FORMAT: &str = "%m/%d/%y";

/// Canonical header format, without zero padding.
pub const HEADER_DATE_WRITE_FORMAT: &str = "%-m/%-d/%y";

/// Parse a date column header. Zero-padded fields are accepted.
pub fn parse_header_date(header: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(header.trim(), HEADER_DATE_FORMAT)
        .map_err(|e| OutbreakError::MalformedDate(format!("'{}' ({})", header, e)))
}

/// Format a date as a canonical column header.
pub fn format_header_date(date: NaiveDate) -> String {
    date.format(HEADER_DATE_WRITE_FORMAT).to_string()
}

/// Rewrite a parseable header in canonical form; anything else is kept as is
/// and left for the reshaper to reject.
pub(crate) fn canonical_header(header: String) -> String {
    match parse_header_date(&header) {
        Ok(date) => format_header_date(date),
        Err(_) => header,
    }
}
