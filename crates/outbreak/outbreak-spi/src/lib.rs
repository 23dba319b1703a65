//! Outbreak Service Provider Interface
//!
//! Defines the data model, error taxonomy and contracts shared by the
//! outbreak metrics pipeline.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::{PopulationLookup, SeriesSource};
pub use error::{OutbreakError, Result};
pub use model::{
    format_header_date, parse_header_date, AlignedFrame, AlignedRow, FatalityPoint, LogDomain,
    LongRecord, LongSeries, Metric, RankedFrame, RankedRow, SeriesKey, SeriesSnapshot, WideRow,
    WideSeries, HEADER_DATE_FORMAT, HEADER_DATE_WRITE_FORMAT,
};

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    #[test]
    fn test_metric_as_str() {
        assert_eq!(Metric::Confirmed.as_str(), "confirmed");
        assert_eq!(Metric::Deaths.as_str(), "deaths");
        assert_eq!(Metric::Recovered.as_str(), "recovered");
        assert_eq!(Metric::Active.as_str(), "active");
        assert_eq!(Metric::New.as_str(), "new");
        assert_eq!(Metric::Rolling7d.to_string(), "rolling_7d");
    }

    #[test]
    fn test_lookup_require() {
        let mut table = BTreeMap::new();
        table.insert("Spain".to_string(), 46.75);

        assert_eq!(table.require("Spain"), Ok(46.75));
        assert_eq!(
            table.require("Atlantis"),
            Err(OutbreakError::UnknownCountry("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_long_record_key() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 22).unwrap();
        let record = LongRecord::new(date, Some("Italy".to_string()), "confirmed", 3.0);
        assert_eq!(record.key(), (date, Some("Italy".to_string())));
    }

    #[test]
    fn test_log_domain_clamp() {
        let domain = LogDomain {
            low: 10.0,
            high: 2000.0,
            values: vec![],
        };
        assert_eq!(domain.clamp(0.5), 10.0);
        assert_eq!(domain.clamp(5000.0), 2000.0);
        assert_eq!(domain.bounds(), (10.0, 2000.0));
    }
}
