//! Pipeline and source configuration types.

use chrono::NaiveDate;
use outbreak_spi::{Metric, OutbreakError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default lower bound of a log-scale axis.
pub const DEFAULT_LOG_FLOOR: f64 = 10.0;

/// Default reload interval of cached sources, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60;

/// Last date hidden from log-scale views; earlier counts are too sparse to plot.
pub fn default_log_cutoff() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2020, 2, 16)
}

/// Whether charts show running totals or day-over-day notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricMode {
    /// Cumulative totals
    #[default]
    Cumulative,
    /// New cases per day with a 7-day mean
    DailyNew,
}

impl MetricMode {
    /// The metric plotted in this mode.
    pub fn plotted_metric(&self) -> Metric {
        match self {
            MetricMode::Cumulative => Metric::Confirmed,
            MetricMode::DailyNew => Metric::New,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricMode::Cumulative => "cumulative",
            MetricMode::DailyNew => "daily_new",
        }
    }
}

impl FromStr for MetricMode {
    type Err = OutbreakError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "cumulative" => Ok(MetricMode::Cumulative),
            "daily_new" | "daily-new" | "new" => Ok(MetricMode::DailyNew),
            other => Err(OutbreakError::Config(format!(
                "unknown metric mode '{}', expected 'cumulative' or 'daily_new'",
                other
            ))),
        }
    }
}

/// Selection made by the presentation layer for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Selected country names
    pub countries: BTreeSet<String>,
    pub metric_mode: MetricMode,
    /// Country whose population rescales every series, if any
    pub normalize_by: Option<String>,
    pub log_scale: bool,
    /// Lower bound of the log-scale domain
    pub log_floor: f64,
    /// Rows on or before this date are dropped from log-scale views
    pub log_cutoff: Option<NaiveDate>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            countries: BTreeSet::new(),
            metric_mode: MetricMode::Cumulative,
            normalize_by: None,
            log_scale: false,
            log_floor: DEFAULT_LOG_FLOOR,
            log_cutoff: default_log_cutoff(),
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)
            .map_err(|e| OutbreakError::Config(format!("invalid pipeline config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.log_floor.is_finite() || self.log_floor <= 0.0 {
            return Err(OutbreakError::Config(format!(
                "log_floor must be a positive number, got {}",
                self.log_floor
            )));
        }
        if let Some(country) = &self.normalize_by {
            if country.trim().is_empty() {
                return Err(OutbreakError::Config(
                    "normalize_by must name a country".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Selected countries in name order.
    pub fn country_list(&self) -> Vec<&str> {
        self.countries.iter().map(String::as_str).collect()
    }
}

/// Builder for PipelineConfig.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    countries: BTreeSet<String>,
    metric_mode: Option<MetricMode>,
    normalize_by: Option<String>,
    log_scale: bool,
    log_floor: Option<f64>,
    log_cutoff: Option<Option<NaiveDate>>,
}

impl PipelineConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a country to the selection.
    pub fn country(mut self, country: &str) -> Self {
        self.countries.insert(country.to_string());
        self
    }

    /// Add several countries to the selection.
    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries.extend(countries.into_iter().map(Into::into));
        self
    }

    pub fn metric_mode(mut self, mode: MetricMode) -> Self {
        self.metric_mode = Some(mode);
        self
    }

    pub fn normalize_by(mut self, country: &str) -> Self {
        self.normalize_by = Some(country.to_string());
        self
    }

    pub fn log_scale(mut self, enabled: bool) -> Self {
        self.log_scale = enabled;
        self
    }

    pub fn log_floor(mut self, floor: f64) -> Self {
        self.log_floor = Some(floor);
        self
    }

    /// Override the log-scale cutoff; `None` keeps every date.
    pub fn log_cutoff(mut self, cutoff: Option<NaiveDate>) -> Self {
        self.log_cutoff = Some(cutoff);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<PipelineConfig> {
        let config = PipelineConfig {
            countries: self.countries,
            metric_mode: self.metric_mode.unwrap_or_default(),
            normalize_by: self.normalize_by,
            log_scale: self.log_scale,
            log_floor: self.log_floor.unwrap_or(DEFAULT_LOG_FLOOR),
            log_cutoff: self.log_cutoff.unwrap_or_else(default_log_cutoff),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Upstream file names inside a time-series directory.
pub const CONFIRMED_FILE: &str = "time_series_covid19_confirmed_global.csv";
pub const DEATHS_FILE: &str = "time_series_covid19_deaths_global.csv";
pub const RECOVERED_FILE: &str = "time_series_covid19_recovered_global.csv";

/// Where the three cumulative tables live and how long to cache them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub confirmed: PathBuf,
    pub deaths: PathBuf,
    pub recovered: PathBuf,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl SourceConfig {
    pub fn new(
        confirmed: impl Into<PathBuf>,
        deaths: impl Into<PathBuf>,
        recovered: impl Into<PathBuf>,
    ) -> Self {
        Self {
            confirmed: confirmed.into(),
            deaths: deaths.into(),
            recovered: recovered.into(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }

    /// Use the upstream file names inside `dir`.
    pub fn from_dir(dir: &Path) -> Self {
        Self::new(
            dir.join(CONFIRMED_FILE),
            dir.join(DEATHS_FILE),
            dir.join(RECOVERED_FILE),
        )
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs();
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
