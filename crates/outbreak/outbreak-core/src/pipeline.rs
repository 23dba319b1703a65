//! The request-scoped pipeline driven by a [`PipelineConfig`].

use crate::align::align;
use crate::delta::{with_daily_delta, with_rolling_mean};
use crate::normalize::{normalize, with_per_capita};
use crate::rank::{fatality_ratio, rank_latest};
use crate::reshape::reshape;
use crate::scale::log_domain;
use outbreak_api::{MetricMode, PipelineConfig};
use outbreak_spi::{
    AlignedFrame, FatalityPoint, LogDomain, LongSeries, Metric, PopulationLookup, RankedFrame,
    Result, SeriesSnapshot, WideSeries,
};
use serde::Serialize;

/// Frames handed to the rendering layer for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineOutput {
    /// Display frame, normalized and/or differenced as configured
    pub frame: AlignedFrame,
    /// Case-fatality ratio per date and country
    pub fatality: Vec<FatalityPoint>,
    /// Latest confirmed cases per 100k, highest first
    pub ranking: RankedFrame,
    /// Axis domain of the plotted metric when a log scale is requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_domain: Option<LogDomain>,
    /// Selected countries with no rows in all three tables
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unmatched: Vec<String>,
}

impl PipelineOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when nothing should be rendered.
    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }
}

/// The three cumulative series of a selection, in long form.
struct LongTriple {
    confirmed: LongSeries,
    deaths: LongSeries,
    recovered: LongSeries,
}

impl LongTriple {
    fn reshape(snapshot: &SeriesSnapshot, countries: &[&str], country_keyed: bool) -> Result<Self> {
        let melt = |wide: &WideSeries, metric: Metric| {
            reshape(&wide.select(countries), metric.as_str(), country_keyed)
        };
        Ok(Self {
            confirmed: melt(&snapshot.confirmed, Metric::Confirmed)?,
            deaths: melt(&snapshot.deaths, Metric::Deaths)?,
            recovered: melt(&snapshot.recovered, Metric::Recovered)?,
        })
    }

    /// Normalize all three by `country`; identity when `None`.
    fn normalize<L: PopulationLookup + ?Sized>(&self, country: Option<&str>, lookup: &L) -> Result<Self> {
        Ok(Self {
            confirmed: normalize(&self.confirmed, Metric::Confirmed.as_str(), country, lookup)?,
            deaths: normalize(&self.deaths, Metric::Deaths.as_str(), country, lookup)?,
            recovered: normalize(&self.recovered, Metric::Recovered.as_str(), country, lookup)?,
        })
    }

    fn align(&self) -> AlignedFrame {
        align(&self.confirmed, &self.deaths, &self.recovered)
    }
}

fn apply_metric_mode(frame: AlignedFrame, mode: MetricMode) -> AlignedFrame {
    match mode {
        MetricMode::Cumulative => frame,
        MetricMode::DailyNew => with_rolling_mean(with_daily_delta(frame)),
    }
}

/// Run the pipeline for the selected countries.
///
/// An empty selection returns [`PipelineOutput::empty`] instead of an error.
/// Every selected country present in the data must be registered in `lookup`.
pub fn run<L: PopulationLookup + ?Sized>(
    snapshot: &SeriesSnapshot,
    config: &PipelineConfig,
    lookup: &L,
) -> Result<PipelineOutput> {
    config.validate()?;
    if config.countries.is_empty() {
        tracing::debug!("empty country selection, nothing to compute");
        return Ok(PipelineOutput::empty());
    }

    let selected = config.country_list();
    let raw = LongTriple::reshape(snapshot, &selected, true)?;

    let counts = with_per_capita(raw.align(), Metric::Confirmed, lookup)?;
    let ranking = rank_latest(&counts, Metric::Confirmed, lookup)?;
    let mut fatality = fatality_ratio(&raw.confirmed, &raw.deaths);

    let present = counts.countries();
    let unmatched: Vec<String> = selected
        .iter()
        .filter(|country| !present.contains(&Some(**country)))
        .map(|country| country.to_string())
        .collect();
    if !unmatched.is_empty() {
        tracing::warn!(?unmatched, "selected countries have no rows");
    }

    let mut frame = raw.normalize(config.normalize_by.as_deref(), lookup)?.align();
    // both frames come from the same join, so rows line up one to one
    for (row, counted) in frame.rows.iter_mut().zip(&counts.rows) {
        row.per_capita = counted.per_capita;
    }
    let mut frame = apply_metric_mode(frame, config.metric_mode);

    let log_domain = if config.log_scale {
        if let Some(cutoff) = config.log_cutoff {
            frame.rows.retain(|r| r.date > cutoff);
            fatality.retain(|p| p.date > cutoff);
        }
        let plotted = config.metric_mode.plotted_metric();
        let values: Vec<f64> = frame
            .rows
            .iter()
            .map(|r| r.value(plotted).unwrap_or(0.0))
            .collect();
        Some(log_domain(&values, config.log_floor))
    } else {
        None
    };

    tracing::info!(
        countries = selected.len(),
        rows = frame.len(),
        mode = config.metric_mode.as_str(),
        normalized = config.normalize_by.is_some(),
        log_scale = config.log_scale,
        "pipeline run complete"
    );

    Ok(PipelineOutput {
        frame,
        fatality,
        ranking,
        log_domain,
        unmatched,
    })
}

/// Single-country frame keyed by date alone.
///
/// With `normalize` set, every count is rescaled by the country's own
/// population before `active` and deltas are derived.
pub fn country_frame<L: PopulationLookup + ?Sized>(
    snapshot: &SeriesSnapshot,
    country: &str,
    mode: MetricMode,
    normalize: bool,
    lookup: &L,
) -> Result<AlignedFrame> {
    let triple = LongTriple::reshape(snapshot, &[country], false)?;
    let target = normalize.then_some(country);
    let frame = triple.normalize(target, lookup)?.align();

    tracing::debug!(country, rows = frame.len(), "built country frame");
    Ok(apply_metric_mode(frame, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use outbreak_api::PipelineConfigBuilder;
    use outbreak_spi::OutbreakError;
    use std::collections::BTreeMap;

    fn headers() -> Vec<String> {
        ["2/15/20", "2/16/20", "2/17/20", "2/18/20"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn snapshot() -> SeriesSnapshot {
        let table = |rows: Vec<(&str, Vec<u64>)>| WideSeries::from_rows(headers(), rows).unwrap();
        SeriesSnapshot::new(
            table(vec![
                ("Atlantis", vec![0, 100, 150, 140]),
                ("Oz", vec![10, 20, 40, 70]),
            ]),
            table(vec![("Atlantis", vec![0, 1, 3, 3]), ("Oz", vec![0, 0, 1, 2])]),
            table(vec![("Atlantis", vec![0, 10, 50, 60]), ("Oz", vec![0, 5, 10, 15])]),
        )
    }

    fn lookup() -> BTreeMap<String, f64> {
        BTreeMap::from([("Atlantis".to_string(), 10.0), ("Oz".to_string(), 0.5)])
    }

    #[test]
    fn test_empty_selection_is_empty_output() {
        let output = run(&snapshot(), &PipelineConfig::default(), &lookup()).unwrap();
        assert!(output.is_empty());
        assert!(output.unmatched.is_empty());
        assert!(output.ranking.is_empty());
        assert!(output.log_domain.is_none());
    }

    #[test]
    fn test_run_cumulative() {
        let config = PipelineConfigBuilder::new()
            .countries(["Atlantis", "Oz"])
            .build()
            .unwrap();
        let output = run(&snapshot(), &config, &lookup()).unwrap();

        assert_eq!(output.frame.len(), 8);
        assert_eq!(output.fatality.len(), 8);
        assert!(output.fatality[0].ratio.is_nan());
        assert!(output.log_domain.is_none());
        assert!(output.frame.rows.iter().all(|r| r.new.is_none()));

        // Oz: 70 / 0.5M * 100k = 14, Atlantis: 140 / 10M * 100k = 1.4
        assert_eq!(output.ranking.countries(), vec!["Oz", "Atlantis"]);
        assert!((output.ranking.rows[0].per_capita - 14.0).abs() < 1e-9);
        assert_eq!(output.ranking.rows[0].per_capita_display, 14.0);
        assert_eq!(output.frame.rows[0].per_capita, Some(0.0));
    }

    #[test]
    fn test_run_daily_new_log_scale() {
        let config = PipelineConfigBuilder::new()
            .country("Atlantis")
            .metric_mode(MetricMode::DailyNew)
            .log_scale(true)
            .build()
            .unwrap();
        let output = run(&snapshot(), &config, &lookup()).unwrap();

        // 2/15 and 2/16 fall on or before the cutoff
        let new: Vec<Option<f64>> = output.frame.rows.iter().map(|r| r.new).collect();
        assert_eq!(new, vec![Some(50.0), Some(0.0)]);
        // the mean still sees the history before the cutoff
        assert_eq!(output.frame.rows[0].rolling_7d, Some(75.0));
        assert_eq!(output.frame.rows[1].rolling_7d, Some(50.0));
        assert_eq!(output.fatality.len(), 2);

        let domain = output.log_domain.unwrap();
        assert_eq!(domain.bounds(), (10.0, 50.0));
        assert_eq!(domain.values, vec![50.0, 10.0]);
    }

    #[test]
    fn test_run_normalized_keeps_ranking_raw() {
        let config = PipelineConfigBuilder::new()
            .country("Atlantis")
            .normalize_by("Atlantis")
            .build()
            .unwrap();
        let output = run(&snapshot(), &config, &lookup()).unwrap();

        let last = output.frame.rows.last().unwrap();
        assert_eq!(last.confirmed, 140.0 / (10.0 * 1e6) * 1e5);
        assert_eq!(output.ranking.rows[0].value, 140.0);
    }

    #[test]
    fn test_run_unregistered_country() {
        let config = PipelineConfigBuilder::new().country("Oz").build().unwrap();
        let empty_registry: BTreeMap<String, f64> = BTreeMap::new();
        assert_eq!(
            run(&snapshot(), &config, &empty_registry),
            Err(OutbreakError::UnknownCountry("Oz".to_string()))
        );
    }

    #[test]
    fn test_run_unknown_selection_yields_empty_frame() {
        let config = PipelineConfigBuilder::new().country("Narnia").build().unwrap();
        let output = run(&snapshot(), &config, &lookup()).unwrap();
        assert!(output.is_empty());
        assert_eq!(output.unmatched, vec!["Narnia".to_string()]);
        assert!(output.frame.clone().non_empty().is_err());
    }

    #[test]
    fn test_run_reports_partially_unmatched_selection() {
        let config = PipelineConfigBuilder::new()
            .countries(["Oz", "Narnia"])
            .build()
            .unwrap();
        let output = run(&snapshot(), &config, &lookup()).unwrap();
        assert_eq!(output.frame.len(), 4);
        assert_eq!(output.unmatched, vec!["Narnia".to_string()]);
    }

    #[test]
    fn test_country_frame_unkeyed() {
        let frame =
            country_frame(&snapshot(), "Atlantis", MetricMode::DailyNew, false, &lookup()).unwrap();
        assert_eq!(frame.len(), 4);
        assert!(frame.rows.iter().all(|r| r.country.is_none()));
        assert_eq!(frame.rows[3].active(), 140.0 - (3.0 + 60.0));
        assert_eq!(frame.rows[3].new, Some(0.0));
        assert_eq!(
            frame.rows[0].date,
            NaiveDate::from_ymd_opt(2020, 2, 15).unwrap()
        );
    }

    #[test]
    fn test_country_frame_normalized() {
        let frame =
            country_frame(&snapshot(), "Oz", MetricMode::Cumulative, true, &lookup()).unwrap();
        assert_eq!(frame.rows[3].confirmed, 70.0 / (0.5 * 1e6) * 1e5);
        let last = &frame.rows[3];
        assert_eq!(last.active(), last.confirmed - (last.deaths + last.recovered));
    }
}
