//! # outbreak-cli
//!
//! Command-line interface for the outbreak metrics pipeline.

use anyhow::Context;
use clap::{Parser, Subcommand};
use outbreak::prelude::*;
use outbreak::DEFAULT_CACHE_TTL_SECS;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "outbreak")]
#[command(about = "Epidemic time-series metrics CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline over the cumulative CSV tables
    Run {
        /// Directory holding the three upstream time-series files
        #[arg(short, long, default_value = ".")]
        data_dir: PathBuf,

        /// Confirmed-cases table (overrides --data-dir)
        #[arg(long)]
        confirmed: Option<PathBuf>,

        /// Deaths table (overrides --data-dir)
        #[arg(long)]
        deaths: Option<PathBuf>,

        /// Recovered table (overrides --data-dir)
        #[arg(long)]
        recovered: Option<PathBuf>,

        /// Countries to include, comma separated or repeated
        #[arg(short, long, value_delimiter = ',')]
        countries: Vec<String>,

        /// Metric mode (cumulative, daily_new)
        #[arg(short, long)]
        mode: Option<MetricMode>,

        /// Rescale every series by this country's population
        #[arg(short, long)]
        normalize_by: Option<String>,

        /// Compute a log-scale axis domain
        #[arg(long)]
        log_scale: bool,

        /// Lower bound of the log-scale domain
        #[arg(long)]
        log_floor: Option<f64>,

        /// Pipeline configuration file (JSON); flags override its fields
        #[arg(long)]
        config: Option<PathBuf>,

        /// Population table (JSON object of country to millions)
        #[arg(short, long)]
        populations: Option<PathBuf>,

        /// Seconds a loaded table set stays fresh
        #[arg(long, default_value_t = DEFAULT_CACHE_TTL_SECS)]
        cache_ttl: u64,

        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List countries with a registered population
    Countries {
        /// Population table (JSON object of country to millions)
        #[arg(short, long)]
        populations: Option<PathBuf>,
    },
}

fn load_registry(path: Option<&Path>) -> anyhow::Result<CountryRegistry> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(CountryRegistry::from_json(&json)?)
        }
        None => Ok(CountryRegistry::with_defaults()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(PipelineConfig::from_json(&json)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}

struct RunArgs {
    source: SourceConfig,
    countries: Vec<String>,
    mode: Option<MetricMode>,
    normalize_by: Option<String>,
    log_scale: bool,
    log_floor: Option<f64>,
    config: Option<PathBuf>,
    populations: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl RunArgs {
    /// Layer command-line flags over the configuration file.
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if !self.countries.is_empty() {
            config.countries = self.countries.iter().cloned().collect();
        }
        if let Some(mode) = self.mode {
            config.metric_mode = mode;
        }
        if self.normalize_by.is_some() {
            config.normalize_by = self.normalize_by.clone();
        }
        config.log_scale |= self.log_scale;
        if let Some(floor) = self.log_floor {
            config.log_floor = floor;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run_pipeline(args: RunArgs) -> anyhow::Result<()> {
    let registry = load_registry(args.populations.as_deref())?;
    let config = args.pipeline_config()?;
    tracing::debug!(?config, "resolved pipeline configuration");

    let source = CachedSource::new(
        CsvSeriesSource::new(args.source.clone()),
        args.source.cache_ttl(),
    );
    let snapshot = source.load().context("failed to load time-series tables")?;
    let output = run(&snapshot, &config, &registry)?;

    if config.countries.is_empty() {
        println!("No countries selected, nothing to render");
        return Ok(());
    }
    if !output.unmatched.is_empty() {
        println!("No rows for: {}", output.unmatched.join(", "));
    }
    if output.is_empty() {
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&output)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            println!("Rows: {}", output.frame.len());
            println!("Ranking:");
            for (i, row) in output.ranking.rows.iter().enumerate() {
                println!(
                    "  {}. {} {:.2} per 100k ({})",
                    i + 1,
                    row.country,
                    row.per_capita_display,
                    row.date
                );
            }
            println!("Results written to {:?}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn list_countries(populations: Option<PathBuf>) -> anyhow::Result<()> {
    let registry = load_registry(populations.as_deref())?;
    for country in registry.countries() {
        if let Some(millions) = registry.get(country) {
            println!("{:<20} {:>10.2}M", country, millions);
        }
    }
    Ok(())
}

fn source_config(
    data_dir: &Path,
    confirmed: Option<PathBuf>,
    deaths: Option<PathBuf>,
    recovered: Option<PathBuf>,
    cache_ttl: u64,
) -> SourceConfig {
    let mut source = SourceConfig::from_dir(data_dir).with_cache_ttl(Duration::from_secs(cache_ttl));
    if let Some(path) = confirmed {
        source.confirmed = path;
    }
    if let Some(path) = deaths {
        source.deaths = path;
    }
    if let Some(path) = recovered {
        source.recovered = path;
    }
    source
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outbreak=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data_dir,
            confirmed,
            deaths,
            recovered,
            countries,
            mode,
            normalize_by,
            log_scale,
            log_floor,
            config,
            populations,
            cache_ttl,
            output,
        } => run_pipeline(RunArgs {
            source: source_config(&data_dir, confirmed, deaths, recovered, cache_ttl),
            countries,
            mode,
            normalize_by,
            log_scale,
            log_floor,
            config,
            populations,
            output,
        }),

        Commands::Countries { populations } => list_countries(populations),
    }
}
