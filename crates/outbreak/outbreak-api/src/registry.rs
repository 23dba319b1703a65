//! Country population registry.

use outbreak_spi::{OutbreakError, PopulationLookup, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Populations in millions, 2021 estimates (updated 25 April 2021).
const POPULATIONS_2021: [(&str, f64); 29] = [
    ("Andorra", 0.077),
    ("Argentina", 45.20),
    ("Australia", 25.50),
    ("Austria", 9.06),
    ("Bangladesh", 164.69),
    ("Belgium", 11.59),
    ("Brazil", 212.56),
    ("Canada", 37.74),
    ("China", 1439.33),
    ("Colombia", 50.88),
    ("Denmark", 5.79),
    ("Egypt", 102.33),
    ("Ethiopia", 114.96),
    ("France", 65.27),
    ("Germany", 83.78),
    ("Greece", 10.42),
    ("India", 1380.00),
    ("Indonesia", 273.52),
    ("Italy", 60.46),
    ("Japan", 126.47),
    ("Netherlands", 17.13),
    ("Norway", 5.41),
    ("Poland", 37.84),
    ("Romania", 19.23),
    ("Russia", 145.93),
    ("Spain", 46.75),
    ("Sweden", 10.09),
    ("Switzerland", 8.65),
    ("United Kingdom", 67.89),
];

/// Immutable country to population (millions) table.
///
/// Built once at startup and passed by reference into the normalizer and
/// ranking calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, f64>", try_from = "BTreeMap<String, f64>")]
pub struct CountryRegistry {
    populations: BTreeMap<String, f64>,
}

impl CountryRegistry {
    /// Build a registry, rejecting non-positive or non-finite populations.
    pub fn new<S, I>(entries: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        let mut populations = BTreeMap::new();
        for (country, millions) in entries {
            let country = country.into();
            if !millions.is_finite() || millions <= 0.0 {
                return Err(OutbreakError::Config(format!(
                    "population of '{}' must be positive, got {}",
                    country, millions
                )));
            }
            populations.insert(country, millions);
        }
        Ok(Self { populations })
    }

    /// The 29-country table shipped with the dashboard.
    pub fn with_defaults() -> Self {
        Self {
            populations: POPULATIONS_2021
                .iter()
                .map(|(country, millions)| (country.to_string(), *millions))
                .collect(),
        }
    }

    /// Parse a JSON object of `{ "Country": millions }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: BTreeMap<String, f64> = serde_json::from_str(json)
            .map_err(|e| OutbreakError::Config(format!("invalid population table: {}", e)))?;
        Self::new(table)
    }

    pub fn get(&self, country: &str) -> Option<f64> {
        self.populations.get(country).copied()
    }

    pub fn contains(&self, country: &str) -> bool {
        self.populations.contains_key(country)
    }

    /// Registered countries in name order.
    pub fn countries(&self) -> Vec<&str> {
        self.populations.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl TryFrom<BTreeMap<String, f64>> for CountryRegistry {
    type Error = OutbreakError;

    fn try_from(populations: BTreeMap<String, f64>) -> Result<Self> {
        Self::new(populations)
    }
}

impl From<CountryRegistry> for BTreeMap<String, f64> {
    fn from(registry: CountryRegistry) -> Self {
        registry.populations
    }
}

impl PopulationLookup for CountryRegistry {
    fn population_millions(&self, country: &str) -> Option<f64> {
        self.get(country)
    }
}
