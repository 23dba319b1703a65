//! Population lookup trait definition.

use std::collections::{BTreeMap, HashMap};

use crate::error::{OutbreakError, Result};

/// Read-only mapping from country name to population in millions.
pub trait PopulationLookup {
    /// Population in millions, if the country is registered.
    fn population_millions(&self, country: &str) -> Option<f64>;

    /// Population in millions, failing with [`OutbreakError::UnknownCountry`].
    fn require(&self, country: &str) -> Result<f64> {
        self.population_millions(country)
            .ok_or_else(|| OutbreakError::UnknownCountry(country.to_string()))
    }
}

impl PopulationLookup for BTreeMap<String, f64> {
    fn population_millions(&self, country: &str) -> Option<f64> {
        self.get(country).copied()
    }
}

impl PopulationLookup for HashMap<String, f64> {
    fn population_millions(&self, country: &str) -> Option<f64> {
        self.get(country).copied()
    }
}

impl<T: PopulationLookup + ?Sized> PopulationLookup for &T {
    fn population_millions(&self, country: &str) -> Option<f64> {
        (**self).population_millions(country)
    }
}
