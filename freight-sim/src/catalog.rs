//! Static reference catalogs: cities, transport modes, roads, and weather conditions.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A city the agency serves. Major cities gate air/rail eligibility and highway preference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(default)]
    pub is_major: bool,
}

impl City {
    #[must_use]
    pub fn new(name: impl Into<String>, is_major: bool) -> Self {
        Self {
            name: name.into(),
            is_major,
        }
    }
}

/// A transport mode with its tariff, speed, and base accident probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transport {
    pub name: String,
    pub cost_per_weight: f64,
    pub speed: f64,
    pub accident_prob: f64,
}

/// A road; highways reduce delivery time and may carry a toll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub name: String,
    #[serde(default)]
    pub is_highway: bool,
    #[serde(default)]
    pub accident_prob_reduction: f64,
}

/// A weather condition; bad weather stops a delivery before it is priced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Weather {
    pub name: String,
    pub is_good: bool,
}

/// Errors raised when catalog entries carry values the evaluator cannot work with.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("{entry}: {field} must be a finite number (got {value})")]
    NonFinite {
        entry: String,
        field: &'static str,
        value: f64,
    },
    #[error("{entry}: {field} must not be negative (got {value:.2})")]
    Negative {
        entry: String,
        field: &'static str,
        value: f64,
    },
    #[error("{entry}: {field} must be between 0 and 1 (got {value:.2})")]
    ProbabilityRange {
        entry: String,
        field: &'static str,
        value: f64,
    },
    #[error("transport {transport}: speed must be positive (got {speed:.2})")]
    NonPositiveSpeed { transport: String, speed: f64 },
}

/// Append-only store of the agency's reference lists.
///
/// Entries keep insertion order; road selection depends on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    cities: Vec<City>,
    #[serde(default)]
    transports: Vec<Transport>,
    #[serde(default)]
    roads: Vec<Road>,
    #[serde(default)]
    weather: Vec<Weather>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a city. Duplicate names are not checked; lookups return the first match.
    pub fn add_city(&mut self, name: impl Into<String>, is_major: bool) {
        self.cities.push(City::new(name, is_major));
    }

    /// Register a transport mode.
    pub fn add_transport(
        &mut self,
        name: impl Into<String>,
        cost_per_weight: f64,
        speed: f64,
        accident_prob: f64,
    ) {
        self.transports.push(Transport {
            name: name.into(),
            cost_per_weight,
            speed,
            accident_prob,
        });
    }

    /// Register a road. Highway order matters for major-city routes.
    pub fn add_road(
        &mut self,
        name: impl Into<String>,
        is_highway: bool,
        accident_prob_reduction: f64,
    ) {
        self.roads.push(Road {
            name: name.into(),
            is_highway,
            accident_prob_reduction,
        });
    }

    /// Register a weather condition.
    pub fn add_weather_condition(&mut self, name: impl Into<String>, is_good: bool) {
        self.weather.push(Weather {
            name: name.into(),
            is_good,
        });
    }

    /// Find a city by exact name.
    #[must_use]
    pub fn find_city(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|city| city.name == name)
    }

    /// All cities in insertion order.
    #[must_use]
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// All transport modes in insertion order.
    #[must_use]
    pub fn transports(&self) -> &[Transport] {
        &self.transports
    }

    /// All roads in insertion order.
    #[must_use]
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// All weather conditions in insertion order.
    #[must_use]
    pub fn weather_conditions(&self) -> &[Weather] {
        &self.weather
    }

    /// Validate numeric fields of every transport and road.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] found, in catalog order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for transport in &self.transports {
            let entry = format!("transport {}", transport.name);
            non_negative(&entry, "cost_per_weight", transport.cost_per_weight)?;
            finite(&entry, "speed", transport.speed)?;
            if transport.speed <= 0.0 {
                return Err(CatalogError::NonPositiveSpeed {
                    transport: transport.name.clone(),
                    speed: transport.speed,
                });
            }
            probability(&entry, "accident_prob", transport.accident_prob)?;
        }
        for road in &self.roads {
            let entry = format!("road {}", road.name);
            probability(&entry, "accident_prob_reduction", road.accident_prob_reduction)?;
        }
        Ok(())
    }
}

fn finite(entry: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::NonFinite {
            entry: entry.to_string(),
            field,
            value,
        })
    }
}

fn non_negative(entry: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    finite(entry, field, value)?;
    if value < 0.0 {
        return Err(CatalogError::Negative {
            entry: entry.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

fn probability(entry: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    finite(entry, field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(CatalogError::ProbabilityRange {
            entry: entry.to_string(),
            field,
            value,
        });
    }
    Ok(())
}
