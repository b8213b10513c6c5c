//! JSON scenario files: catalog contents, orders, delivery model, and an optional seed.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, City, Road, Transport, Weather};
use crate::evaluator::{DeliveryModel, DeliveryModelError};
use crate::orders::{Cargo, OrderError, validate_order_values};
use crate::simulation::TransAgency;

/// An order as written in a scenario file, by city name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub weight: f64,
    pub origin: String,
    pub destination: String,
    pub desired_speed: f64,
    pub desired_price: f64,
}

/// Complete scenario description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub transports: Vec<Transport>,
    #[serde(default)]
    pub roads: Vec<Road>,
    #[serde(default)]
    pub weather: Vec<Weather>,
    #[serde(default)]
    pub orders: Vec<OrderSpec>,
    #[serde(default)]
    pub model: DeliveryModel,
}

/// Errors raised while loading a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Model(#[from] DeliveryModelError),
    #[error(transparent)]
    Order(#[from] OrderError),
}

impl Scenario {
    /// Parse and validate a scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any value fails validation.
    pub fn from_json(json_str: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_json::from_str(json_str)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Embedded sample scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file does not parse or validate.
    pub fn default_scenario() -> Result<Self, ScenarioError> {
        Self::from_json(include_str!("../data/scenario.json"))
    }

    /// Validate catalog values, model coefficients, and order numbers.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.catalog().validate()?;
        self.model.validate()?;
        for (index, order) in self.orders.iter().enumerate() {
            validate_order_values(
                index,
                order.weight,
                order.desired_speed,
                order.desired_price,
            )?;
        }
        Ok(())
    }

    /// Catalog built from the scenario lists, in file order.
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        let mut catalog = Catalog::new();
        for city in &self.cities {
            catalog.add_city(city.name.clone(), city.is_major);
        }
        for t in &self.transports {
            catalog.add_transport(t.name.clone(), t.cost_per_weight, t.speed, t.accident_prob);
        }
        for road in &self.roads {
            catalog.add_road(
                road.name.clone(),
                road.is_highway,
                road.accident_prob_reduction,
            );
        }
        for weather in &self.weather {
            catalog.add_weather_condition(weather.name.clone(), weather.is_good);
        }
        catalog
    }

    /// Build an agency and register every order; orders naming unknown cities are dropped.
    #[must_use]
    pub fn build_agency(&self) -> TransAgency {
        let mut agency = TransAgency::from_catalog(self.catalog(), self.model.clone());
        for spec in &self.orders {
            agency.add_order(
                Cargo::new(spec.weight),
                &spec.origin,
                &spec.destination,
                spec.desired_speed,
                spec.desired_price,
            );
        }
        agency
    }
}
