//! Delivery orders and the registry that resolves them against the catalog.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, City};

/// Order values the evaluator cannot price.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OrderError {
    #[error("order {index}: cargo weight must be positive (got {weight})")]
    CargoWeight { index: usize, weight: f64 },
    #[error("order {index}: {field} must be a non-negative number (got {value})")]
    Limit {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Check the numbers of the order at `index`: positive finite weight, non-negative limits.
///
/// # Errors
///
/// Returns the first offending value.
pub fn validate_order_values(
    index: usize,
    weight: f64,
    desired_speed: f64,
    desired_price: f64,
) -> Result<(), OrderError> {
    if !(weight.is_finite() && weight > 0.0) {
        return Err(OrderError::CargoWeight { index, weight });
    }
    for (field, value) in [("desired_speed", desired_speed), ("desired_price", desired_price)] {
        if value.is_nan() || value < 0.0 {
            return Err(OrderError::Limit {
                index,
                field,
                value,
            });
        }
    }
    Ok(())
}

/// Freight carried by an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub weight: f64,
}

impl Cargo {
    #[must_use]
    pub const fn new(weight: f64) -> Self {
        Self { weight }
    }
}

/// A resolved delivery order. `desired_speed` is the longest acceptable delivery time and
/// `desired_price` the highest acceptable cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub cargo: Cargo,
    pub origin: City,
    pub destination: City,
    pub desired_speed: f64,
    pub desired_price: f64,
}

impl Order {
    /// True when both endpoints are major cities.
    #[must_use]
    pub const fn connects_majors(&self) -> bool {
        self.origin.is_major && self.destination.is_major
    }

    /// True when at least one endpoint is a major city.
    #[must_use]
    pub const fn touches_major(&self) -> bool {
        self.origin.is_major || self.destination.is_major
    }

    /// Validate weight and limits; `index` labels the error.
    ///
    /// # Errors
    ///
    /// See [`validate_order_values`].
    pub fn validate(&self, index: usize) -> Result<(), OrderError> {
        validate_order_values(index, self.cargo.weight, self.desired_speed, self.desired_price)
    }
}

/// Ordered list of accepted orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRegistry {
    orders: Vec<Order>,
}

impl OrderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve both city names and append the order.
    ///
    /// Orders naming an unknown city are dropped without error. Returns whether the order
    /// was stored.
    pub fn add_order(
        &mut self,
        catalog: &Catalog,
        cargo: Cargo,
        origin: &str,
        destination: &str,
        desired_speed: f64,
        desired_price: f64,
    ) -> bool {
        let (Some(origin_city), Some(destination_city)) =
            (catalog.find_city(origin), catalog.find_city(destination))
        else {
            log::debug!("dropping order {origin} -> {destination}: unknown city");
            return false;
        };
        self.orders.push(Order {
            cargo,
            origin: origin_city.clone(),
            destination: destination_city.clone(),
            desired_speed,
            desired_price,
        });
        true
    }

    /// Accepted orders in insertion order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Number of accepted orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
