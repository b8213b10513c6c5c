//! Delivery time, cost, and accident-loss calculations.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Road, Transport};

/// Coefficients for the delivery formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryModel {
    /// Nominal distance covered by every order.
    #[serde(default = "DeliveryModel::default_route_distance")]
    pub route_distance: f64,
    /// Extra distance-equivalent of loading and unloading, per weight unit.
    #[serde(default = "DeliveryModel::default_handling_time_per_weight")]
    pub handling_time_per_weight: f64,
    /// Time multiplier on highways.
    #[serde(default = "DeliveryModel::default_highway_time_factor")]
    pub highway_time_factor: f64,
    /// Cost multiplier on highways (tolls).
    #[serde(default = "DeliveryModel::default_highway_cost_factor")]
    pub highway_cost_factor: f64,
    /// Value lost in one certain accident.
    #[serde(default = "DeliveryModel::default_accident_loss_unit")]
    pub accident_loss_unit: f64,
}

/// Errors raised when delivery model coefficients are out of range.
#[derive(Debug, Error, PartialEq)]
pub enum DeliveryModelError {
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be in ({min:.2}, {max:.2}] (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

impl DeliveryModel {
    const fn default_route_distance() -> f64 {
        100.0
    }

    const fn default_handling_time_per_weight() -> f64 {
        1.0
    }

    const fn default_highway_time_factor() -> f64 {
        0.8
    }

    const fn default_highway_cost_factor() -> f64 {
        1.1
    }

    const fn default_accident_loss_unit() -> f64 {
        100.0
    }

    /// Check coefficient ranges.
    ///
    /// # Errors
    ///
    /// Returns the first coefficient that would break monotonicity of the formulas.
    pub fn validate(&self) -> Result<(), DeliveryModelError> {
        ensure_min("route_distance", self.route_distance, 0.0)?;
        ensure_min("handling_time_per_weight", self.handling_time_per_weight, 0.0)?;
        ensure_min("accident_loss_unit", self.accident_loss_unit, 0.0)?;
        if !(self.highway_time_factor > 0.0 && self.highway_time_factor <= 1.0) {
            return Err(DeliveryModelError::RangeViolation {
                field: "highway_time_factor",
                min: 0.0,
                max: 1.0,
                value: self.highway_time_factor,
            });
        }
        if !(self.highway_cost_factor > 0.0 && self.highway_cost_factor.is_finite()) {
            return Err(DeliveryModelError::RangeViolation {
                field: "highway_cost_factor",
                min: 0.0,
                max: f64::MAX,
                value: self.highway_cost_factor,
            });
        }
        Ok(())
    }

    /// Delivery time; falls with transport speed and on highways, grows with weight.
    #[must_use]
    pub fn delivery_time(&self, weight: f64, road: &Road, transport: &Transport) -> f64 {
        let effort = weight.mul_add(self.handling_time_per_weight, self.route_distance);
        let road_factor = if road.is_highway {
            self.highway_time_factor
        } else {
            1.0
        };
        effort / transport.speed * road_factor
    }

    /// Delivery cost; proportional to `weight * cost_per_weight`, with a highway toll.
    #[must_use]
    pub fn delivery_cost(&self, weight: f64, road: &Road, transport: &Transport) -> f64 {
        let road_factor = if road.is_highway {
            self.highway_cost_factor
        } else {
            1.0
        };
        weight * transport.cost_per_weight * road_factor
    }

    /// Probability of an accident on this road with this transport, floored at zero.
    #[must_use]
    pub fn accident_probability(transport: &Transport, road: &Road) -> f64 {
        (transport.accident_prob - road.accident_prob_reduction).max(0.0)
    }

    /// Expected accident loss recorded for a completed delivery.
    #[must_use]
    pub fn accident_loss(&self, transport: &Transport, road: &Road) -> f64 {
        Self::accident_probability(transport, road) * self.accident_loss_unit
    }
}

impl Default for DeliveryModel {
    fn default() -> Self {
        Self {
            route_distance: Self::default_route_distance(),
            handling_time_per_weight: Self::default_handling_time_per_weight(),
            highway_time_factor: Self::default_highway_time_factor(),
            highway_cost_factor: Self::default_highway_cost_factor(),
            accident_loss_unit: Self::default_accident_loss_unit(),
        }
    }
}

fn ensure_min(field: &'static str, value: f64, min: f64) -> Result<(), DeliveryModelError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(DeliveryModelError::MinViolation { field, min, value })
    }
}

/// Delivery time under the default model.
#[must_use]
pub fn calculate_delivery_time(weight: f64, road: &Road, transport: &Transport) -> f64 {
    DeliveryModel::default().delivery_time(weight, road, transport)
}

/// Delivery cost under the default model.
#[must_use]
pub fn calculate_delivery_cost(weight: f64, road: &Road, transport: &Transport) -> f64 {
    DeliveryModel::default().delivery_cost(weight, road, transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truck() -> Transport {
        Transport {
            name: "truck".into(),
            cost_per_weight: 2.0,
            speed: 50.0,
            accident_prob: 0.1,
        }
    }

    fn road(is_highway: bool, reduction: f64) -> Road {
        Road {
            name: if is_highway { "H1" } else { "R1" }.into(),
            is_highway,
            accident_prob_reduction: reduction,
        }
    }

    #[test]
    fn default_formulas_match_known_values() {
        let time = calculate_delivery_time(10.0, &road(false, 0.0), &truck());
        let cost = calculate_delivery_cost(10.0, &road(false, 0.0), &truck());
        assert!((time - 2.2).abs() < 1e-9);
        assert!((cost - 20.0).abs() < 1e-9);
    }

    #[test]
    fn highway_is_faster_and_tolled() {
        let model = DeliveryModel::default();
        let t = truck();
        assert!(
            model.delivery_time(10.0, &road(true, 0.0), &t)
                < model.delivery_time(10.0, &road(false, 0.0), &t)
        );
        assert!(
            model.delivery_cost(10.0, &road(true, 0.0), &t)
                > model.delivery_cost(10.0, &road(false, 0.0), &t)
        );
    }

    #[test]
    fn time_falls_with_speed_and_rises_with_weight() {
        let model = DeliveryModel::default();
        let slow = truck();
        let fast = Transport {
            speed: 120.0,
            ..truck()
        };
        let r = road(false, 0.0);
        assert!(model.delivery_time(10.0, &r, &fast) < model.delivery_time(10.0, &r, &slow));
        assert!(model.delivery_time(20.0, &r, &slow) > model.delivery_time(10.0, &r, &slow));
    }

    #[test]
    fn accident_probability_is_clamped() {
        let t = truck();
        assert!((DeliveryModel::accident_probability(&t, &road(false, 0.04)) - 0.06).abs() < 1e-9);
        assert!(DeliveryModel::accident_probability(&t, &road(true, 0.5)).abs() < f64::EPSILON);
        let model = DeliveryModel::default();
        assert!((model.accident_loss(&t, &road(false, 0.0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_bad_coefficients() {
        let model = DeliveryModel {
            highway_time_factor: 1.5,
            ..DeliveryModel::default()
        };
        assert!(matches!(
            model.validate(),
            Err(DeliveryModelError::RangeViolation {
                field: "highway_time_factor",
                ..
            })
        ));
        let model = DeliveryModel {
            route_distance: -1.0,
            ..DeliveryModel::default()
        };
        assert_eq!(
            model.validate().unwrap_err().to_string(),
            "route_distance must be at least 0.00 (got -1.00)"
        );
        assert_eq!(DeliveryModel::default().validate(), Ok(()));
    }

    #[test]
    fn model_deserializes_with_defaults() {
        let model: DeliveryModel =
            serde_json::from_str(r#"{ "route_distance": 250.0 }"#).unwrap();
        assert!((model.route_distance - 250.0).abs() < f64::EPSILON);
        assert!((model.highway_time_factor - 0.8).abs() < f64::EPSILON);
    }
}
