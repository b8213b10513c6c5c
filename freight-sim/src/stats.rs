//! Aggregated income, delivery-time, and loss statistics.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{Road, Transport};
use crate::evaluator::DeliveryModel;
use crate::numbers::{finite_or_zero, usize_to_f64};

/// Nested accident losses: transport name -> road name -> accumulated loss.
pub type AccidentLosses = BTreeMap<String, BTreeMap<String, f64>>;

/// Running statistics owned by the simulation driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    income: BTreeMap<String, f64>,
    delivery_times: BTreeMap<String, Vec<f64>>,
    weather_losses: f64,
    accident_losses: AccidentLosses,
    // Never written by the delivery flow; reported as-is.
    highway_income: f64,
    regular_road_income: f64,
}

impl Statistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add delivery income for a destination.
    pub fn update_income(&mut self, destination: &str, cost: f64) {
        *self.income.entry(destination.to_string()).or_insert(0.0) += cost;
    }

    /// Append a delivery time for a destination.
    pub fn update_delivery_time(&mut self, destination: &str, time: f64) {
        self.delivery_times
            .entry(destination.to_string())
            .or_default()
            .push(time);
    }

    /// Accumulate the expected accident loss for a transport/road pair. Returns the amount added.
    pub fn update_accident_losses(
        &mut self,
        model: &DeliveryModel,
        transport: &Transport,
        road: &Road,
    ) -> f64 {
        let loss = model.accident_loss(transport, road);
        *self
            .accident_losses
            .entry(transport.name.clone())
            .or_default()
            .entry(road.name.clone())
            .or_insert(0.0) += loss;
        loss
    }

    #[must_use]
    pub fn income(&self, destination: &str) -> f64 {
        self.income.get(destination).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn delivery_times(&self, destination: &str) -> &[f64] {
        self.delivery_times
            .get(destination)
            .map_or(&[][..], Vec::as_slice)
    }

    #[must_use]
    pub fn accident_loss(&self, transport: &str, road: &str) -> f64 {
        self.accident_losses
            .get(transport)
            .and_then(|roads| roads.get(road))
            .copied()
            .unwrap_or(0.0)
    }

    #[must_use]
    pub const fn weather_losses(&self) -> f64 {
        self.weather_losses
    }

    #[must_use]
    pub const fn highway_income(&self) -> f64 {
        self.highway_income
    }

    #[must_use]
    pub const fn regular_road_income(&self) -> f64 {
        self.regular_road_income
    }

    /// Immutable copy of every aggregate plus derived totals.
    #[must_use]
    pub fn snapshot(&self) -> StatisticsSnapshot {
        let mean_delivery_time = self
            .delivery_times
            .iter()
            .filter(|(_, times)| !times.is_empty())
            .map(|(city, times)| {
                let sum: f64 = times.iter().sum();
                (city.clone(), finite_or_zero(sum / usize_to_f64(times.len())))
            })
            .collect();
        StatisticsSnapshot {
            income: self.income.clone(),
            delivery_times: self.delivery_times.clone(),
            mean_delivery_time,
            total_income: self.income.values().sum(),
            weather_losses: self.weather_losses,
            accident_losses: self.accident_losses.clone(),
            total_accident_loss: self
                .accident_losses
                .values()
                .flat_map(BTreeMap::values)
                .sum(),
            highway_income: self.highway_income,
            regular_road_income: self.regular_road_income,
        }
    }
}

/// Point-in-time view of [`Statistics`], suitable for reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub income: BTreeMap<String, f64>,
    pub delivery_times: BTreeMap<String, Vec<f64>>,
    pub mean_delivery_time: BTreeMap<String, f64>,
    pub total_income: f64,
    pub weather_losses: f64,
    pub accident_losses: AccidentLosses,
    pub total_accident_loss: f64,
    pub highway_income: f64,
    pub regular_road_income: f64,
}

impl StatisticsSnapshot {
    /// Number of recorded deliveries across all destinations.
    #[must_use]
    pub fn delivery_count(&self) -> usize {
        self.delivery_times.values().map(Vec::len).sum()
    }
}
