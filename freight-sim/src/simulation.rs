//! The agency: catalogs, orders, statistics, and the one-pass delivery simulation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, Road, Transport};
use crate::evaluator::DeliveryModel;
use crate::orders::{Cargo, Order, OrderError, OrderRegistry};
use crate::rng::{RandomSource, RngBundle};
use crate::selection::{self, AIR, SelectionError};
use crate::stats::{Statistics, StatisticsSnapshot};

/// Why an order was not delivered. These are expected outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Air was selected for a route that is not major-to-major.
    AirTransportInfeasible,
    /// The origin's weather was not good.
    WeatherBad,
    /// Delivery time is above the order's desired speed.
    TimeExceedsDesired,
    /// Delivery cost is above the order's desired price.
    CostExceedsDesired,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AirTransportInfeasible => write!(f, "air transport infeasible"),
            Self::WeatherBad => write!(f, "weather bad"),
            Self::TimeExceedsDesired => write!(f, "time exceeds desired"),
            Self::CostExceedsDesired => write!(f, "cost exceeds desired"),
        }
    }
}

/// Terminal state of one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Delivered {
        time: f64,
        cost: f64,
        accident_loss: f64,
    },
    Rejected {
        reason: RejectionReason,
    },
}

impl Outcome {
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::Rejected { reason } => Some(*reason),
            Self::Delivered { .. } => None,
        }
    }
}

/// What happened to a single order, with the options that were drawn for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReport {
    /// Zero-based position in the order registry.
    pub index: usize,
    pub origin: String,
    pub destination: String,
    pub transport: String,
    pub road: String,
    pub weather: String,
    pub outcome: Outcome,
}

impl OrderReport {
    /// One human-readable line describing the outcome.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let (from, to) = (&self.origin, &self.destination);
        match self.outcome.rejection() {
            None => format!("Order from {from} to {to} delivered successfully"),
            Some(RejectionReason::AirTransportInfeasible) => {
                format!("Cannot use air transport for delivery from {from} to {to}")
            }
            Some(RejectionReason::WeatherBad) => {
                format!("Weather is bad in {from}, delivery delayed")
            }
            Some(RejectionReason::TimeExceedsDesired) => {
                format!("Delivery time too long for order from {from} to {to}")
            }
            Some(RejectionReason::CostExceedsDesired) => {
                format!("Delivery cost too high for order from {from} to {to}")
            }
        }
    }
}

/// Result of one pass over the order list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub orders: Vec<OrderReport>,
    pub stats: StatisticsSnapshot,
}

impl SimulationReport {
    #[must_use]
    pub fn delivered_count(&self) -> usize {
        self.orders.iter().filter(|o| o.outcome.is_delivered()).count()
    }

    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.orders.len() - self.delivered_count()
    }

    /// Number of orders rejected for the given reason.
    #[must_use]
    pub fn rejected_for(&self, reason: RejectionReason) -> usize {
        self.orders
            .iter()
            .filter(|o| o.outcome.rejection() == Some(reason))
            .count()
    }
}

/// Catalog list named in configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Transport,
    Road,
    Weather,
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Road => write!(f, "road"),
            Self::Weather => write!(f, "weather"),
        }
    }
}

/// Fatal configuration problems that stop a simulation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    #[error("{kind} catalog is empty but {orders} order(s) are pending")]
    EmptyCatalog { kind: CatalogKind, orders: usize },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Freight agency holding catalogs, orders, and accumulated statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransAgency {
    catalog: Catalog,
    orders: OrderRegistry,
    stats: Statistics,
    model: DeliveryModel,
}

impl TransAgency {
    /// Empty agency with the default delivery model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty agency with a custom delivery model.
    #[must_use]
    pub fn with_model(model: DeliveryModel) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    /// Agency over a prepared catalog, with no orders yet.
    #[must_use]
    pub fn from_catalog(catalog: Catalog, model: DeliveryModel) -> Self {
        Self {
            catalog,
            model,
            ..Self::default()
        }
    }

    /// Register a city.
    pub fn add_city(&mut self, name: impl Into<String>, is_major: bool) {
        self.catalog.add_city(name, is_major);
    }

    /// Register a transport mode.
    pub fn add_transport(
        &mut self,
        name: impl Into<String>,
        cost_per_weight: f64,
        speed: f64,
        accident_prob: f64,
    ) {
        self.catalog
            .add_transport(name, cost_per_weight, speed, accident_prob);
    }

    /// Register a road.
    pub fn add_road(
        &mut self,
        name: impl Into<String>,
        is_highway: bool,
        accident_prob_reduction: f64,
    ) {
        self.catalog
            .add_road(name, is_highway, accident_prob_reduction);
    }

    /// Register a weather condition.
    pub fn add_weather_condition(&mut self, name: impl Into<String>, is_good: bool) {
        self.catalog.add_weather_condition(name, is_good);
    }

    /// Register an order by city names; unknown names drop the order silently.
    pub fn add_order(
        &mut self,
        cargo: Cargo,
        origin: &str,
        destination: &str,
        desired_speed: f64,
        desired_price: f64,
    ) -> bool {
        self.orders.add_order(
            &self.catalog,
            cargo,
            origin,
            destination,
            desired_speed,
            desired_price,
        )
    }

    /// Reference catalogs.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Registered orders.
    #[must_use]
    pub const fn orders(&self) -> &OrderRegistry {
        &self.orders
    }

    /// Statistics accumulated over every run so far.
    #[must_use]
    pub const fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Delivery model used for pricing.
    #[must_use]
    pub const fn model(&self) -> &DeliveryModel {
        &self.model
    }

    /// Run the simulation with streams derived from `seed`.
    ///
    /// # Errors
    ///
    /// See [`TransAgency::simulate_delivery`].
    pub fn simulate_with_seed(&mut self, seed: u64) -> Result<SimulationReport, SimulationError> {
        let mut rngs = RngBundle::from_user_seed(seed);
        let mut report = self.simulate_delivery(&mut rngs)?;
        let (transport, road, weather) = rngs.draws();
        log::debug!("seed {seed}: {transport} transport, {road} road, {weather} weather draws");
        report.seed = Some(seed);
        Ok(report)
    }

    /// Process every registered order once, in insertion order.
    ///
    /// Statistics accumulate across calls.
    ///
    /// # Errors
    ///
    /// Every check runs before the first order is processed, so a failed run leaves the
    /// statistics untouched. Returns [`SimulationError::EmptyCatalog`] when orders exist but a
    /// catalog list is empty, [`SimulationError::Catalog`] or [`SimulationError::Order`] for
    /// values that cannot be priced, and [`SimulationError::Selection`] when an order has no
    /// eligible transport.
    pub fn simulate_delivery<S>(&mut self, rngs: &mut S) -> Result<SimulationReport, SimulationError>
    where
        S: RandomSource + ?Sized,
    {
        self.preflight()?;
        let mut reports = Vec::with_capacity(self.orders.len());
        for (index, order) in self.orders.orders().iter().enumerate() {
            let report =
                process_order(&self.catalog, &self.model, &mut self.stats, index, order, rngs)?;
            log::info!("order {index}: {}", report.summary_line());
            reports.push(report);
        }
        Ok(SimulationReport {
            seed: None,
            orders: reports,
            stats: self.stats.snapshot(),
        })
    }

    fn preflight(&self) -> Result<(), SimulationError> {
        let pending = self.orders.len();
        if pending == 0 {
            return Ok(());
        }
        let checks = [
            (CatalogKind::Transport, self.catalog.transports().is_empty()),
            (CatalogKind::Road, self.catalog.roads().is_empty()),
            (CatalogKind::Weather, self.catalog.weather_conditions().is_empty()),
        ];
        for (kind, empty) in checks {
            if empty {
                return Err(SimulationError::EmptyCatalog {
                    kind,
                    orders: pending,
                });
            }
        }
        self.catalog.validate()?;
        for (index, order) in self.orders.orders().iter().enumerate() {
            order.validate(index)?;
            if selection::eligible_transports(&self.catalog, order).is_empty() {
                return Err(SelectionError::NoEligibleTransport {
                    origin: order.origin.name.clone(),
                    destination: order.destination.name.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

fn process_order<S>(
    catalog: &Catalog,
    model: &DeliveryModel,
    stats: &mut Statistics,
    index: usize,
    order: &Order,
    rngs: &mut S,
) -> Result<OrderReport, SimulationError>
where
    S: RandomSource + ?Sized,
{
    let transport = selection::choose_transport(catalog, order, rngs.transport_rng())?;
    let road = selection::choose_road(catalog, &order.origin, &order.destination, rngs.road_rng())?;
    let weather = selection::get_weather(catalog, &order.origin, rngs.weather_rng())?;
    log::debug!(
        "order {index}: {} via {} on {} ({})",
        order.destination.name,
        transport.name,
        road.name,
        weather.name
    );

    let outcome = evaluate(model, stats, order, transport, road, weather.is_good);
    Ok(OrderReport {
        index,
        origin: order.origin.name.clone(),
        destination: order.destination.name.clone(),
        transport: transport.name.clone(),
        road: road.name.clone(),
        weather: weather.name.clone(),
        outcome,
    })
}

fn evaluate(
    model: &DeliveryModel,
    stats: &mut Statistics,
    order: &Order,
    transport: &Transport,
    road: &Road,
    weather_is_good: bool,
) -> Outcome {
    // Selection already filters air, this re-check stays in the flow.
    if transport.name == AIR && !order.connects_majors() {
        return Outcome::Rejected {
            reason: RejectionReason::AirTransportInfeasible,
        };
    }
    if !weather_is_good {
        return Outcome::Rejected {
            reason: RejectionReason::WeatherBad,
        };
    }

    let time = model.delivery_time(order.cargo.weight, road, transport);
    let cost = model.delivery_cost(order.cargo.weight, road, transport);
    if time > order.desired_speed {
        return Outcome::Rejected {
            reason: RejectionReason::TimeExceedsDesired,
        };
    }
    if cost > order.desired_price {
        return Outcome::Rejected {
            reason: RejectionReason::CostExceedsDesired,
        };
    }

    stats.update_income(&order.destination.name, cost);
    stats.update_delivery_time(&order.destination.name, time);
    let accident_loss = stats.update_accident_losses(model, transport, road);
    Outcome::Delivered {
        time,
        cost,
        accident_loss,
    }
}
