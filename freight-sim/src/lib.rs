//! Freight Agency Simulation Engine
//!
//! Platform-agnostic core for the freight delivery simulator: catalogs of cities, transport
//! modes, roads and weather, order registration, randomized transport/road selection, delivery
//! evaluation, and statistics aggregation. Console rendering lives in `freight-cli`.

pub mod catalog;
pub mod evaluator;
pub mod numbers;
pub mod orders;
pub mod rng;
pub mod scenario;
pub mod selection;
pub mod simulation;
pub mod stats;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, City, Road, Transport, Weather};
pub use evaluator::{
    DeliveryModel, DeliveryModelError, calculate_delivery_cost, calculate_delivery_time,
};
pub use orders::{Cargo, Order, OrderError, OrderRegistry};
pub use rng::{CountingRng, RandomSource, RngBundle};
pub use scenario::{OrderSpec, Scenario, ScenarioError};
pub use selection::{
    AIR, EligibleTransports, RAIL, SelectionError, TransportClass, choose_road, choose_transport,
    eligible_transports, get_weather,
};
pub use simulation::{
    CatalogKind, OrderReport, Outcome, RejectionReason, SimulationError, SimulationReport,
    TransAgency,
};
pub use stats::{AccidentLosses, Statistics, StatisticsSnapshot};

/// Seed used when neither the caller nor the scenario provides one.
pub const DEFAULT_SEED: u64 = 1337;

/// Trait for abstracting scenario loading.
/// Platform-specific implementations should provide this
pub trait ScenarioLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the scenario from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario cannot be read or parsed.
    fn load_scenario(&self) -> Result<Scenario, Self::Error>;
}

/// Main engine tying a scenario source to simulation runs
pub struct FreightEngine<L>
where
    L: ScenarioLoader,
{
    loader: L,
}

impl<L> FreightEngine<L>
where
    L: ScenarioLoader,
{
    /// Create a new engine with the provided scenario loader
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Build a fresh agency from the loaded scenario
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario cannot be loaded.
    pub fn create_agency(&self) -> Result<TransAgency, L::Error> {
        self.loader.load_scenario().map(|s| s.build_agency())
    }

    /// Run one simulation on a fresh agency.
    ///
    /// The seed falls back to the scenario's own seed, then to [`DEFAULT_SEED`].
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario cannot be loaded or the run hits a fatal
    /// configuration error.
    pub fn run(&self, seed: Option<u64>) -> Result<SimulationReport, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let scenario = self.loader.load_scenario().map_err(Into::into)?;
        let seed = seed.or(scenario.seed).unwrap_or(DEFAULT_SEED);
        let mut agency = scenario.build_agency();
        Ok(agency.simulate_with_seed(seed)?)
    }
}
