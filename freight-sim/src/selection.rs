//! Transport, road, and weather selection for a single order.
use rand::Rng;
use smallvec::SmallVec;
use thiserror::Error;

use crate::catalog::{Catalog, City, Road, Transport, Weather};
use crate::orders::Order;

/// Transport name reserved for air freight.
pub const AIR: &str = "air";
/// Transport name reserved for rail freight.
pub const RAIL: &str = "rail";

/// Candidate list stored inline for typical catalog sizes.
pub type EligibleTransports<'a> = SmallVec<[&'a Transport; 4]>;

/// Eligibility family of a transport, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportClass {
    /// Needs both endpoints to be major cities.
    Air,
    /// Needs at least one major endpoint.
    Rail,
    /// Always eligible.
    Ground,
}

impl TransportClass {
    #[must_use]
    pub fn of(transport: &Transport) -> Self {
        match transport.name.as_str() {
            AIR => Self::Air,
            RAIL => Self::Rail,
            _ => Self::Ground,
        }
    }

    /// Whether a transport of this class may carry the given order.
    #[must_use]
    pub const fn serves(self, order: &Order) -> bool {
        match self {
            Self::Air => order.connects_majors(),
            Self::Rail => order.touches_major(),
            Self::Ground => true,
        }
    }
}

/// Raised when a selection has nothing to pick from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no transport is eligible for {origin} -> {destination}")]
    NoEligibleTransport { origin: String, destination: String },
    #[error("road catalog is empty")]
    NoRoads,
    #[error("weather catalog is empty")]
    NoWeather,
}

/// Transports whose class rule admits the order, in catalog order.
#[must_use]
pub fn eligible_transports<'a>(catalog: &'a Catalog, order: &Order) -> EligibleTransports<'a> {
    catalog
        .transports()
        .iter()
        .filter(|transport| TransportClass::of(transport).serves(order))
        .collect()
}

/// Pick a transport uniformly among the eligible ones.
///
/// # Errors
///
/// Returns [`SelectionError::NoEligibleTransport`] when no catalog entry serves the order.
pub fn choose_transport<'a, R>(
    catalog: &'a Catalog,
    order: &Order,
    rng: &mut R,
) -> Result<&'a Transport, SelectionError>
where
    R: Rng + ?Sized,
{
    let candidates = eligible_transports(catalog, order);
    if candidates.is_empty() {
        return Err(SelectionError::NoEligibleTransport {
            origin: order.origin.name.clone(),
            destination: order.destination.name.clone(),
        });
    }
    let roll = rng.gen_range(0..candidates.len());
    Ok(candidates[roll])
}

/// First highway in catalog order when either endpoint is major; otherwise a uniform pick
/// over the whole road catalog.
///
/// # Errors
///
/// Returns [`SelectionError::NoRoads`] when the catalog has no roads.
pub fn choose_road<'a, R>(
    catalog: &'a Catalog,
    origin: &City,
    destination: &City,
    rng: &mut R,
) -> Result<&'a Road, SelectionError>
where
    R: Rng + ?Sized,
{
    let roads = catalog.roads();
    if (origin.is_major || destination.is_major)
        && let Some(highway) = roads.iter().find(|road| road.is_highway)
    {
        return Ok(highway);
    }
    if roads.is_empty() {
        return Err(SelectionError::NoRoads);
    }
    Ok(&roads[rng.gen_range(0..roads.len())])
}

/// Uniform pick over the weather catalog. The city does not influence the draw.
///
/// # Errors
///
/// Returns [`SelectionError::NoWeather`] when the catalog has no weather entries.
pub fn get_weather<'a, R>(
    catalog: &'a Catalog,
    _city: &City,
    rng: &mut R,
) -> Result<&'a Weather, SelectionError>
where
    R: Rng + ?Sized,
{
    let conditions = catalog.weather_conditions();
    if conditions.is_empty() {
        return Err(SelectionError::NoWeather);
    }
    Ok(&conditions[rng.gen_range(0..conditions.len())])
}
