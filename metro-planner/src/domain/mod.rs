//! Domain types for the metro route planner.
//!
//! This module contains the validated value types shared by the station
//! source, the live-service client and the planner. Types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod error;
mod geo;
mod itinerary;
mod station;

pub use error::DomainError;
pub use geo::{EARTH_RADIUS_KM, distance, distance_to_station, station_distance};
pub use itinerary::{Itinerary, ItineraryStep};
pub use station::{Coordinate, LineId, Station, StationId};
