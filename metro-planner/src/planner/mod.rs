//! Route planner over the metro station graph.
//!
//! This module implements the core planning pipeline that answers:
//! "Which stations do I pass through, and which line do I ride on each hop?"
//!
//! Stations become a graph in which two stations are adjacent when they share
//! a line (optionally only lines the live board reports as running). A
//! least-cost search using great-circle distance fills a predecessor table,
//! and the itinerary is rebuilt by walking it back from the destination.
//!
//! Limitation: a hop means "both stations are on a common line". The graph
//! does not know train direction or whether the two stops are consecutive.

mod config;
mod error;
mod graph;
mod nearest;
mod reconstruct;
mod route;
mod search;

#[cfg(test)]
mod plan_tests;

pub use config::PlanConfig;
pub use error::{PlanError, UpstreamError};
pub use graph::{EffectiveLines, LineIndex, StationGraph};
pub use nearest::{nearest_station, nearest_stations};
pub use reconstruct::reconstruct;
pub use route::{RoutePlanner, plan_route};
pub use search::{DistanceTable, PredecessorTable, ShortestPaths, shortest_paths};
