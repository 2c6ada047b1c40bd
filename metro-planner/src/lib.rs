//! Metro route planner.
//!
//! Answers: "Which stations do I pass through to get from here to there,
//! and which line do I ride on each hop?" Stations come from the open-data
//! entrances dataset; the live departures board can optionally restrict
//! routes to lines that are running right now.

pub mod domain;
pub mod live;
pub mod planner;
pub mod stations;
