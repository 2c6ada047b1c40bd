//! Planning entry points.
//!
//! Every call loads the current station list, builds a fresh graph (with or
//! without live filtering), searches it and reconstructs the itinerary.
//! Nothing is kept between calls.

use tracing::{debug, info};

use crate::domain::{Coordinate, Itinerary, Station, StationId};
use crate::live::LiveService;
use crate::stations::StationSource;

use super::config::PlanConfig;
use super::error::PlanError;
use super::graph::StationGraph;
use super::nearest::{nearest_station, nearest_stations};
use super::reconstruct::reconstruct;
use super::search::shortest_paths;

/// Plan a route over an already-built graph.
pub fn plan_route(
    graph: &StationGraph,
    origin: StationId,
    destination: StationId,
) -> Result<Itinerary, PlanError> {
    for id in [origin, destination] {
        if !graph.contains(id) {
            return Err(PlanError::UnknownStation(id));
        }
    }

    let paths = shortest_paths(graph, origin);
    debug!(
        origin = %origin,
        reachable = paths.distances().len(),
        "Search finished"
    );

    reconstruct(graph, paths.predecessors(), origin, destination)
}

/// Route planner over a station source and a live service.
pub struct RoutePlanner<'a, S: StationSource, L: LiveService> {
    stations: &'a S,
    live: &'a L,
    config: &'a PlanConfig,
}

impl<'a, S: StationSource, L: LiveService> RoutePlanner<'a, S, L> {
    /// Create a new planner.
    pub fn new(stations: &'a S, live: &'a L, config: &'a PlanConfig) -> Self {
        Self {
            stations,
            live,
            config,
        }
    }

    /// Plan between two station ids.
    pub async fn plan_by_station_ids(
        &self,
        origin: StationId,
        destination: StationId,
        use_live_service: bool,
    ) -> Result<Itinerary, PlanError> {
        let stations = self.stations.fetch_stations().await?;
        self.plan(stations, origin, destination, use_live_service)
            .await
    }

    /// Plan between two coordinates, each resolved to its nearest station.
    pub async fn plan_by_coordinates(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        use_live_service: bool,
    ) -> Result<Itinerary, PlanError> {
        let stations = self.stations.fetch_stations().await?;

        let from = nearest_station(&origin, &stations)
            .ok_or(PlanError::NoStations)?
            .id();
        let to = nearest_station(&destination, &stations)
            .ok_or(PlanError::NoStations)?
            .id();
        debug!(
            origin = %origin,
            from = %from,
            destination = %destination,
            to = %to,
            "Resolved coordinates to stations"
        );

        self.plan(stations, from, to, use_live_service).await
    }

    /// The `n` stations nearest to a coordinate.
    pub async fn nearest_stations(
        &self,
        point: Coordinate,
        n: usize,
    ) -> Result<Vec<Station>, PlanError> {
        let stations = self.stations.fetch_stations().await?;
        Ok(nearest_stations(&point, &stations, n)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn plan(
        &self,
        stations: Vec<Station>,
        origin: StationId,
        destination: StationId,
        use_live_service: bool,
    ) -> Result<Itinerary, PlanError> {
        // Unknown ids are rejected before paying for live queries
        for id in [origin, destination] {
            if !stations.iter().any(|s| s.id() == id) {
                return Err(PlanError::UnknownStation(id));
            }
        }

        let config = self.config.clone().with_live_service(use_live_service);
        let graph = StationGraph::build(stations, &config, self.live).await?;
        let itinerary = plan_route(&graph, origin, destination)?;

        info!(
            origin = %origin,
            destination = %destination,
            hops = itinerary.hop_count(),
            live = use_live_service,
            "Planned route"
        );
        Ok(itinerary)
    }
}
