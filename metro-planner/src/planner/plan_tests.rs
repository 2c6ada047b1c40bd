//! End-to-end tests for route planning.

use std::collections::BTreeSet;

use super::*;
use crate::domain::{Coordinate, LineId, Station, StationId};
use crate::live::StaticLiveService;
use crate::stations::{StationError, StationSource};

fn line(n: u8) -> LineId {
    LineId::new(n).unwrap()
}

fn lines(ns: &[u8]) -> BTreeSet<LineId> {
    ns.iter().map(|&n| line(n)).collect()
}

fn coord(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

fn station(id: u32, ls: &[u8], lat: f64, lon: f64) -> Station {
    Station::new(
        StationId(id),
        format!("Station {id}"),
        ls.iter().map(|&n| line(n)),
        coord(lat, lon),
    )
}

/// Line 1 serves 1, 2, 3 and line 2 serves 3, 4, 5. Station 2 sits off the
/// straight line between 1 and 3.
fn network() -> Vec<Station> {
    vec![
        station(1, &[1], 0.0, 0.0),
        station(2, &[1], 0.01, 0.01),
        station(3, &[1, 2], 0.0, 0.02),
        station(4, &[2], 0.01, 0.03),
        station(5, &[2], 0.0, 0.04),
    ]
}

/// Live board reporting every declared line.
fn all_running() -> StaticLiveService {
    network()
        .iter()
        .fold(StaticLiveService::new(), |live, s| {
            live.with_lines(s.id(), s.lines().iter().copied())
        })
}

fn ids(ns: &[u32]) -> Vec<StationId> {
    ns.iter().map(|&n| StationId(n)).collect()
}

struct Unavailable;

impl StationSource for Unavailable {
    async fn fetch_stations(&self) -> Result<Vec<Station>, StationError> {
        Err(StationError::Unauthorized)
    }
}

#[test]
fn interchange_route() {
    let graph = StationGraph::from_declared(network());
    let itinerary = plan_route(&graph, StationId(1), StationId(5)).unwrap();

    assert_eq!(itinerary.stations(), ids(&[1, 3, 5]));
    assert_eq!(itinerary.steps()[0].lines, Some(lines(&[1])));
    assert_eq!(itinerary.steps()[1].lines, Some(lines(&[2])));
    assert!(itinerary.steps()[2].is_terminal());
}

#[test]
fn same_line_is_a_single_hop() {
    let graph = StationGraph::from_declared(network());
    let itinerary = plan_route(&graph, StationId(1), StationId(2)).unwrap();

    assert_eq!(itinerary.stations(), ids(&[1, 2]));
    assert_eq!(itinerary.hop_count(), 1);
}

#[test]
fn same_origin_and_destination() {
    let graph = StationGraph::from_declared(network());
    let itinerary = plan_route(&graph, StationId(4), StationId(4)).unwrap();

    assert_eq!(itinerary.stations(), ids(&[4]));
    assert!(itinerary.steps()[0].lines.is_none());
}

#[test]
fn unknown_station_is_not_no_route() {
    let graph = StationGraph::from_declared(network());

    let err = plan_route(&graph, StationId(1), StationId(99)).unwrap_err();
    assert!(matches!(err, PlanError::UnknownStation(StationId(99))));

    let err = plan_route(&graph, StationId(42), StationId(1)).unwrap_err();
    assert!(matches!(err, PlanError::UnknownStation(StationId(42))));
}

#[test]
fn disconnected_lines_have_no_route() {
    let mut stations = network();
    stations.push(station(6, &[7], 0.0, 0.05));
    let graph = StationGraph::from_declared(stations);

    let err = plan_route(&graph, StationId(1), StationId(6)).unwrap_err();
    assert!(matches!(
        err,
        PlanError::NoRouteFound {
            origin: StationId(1),
            destination: StationId(6),
        }
    ));
}

#[test]
fn planning_is_idempotent() {
    let graph = StationGraph::from_declared(network());
    let first = plan_route(&graph, StationId(2), StationId(4)).unwrap();
    let second = plan_route(&graph, StationId(2), StationId(4)).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn plan_by_station_ids_without_live() {
    let stations = network();
    let live = StaticLiveService::new();
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let itinerary = planner
        .plan_by_station_ids(StationId(1), StationId(5), false)
        .await
        .unwrap();

    assert_eq!(itinerary.stations(), ids(&[1, 3, 5]));
    assert_eq!(live.call_count(), 0);
}

#[tokio::test]
async fn plan_by_station_ids_with_live() {
    let stations = network();
    let live = all_running();
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let itinerary = planner
        .plan_by_station_ids(StationId(1), StationId(5), true)
        .await
        .unwrap();

    assert_eq!(itinerary.stations(), ids(&[1, 3, 5]));
    assert_eq!(live.call_count(), 5);
}

#[tokio::test]
async fn unknown_station_checked_before_live_queries() {
    let stations = network();
    let live = all_running();
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let err = planner
        .plan_by_station_ids(StationId(1), StationId(99), true)
        .await
        .unwrap_err();

    assert!(matches!(err, PlanError::UnknownStation(StationId(99))));
    assert_eq!(live.call_count(), 0);
}

#[tokio::test]
async fn dead_interchange_cuts_the_route() {
    // Station 3 is the only link between the lines
    let stations = network();
    let live = network()
        .iter()
        .filter(|s| s.id() != StationId(3))
        .fold(StaticLiveService::new(), |live, s| {
            live.with_lines(s.id(), s.lines().iter().copied())
        });
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let err = planner
        .plan_by_station_ids(StationId(1), StationId(5), true)
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::NoRouteFound { .. }));

    // Without live filtering the route is still there
    let itinerary = planner
        .plan_by_station_ids(StationId(1), StationId(5), false)
        .await
        .unwrap();
    assert_eq!(itinerary.stations(), ids(&[1, 3, 5]));
}

#[tokio::test]
async fn origin_without_live_lines() {
    let stations = network();
    let live = StaticLiveService::new()
        .with_lines(StationId(2), [line(1)])
        .with_lines(StationId(3), [line(1), line(2)]);
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let err = planner
        .plan_by_station_ids(StationId(1), StationId(2), true)
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::NoRouteFound { .. }));

    let itinerary = planner
        .plan_by_station_ids(StationId(1), StationId(1), true)
        .await
        .unwrap();
    assert_eq!(itinerary.stations(), ids(&[1]));
}

#[tokio::test]
async fn destination_without_live_lines() {
    // Station 5 has no train due, the rest of line 2 is running
    let stations = network();
    let live = network()
        .iter()
        .filter(|s| s.id() != StationId(5))
        .fold(StaticLiveService::new(), |live, s| {
            live.with_lines(s.id(), s.lines().iter().copied())
        });
    let config = PlanConfig::default().with_live_service(true);
    let graph = StationGraph::build(stations, &config, &live).await.unwrap();

    assert!(graph.line_index().stations_on(line(2)).iter().all(|&id| id != StationId(5)));
    let err = plan_route(&graph, StationId(3), StationId(5)).unwrap_err();
    assert!(matches!(
        err,
        PlanError::NoRouteFound {
            origin: StationId(3),
            destination: StationId(5),
        }
    ));

    let itinerary = plan_route(&graph, StationId(5), StationId(5)).unwrap();
    assert_eq!(itinerary.stations(), ids(&[5]));
}

#[tokio::test]
async fn failed_board_degrades_by_default() {
    let stations = network();
    let live = all_running().failing(StationId(4));
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let itinerary = planner
        .plan_by_station_ids(StationId(1), StationId(5), true)
        .await
        .unwrap();
    assert_eq!(itinerary.stations(), ids(&[1, 3, 5]));

    let err = planner
        .plan_by_station_ids(StationId(1), StationId(4), true)
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::NoRouteFound { .. }));
}

#[tokio::test]
async fn failed_board_is_fatal_when_strict() {
    let stations = network();
    let live = all_running().failing(StationId(4));
    let config = PlanConfig::default().with_strict_live(true);
    let planner = RoutePlanner::new(&stations, &live, &config);

    let err = planner
        .plan_by_station_ids(StationId(1), StationId(5), true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::UpstreamUnavailable(UpstreamError::Live {
            station: StationId(4),
            ..
        })
    ));
}

#[tokio::test]
async fn station_source_failure_is_upstream() {
    let live = StaticLiveService::new();
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&Unavailable, &live, &config);

    let err = planner
        .plan_by_station_ids(StationId(1), StationId(5), false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlanError::UpstreamUnavailable(UpstreamError::Stations(StationError::Unauthorized))
    ));
}

#[tokio::test]
async fn plan_by_coordinates_resolves_nearest() {
    let stations = network();
    let live = StaticLiveService::new();
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let itinerary = planner
        .plan_by_coordinates(coord(0.0, 0.001), coord(0.0, 0.039), false)
        .await
        .unwrap();
    assert_eq!(itinerary.stations(), ids(&[1, 3, 5]));

    let itinerary = planner
        .plan_by_coordinates(coord(0.0, 0.0), coord(0.0001, 0.0001), false)
        .await
        .unwrap();
    assert_eq!(itinerary.stations(), ids(&[1]));
}

#[tokio::test]
async fn plan_by_coordinates_without_stations() {
    let stations: Vec<Station> = Vec::new();
    let live = StaticLiveService::new();
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let err = planner
        .plan_by_coordinates(coord(0.0, 0.0), coord(1.0, 1.0), false)
        .await
        .unwrap_err();
    assert!(matches!(err, PlanError::NoStations));
}

#[tokio::test]
async fn nearest_stations_entry_point() {
    let stations = network();
    let live = StaticLiveService::new();
    let config = PlanConfig::default();
    let planner = RoutePlanner::new(&stations, &live, &config);

    let nearest = planner
        .nearest_stations(coord(0.0, 0.041), 2)
        .await
        .unwrap();
    let found: Vec<StationId> = nearest.iter().map(Station::id).collect();
    assert_eq!(found, ids(&[5, 4]));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    type RawStation = (Vec<u8>, f64, f64);

    fn raw_network() -> impl Strategy<Value = Vec<RawStation>> {
        prop::collection::vec(
            (
                prop::collection::vec(1u8..=4, 0..3),
                -0.05f64..0.05,
                -0.05f64..0.05,
            ),
            1..12,
        )
    }

    fn build(raw: &[RawStation]) -> Vec<Station> {
        raw.iter()
            .enumerate()
            .map(|(i, (ls, lat, lon))| station(i as u32 + 1, ls, *lat, *lon))
            .collect()
    }

    fn pick(stations: &[Station], n: usize) -> StationId {
        stations[n % stations.len()].id()
    }

    proptest! {
        #[test]
        fn itinerary_is_well_formed(raw in raw_network(), a in 0usize..64, b in 0usize..64) {
            let stations = build(&raw);
            let (origin, destination) = (pick(&stations, a), pick(&stations, b));
            let graph = StationGraph::from_declared(stations);

            if let Ok(itinerary) = plan_route(&graph, origin, destination) {
                prop_assert_eq!(itinerary.origin(), origin);
                prop_assert_eq!(itinerary.destination(), destination);
                prop_assert!(!itinerary.steps().is_empty());

                for pair in itinerary.steps().windows(2) {
                    let hop = pair[0].lines.as_ref().unwrap();
                    let from = graph.effective_lines(pair[0].station).unwrap();
                    let to = graph.effective_lines(pair[1].station).unwrap();
                    prop_assert!(!hop.is_empty());
                    prop_assert!(hop.is_subset(from));
                    prop_assert!(hop.is_subset(to));
                }

                let again = plan_route(&graph, origin, destination).unwrap();
                prop_assert_eq!(itinerary, again);
            }
        }

        #[test]
        fn live_filtering_never_adds_routes(
            raw in raw_network(),
            mask in prop::collection::vec(any::<bool>(), 12),
            a in 0usize..64,
            b in 0usize..64,
        ) {
            let stations = build(&raw);
            let (origin, destination) = (pick(&stations, a), pick(&stations, b));

            // Drop a station's lines entirely when its mask bit is unset
            let effective: EffectiveLines = stations
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let kept = if mask[i] { s.lines().clone() } else { BTreeSet::new() };
                    (s.id(), kept)
                })
                .collect();

            let declared = StationGraph::from_declared(stations.clone());
            let live = StationGraph::new(stations, effective);

            if plan_route(&live, origin, destination).is_ok() {
                prop_assert!(plan_route(&declared, origin, destination).is_ok());
            }
        }
    }
}
