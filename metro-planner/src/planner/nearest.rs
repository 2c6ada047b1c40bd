//! Nearest-station lookup for arbitrary coordinates.

use crate::domain::{Coordinate, Station, distance_to_station};

/// The `n` stations closest to `point`, nearest first.
///
/// Distance to a station is the distance to its closest entrance. Ties keep
/// the order of `stations`.
pub fn nearest_stations<'a>(
    point: &Coordinate,
    stations: &'a [Station],
    n: usize,
) -> Vec<&'a Station> {
    let mut ranked: Vec<(f64, &Station)> = stations
        .iter()
        .map(|station| (distance_to_station(point, station), station))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().take(n).map(|(_, station)| station).collect()
}

/// The single closest station, if any.
pub fn nearest_station<'a>(point: &Coordinate, stations: &'a [Station]) -> Option<&'a Station> {
    nearest_stations(point, stations, 1).into_iter().next()
}
