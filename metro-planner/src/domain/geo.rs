//! Great-circle distances between coordinates and stations.

use super::{Coordinate, Station};

/// Earth radius used by the haversine formula, in kilometres.
///
/// Slightly above the 6371 km mean radius; it is the value the station
/// network's distances have always been computed with.
pub const EARTH_RADIUS_KM: f64 = 6373.0;

/// Distance in metres between two coordinates (haversine formula).
pub fn distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon() - a.lon()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c * 1000.0
}

/// Distance in metres from a coordinate to the closest entrance of a station.
pub fn distance_to_station(point: &Coordinate, station: &Station) -> f64 {
    station
        .entrances()
        .iter()
        .map(|entrance| distance(point, entrance))
        .fold(f64::INFINITY, f64::min)
}

/// Distance in metres between two stations: the closest pair of entrances.
pub fn station_distance(a: &Station, b: &Station) -> f64 {
    a.entrances()
        .iter()
        .map(|entrance| distance_to_station(entrance, b))
        .fold(f64::INFINITY, f64::min)
}
