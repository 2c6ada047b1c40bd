//! Conversion from dataset records to domain stations.
//!
//! The dataset has one record per station *entrance*. Records sharing a
//! station id are merged, accumulating their coordinates as entrances.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::{Coordinate, DomainError, LineId, Station, StationId};

use super::client::StationDto;

/// Merge entrance records into stations, in order of first appearance.
///
/// Records that fail validation are skipped with a warning.
pub fn convert_stations(records: &[StationDto]) -> Vec<Station> {
    let mut stations: Vec<Station> = Vec::new();
    let mut positions: HashMap<StationId, usize> = HashMap::new();

    for record in records {
        let (id, entrance) = match parse_identity(record) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(record = ?record.idparada, error = %e, "Skipping station record");
                continue;
            }
        };

        if let Some(&pos) = positions.get(&id) {
            stations[pos].push_entrance(entrance);
            continue;
        }

        let lines = match LineId::parse_list(&record.lineas.as_text()) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(station = %id, error = %e, "Skipping station with bad line list");
                continue;
            }
        };

        positions.insert(id, stations.len());
        stations.push(Station::new(id, record.denominacion.clone(), lines, entrance));
    }

    stations
}

/// Parse the station id and the entrance location of one record.
fn parse_identity(record: &StationDto) -> Result<(StationId, Coordinate), DomainError> {
    let id = StationId::parse(&record.idparada.as_text())?;
    // The dataset stores positions as [longitude, latitude]
    let [lon, lat] = record.geo_shape.geometry.coordinates;
    let entrance = Coordinate::new(lat, lon)?;
    Ok((id, entrance))
}
