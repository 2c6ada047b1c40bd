//! Itinerary reconstruction from a predecessor table.

use std::collections::{BTreeSet, HashSet};

use crate::domain::{Itinerary, ItineraryStep, LineId, StationId};

use super::error::PlanError;
use super::graph::StationGraph;
use super::search::PredecessorTable;

/// Walk the predecessor chain from `destination` back to `origin` and
/// annotate each hop with the lines shared by its two stations.
///
/// A destination with no predecessor is unreachable (`NoRouteFound`). A
/// chain that breaks or loops before reaching the origin, or a hop with no
/// shared line, is a broken invariant (`Internal`).
pub fn reconstruct(
    graph: &StationGraph,
    predecessors: &PredecessorTable,
    origin: StationId,
    destination: StationId,
) -> Result<Itinerary, PlanError> {
    if origin == destination {
        return Ok(Itinerary::arrived(origin));
    }

    if !predecessors.contains_key(&destination) {
        return Err(PlanError::NoRouteFound {
            origin,
            destination,
        });
    }

    let mut chain = vec![destination];
    let mut visited = HashSet::from([destination]);
    let mut current = destination;

    while current != origin {
        let Some(&previous) = predecessors.get(&current) else {
            return Err(PlanError::Internal(format!(
                "predecessor chain from {destination} breaks at station {current}"
            )));
        };
        if !visited.insert(previous) {
            return Err(PlanError::Internal(format!(
                "predecessor chain from {destination} loops at station {previous}"
            )));
        }
        chain.push(previous);
        current = previous;
    }

    chain.reverse();

    let mut steps = Vec::with_capacity(chain.len());
    for pair in chain.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        steps.push(ItineraryStep {
            station: from,
            lines: Some(shared_lines(graph, from, to)?),
        });
    }
    steps.push(ItineraryStep {
        station: destination,
        lines: None,
    });

    Itinerary::new(steps).map_err(|e| PlanError::Internal(e.to_string()))
}

/// Lines usable between two consecutive stops.
fn shared_lines(
    graph: &StationGraph,
    from: StationId,
    to: StationId,
) -> Result<BTreeSet<LineId>, PlanError> {
    let shared: BTreeSet<LineId> = match (graph.effective_lines(from), graph.effective_lines(to)) {
        (Some(a), Some(b)) => a.intersection(b).copied().collect(),
        _ => BTreeSet::new(),
    };

    if shared.is_empty() {
        return Err(PlanError::Internal(format!(
            "stations {from} and {to} share no line"
        )));
    }
    Ok(shared)
}
