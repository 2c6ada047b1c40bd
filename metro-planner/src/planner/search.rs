//! Least-cost search over the station graph.
//!
//! Dijkstra with a binary heap keyed by cumulative distance. Edge costs are
//! great-circle distances and never negative. The frontier is exhausted, so
//! the tables cover every station reachable from the origin.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::trace;

use crate::domain::StationId;

use super::graph::StationGraph;

/// Best known cumulative distance (metres) from the origin, per station.
pub type DistanceTable = HashMap<StationId, f64>;

/// Station visited immediately before each station on its best path.
pub type PredecessorTable = HashMap<StationId, StationId>;

/// Result of a search from one origin.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    origin: StationId,
    distances: DistanceTable,
    predecessors: PredecessorTable,
}

impl ShortestPaths {
    pub fn origin(&self) -> StationId {
        self.origin
    }

    pub fn distances(&self) -> &DistanceTable {
        &self.distances
    }

    pub fn predecessors(&self) -> &PredecessorTable {
        &self.predecessors
    }

    /// Cumulative distance to a station, if reachable.
    pub fn distance_to(&self, station: StationId) -> Option<f64> {
        self.distances.get(&station).copied()
    }

    pub fn is_reachable(&self, station: StationId) -> bool {
        self.distances.contains_key(&station)
    }
}

/// Compute least-cost paths from `origin` to every reachable station.
///
/// An origin absent from the graph yields tables containing only the origin.
pub fn shortest_paths(graph: &StationGraph, origin: StationId) -> ShortestPaths {
    let mut distances = DistanceTable::new();
    let mut predecessors = PredecessorTable::new();
    let mut queue = BinaryHeap::new();
    let mut relaxations = 0usize;

    distances.insert(origin, 0.0);
    queue.push(QueueEntry::new(origin, 0.0));

    while let Some(entry) = queue.pop() {
        let current = entry.station;
        // Stale entry: a cheaper path was found after this one was queued
        if distances
            .get(&current)
            .is_some_and(|&best| entry.cost.0 > best)
        {
            continue;
        }

        for next in graph.neighbours(current) {
            let Some(hop) = graph.cost(current, next) else {
                continue;
            };
            let next_cost = entry.cost.0 + hop;

            let improves = distances
                .get(&next)
                .is_none_or(|&best| next_cost < best);
            if !improves {
                continue;
            }

            trace!(
                from = %current,
                to = %next,
                cost = next_cost,
                "Relaxed station"
            );
            relaxations += 1;
            distances.insert(next, next_cost);
            predecessors.insert(next, current);
            queue.push(QueueEntry::new(next, next_cost));
        }
    }

    trace!(
        origin = %origin,
        reachable = distances.len(),
        relaxations,
        "Search complete"
    );

    ShortestPaths {
        origin,
        distances,
        predecessors,
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    station: StationId,
    cost: Cost,
}

impl QueueEntry {
    fn new(station: StationId, cost: f64) -> Self {
        Self {
            station,
            cost: Cost(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the cheapest entry first
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.station.cmp(&self.station))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
