//! Itinerary types.
//!
//! An `Itinerary` is the station-by-station answer to a planning request:
//! every stop from origin to destination, each annotated with the lines that
//! can be ridden to the next stop.

use std::collections::BTreeSet;

use super::{DomainError, LineId, StationId};

/// One stop of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryStep {
    /// The station at this stop.
    pub station: StationId,
    /// Lines usable to reach the next stop; `None` on the final stop.
    pub lines: Option<BTreeSet<LineId>>,
}

impl ItineraryStep {
    /// Returns true if this is the arrival step.
    pub fn is_terminal(&self) -> bool {
        self.lines.is_none()
    }
}

/// A complete route from origin to destination.
///
/// Construction guarantees at least one step, a non-empty line set on every
/// step but the last, and no line set on the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    steps: Vec<ItineraryStep>,
}

impl Itinerary {
    /// Build an itinerary from its steps, validating the shape.
    pub fn new(steps: Vec<ItineraryStep>) -> Result<Self, DomainError> {
        let Some((last, rest)) = steps.split_last() else {
            return Err(DomainError::EmptyItinerary);
        };

        if !last.is_terminal() {
            return Err(DomainError::InvalidItinerary("final step carries a line set"));
        }

        for step in rest {
            match &step.lines {
                None => {
                    return Err(DomainError::InvalidItinerary(
                        "intermediate step has no line set",
                    ));
                }
                Some(lines) if lines.is_empty() => {
                    return Err(DomainError::InvalidItinerary(
                        "intermediate step has an empty line set",
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(Self { steps })
    }

    /// A single-step itinerary: already at the destination.
    pub fn arrived(station: StationId) -> Self {
        Self {
            steps: vec![ItineraryStep {
                station,
                lines: None,
            }],
        }
    }

    pub fn steps(&self) -> &[ItineraryStep] {
        &self.steps
    }

    /// Returns the first station.
    pub fn origin(&self) -> StationId {
        self.steps[0].station
    }

    /// Returns the final station.
    pub fn destination(&self) -> StationId {
        self.steps[self.steps.len() - 1].station
    }

    /// Number of hops between stations.
    pub fn hop_count(&self) -> usize {
        self.steps.len() - 1
    }

    /// Station ids in travel order.
    pub fn stations(&self) -> Vec<StationId> {
        self.steps.iter().map(|s| s.station).collect()
    }
}
