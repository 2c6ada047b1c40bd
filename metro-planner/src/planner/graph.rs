//! Station graph construction.
//!
//! The routing graph is a projection of line membership onto stations: two
//! stations are adjacent iff they share at least one *effective* line. The
//! graph knows nothing about train direction or stop order, so a single hop
//! may span several physical stops of the same line.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{LineId, Station, StationId, station_distance};
use crate::live::LiveService;

use super::config::PlanConfig;
use super::error::{PlanError, UpstreamError};

/// Lines usable at each station for one planning run.
pub type EffectiveLines = HashMap<StationId, BTreeSet<LineId>>;

/// Mapping from line to the stations it serves, in station-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    lines: BTreeMap<LineId, Vec<StationId>>,
}

impl LineIndex {
    /// Build the index from each station's effective lines.
    pub fn build(stations: &[Station], effective: &EffectiveLines) -> Self {
        let mut lines: BTreeMap<LineId, Vec<StationId>> = BTreeMap::new();
        for station in stations {
            let Some(station_lines) = effective.get(&station.id()) else {
                continue;
            };
            for line in station_lines {
                let members = lines.entry(*line).or_default();
                if !members.contains(&station.id()) {
                    members.push(station.id());
                }
            }
        }
        Self { lines }
    }

    /// Stations served by a line.
    pub fn stations_on(&self, line: LineId) -> &[StationId] {
        self.lines.get(&line).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every indexed line, ascending.
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        self.lines.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// In-memory station network for a single planning run.
#[derive(Debug, Clone)]
pub struct StationGraph {
    stations: Vec<Station>,
    positions: HashMap<StationId, usize>,
    effective: EffectiveLines,
    index: LineIndex,
}

impl StationGraph {
    /// Assemble a graph from stations and their effective lines.
    ///
    /// Stations missing from `effective` have no usable lines. A repeated
    /// station id keeps its first occurrence.
    pub fn new(stations: Vec<Station>, mut effective: EffectiveLines) -> Self {
        let mut unique = Vec::with_capacity(stations.len());
        let mut positions = HashMap::with_capacity(stations.len());

        for station in stations {
            if positions.contains_key(&station.id()) {
                warn!(station = %station.id(), "Ignoring duplicate station");
                continue;
            }
            positions.insert(station.id(), unique.len());
            unique.push(station);
        }

        effective.retain(|id, _| positions.contains_key(id));
        let index = LineIndex::build(&unique, &effective);

        Self {
            stations: unique,
            positions,
            effective,
            index,
        }
    }

    /// Graph using each station's declared lines. Never queries the live board.
    pub fn from_declared(stations: Vec<Station>) -> Self {
        let effective = declared_lines(&stations);
        Self::new(stations, effective)
    }

    /// Build the graph as configured, querying the live board when
    /// `config.use_live_service` is set.
    ///
    /// A station left with no effective lines (no train due, or a failed
    /// query outside strict mode) has no neighbours and is in no line of the
    /// index. It cannot be reached from any other station, even as the
    /// destination, because the final hop needs a line shared by both ends.
    /// Planning from such a station to itself still succeeds.
    pub async fn build<L: LiveService>(
        stations: Vec<Station>,
        config: &PlanConfig,
        live: &L,
    ) -> Result<Self, PlanError> {
        if !config.use_live_service {
            return Ok(Self::from_declared(stations));
        }

        let effective = live_lines(&stations, config, live).await?;
        Ok(Self::new(stations, effective))
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.positions.get(&id).map(|&pos| &self.stations[pos])
    }

    pub fn contains(&self, id: StationId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Effective lines of a station; `None` when it has none.
    pub fn effective_lines(&self, id: StationId) -> Option<&BTreeSet<LineId>> {
        self.effective.get(&id).filter(|lines| !lines.is_empty())
    }

    /// Stations reachable in one hop from `id`, in a deterministic order.
    pub fn neighbours(&self, id: StationId) -> Vec<StationId> {
        let Some(lines) = self.effective_lines(id) else {
            return Vec::new();
        };

        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for line in lines {
            for &other in self.index.stations_on(*line) {
                if other != id && seen.insert(other) {
                    out.push(other);
                }
            }
        }
        out
    }

    /// Cost of a hop in metres, or `None` if either station is unknown.
    pub fn cost(&self, from: StationId, to: StationId) -> Option<f64> {
        Some(station_distance(self.station(from)?, self.station(to)?))
    }
}

/// Each station's statically declared lines.
fn declared_lines(stations: &[Station]) -> EffectiveLines {
    stations
        .iter()
        .map(|s| (s.id(), s.lines().clone()))
        .collect()
}

/// Query the live board for every station, `batch_size` queries at a time.
///
/// Reported lines are restricted to the station's declared lines. A failed
/// query leaves the station with no lines unless `strict_live` is set.
async fn live_lines<L: LiveService>(
    stations: &[Station],
    config: &PlanConfig,
    live: &L,
) -> Result<EffectiveLines, PlanError> {
    let mut effective = EffectiveLines::with_capacity(stations.len());
    let mut failures = 0;

    for batch in stations.chunks(config.batch_size.max(1)) {
        let futures: Vec<_> = batch
            .iter()
            .map(|station| async move {
                let result = live.live_lines(station.id()).await;
                (station, result)
            })
            .collect();

        for (station, result) in join_all(futures).await {
            let lines = match result {
                Ok(reported) => reported
                    .intersection(station.lines())
                    .copied()
                    .collect::<BTreeSet<_>>(),
                Err(e) if config.strict_live => {
                    return Err(UpstreamError::Live {
                        station: station.id(),
                        source: e,
                    }
                    .into());
                }
                Err(e) => {
                    warn!(
                        station = %station.id(),
                        error = %e,
                        "Live query failed, treating station as not served"
                    );
                    failures += 1;
                    BTreeSet::new()
                }
            };
            effective.insert(station.id(), lines);
        }
    }

    debug!(
        stations = stations.len(),
        failures, "Resolved live lines"
    );

    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinate;
    use crate::live::StaticLiveService;

    fn line(n: u8) -> LineId {
        LineId::new(n).unwrap()
    }

    fn station(id: u32, lines: &[u8], lat: f64, lon: f64) -> Station {
        Station::new(
            StationId(id),
            format!("S{id}"),
            lines.iter().map(|&n| line(n)),
            Coordinate::new(lat, lon).unwrap(),
        )
    }

    fn network() -> Vec<Station> {
        vec![
            station(1, &[1], 0.0, 0.0),
            station(2, &[1], 0.01, 0.01),
            station(3, &[1, 2], 0.0, 0.02),
            station(4, &[2], 0.01, 0.03),
            station(5, &[2], 0.0, 0.04),
        ]
    }

    #[test]
    fn line_index_groups_stations() {
        let graph = StationGraph::from_declared(network());
        let index = graph.line_index();

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.stations_on(line(1)),
            &[StationId(1), StationId(2), StationId(3)]
        );
        assert_eq!(
            index.stations_on(line(2)),
            &[StationId(3), StationId(4), StationId(5)]
        );
        assert!(index.stations_on(line(9)).is_empty());
    }

    #[test]
    fn neighbours_share_a_line() {
        let graph = StationGraph::from_declared(network());

        assert_eq!(graph.neighbours(StationId(1)), vec![StationId(2), StationId(3)]);
        assert_eq!(
            graph.neighbours(StationId(3)),
            vec![StationId(1), StationId(2), StationId(4), StationId(5)]
        );
        assert!(graph.neighbours(StationId(99)).is_empty());
    }

    #[test]
    fn station_without_lines_is_isolated() {
        let mut effective = declared_lines(&network());
        effective.insert(StationId(3), BTreeSet::new());
        let graph = StationGraph::new(network(), effective);

        assert!(graph.effective_lines(StationId(3)).is_none());
        assert!(graph.neighbours(StationId(3)).is_empty());
        assert_eq!(graph.neighbours(StationId(1)), vec![StationId(2)]);
    }

    #[test]
    fn duplicate_stations_keep_first() {
        let mut stations = network();
        stations.push(station(1, &[7], 5.0, 5.0));
        let graph = StationGraph::from_declared(stations);

        assert_eq!(graph.stations().len(), 5);
        assert!(graph.line_index().stations_on(line(7)).is_empty());
    }

    #[test]
    fn cost_is_symmetric() {
        let graph = StationGraph::from_declared(network());
        let ab = graph.cost(StationId(1), StationId(3)).unwrap();
        let ba = graph.cost(StationId(3), StationId(1)).unwrap();

        assert_eq!(ab, ba);
        assert_eq!(graph.cost(StationId(2), StationId(2)), Some(0.0));
        assert!(graph.cost(StationId(1), StationId(42)).is_none());
    }

    #[tokio::test]
    async fn declared_mode_skips_live_queries() {
        let live = StaticLiveService::new();
        let graph = StationGraph::build(network(), &PlanConfig::default(), &live)
            .await
            .unwrap();

        assert_eq!(live.call_count(), 0);
        assert_eq!(graph.neighbours(StationId(1)).len(), 2);
    }

    #[tokio::test]
    async fn live_mode_queries_every_station() {
        let live = StaticLiveService::new()
            .with_lines(StationId(1), [line(1)])
            .with_lines(StationId(2), [line(1)])
            // Line 9 is not declared at station 3 and is dropped
            .with_lines(StationId(3), [line(2), line(9)]);
        let config = PlanConfig::default()
            .with_live_service(true)
            .with_batch_size(2);

        let graph = StationGraph::build(network(), &config, &live).await.unwrap();

        assert_eq!(live.call_count(), 5);
        assert_eq!(graph.neighbours(StationId(1)), vec![StationId(2)]);
        assert_eq!(
            graph.effective_lines(StationId(3)).unwrap(),
            &BTreeSet::from([line(2)])
        );
        assert!(graph.effective_lines(StationId(4)).is_none());
    }

    #[tokio::test]
    async fn failed_live_query_degrades_station() {
        let live = StaticLiveService::new()
            .with_lines(StationId(1), [line(1)])
            .with_lines(StationId(3), [line(1)])
            .failing(StationId(2));
        let config = PlanConfig::default().with_live_service(true);

        let graph = StationGraph::build(network(), &config, &live).await.unwrap();

        assert!(graph.effective_lines(StationId(2)).is_none());
        assert_eq!(graph.neighbours(StationId(1)), vec![StationId(3)]);
    }

    #[tokio::test]
    async fn strict_live_fails_whole_build() {
        let live = StaticLiveService::new().failing(StationId(4));
        let config = PlanConfig::default()
            .with_live_service(true)
            .with_strict_live(true);

        let err = StationGraph::build(network(), &config, &live)
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
}
