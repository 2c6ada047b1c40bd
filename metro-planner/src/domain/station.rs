//! Station, line and coordinate types.

use std::collections::BTreeSet;
use std::fmt;

use super::DomainError;

/// Unique numeric identifier of a metro station.
///
/// # Examples
///
/// ```
/// use metro_planner::domain::StationId;
///
/// let id = StationId::parse(" 27 ").unwrap();
/// assert_eq!(id, StationId(27));
///
/// assert!(StationId::parse("abc").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationId(pub u32);

impl StationId {
    /// Parse a station identifier, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        s.trim()
            .parse::<u32>()
            .map(StationId)
            .map_err(|_| DomainError::InvalidStationId(s.to_string()))
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A metro line number.
///
/// Lines are small positive integers; zero is rejected.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineId(u8);

impl LineId {
    /// Create a line identifier from its number.
    pub fn new(n: u8) -> Result<Self, DomainError> {
        if n == 0 {
            return Err(DomainError::InvalidLine("0".to_string()));
        }
        Ok(LineId(n))
    }

    /// Parse a line number, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let n = s
            .trim()
            .parse::<u8>()
            .map_err(|_| DomainError::InvalidLine(s.to_string()))?;
        Self::new(n).map_err(|_| DomainError::InvalidLine(s.to_string()))
    }

    /// Parse a comma-separated line list such as `"3, 5,9"`.
    pub fn parse_list(s: &str) -> Result<BTreeSet<Self>, DomainError> {
        s.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Returns the line number.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::InvalidCoordinate { lat, lon });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// A metro station as loaded for one planning run.
///
/// A station always has at least one entrance. Most stations have a single
/// location; those with several physical entrances list each of them, and
/// distances to such a station use the closest entrance.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    id: StationId,
    name: String,
    lines: BTreeSet<LineId>,
    entrances: Vec<Coordinate>,
}

impl Station {
    /// Create a station with a single location.
    pub fn new(
        id: StationId,
        name: impl Into<String>,
        lines: impl IntoIterator<Item = LineId>,
        location: Coordinate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            lines: lines.into_iter().collect(),
            entrances: vec![location],
        }
    }

    /// Create a station with one or more entrances.
    pub fn with_entrances(
        id: StationId,
        name: impl Into<String>,
        lines: impl IntoIterator<Item = LineId>,
        entrances: Vec<Coordinate>,
    ) -> Result<Self, DomainError> {
        if entrances.is_empty() {
            return Err(DomainError::NoEntrances(id));
        }
        Ok(Self {
            id,
            name: name.into(),
            lines: lines.into_iter().collect(),
            entrances,
        })
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lines the station is statically declared to serve.
    pub fn lines(&self) -> &BTreeSet<LineId> {
        &self.lines
    }

    /// Every entrance location; never empty.
    pub fn entrances(&self) -> &[Coordinate] {
        &self.entrances
    }

    /// Add an entrance location.
    pub fn push_entrance(&mut self, entrance: Coordinate) {
        self.entrances.push(entrance);
    }
}
