//! Extraction of upcoming arrivals from a live departures board page.
//!
//! Each arrival row on the board carries a `<span>` whose text starts with
//! the line number (`"3 - ..."`), the destination in bold, and the
//! scheduled clock time as `HH:MM:SS`. A row runs from its line marker to
//! the next one; fields are only taken from inside their own row, and rows
//! missing a destination or a time are ignored.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{Duration, NaiveTime};
use regex::Regex;
use tracing::trace;

use crate::domain::LineId;

static LINE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<span[^>]*>\s*(?P<line>\d+)\s*-[^<]*</span>")
        .expect("line marker pattern is valid")
});

static DESTINATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<b>(?P<dest>[^<]*)</b>").expect("destination pattern is valid"));

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<time>\d{1,2}:\d{2}:\d{2})\b").expect("clock time pattern is valid")
});

/// An upcoming train at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    /// Line the train runs on.
    pub line: LineId,
    /// Destination shown on the board.
    pub destination: String,
    /// Time remaining until the train arrives.
    pub due_in: Duration,
}

impl Arrival {
    /// Format the wait as `MM:SS`.
    pub fn due_in_display(&self) -> String {
        let secs = self.due_in.num_seconds();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

/// Parse every arrival on a board page.
///
/// `now` is the local clock time the wait is measured from; a scheduled time
/// earlier than `now` is taken to be tomorrow.
pub fn parse_board(html: &str, now: NaiveTime) -> Vec<Arrival> {
    let markers: Vec<_> = LINE_MARKER.captures_iter(html).collect();

    markers
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let marker = caps.get(0)?;
            let row_end = markers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(html.len(), |next| next.start());
            let row = &html[marker.end()..row_end];

            let line = match LineId::parse(&caps["line"]) {
                Ok(line) => line,
                Err(e) => {
                    trace!(error = %e, "Ignoring board row");
                    return None;
                }
            };
            let Some(dest) = DESTINATION.captures(row) else {
                trace!(line = %line, "Ignoring board row without destination");
                return None;
            };
            let Some(time) = CLOCK_TIME.captures(row) else {
                trace!(line = %line, "Ignoring board row without time");
                return None;
            };
            let Ok(at) = NaiveTime::parse_from_str(&time["time"], "%H:%M:%S") else {
                trace!(time = &time["time"], "Ignoring board row with bad time");
                return None;
            };

            Some(Arrival {
                line,
                destination: dest["dest"].trim().to_string(),
                due_in: wait_until(now, at),
            })
        })
        .collect()
}

/// Distinct lines among a set of arrivals.
pub fn lines_of(arrivals: &[Arrival]) -> BTreeSet<LineId> {
    arrivals.iter().map(|a| a.line).collect()
}

/// Duration from `now` until the next occurrence of `at`.
fn wait_until(now: NaiveTime, at: NaiveTime) -> Duration {
    let wait = at.signed_duration_since(now);
    if wait < Duration::zero() {
        wait + Duration::days(1)
    } else {
        wait
    }
}
