//! Per-station progress markers
//!
//! Given a station list, a travel direction and the station the sign stands
//! at, [`resolve`] assigns every station one [`StatusMarker`]. The marker's
//! suffix is appended to the station tile name, so `tc1+03` becomes
//! `tc1+03@=` for "you are here, track behind you is traversed".

use serde::{Deserialize, Serialize};

use crate::models::Direction;

/// Progress marker for one station on a sign.
///
/// `@` marks the current station, `=` traversed track, `#` a departure or
/// arrival boundary, and the empty suffix untraversed track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusMarker {
    /// `""`
    Ahead,
    /// `=`
    Passed,
    /// `#`
    Terminal,
    /// `@`
    Here,
    /// `@=`
    HerePassed,
    /// `@#`
    HereTerminal,
    /// `@#=`
    HereTerminalPassed,
    /// `#=`
    TerminalPassed,
}

impl StatusMarker {
    /// Suffix appended to the station tile name.
    pub fn suffix(self) -> &'static str {
        match self {
            StatusMarker::Ahead => "",
            StatusMarker::Passed => "=",
            StatusMarker::Terminal => "#",
            StatusMarker::Here => "@",
            StatusMarker::HerePassed => "@=",
            StatusMarker::HereTerminal => "@#",
            StatusMarker::HereTerminalPassed => "@#=",
            StatusMarker::TerminalPassed => "#=",
        }
    }

    /// Whether this marker flags the current station.
    pub fn is_current(self) -> bool {
        matches!(
            self,
            StatusMarker::Here
                | StatusMarker::HerePassed
                | StatusMarker::HereTerminal
                | StatusMarker::HereTerminalPassed
        )
    }
}

impl std::fmt::Display for StatusMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Positional role of a station relative to the travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Origin,
    Terminus,
    Interior,
}

fn role(index: usize, last: usize, direction: Direction) -> Role {
    let (origin, terminus) = match direction {
        Direction::Ascending => (0, last),
        Direction::Descending => (last, 0),
    };
    // Origin wins for a single-station list
    if index == origin {
        Role::Origin
    } else if index == terminus {
        Role::Terminus
    } else {
        Role::Interior
    }
}

/// Resolve one marker per station.
///
/// If `current` is not in `stations`, no station is treated as current and
/// interior stations fall back to the "not current" rules with no position to
/// compare against.
pub fn resolve(stations: &[String], current: &str, direction: Direction) -> Vec<StatusMarker> {
    let Some(last) = stations.len().checked_sub(1) else {
        return Vec::new();
    };
    let current_index = stations.iter().position(|s| s == current);

    (0..stations.len())
        .map(|i| {
            let here = current_index == Some(i);
            match (role(i, last, direction), direction, here) {
                (Role::Origin, Direction::Descending, true) => StatusMarker::Here,
                (Role::Origin, Direction::Descending, false) => StatusMarker::Passed,
                (Role::Origin, Direction::Ascending, true) => StatusMarker::HereTerminal,
                (Role::Origin, Direction::Ascending, false) => StatusMarker::TerminalPassed,
                (Role::Terminus, Direction::Descending, true) => StatusMarker::HerePassed,
                (Role::Terminus, Direction::Descending, false) => StatusMarker::Ahead,
                (Role::Terminus, Direction::Ascending, true) => StatusMarker::HereTerminalPassed,
                (Role::Terminus, Direction::Ascending, false) => StatusMarker::Terminal,
                (Role::Interior, Direction::Descending, true) => StatusMarker::Here,
                (Role::Interior, Direction::Ascending, true) => StatusMarker::HerePassed,
                (Role::Interior, _, false) => {
                    if is_ahead(i, current_index, direction) {
                        StatusMarker::Ahead
                    } else {
                        StatusMarker::Passed
                    }
                }
            }
        })
        .collect()
}

/// Whether `index` has not been reached yet when travelling in `direction`.
///
/// A missing current station sits before the first index.
fn is_ahead(index: usize, current: Option<usize>, direction: Direction) -> bool {
    match (direction, current) {
        (Direction::Descending, Some(c)) => index < c,
        (Direction::Descending, None) => false,
        (Direction::Ascending, Some(c)) => index > c,
        (Direction::Ascending, None) => true,
    }
}
