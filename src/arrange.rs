//! Fixed-length progress rows centered on a line's anchor
//!
//! [`arrange`] lays a station list into a row of `length` cells so the anchor
//! (one station, or the boundary between two adjacent stations) lands on the
//! row's midpoint. Every other cell holds the blank filler.

use thiserror::Error;

use crate::models::Direction;
use crate::status;

/// Prefix of every station tile asset name.
pub const STATION_TILE_PREFIX: &str = "tc";

/// Validation failure while arranging a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Anchor has neither one nor two stations
    #[error("anchor must name 1 or 2 stations, got {len}")]
    AnchorShape { len: usize },
    /// A single-station anchor needs a middle cell
    #[error("row length must be odd for a single-station anchor, got {length}")]
    EvenLength { length: usize },
    /// More stations than cells
    #[error("{stations} stations do not fit in a row of {length}")]
    TooManyStations { stations: usize, length: usize },
    /// Anchor station(s) missing, or a pair that is not adjacent and in order
    #[error("anchor [{}] not found as {} in the station list", anchor.join(", "), if anchor.len() == 2 { "an adjacent ordered pair" } else { "a station" })]
    AnchorNotFound { anchor: Vec<String> },
    /// Centering the anchor pushes a station past either end of the row
    #[error("station '{station}' lands outside a row of {length} when centering the anchor")]
    OutOfRow { station: String, length: usize },
}

/// Find where the anchor starts in `stations`.
///
/// A single anchor matches its first occurrence. A pair matches the first
/// index `p` with `stations[p] == anchor[0]` and `stations[p + 1] == anchor[1]`.
pub fn find_anchor(stations: &[String], anchor: &[String]) -> Option<usize> {
    match anchor {
        [single] => stations.iter().position(|s| s == single),
        [first, second] => stations
            .windows(2)
            .position(|pair| &pair[0] == first && &pair[1] == second),
        _ => None,
    }
}

/// Arrange `stations` into a row of `length` tile tokens.
///
/// Station cells read `tc<station><marker>`, with the marker from
/// [`status::resolve`] for `current` and `direction`. All other cells equal
/// `blank`.
///
/// # Errors
///
/// See [`LayoutError`]. Checks run in the order: anchor shape, parity, station
/// count, anchor lookup, row bounds.
pub fn arrange(
    stations: &[String],
    anchor: &[String],
    current: &str,
    direction: Direction,
    length: usize,
    blank: &str,
) -> Result<Vec<String>, LayoutError> {
    match anchor.len() {
        1 if length % 2 == 0 => return Err(LayoutError::EvenLength { length }),
        1 | 2 => {}
        len => return Err(LayoutError::AnchorShape { len }),
    }

    if stations.len() > length {
        return Err(LayoutError::TooManyStations { stations: stations.len(), length });
    }

    let start = find_anchor(stations, anchor)
        .ok_or_else(|| LayoutError::AnchorNotFound { anchor: anchor.to_vec() })?;

    // Cell the anchor should start at; a pair straddles the midpoint
    let target = if anchor.len() == 1 { Some(length / 2) } else { (length / 2).checked_sub(1) };

    let mut row = vec![blank.to_string(); length];
    let markers = status::resolve(stations, current, direction);

    for (i, (station, marker)) in stations.iter().zip(markers).enumerate() {
        let cell = target
            .and_then(|t| (t + i).checked_sub(start))
            .filter(|&c| c < length)
            .ok_or_else(|| LayoutError::OutOfRow { station: station.clone(), length })?;
        row[cell] = format!("{}{}{}", STATION_TILE_PREFIX, station, marker.suffix());
    }

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_arrange_single_anchor_centered() {
        let row =
            arrange(&ids(&["A", "B", "C"]), &ids(&["B"]), "B", Direction::Ascending, 5, "_").unwrap();
        assert_eq!(row, ids(&["_", "tcA#=", "tcB@=", "tcC#", "_"]));
    }

    #[test]
    fn test_arrange_pair_anchor_straddles_midpoint() {
        let stations = ids(&["A", "B", "C", "D"]);
        let row = arrange(&stations, &ids(&["B", "C"]), "A", Direction::Descending, 6, "").unwrap();
        // target = 6/2 - 1 = 2, anchor starts at 1, so offset 1
        assert_eq!(row, ids(&["", "tcA@=", "tcB=", "tcC=", "tcD=", ""]));
    }

    #[test]
    fn test_arrange_pair_anchor_odd_length() {
        let stations = ids(&["A", "B"]);
        let row = arrange(&stations, &ids(&["A", "B"]), "B", Direction::Ascending, 5, "_").unwrap();
        assert_eq!(row, ids(&["_", "tcA#=", "tcB@#=", "_", "_"]));
    }

    #[test]
    fn test_arrange_length_and_blank_count() {
        let stations = ids(&["1+02", "1+01", "1+00", "1-01", "1-02"]);
        let anchor = ids(&["1+01", "1+00"]);
        for length in [5, 8, 14, 15, 20] {
            for current in &stations {
                let row =
                    arrange(&stations, &anchor, current, Direction::Ascending, length, "tc1").unwrap();
                assert_eq!(row.len(), length);
                let filled = row.iter().filter(|c| c.as_str() != "tc1").count();
                assert_eq!(filled, stations.len());
            }
        }
    }

    #[test]
    fn test_arrange_is_idempotent() {
        let stations = ids(&["A", "B", "C", "D"]);
        let anchor = ids(&["B", "C"]);
        let first = arrange(&stations, &anchor, "C", Direction::Descending, 10, "x").unwrap();
        let second = arrange(&stations, &anchor, "C", Direction::Descending, 10, "x").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_arrange_single_station_single_cell() {
        let row = arrange(&ids(&["A"]), &ids(&["A"]), "A", Direction::Ascending, 1, "").unwrap();
        assert_eq!(row, ids(&["tcA@#"]));
    }

    #[test]
    fn test_arrange_rejects_bad_anchor_shape() {
        let stations = ids(&["A", "B", "C"]);
        assert_eq!(
            arrange(&stations, &[], "A", Direction::Ascending, 5, ""),
            Err(LayoutError::AnchorShape { len: 0 })
        );
        assert_eq!(
            arrange(&stations, &stations, "A", Direction::Ascending, 5, ""),
            Err(LayoutError::AnchorShape { len: 3 })
        );
    }

    #[test]
    fn test_arrange_rejects_even_length_for_single_anchor() {
        let err = arrange(&ids(&["X"]), &ids(&["X"]), "X", Direction::Ascending, 10, "").unwrap_err();
        assert_eq!(err, LayoutError::EvenLength { length: 10 });
    }

    #[test]
    fn test_arrange_rejects_too_many_stations() {
        let stations = ids(&["A", "B", "C", "D"]);
        let err = arrange(&stations, &ids(&["B", "C"]), "A", Direction::Ascending, 3, "").unwrap_err();
        assert_eq!(err, LayoutError::TooManyStations { stations: 4, length: 3 });
    }

    #[test]
    fn test_arrange_rejects_non_adjacent_pair() {
        let stations = ids(&["A", "B", "D", "C"]);
        let err = arrange(&stations, &ids(&["B", "C"]), "A", Direction::Ascending, 6, "").unwrap_err();
        assert_eq!(err, LayoutError::AnchorNotFound { anchor: ids(&["B", "C"]) });
    }

    #[test]
    fn test_arrange_rejects_pair_in_wrong_order() {
        let stations = ids(&["A", "B", "C"]);
        let err = arrange(&stations, &ids(&["C", "B"]), "A", Direction::Ascending, 6, "").unwrap_err();
        assert!(matches!(err, LayoutError::AnchorNotFound { .. }));
    }

    #[test]
    fn test_arrange_rejects_missing_single_anchor() {
        let err =
            arrange(&ids(&["A", "B"]), &ids(&["Z"]), "A", Direction::Ascending, 5, "").unwrap_err();
        assert!(matches!(err, LayoutError::AnchorNotFound { .. }));
    }

    #[test]
    fn test_arrange_fails_instead_of_truncating() {
        // Anchor at the far end pushes the first stations off the left edge
        let stations = ids(&["A", "B", "C", "D", "E"]);
        let err = arrange(&stations, &ids(&["E"]), "A", Direction::Ascending, 5, "").unwrap_err();
        assert_eq!(err, LayoutError::OutOfRow { station: "A".to_string(), length: 5 });

        // And the last stations off the right edge
        let err = arrange(&stations, &ids(&["A"]), "A", Direction::Ascending, 5, "").unwrap_err();
        assert_eq!(err, LayoutError::OutOfRow { station: "D".to_string(), length: 5 });
    }

    #[test]
    fn test_arrange_reversed_pair_still_found() {
        let stations = ids(&["S3", "S2", "S1"]);
        let row = arrange(&stations, &ids(&["S3", "S2"]), "S2", Direction::Descending, 4, "").unwrap();
        // target 1, anchor at 0
        assert_eq!(row, ids(&["", "tcS3", "tcS2@", "tcS1="]));
    }

    #[test]
    fn test_find_anchor() {
        let stations = ids(&["A", "B", "C", "B", "D"]);
        assert_eq!(find_anchor(&stations, &ids(&["B"])), Some(1));
        assert_eq!(find_anchor(&stations, &ids(&["B", "D"])), Some(3));
        assert_eq!(find_anchor(&stations, &ids(&["D", "B"])), None);
        assert_eq!(find_anchor(&stations, &[]), None);
    }
}
