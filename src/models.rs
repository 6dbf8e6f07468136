//! Data model for line descriptions and generated signs
//!
//! A [`LineSegment`] is produced once by the loader and treated as read-only
//! afterwards. Signs and their tile grids are built fresh by the composer.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 2D grid of tile tokens, row-major. Blank cells are empty strings.
pub type TileGrid = Vec<Vec<String>>;

/// Traversal sense of a line.
///
/// `Ascending` walks the station list in increasing index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Ascending => write!(f, "ascending"),
            Direction::Descending => write!(f, "descending"),
        }
    }
}

/// Which way a sign faces, selected by the leading character of a config code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// `<`: the sign points toward the start of the (possibly mirrored) list
    Left,
    /// `>`: the sign points toward the end of the (possibly mirrored) list
    Right,
}

/// Sign layout variant, selected by the trailing digit of a config code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Digit `1`: one combined row
    Compact,
    /// Digit `2`: header row over a progress row
    Detailed,
}

impl Variant {
    /// File name prefix used for signs of this variant.
    pub fn prefix(self) -> &'static str {
        match self {
            Variant::Compact => "dh",
            Variant::Detailed => "sh",
        }
    }
}

/// Decoded per-station, per-row config code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigCode {
    /// No sign for this station in this row (`0`, or anything unrecognized)
    Skip,
    /// Build a sign when the pass looks for `trigger` in this row
    Build { trigger: Trigger, variant: Variant },
}

impl ConfigCode {
    /// Decode a raw code such as `<2`, `>1` or `0`.
    ///
    /// Returns `None` for text that is not one of the recognized shapes. The
    /// loader maps those to [`ConfigCode::Skip`] and records a warning.
    pub fn parse(raw: &str) -> Option<ConfigCode> {
        let mut chars = raw.chars();
        let lead = chars.next()?;
        if lead == '0' && chars.as_str().is_empty() {
            return Some(ConfigCode::Skip);
        }
        let trigger = match lead {
            '<' => Trigger::Left,
            '>' => Trigger::Right,
            _ => return None,
        };
        let variant = match chars.as_str() {
            "1" => Variant::Compact,
            "2" => Variant::Detailed,
            _ => return None,
        };
        Some(ConfigCode::Build { trigger, variant })
    }

    /// The variant to build if this code fires for `trigger`.
    pub fn fires(self, trigger: Trigger) -> Option<Variant> {
        match self {
            ConfigCode::Build { trigger: t, variant } if t == trigger => Some(variant),
            _ => None,
        }
    }
}

impl std::fmt::Display for ConfigCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigCode::Skip => write!(f, "0"),
            ConfigCode::Build { trigger, variant } => {
                let lead = match trigger {
                    Trigger::Left => '<',
                    Trigger::Right => '>',
                };
                let digit = match variant {
                    Variant::Compact => '1',
                    Variant::Detailed => '2',
                };
                write!(f, "{}{}", lead, digit)
            }
        }
    }
}

/// Error building a segment whose code rows don't line up with its stations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config row {row} has {codes} codes for {stations} stations")]
pub struct SegmentShapeError {
    pub row: usize,
    pub codes: usize,
    pub stations: usize,
}

/// One line segment: ordered stations, the anchor, and two config rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    stations: Vec<String>,
    anchor: Vec<String>,
    codes: [Vec<ConfigCode>; 2],
}

impl LineSegment {
    /// Create a segment, checking both code rows have one entry per station.
    ///
    /// The anchor's shape is not checked here; the row arranger rejects a bad
    /// anchor when the segment is composed.
    pub fn new(
        stations: Vec<String>,
        anchor: Vec<String>,
        codes: [Vec<ConfigCode>; 2],
    ) -> Result<Self, SegmentShapeError> {
        for (row, codes) in codes.iter().enumerate() {
            if codes.len() != stations.len() {
                return Err(SegmentShapeError {
                    row,
                    codes: codes.len(),
                    stations: stations.len(),
                });
            }
        }
        Ok(Self { stations, anchor, codes })
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn anchor(&self) -> &[String] {
        &self.anchor
    }

    /// Config row `row` (0 or 1).
    pub fn codes(&self, row: usize) -> &[ConfigCode] {
        &self.codes[row]
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Line id taken from the first station: the id minus its last three
    /// characters (`1+06` gives `1`). Shorter ids give an empty line id.
    pub fn line_id(&self) -> String {
        let Some(first) = self.stations.first() else {
            return String::new();
        };
        let count = first.chars().count();
        first.chars().take(count.saturating_sub(3)).collect()
    }

    /// A mirrored copy: stations, anchor and both code rows reversed.
    ///
    /// Reversing a two-station anchor swaps its members, so it stays an
    /// adjacent, order-matching pair inside the reversed station list.
    pub fn reversed(&self) -> Self {
        let rev = |v: &[ConfigCode]| v.iter().rev().copied().collect::<Vec<_>>();
        Self {
            stations: self.stations.iter().rev().cloned().collect(),
            anchor: self.anchor.iter().rev().cloned().collect(),
            codes: [rev(&self.codes[0]), rev(&self.codes[1])],
        }
    }
}

/// A generated sign: one tile grid plus the name it is saved under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sign {
    /// Output name, e.g. `sh1+03+` or `dh1+03-#`
    pub name: String,
    pub station: String,
    pub variant: Variant,
    /// `+` for signs driven by config row 0, `-` for row 1
    pub tag: char,
    /// Whether the sign came from the mirrored pass
    pub mirrored: bool,
    pub grid: TileGrid,
}

impl Sign {
    /// Grid width in cells (longest row).
    pub fn columns(&self) -> usize {
        self.grid.iter().map(Vec::len).max().unwrap_or(0)
    }
}
