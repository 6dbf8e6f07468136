//! Sign composition for a whole line segment
//!
//! [`compose_segment`] runs two passes over a segment. The ascending pass
//! walks the stations as loaded; the mirrored pass walks a reversed copy.
//! In each pass a station gets a left-facing sign when one config row holds a
//! `<` code and a right-facing sign when the other holds a `>` code:
//!
//! | Pass | Left-facing (`<`) | Right-facing (`>`) |
//! |------|-------------------|--------------------|
//! | ascending | row 0, tag `+` | row 1, tag `-` |
//! | mirrored | row 1, tag `-` | row 0, tag `+` |
//!
//! Left-facing progress rows read in descending order, right-facing ones in
//! ascending order. Signs from the mirrored pass carry an extra `#` in their
//! name.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::arrange::{arrange, LayoutError, STATION_TILE_PREFIX};
use crate::models::{Direction, LineSegment, Sign, TileGrid, Trigger, Variant};

/// Arrow pointing toward the start of the list.
const TILE_ARROW_LEFT: &str = "tczuo";
/// Arrow pointing toward the end of the list.
const TILE_ARROW_RIGHT: &str = "tcyou";
/// "Departing toward" label.
const TILE_DEPARTING: &str = "tckaiwang";
/// "Terminal station" label, used at the end of the line.
const TILE_TERMINAL: &str = "tczhongdianzhan";
/// Divider between the line tile and the station name on detailed signs.
const TILE_DIVIDER: &str = "tcfenge";

/// Cells in a detailed header before padding.
const DETAILED_HEADER_CELLS: usize = 8;

/// Row lengths and thresholds shared by every sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    /// Pixel size of one square tile
    pub cell_size: u32,
    /// Width of both rows of a detailed sign
    pub detailed_length: usize,
    /// Progress row length on compact signs without a boundary tile
    pub compact_length: usize,
    /// Segments with at most this many stations get a boundary tile on
    /// compact signs, and a progress row one cell shorter
    pub compact_boundary_max_stations: usize,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            cell_size: 128,
            detailed_length: 20,
            compact_length: 15,
            compact_boundary_max_stations: 14,
        }
    }
}

/// Static description of one of the four sign slots a station can have.
#[derive(Debug, Clone, Copy)]
struct Slot {
    trigger: Trigger,
    /// Config row consulted, which also fixes the `+`/`-` tag
    row: usize,
}

impl Slot {
    fn tag(self) -> char {
        if self.row == 0 {
            '+'
        } else {
            '-'
        }
    }

    fn direction(self) -> Direction {
        match self.trigger {
            Trigger::Left => Direction::Descending,
            Trigger::Right => Direction::Ascending,
        }
    }
}

const ASCENDING_SLOTS: [Slot; 2] =
    [Slot { trigger: Trigger::Left, row: 0 }, Slot { trigger: Trigger::Right, row: 1 }];
const MIRRORED_SLOTS: [Slot; 2] =
    [Slot { trigger: Trigger::Left, row: 1 }, Slot { trigger: Trigger::Right, row: 0 }];

/// Shared inputs for building every sign of one pass.
struct Pass<'a> {
    segment: &'a LineSegment,
    line: &'a str,
    policy: &'a LayoutPolicy,
    mirrored: bool,
}

/// Compose every sign of a segment.
///
/// The segment is not modified; the mirrored pass works on
/// [`LineSegment::reversed`].
///
/// # Errors
///
/// The first [`LayoutError`] from the row arranger aborts the whole segment.
pub fn compose_segment(
    segment: &LineSegment,
    policy: &LayoutPolicy,
) -> Result<Vec<Sign>, LayoutError> {
    let line = segment.line_id();
    info!("composing line {} ({} stations)", line, segment.len());

    let mut signs = Vec::new();
    let ascending = Pass { segment, line: &line, policy, mirrored: false };
    ascending.run(&ASCENDING_SLOTS, &mut signs)?;

    let reversed = segment.reversed();
    let mirrored = Pass { segment: &reversed, line: &line, policy, mirrored: true };
    mirrored.run(&MIRRORED_SLOTS, &mut signs)?;

    Ok(signs)
}

impl Pass<'_> {
    fn run(&self, slots: &[Slot; 2], out: &mut Vec<Sign>) -> Result<(), LayoutError> {
        for (num, station) in self.segment.stations().iter().enumerate() {
            for &slot in slots {
                let code = self.segment.codes(slot.row)[num];
                let Some(variant) = code.fires(slot.trigger) else {
                    continue;
                };
                let sign = self.build(num, station, slot, variant)?;
                debug!("composed {} ({} cols)", sign.name, sign.columns());
                out.push(sign);
            }
        }
        Ok(())
    }

    fn build(
        &self,
        num: usize,
        station: &str,
        slot: Slot,
        variant: Variant,
    ) -> Result<Sign, LayoutError> {
        let header = self.header(num, station, slot);
        let grid = match variant {
            Variant::Detailed => self.detailed(station, slot, &header)?,
            Variant::Compact => self.compact(station, slot, &header)?,
        };

        let mut name = format!("{}{}{}", variant.prefix(), station, slot.tag());
        if self.mirrored {
            name.push('#');
        }

        Ok(Sign {
            name,
            station: station.to_string(),
            variant,
            tag: slot.tag(),
            mirrored: self.mirrored,
            grid,
        })
    }

    fn header(&self, num: usize, station: &str, slot: Slot) -> Header {
        let line_tile = format!("{}{}{}", STATION_TILE_PREFIX, self.line, slot.tag());
        let at_end = match slot.trigger {
            Trigger::Left => num == 0,
            Trigger::Right => num + 1 == self.segment.len(),
        };
        let (arrow, toward) = if at_end {
            (String::new(), [TILE_TERMINAL.to_string(), String::new()])
        } else {
            let arrow = match slot.trigger {
                Trigger::Left => TILE_ARROW_LEFT,
                Trigger::Right => TILE_ARROW_RIGHT,
            };
            let board = format!("tckw{}{}", self.line, slot.tag());
            (arrow.to_string(), [TILE_DEPARTING.to_string(), board])
        };
        Header { at_end, arrow, line_tile, toward, name_tile: format!("tczm{}", station) }
    }

    fn progress_row(&self, station: &str, slot: Slot, length: usize) -> Result<Vec<String>, LayoutError> {
        let blank = format!("{}{}", STATION_TILE_PREFIX, self.line);
        arrange(
            self.segment.stations(),
            self.segment.anchor(),
            station,
            slot.direction(),
            length,
            &blank,
        )
    }

    /// Header row over a progress row, both `detailed_length` wide.
    fn detailed(&self, station: &str, slot: Slot, header: &Header) -> Result<TileGrid, LayoutError> {
        let width = self.policy.detailed_length;
        let core = match slot.trigger {
            Trigger::Left => vec![
                header.arrow.clone(),
                header.line_tile.clone(),
                TILE_DIVIDER.to_string(),
                header.name_tile.clone(),
                String::new(),
                header.toward[0].clone(),
                header.toward[1].clone(),
                String::new(),
            ],
            Trigger::Right => {
                let [t0, t1, t2] = header.toward_right();
                vec![
                    t0,
                    t1,
                    t2,
                    header.name_tile.clone(),
                    String::new(),
                    TILE_DIVIDER.to_string(),
                    header.line_tile.clone(),
                    header.arrow.clone(),
                ]
            }
        };
        debug_assert_eq!(core.len(), DETAILED_HEADER_CELLS);

        let pad = width.saturating_sub(DETAILED_HEADER_CELLS);
        let mut top = vec![String::new(); pad / 2];
        top.extend(core);
        top.resize(top.len() + pad - pad / 2, String::new());

        let bottom = self.progress_row(station, slot, width)?;
        Ok(vec![top, bottom])
    }

    /// One row: header beside the progress row.
    fn compact(&self, station: &str, slot: Slot, header: &Header) -> Result<TileGrid, LayoutError> {
        let boundary = self.segment.len() <= self.policy.compact_boundary_max_stations;
        let length = if boundary {
            self.policy.compact_length.saturating_sub(1)
        } else {
            self.policy.compact_length
        };

        let row = match slot.trigger {
            Trigger::Left => {
                let mut row = vec![
                    header.arrow.clone(),
                    header.line_tile.clone(),
                    header.toward[0].clone(),
                    header.toward[1].clone(),
                    String::new(),
                    header.name_tile.clone(),
                    String::new(),
                ];
                if boundary {
                    row.push(format!("{}{}zuo", STATION_TILE_PREFIX, self.line));
                }
                row.extend(self.progress_row(station, slot, length)?);
                row
            }
            Trigger::Right => {
                let toward = header.toward_right();
                let mut row = self.progress_row(station, slot, length)?;
                if boundary {
                    row.push(format!("{}{}you", STATION_TILE_PREFIX, self.line));
                }
                row.push(header.name_tile.clone());
                row.push(String::new());
                row.extend(toward);
                row.push(header.line_tile.clone());
                row.push(header.arrow.clone());
                row
            }
        };
        Ok(vec![row])
    }
}

/// Decorative tiles shared by both variants.
struct Header {
    /// Station is the last one in the facing direction
    at_end: bool,
    /// Empty at the end of the line
    arrow: String,
    line_tile: String,
    /// Departure label and board, or the terminal label and a blank
    toward: [String; 2],
    name_tile: String,
}

impl Header {
    /// Three-cell "toward" block of right-facing signs. The terminal label
    /// sits one cell in.
    fn toward_right(&self) -> [String; 3] {
        let [first, second] = self.toward.clone();
        if self.at_end {
            [String::new(), first, String::new()]
        } else {
            [first, second, String::new()]
        }
    }
}
