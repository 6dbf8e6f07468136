//! Line description loading
//!
//! The input is plain text, one segment per block, blocks separated by blank
//! lines. Spaces are ignored everywhere.
//!
//! ```text
//! line1: 1+01, 1+00
//! 1+02: <1
//! 1+01: <2, >2
//! 1+00: >1
//! ```
//!
//! The first line of a block names the anchor on its right-hand side (one
//! station, or the first two listed). Every following line is a station with
//! either one config code shared by both rows, or one code per row. The
//! separator is the last `:` on the line, or the first `,` when there is no
//! colon.

use log::warn;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

use crate::models::{ConfigCode, LineSegment};

/// Error type for parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

/// Error loading a line description file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read line description: {0}")]
    Io(#[from] std::io::Error),
    /// The input is not valid UTF-8
    #[error("line {line}: invalid UTF-8 at byte {offset}")]
    Encoding { line: usize, offset: usize },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A non-fatal problem found while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub line: usize,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Segments loaded from one input, plus any warnings.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub segments: Vec<LineSegment>,
    pub warnings: Vec<Warning>,
}

/// Load a line description file.
pub fn load_file(path: &Path) -> Result<LoadResult, LoadError> {
    let file = std::fs::File::open(path)?;
    load_reader(file)
}

/// Load line descriptions from any reader.
pub fn load_reader<R: Read>(reader: R) -> Result<LoadResult, LoadError> {
    let mut bytes = Vec::new();
    BufReader::new(reader).read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes).map_err(|e| {
        let offset = e.utf8_error().valid_up_to();
        let line = e.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1;
        LoadError::Encoding { line, offset }
    })?;
    Ok(parse_str(&text)?)
}

/// Parse line descriptions from a string.
pub fn parse_str(text: &str) -> Result<LoadResult, ParseError> {
    let mut result = LoadResult::default();
    let mut block = Block::default();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            block.finish(&mut result)?;
            continue;
        }

        let line: String = line.chars().filter(|&c| c != ' ').collect();
        let Some((left, right)) = split_entry(&line) else {
            result.warnings.push(Warning {
                message: format!("no ':' or ',' separator in '{}', line ignored", line),
                line: line_number,
            });
            continue;
        };
        let fields: Vec<&str> = right.split(',').collect();

        if block.anchor.is_none() {
            block.start = line_number;
            block.anchor = Some(fields.iter().take(2).map(|s| s.to_string()).collect());
            continue;
        }

        let (raw0, raw1) = match fields.as_slice() {
            [shared] => (*shared, *shared),
            [first, second] => (*first, *second),
            _ => {
                return Err(ParseError {
                    message: format!(
                        "station '{}' needs 1 or 2 config codes, got {}",
                        left,
                        fields.len()
                    ),
                    line: line_number,
                })
            }
        };

        block.stations.push(left.to_string());
        block.rows[0].push(decode(raw0, line_number, &mut result.warnings));
        block.rows[1].push(decode(raw1, line_number, &mut result.warnings));
    }

    block.finish(&mut result)?;
    Ok(result)
}

/// Segment being accumulated.
#[derive(Debug, Default)]
struct Block {
    start: usize,
    anchor: Option<Vec<String>>,
    stations: Vec<String>,
    rows: [Vec<ConfigCode>; 2],
}

impl Block {
    /// Close the block, pushing a segment if it has stations.
    fn finish(&mut self, result: &mut LoadResult) -> Result<(), ParseError> {
        let block = std::mem::take(self);
        let Some(anchor) = block.anchor else {
            return Ok(());
        };
        if block.stations.is_empty() {
            result.warnings.push(Warning {
                message: "segment header without stations, skipped".to_string(),
                line: block.start,
            });
            return Ok(());
        }
        let segment = LineSegment::new(block.stations, anchor, block.rows)
            .map_err(|e| ParseError { message: e.to_string(), line: block.start })?;
        result.segments.push(segment);
        Ok(())
    }
}

/// Split a line at the last ':' or, failing that, the first ','.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let sep = line.rfind(':').or_else(|| line.find(','))?;
    Some((&line[..sep], &line[sep + 1..]))
}

fn decode(raw: &str, line: usize, warnings: &mut Vec<Warning>) -> ConfigCode {
    ConfigCode::parse(raw).unwrap_or_else(|| {
        warn!("line {}: unrecognized config code '{}', no sign", line, raw);
        warnings.push(Warning {
            message: format!("unrecognized config code '{}', treated as 0", raw),
            line,
        });
        ConfigCode::Skip
    })
}
