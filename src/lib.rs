//! linesign - Library for composing and rendering transit line signs
//!
//! This library provides functionality to:
//! - Load line descriptions (stations, anchor, per-station sign codes)
//! - Resolve each station's status relative to where a sign stands
//! - Arrange stations into fixed-width progress rows around an anchor
//! - Compose detailed and compact sign grids for both travel directions
//! - Render tile grids to PNG images

pub mod arrange;
pub mod cli;
pub mod compose;
pub mod compositor;
pub mod config;
pub mod generate;
pub mod loader;
pub mod models;
pub mod output;
pub mod status;
