//! Tile grid rendering
//!
//! A [`TileCompositor`] turns a [`TileGrid`] into an RGBA canvas. Each
//! non-empty token names a square PNG asset, `<asset_dir>/<token>.png`, which
//! is pasted with its top-left corner at `(col * cell_size, row * cell_size)`.
//! The canvas starts white and is sized to the grid's bounding box.

use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::TileGrid;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Error rendering a tile grid.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// The grid has no rows, or only empty rows
    #[error("tile grid is empty")]
    EmptyGrid,
    /// The canvas would not fit in `u32` pixel dimensions
    #[error("canvas of {cols}x{rows} cells at {cell_size}px is too large")]
    CanvasTooLarge { cols: usize, rows: usize, cell_size: u32 },
    /// An asset could not be opened or decoded
    #[error("tile '{token}' ({}): {source}", path.display())]
    Asset {
        token: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Pastes tile assets from one directory onto a canvas.
#[derive(Debug, Clone)]
pub struct TileCompositor {
    asset_dir: PathBuf,
    cell_size: u32,
}

impl TileCompositor {
    /// Create a compositor reading assets from `asset_dir`.
    pub fn new(asset_dir: impl Into<PathBuf>, cell_size: u32) -> Self {
        Self { asset_dir: asset_dir.into(), cell_size }
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Path of the asset a token resolves to.
    pub fn asset_path(&self, token: &str) -> PathBuf {
        self.asset_dir.join(format!("{}.png", token))
    }

    /// Canvas size in pixels for a grid: widest row by row count.
    ///
    /// Returns `None` when either side overflows `u32`.
    pub fn canvas_size(&self, grid: &TileGrid) -> Option<(u32, u32)> {
        let cols = grid.iter().map(Vec::len).max().unwrap_or(0);
        let side = |cells: usize| u32::try_from(cells).ok()?.checked_mul(self.cell_size);
        Some((side(cols)?, side(grid.len())?))
    }

    /// Render a grid.
    ///
    /// Assets replace the canvas pixels they cover; they are not alpha
    /// blended. An asset larger than a cell spills into the next cells and is
    /// clipped at the canvas edge.
    ///
    /// # Errors
    ///
    /// [`CompositorError::EmptyGrid`] when there is nothing to size the canvas
    /// by, [`CompositorError::CanvasTooLarge`] when its pixel size overflows,
    /// [`CompositorError::Asset`] for the first asset that fails to load.
    pub fn render(&self, grid: &TileGrid) -> Result<RgbaImage, CompositorError> {
        let Some((width, height)) = self.canvas_size(grid) else {
            return Err(CompositorError::CanvasTooLarge {
                cols: grid.iter().map(Vec::len).max().unwrap_or(0),
                rows: grid.len(),
                cell_size: self.cell_size,
            });
        };
        if width == 0 || height == 0 {
            return Err(CompositorError::EmptyGrid);
        }

        let mut canvas = RgbaImage::from_pixel(width, height, WHITE);

        for (r, row) in grid.iter().enumerate() {
            for (c, token) in row.iter().enumerate() {
                if token.is_empty() {
                    continue;
                }
                let tile = self.load(token)?;
                let x = c as i64 * i64::from(self.cell_size);
                let y = r as i64 * i64::from(self.cell_size);
                image::imageops::replace(&mut canvas, &tile, x, y);
            }
        }

        Ok(canvas)
    }

    fn load(&self, token: &str) -> Result<RgbaImage, CompositorError> {
        let path = self.asset_path(token);
        image::open(&path)
            .map(|img| img.to_rgba8())
            .map_err(|source| CompositorError::Asset { token: token.to_string(), path, source })
    }
}
