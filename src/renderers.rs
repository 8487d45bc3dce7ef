use image::{GrayImage, Luma};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::cells::{Cartesian2DCoordinate, CellState};
use crate::errors::*;
use error_chain::bail;
use crate::grid::Grid;
use crate::units::CellPixels;
use crate::walls::{render_walls, WallRenderer};

pub const DEFAULT_CELL_PIXELS: CellPixels = CellPixels(2);

const FOREGROUND: Luma<u8> = Luma([0]);
const BACKGROUND: Luma<u8> = Luma([0xff]);

/// Wall extraction into a monochrome bitmap.
///
/// Each cell paints its left and bottom walls as runs of `cell_pixels` pixels starting at its lower
/// left corner. The right and top walls are the left and bottom walls of the next cell over, apart
/// from the far edges of the grid which `finish` paints as a solid border. The bitmap is one pixel
/// wider and taller than the cells so that border has somewhere to go.
///
/// Maze `y` grows upwards while image rows grow downwards, so the maze is flipped onto the image:
/// the bottom row of cells ends up at the bottom of the picture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RasterWalls {
    cell_pixels: u32,
}

// Lower-left corner pixel of a cell whose own left and bottom walls are both missing. A wall that
// ends there, from the left or from below, stops a pixel short unless the corner is filled in.
struct CornerPixel {
    cell: CellState,
    left: CellState,
    below: CellState,
}

fn wall_arrives_from_left(n: &CornerPixel) -> bool {
    n.left.contains(CellState::BOTTOM)
}

fn wall_arrives_from_below(n: &CornerPixel) -> bool {
    n.below.contains(CellState::LEFT)
}

const CORNER_PIXEL_RULES: [fn(&CornerPixel) -> bool; 2] = [wall_arrives_from_left,
                                                            wall_arrives_from_below];

impl RasterWalls {
    pub fn new(cell_pixels: CellPixels) -> RasterWalls {
        let CellPixels(px) = cell_pixels;
        assert!(px > 0, "cells must be at least one pixel wide");
        RasterWalls { cell_pixels: px }
    }

    #[inline]
    pub fn cell_pixels(&self) -> CellPixels {
        CellPixels(self.cell_pixels)
    }

    /// Bitmap dimensions for a grid, or `None` if they do not fit in a `u32`.
    pub fn checked_image_size(&self, grid: &Grid) -> Option<(u32, u32)> {
        let side = |cells: u32| -> Option<u32> { cells.checked_mul(self.cell_pixels)?.checked_add(1) };
        Some((side(grid.width())?, side(grid.height())?))
    }

    /// Bitmap dimensions for a grid.
    ///
    /// Panics if they do not fit in a `u32`.
    pub fn image_size(&self, grid: &Grid) -> (u32, u32) {
        match self.checked_image_size(grid) {
            Some(size) => size,
            None => panic!("{}x{} cells of {} pixels do not fit in a bitmap",
                           grid.width(), grid.height(), self.cell_pixels),
        }
    }

    // Paint in maze space, y up.
    #[inline]
    fn paint(&self, image: &mut GrayImage, x: u32, y: u32) {
        let flipped_y = image.height() - 1 - y;
        image.put_pixel(x, flipped_y, FOREGROUND);
    }
}

impl Default for RasterWalls {
    fn default() -> RasterWalls {
        RasterWalls::new(DEFAULT_CELL_PIXELS)
    }
}

impl WallRenderer for RasterWalls {
    type Canvas = GrayImage;

    fn canvas(&self, grid: &Grid) -> GrayImage {
        let (w, h) = self.image_size(grid);
        GrayImage::from_pixel(w, h, BACKGROUND)
    }

    fn render_cell(&self, grid: &Grid, coord: Cartesian2DCoordinate, image: &mut GrayImage) {
        let (x, y) = (i64::from(coord.x), i64::from(coord.y));
        let px = self.cell_pixels;
        let (corner_x, corner_y) = (coord.x * px, coord.y * px);
        let neighbourhood = CornerPixel {
            cell: grid.get_cell(x, y),
            left: grid.get_cell(x - 1, y),
            below: grid.get_cell(x, y - 1),
        };
        let cell = neighbourhood.cell;

        if cell.contains(CellState::LEFT) {
            for i in 0..px {
                self.paint(image, corner_x, corner_y + i);
            }
        }
        if cell.contains(CellState::BOTTOM) {
            for i in 0..px {
                self.paint(image, corner_x + i, corner_y);
            }
        }
        if !cell.contains(CellState::LEFT) && !cell.contains(CellState::BOTTOM) &&
           CORNER_PIXEL_RULES.iter().any(|rule| rule(&neighbourhood)) {
            self.paint(image, corner_x, corner_y);
        }
    }

    fn finish(&self, _: &Grid, mut image: GrayImage) -> GrayImage {
        let (w, h) = image.dimensions();
        for x in 0..w {
            image.put_pixel(x, 0, FOREGROUND);
        }
        for y in 0..h {
            image.put_pixel(w - 1, y, FOREGROUND);
        }
        debug!(width = w, height = h, "rasterized maze walls");
        image
    }
}

#[derive(Debug, Clone)]
pub struct RasterOptions {
    cell_pixels: CellPixels,
    output_file: Option<PathBuf>,
}

impl RasterOptions {
    pub fn cell_pixels(&self) -> CellPixels {
        self.cell_pixels
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct RasterOptionsBuilder {
    options: RasterOptions,
}

impl RasterOptionsBuilder {
    pub fn new() -> RasterOptionsBuilder {
        RasterOptionsBuilder {
            options: RasterOptions {
                cell_pixels: DEFAULT_CELL_PIXELS,
                output_file: None,
            },
        }
    }

    pub fn cell_pixels(mut self, cell_pixels: CellPixels) -> RasterOptionsBuilder {
        self.options.cell_pixels = cell_pixels;
        self
    }

    pub fn output_file<P: AsRef<Path>>(mut self, path: Option<P>) -> RasterOptionsBuilder {
        self.options.output_file = path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> RasterOptions {
        self.options
    }
}

impl Default for RasterOptionsBuilder {
    fn default() -> RasterOptionsBuilder {
        RasterOptionsBuilder::new()
    }
}

/// Rasterize the grid's walls and write them out as a PNG.
pub fn render_to_file(grid: &Grid, options: &RasterOptions) -> Result<()> {
    let path = options.output_file().ok_or(ErrorKind::MissingOutputPath)?;
    let raster = RasterWalls::new(options.cell_pixels());
    if raster.checked_image_size(grid).is_none() {
        bail!(ErrorKind::ImageTooLarge(grid.width(), grid.height(), options.cell_pixels().0));
    }
    let image = render_walls(grid, &raster);
    image.save(path)
        .chain_err(|| format!("Failed to write maze image {}", path.display()))?;
    info!(path = %path.display(), width = image.width(), height = image.height(), "saved maze image");
    Ok(())
}
