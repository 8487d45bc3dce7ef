use image::GrayImage;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use tracing::info;

use crate::cells::CellState;
use crate::generators;
use crate::geometry::LineSegment;
use crate::grid::Grid;
use crate::renderers::RasterWalls;
use crate::units::{ColumnLength, RowLength, Scale};
use crate::walls::{render_walls, LineWalls};

/// Seed used by `Maze::new`, so the same dimensions always give the same maze.
pub const DEFAULT_SEED: u64 = 42;

/// A carved perfect maze. The seed alone decides its layout for given dimensions.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    seed: u64,
}

impl Maze {
    pub fn new(width: u32, height: u32) -> Maze {
        Maze::with_seed(width, height, DEFAULT_SEED)
    }

    /// Build and carve a `width` by `height` maze.
    ///
    /// Panics if either dimension is zero.
    pub fn with_seed(width: u32, height: u32, seed: u64) -> Maze {
        assert!(width > 0 && height > 0,
                "maze dimensions must be positive, got {}x{}", width, height);

        let mut grid = Grid::new(RowLength(width as usize), ColumnLength(height as usize));
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let passages = generators::recursive_backtracker(&mut grid, &mut rng);
        info!(width, height, seed, passages, "generated maze");

        Maze { grid, seed }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// See `Grid::get_cell`: fully walled outside the maze.
    #[inline]
    pub fn get_cell(&self, x: i64, y: i64) -> CellState {
        self.grid.get_cell(x, y)
    }

    #[inline]
    pub fn has_flag(&self, x: i64, y: i64, flag: CellState) -> bool {
        self.grid.has_flag(x, y, flag)
    }

    /// The maze walls as deduplicated line segments, each endpoint multiplied by the scale for its
    /// axis. Segments come out in the order cells first produced them.
    pub fn generate(&self, scale_x: f64, scale_y: f64) -> Vec<LineSegment> {
        self.generate_with(&LineWalls::new(Scale::new(scale_x, scale_y)))
    }

    pub fn generate_with(&self, walls: &LineWalls) -> Vec<LineSegment> {
        render_walls(&self.grid, walls).into_vec()
    }

    /// Panics if the bitmap would be too large, see `RasterWalls::checked_image_size`.
    pub fn rasterize(&self, raster: &RasterWalls) -> GrayImage {
        render_walls(&self.grid, raster)
    }
}
