//! **sketch_maze** generates seeded perfect mazes and turns their walls into geometry: line
//! segments for a vector drawing layer, or a monochrome bitmap.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod geometry;
pub mod grid;
pub mod maze;
pub mod renderers;
pub mod sketch;
pub mod units;
pub mod walls;
mod utils;

pub use crate::maze::{Maze, DEFAULT_SEED};
