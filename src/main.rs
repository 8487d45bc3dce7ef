use docopt::Docopt;
use serde_derive::Deserialize;
use sketch_maze::{
    renderers::{self, RasterOptionsBuilder},
    sketch::{self, WireSketch},
    units::{CellPixels, Scale},
    walls::LineWalls,
    Maze,
};
use std::{
    fs::File,
    io,
    io::prelude::*,
    path::Path,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Sketch Maze

Usage:
    maze_driver -h | --help
    maze_driver [lines] [options]
    maze_driver text [options]
    maze_driver raster --image-out=<path> [options]

Options:
    -h --help              Show this screen.
    --grid-width=<n>       Number of maze cells across [default: 15].
    --grid-height=<n>      Number of maze cells up [default: 25].
    --width=<w>            Width of the drawing area the maze is scaled to [default: 150].
    --height=<h>           Height of the drawing area the maze is scaled to [default: 250].
    --seed=<n>             Random seed; the same seed and grid size always give the same maze [default: 42].
    --lines-out=<path>     Write the wall segments to a file, one 'x1 y1 x2 y2' per line, instead of stdout.
    --wire-out=<path>      Write the walls as a wire: shared points plus lines between 1-based point indices.
    --text-out=<path>      Output file path for a textual rendering of the maze.
    --image-out=<path>     Output file path for a bitmap rendering of the maze. Always PNG format.
    --cell-pixels=<n>      Pixel count of one cell side in a bitmap rendering [default: 2] max 255.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_lines: bool,
    cmd_text: bool,
    cmd_raster: bool,
    flag_grid_width: u32,
    flag_grid_height: u32,
    flag_width: f64,
    flag_height: f64,
    flag_seed: u64,
    flag_lines_out: String,
    flag_wire_out: String,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u8,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::sketch_maze::errors::Error, ::sketch_maze::errors::ErrorKind);
        }

        foreign_links {
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;
use error_chain::bail;

fn main() -> Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_grid_width == 0 || args.flag_grid_height == 0 {
        bail!("The maze grid needs at least one cell in each direction.");
    }
    if args.cmd_raster && args.flag_cell_pixels == 0 {
        bail!("Cells must be at least one pixel across.");
    }

    let maze = Maze::with_seed(args.flag_grid_width, args.flag_grid_height, args.flag_seed);

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze, &args.flag_save_edges)?;
    }

    if args.cmd_raster {
        // Terminal output: write the picture and stop.
        let options = RasterOptionsBuilder::new()
            .cell_pixels(CellPixels(u32::from(args.flag_cell_pixels)))
            .output_file(Some(&args.flag_image_out))
            .build();
        renderers::render_to_file(maze.grid(), &options)?;
        return Ok(());
    }

    if args.cmd_text {
        let text = format!("{}", maze.grid());
        if args.flag_text_out.is_empty() {
            print!("{}", text);
        } else {
            write_text_to_file(&text, &args.flag_text_out)
                .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
        }
        return Ok(());
    }

    let scale = Scale::fit(args.flag_width, args.flag_height, args.flag_grid_width, args.flag_grid_height);
    let segments = maze.generate_with(&LineWalls::new(scale));
    info!(segments = segments.len(), scale_x = scale.x, scale_y = scale.y, "maze walls ready");

    if !args.flag_wire_out.is_empty() {
        let mut wire = WireSketch::new();
        let points = sketch::draw_segments(&mut wire, &segments);
        info!(points, lines = wire.lines().len(), "drew maze wire");
        wire.save(&args.flag_wire_out)?;
    }

    // A wire file on its own replaces the listing unless `lines` was asked for explicitly.
    if !args.flag_wire_out.is_empty() && !args.cmd_lines && args.flag_lines_out.is_empty() {
        return Ok(());
    }

    let mut lines = String::new();
    for segment in &segments {
        lines.push_str(&segment.to_string());
        lines.push('\n');
    }
    if args.flag_lines_out.is_empty() {
        print!("{}", lines);
    } else {
        write_text_to_file(&lines, &args.flag_lines_out)
            .chain_err(|| format!("Failed to write maze lines to file {}", args.flag_lines_out))?;
    }

    Ok(())
}

fn write_text_to_file<P: AsRef<Path>>(data: &str, file_name: P) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze: &Maze, file_path: &str) -> Result<()> {

    let grid = maze.grid();
    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", grid.size(), grid.passages_count()));

    for (src, dst) in grid.iter_passages() {
        let src_as_1_based_index = src.row_major_index(grid.width()) + 1;
        let dst_as_1_based_index = dst.row_major_index(grid.width()) + 1;
        graph_data.push_str(&format!("{} {}\n", src_as_1_based_index, dst_as_1_based_index));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
