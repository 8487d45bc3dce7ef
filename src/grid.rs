use crate::cells::{Cartesian2DCoordinate, CellState, Wall};
use crate::units::{ColumnLength, EdgesCount, NodesCount, RowLength};

use itertools::iproduct;
use petgraph::{Graph, Undirected};
use smallvec::SmallVec;
use std::convert::TryFrom;
use std::fmt;

pub type NeighbourSmallVec = SmallVec<[(Wall, Cartesian2DCoordinate); 4]>;

/// Undirected graph of the open passages. Node `n` is the cell at row major index `n`.
pub type PassageGraph = Graph<(), (), Undirected, u32>;

/// Rectangular grid of cell wall bitmasks, stored row major.
///
/// Cells start fully walled. Only the carver tears walls down, and it always does so in
/// complementary pairs through `carve_passage`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, passages: {:?}",
               self.width, self.height, self.passages_count())
    }
}

impl Grid {
    /// Panics if either dimension does not fit in a `u32`.
    pub fn new(row_width: RowLength, column_height: ColumnLength) -> Grid {
        let (RowLength(w), ColumnLength(h)) = (row_width, column_height);
        let (width, height) = match (u32::try_from(w), u32::try_from(h)) {
            (Ok(width), Ok(height)) => (width, height),
            _ => panic!("grid dimensions {}x{} are too large", w, h),
        };
        Grid {
            width,
            height,
            cells: vec![CellState::INITIAL; w * h],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Upper bound on the number of shared edges, i.e. passages if every wall were removed.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let (w, h) = (self.width as usize, self.height as usize);
        let shared_edges = w.saturating_sub(1) * h + h.saturating_sub(1) * w;
        (NodesCount(self.size()), EdgesCount(shared_edges))
    }

    #[inline]
    pub fn is_valid_coordinate(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width) && y < i64::from(self.height)
    }

    /// The cell state at `(x, y)`, or the fully walled `CellState::INITIAL` for any coordinate
    /// outside the grid. Edge cells therefore see a solid neighbour beyond the boundary.
    #[inline]
    pub fn get_cell(&self, x: i64, y: i64) -> CellState {
        if self.is_valid_coordinate(x, y) {
            self.cells[y as usize * self.width as usize + x as usize]
        } else {
            CellState::INITIAL
        }
    }

    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> CellState {
        self.get_cell(i64::from(coord.x), i64::from(coord.y))
    }

    #[inline]
    pub fn has_flag(&self, x: i64, y: i64, flag: CellState) -> bool {
        self.get_cell(x, y).contains(flag)
    }

    /// Cells in row major order: `y` outer, `x` inner.
    pub fn iter(&self) -> impl Iterator<Item = Cartesian2DCoordinate> {
        iproduct!(0..self.height, 0..self.width).map(|(y, x)| Cartesian2DCoordinate::new(x, y))
    }

    /// In-grid neighbours of `coord`, each tagged with the wall of `coord` that separates them.
    /// Always listed in the order left, below, right, above.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> NeighbourSmallVec {
        [Wall::Left, Wall::Bottom, Wall::Right, Wall::Top]
            .iter()
            .filter_map(|&wall| {
                let (x, y) = coord.across(wall);
                if self.is_valid_coordinate(x, y) {
                    Some((wall, Cartesian2DCoordinate::new(x as u32, y as u32)))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Is there an open passage from `coord` across `wall` to another cell of the grid?
    pub fn is_passage_open(&self, coord: Cartesian2DCoordinate, wall: Wall) -> bool {
        let (x, y) = coord.across(wall);
        self.is_valid_coordinate(x, y) && !self.cell(coord).has_wall(wall)
    }

    /// Open passages, each reported once from the cell below or to the left of it.
    pub fn iter_passages<'a>(&'a self)
                             -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + 'a {
        self.iter().flat_map(move |coord| {
            [Wall::Right, Wall::Top]
                .iter()
                .filter(|&&wall| self.is_passage_open(coord, wall))
                .map(|&wall| {
                    let (x, y) = coord.across(wall);
                    (coord, Cartesian2DCoordinate::new(x as u32, y as u32))
                })
                .collect::<SmallVec<[_; 2]>>()
        })
    }

    pub fn passages_count(&self) -> usize {
        self.iter_passages().count()
    }

    pub fn passage_graph(&self) -> PassageGraph {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = PassageGraph::with_capacity(nodes, edges);
        for _ in 0..nodes {
            let _ = graph.add_node(());
        }
        for (a, b) in self.iter_passages() {
            graph.add_edge((a.row_major_index(self.width) as u32).into(),
                           (b.row_major_index(self.width) as u32).into(),
                           ());
        }
        graph
    }

    #[inline]
    pub(crate) fn is_visited(&self, coord: Cartesian2DCoordinate) -> bool {
        self.cell(coord).is_visited()
    }

    #[inline]
    pub(crate) fn mark_visited(&mut self, coord: Cartesian2DCoordinate) {
        let index = coord.row_major_index(self.width);
        self.cells[index].insert(CellState::VISITED);
    }

    /// Knock down the wall between `coord` and its neighbour across `wall`, on both sides.
    ///
    /// Panics if the neighbour is outside the grid.
    pub(crate) fn carve_passage(&mut self,
                                coord: Cartesian2DCoordinate,
                                wall: Wall)
                                -> Cartesian2DCoordinate {
        let (x, y) = coord.across(wall);
        assert!(self.is_valid_coordinate(x, y),
                "cannot carve through the grid boundary at {:?} {:?}", coord, wall);
        let neighbour = Cartesian2DCoordinate::new(x as u32, y as u32);

        let index = coord.row_major_index(self.width);
        self.cells[index].remove(wall.flag());
        let neighbour_index = neighbour.row_major_index(self.width);
        self.cells[neighbour_index].remove(wall.opposite().flag());

        neighbour
    }
}

impl fmt::Display for Grid {
    /// Text picture of the walls, highest row first so that up is up.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const CORNER: &str = "+";
        const WALL_H: &str = "---";
        const OPEN_H: &str = "   ";
        const WALL_V: &str = "|";
        const OPEN_V: &str = " ";
        const BODY: &str = "   ";

        let top = i64::from(self.height) - 1;
        let mut output = String::new();

        // Every row prints its own floor, the row above having printed this row's ceiling.
        for x in 0..i64::from(self.width) {
            output.push_str(CORNER);
            output.push_str(if self.has_flag(x, top, CellState::TOP) { WALL_H } else { OPEN_H });
        }
        output.push_str(CORNER);
        output.push('\n');

        for y in (0..=top).rev() {
            let mut middle = String::new();
            let mut floor = String::new();
            for x in 0..i64::from(self.width) {
                let cell = self.get_cell(x, y);
                middle.push_str(if cell.contains(CellState::LEFT) { WALL_V } else { OPEN_V });
                middle.push_str(BODY);
                floor.push_str(CORNER);
                floor.push_str(if cell.contains(CellState::BOTTOM) { WALL_H } else { OPEN_H });
            }
            let last_x = i64::from(self.width) - 1;
            middle.push_str(if self.has_flag(last_x, y, CellState::RIGHT) { WALL_V } else { OPEN_V });
            floor.push_str(CORNER);

            output.push_str(&middle);
            output.push('\n');
            output.push_str(&floor);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
