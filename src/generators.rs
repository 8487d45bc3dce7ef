use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::{Grid, NeighbourSmallVec};

/// One cell being visited: its shuffled neighbours and how many of them have been looked at.
struct Frame {
    coord: Cartesian2DCoordinate,
    neighbours: NeighbourSmallVec,
    next: usize,
}

impl Frame {
    fn enter<R: Rng>(grid: &mut Grid, coord: Cartesian2DCoordinate, rng: &mut R) -> Frame {
        grid.mark_visited(coord);
        let mut neighbours = grid.neighbours(coord);
        neighbours.shuffle(rng);
        Frame {
            coord,
            neighbours,
            next: 0,
        }
    }
}

/// Apply the recursive backtracker maze generation algorithm to a fully walled grid.
///
/// Starting from a random cell, walk to a random unvisited neighbour, knocking down the wall
/// between them, and carry on from there. When a cell has no unvisited neighbours left, back up
/// to the most recent cell that still has some. A wall is only ever removed on the way into an
/// unvisited cell, so the passages form a spanning tree: a perfect maze.
///
/// Each cell's neighbours are shuffled once, on arrival, and then tried in that order; whether a
/// neighbour is still unvisited is decided when its turn comes. The pending cells live on an
/// explicit stack so the walk depth is bounded by memory rather than the call stack.
///
/// Returns the number of passages carved, `width * height - 1` for a non empty grid.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid, rng: &mut R) -> usize {
    if grid.size() == 0 {
        return 0;
    }

    let start = Cartesian2DCoordinate::new(rng.gen_range(0..grid.width()),
                                           rng.gen_range(0..grid.height()));
    let mut stack = Vec::with_capacity(grid.size());
    stack.push(Frame::enter(grid, start, rng));
    let mut carved = 0;

    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.neighbours.len() {
            let _ = stack.pop();
            continue;
        }
        let (wall, neighbour) = frame.neighbours[frame.next];
        frame.next += 1;
        let current = frame.coord;

        if !grid.is_visited(neighbour) {
            let _ = grid.carve_passage(current, wall);
            carved += 1;
            stack.push(Frame::enter(grid, neighbour, rng));
        }
    }

    debug!(width = grid.width(), height = grid.height(), start = ?start, carved,
           "carved recursive backtracker maze");
    carved
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::{CellState, Wall};
    use crate::units::{ColumnLength, RowLength};

    use bit_set::BitSet;
    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn carved_grid(w: usize, h: usize, seed: u64) -> (Grid, usize) {
        let mut g = Grid::new(RowLength(w), ColumnLength(h));
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let carved = recursive_backtracker(&mut g, &mut rng);
        (g, carved)
    }

    // Breadth first flood fill over open passages from (0, 0).
    fn reachable_cells(g: &Grid) -> BitSet {
        let mut reached = BitSet::with_capacity(g.size());
        let mut frontier = vec![Cartesian2DCoordinate::new(0, 0)];
        reached.insert(0);
        while let Some(coord) = frontier.pop() {
            for &(wall, neighbour) in g.neighbours(coord).iter() {
                let index = neighbour.row_major_index(g.width());
                if g.is_passage_open(coord, wall) && reached.insert(index) {
                    frontier.push(neighbour);
                }
            }
        }
        reached
    }

    fn walls_are_symmetric(g: &Grid) -> bool {
        g.iter().all(|coord| {
            g.neighbours(coord).iter().all(|&(wall, neighbour)| {
                g.cell(coord).has_wall(wall) == g.cell(neighbour).has_wall(wall.opposite())
            })
        })
    }

    #[test]
    fn single_cell_needs_no_passages() {
        let (g, carved) = carved_grid(1, 1, 42);
        assert_eq!(carved, 0);
        assert_eq!(g.cell(Cartesian2DCoordinate::new(0, 0)).walls(), CellState::INITIAL);
        assert!(g.cell(Cartesian2DCoordinate::new(0, 0)).is_visited());
    }

    #[test]
    fn two_cells_share_one_passage() {
        let (g, carved) = carved_grid(2, 1, 42);
        assert_eq!(carved, 1);
        assert_eq!(g.passages_count(), 1);
        assert!(!g.cell(Cartesian2DCoordinate::new(0, 0)).has_wall(Wall::Right));
        assert!(!g.cell(Cartesian2DCoordinate::new(1, 0)).has_wall(Wall::Left));
    }

    #[test]
    fn every_cell_is_visited() {
        let (g, _) = carved_grid(15, 25, 42);
        assert!(g.iter().all(|c| g.cell(c).is_visited()));
    }

    #[test]
    fn carving_makes_a_spanning_tree() {
        let (g, carved) = carved_grid(15, 25, 42);
        assert_eq!(carved, 15 * 25 - 1);
        assert_eq!(g.passages_count(), 15 * 25 - 1);
        assert_eq!(reachable_cells(&g).len(), 15 * 25);

        let graph = g.passage_graph();
        assert_eq!(connected_components(&graph), 1);
        assert!(!is_cyclic_undirected(&graph));
    }

    #[test]
    fn carving_is_deterministic() {
        let (a, _) = carved_grid(20, 13, 7);
        let (b, _) = carved_grid(20, 13, 7);
        assert_eq!(a, b);

        let (c, _) = carved_grid(20, 13, 8);
        assert_ne!(a, c);
    }

    #[test]
    fn long_corridors_do_not_exhaust_the_stack() {
        let (g, carved) = carved_grid(1, 100_000, 42);
        assert_eq!(carved, 99_999);
        assert_eq!(reachable_cells(&g).len(), 100_000);
    }

    #[test]
    fn empty_grid_is_left_alone() {
        let (g, carved) = carved_grid(0, 0, 42);
        assert_eq!(carved, 0);
        assert_eq!(g.size(), 0);
    }

    #[test]
    fn quickcheck_spanning_tree() {
        fn p(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = (usize::from(w % 24), usize::from(h % 24));
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            let (g, carved) = carved_grid(w, h, seed);
            TestResult::from_bool(carved == w * h - 1 &&
                                  g.passages_count() == w * h - 1 &&
                                  reachable_cells(&g).len() == w * h &&
                                  walls_are_symmetric(&g))
        }
        quickcheck(p as fn(u8, u8, u64) -> TestResult);
    }

    #[test]
    fn quickcheck_determinism() {
        fn p(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = (usize::from(w % 16), usize::from(h % 16));
            if w == 0 || h == 0 {
                return TestResult::discard();
            }
            TestResult::from_bool(carved_grid(w, h, seed) == carved_grid(w, h, seed))
        }
        quickcheck(p as fn(u8, u8, u64) -> TestResult);
    }
}
