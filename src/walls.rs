//! Turning a carved grid into wall geometry.
//!
//! A `WallRenderer` is asked for the geometry of every cell in row major order and accumulates
//! it on its own kind of canvas. `LineWalls` produces deduplicated line segments for a vector
//! drawing layer; `renderers::RasterWalls` paints a bitmap from the same wall bits.

use tracing::debug;

use crate::cells::{Cartesian2DCoordinate, CellState};
use crate::geometry::{LineSegment, Vector};
use crate::grid::Grid;
use crate::units::Scale;
use crate::utils::{fnv_hashset, FnvHashSet};

/// Fraction of a cell at which a wall stops short of a corner that another wall will close.
pub const LINE_CORNER_OFFSET: f64 = 0.7;

/// A strategy for producing the wall geometry of one cell at a time.
pub trait WallRenderer {
    type Canvas;

    /// A blank canvas sized for `grid`.
    fn canvas(&self, grid: &Grid) -> Self::Canvas;

    fn render_cell(&self, grid: &Grid, coord: Cartesian2DCoordinate, canvas: &mut Self::Canvas);

    /// Any whole-grid touches once every cell has been rendered.
    fn finish(&self, _: &Grid, canvas: Self::Canvas) -> Self::Canvas {
        canvas
    }
}

/// Render every cell of `grid`, `y` outer and `x` inner.
pub fn render_walls<R: WallRenderer>(grid: &Grid, renderer: &R) -> R::Canvas {
    let mut canvas = renderer.canvas(grid);
    for coord in grid.iter() {
        renderer.render_cell(grid, coord, &mut canvas);
    }
    renderer.finish(grid, canvas)
}

/// Segments in first-inserted order, each distinct `(start, end)` pair kept once.
#[derive(Debug, Clone, Default)]
pub struct SegmentSet {
    seen: FnvHashSet<LineSegment>,
    ordered: Vec<LineSegment>,
}

impl SegmentSet {
    pub fn with_capacity(capacity: usize) -> SegmentSet {
        SegmentSet {
            seen: fnv_hashset(capacity),
            ordered: Vec::with_capacity(capacity),
        }
    }

    /// Returns false if an identical segment, same direction included, is already present.
    pub fn insert(&mut self, segment: LineSegment) -> bool {
        if self.seen.insert(segment) {
            self.ordered.push(segment);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, segment: &LineSegment) -> bool {
        self.seen.contains(segment)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<LineSegment> {
        self.ordered.iter()
    }

    pub fn into_vec(self) -> Vec<LineSegment> {
        self.ordered
    }
}

impl Extend<LineSegment> for SegmentSet {
    fn extend<T: IntoIterator<Item = LineSegment>>(&mut self, iter: T) {
        for segment in iter {
            let _ = self.insert(segment);
        }
    }
}

/// Position along one axis of a cell, in cell units from its lower-left corner.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Span {
    Zero,
    Offset,
    One,
}

/// A cell and the neighbours its corner patches look at. Off-grid neighbours read as fully walled.
struct Neighbourhood {
    cell: CellState,
    below: CellState,
    right: CellState,
}

impl Neighbourhood {
    fn at(grid: &Grid, x: i64, y: i64) -> Neighbourhood {
        Neighbourhood {
            cell: grid.get_cell(x, y),
            below: grid.get_cell(x, y - 1),
            right: grid.get_cell(x + 1, y),
        }
    }
}

/// An extra segment needed to keep a corner closed where the cell's own walls leave a gap.
struct CornerPatch {
    applies: fn(&Neighbourhood) -> bool,
    start: (Span, Span),
    end: (Span, Span),
}

// Open below and to the right while the wall on the right carries on below this cell.
fn open_below_right(n: &Neighbourhood) -> bool {
    !n.cell.contains(CellState::BOTTOM) && !n.cell.contains(CellState::RIGHT) &&
    n.below.contains(CellState::RIGHT)
}

// Open above and to the right, with the cell on the right open above as well.
fn open_above_right(n: &Neighbourhood) -> bool {
    !n.cell.contains(CellState::TOP) && !n.cell.contains(CellState::RIGHT) &&
    !n.right.contains(CellState::TOP)
}

const CORNER_PATCHES: [CornerPatch; 2] = [
    CornerPatch {
        applies: open_below_right,
        start: (Span::Offset, Span::Zero),
        end: (Span::One, Span::Zero),
    },
    CornerPatch {
        applies: open_above_right,
        start: (Span::Offset, Span::One),
        end: (Span::One, Span::One),
    },
];

/// Wall extraction into line segments.
///
/// Every wall a cell still has becomes one segment along that side. A bottom or top wall runs the
/// full cell width only when the cell has no right wall; otherwise it stops at the corner offset
/// and the right wall is drawn at that offset, and likewise vertically for the top wall. The top
/// and right walls therefore sit inside the cell, giving shared walls a thickness of
/// `1 - corner_offset` cells once the neighbour draws its own side. `CORNER_PATCHES` fill the
/// remaining gaps at outer corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LineWalls {
    scale: Scale,
    corner_offset: f64,
}

impl LineWalls {
    pub fn new(scale: Scale) -> LineWalls {
        LineWalls::with_corner_offset(scale, LINE_CORNER_OFFSET)
    }

    pub fn with_corner_offset(scale: Scale, corner_offset: f64) -> LineWalls {
        LineWalls {
            scale,
            corner_offset,
        }
    }

    #[inline]
    pub fn scale(&self) -> Scale {
        self.scale
    }

    #[inline]
    pub fn corner_offset(&self) -> f64 {
        self.corner_offset
    }

    #[inline]
    fn span(&self, span: Span) -> f64 {
        match span {
            Span::Zero => 0.0,
            Span::Offset => self.corner_offset,
            Span::One => 1.0,
        }
    }

    /// A segment between two points given in cell units relative to cell `(x, y)`.
    #[inline]
    fn segment(&self, x: f64, y: f64, dx1: f64, dy1: f64, dx2: f64, dy2: f64) -> LineSegment {
        let Scale { x: sx, y: sy } = self.scale;
        LineSegment::new(Vector::new((x + dx1) * sx, (y + dy1) * sy),
                         Vector::new((x + dx2) * sx, (y + dy2) * sy))
    }

    /// The segments for one cell, in emission order. May contain duplicates of a neighbour's.
    pub fn cell_segments(&self, grid: &Grid, coord: Cartesian2DCoordinate) -> Vec<LineSegment> {
        let (x, y) = (i64::from(coord.x), i64::from(coord.y));
        let (fx, fy) = (x as f64, y as f64);
        let n = Neighbourhood::at(grid, x, y);
        let s = n.cell;
        let offset = self.corner_offset;

        let mut segments = Vec::with_capacity(4);
        let mut x_offset = offset;
        let mut y_offset = offset;

        if s.contains(CellState::BOTTOM) {
            x_offset = if s.contains(CellState::RIGHT) { offset } else { 1.0 };
            segments.push(self.segment(fx, fy, 0.0, 0.0, x_offset, 0.0));
        }
        if s.contains(CellState::LEFT) {
            y_offset = if s.contains(CellState::TOP) { offset } else { 1.0 };
            segments.push(self.segment(fx, fy, 0.0, 0.0, 0.0, y_offset));
        }
        if s.contains(CellState::TOP) {
            x_offset = if s.contains(CellState::RIGHT) { offset } else { 1.0 };
            segments.push(self.segment(fx, fy, 0.0, y_offset, x_offset, y_offset));
        }
        if s.contains(CellState::RIGHT) {
            y_offset = if s.contains(CellState::TOP) { offset } else { 1.0 };
            segments.push(self.segment(fx, fy, x_offset, 0.0, x_offset, y_offset));
        }

        for patch in CORNER_PATCHES.iter().filter(|patch| (patch.applies)(&n)) {
            segments.push(self.segment(fx,
                                       fy,
                                       self.span(patch.start.0),
                                       self.span(patch.start.1),
                                       self.span(patch.end.0),
                                       self.span(patch.end.1)));
        }

        segments
    }
}

impl WallRenderer for LineWalls {
    type Canvas = SegmentSet;

    fn canvas(&self, grid: &Grid) -> SegmentSet {
        SegmentSet::with_capacity(grid.size() * 2)
    }

    fn render_cell(&self, grid: &Grid, coord: Cartesian2DCoordinate, canvas: &mut SegmentSet) {
        canvas.extend(self.cell_segments(grid, coord));
    }

    fn finish(&self, grid: &Grid, canvas: SegmentSet) -> SegmentSet {
        debug!(cells = grid.size(), segments = canvas.len(), "extracted wall segments");
        canvas
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::Wall;
    use crate::units::{ColumnLength, RowLength};

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment::from_coords(x1, y1, x2, y2)
    }

    fn unit_walls() -> LineWalls {
        LineWalls::new(Scale::default())
    }

    #[test]
    fn segment_set_keeps_first_insertion_order() {
        let mut set = SegmentSet::with_capacity(4);
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(1.0, 0.0, 1.0, 1.0);
        assert!(set.insert(a));
        assert!(set.insert(b));
        assert!(!set.insert(a));
        assert!(set.insert(a.reversed()));
        assert_eq!(set.len(), 3);
        assert!(set.contains(&b));
        assert_eq!(set.into_vec(), vec![a, b, a.reversed()]);
    }

    #[test]
    fn fully_walled_cell() {
        let g = Grid::new(RowLength(1), ColumnLength(1));
        let segments = unit_walls().cell_segments(&g, Cartesian2DCoordinate::new(0, 0));
        assert_eq!(segments,
                   vec![seg(0.0, 0.0, 0.7, 0.0),
                        seg(0.0, 0.0, 0.0, 0.7),
                        seg(0.0, 0.7, 0.7, 0.7),
                        seg(0.7, 0.0, 0.7, 0.7)]);
    }

    #[test]
    fn open_right_side_runs_walls_to_the_corner() {
        let mut g = Grid::new(RowLength(2), ColumnLength(1));
        g.carve_passage(Cartesian2DCoordinate::new(0, 0), Wall::Right);
        let walls = unit_walls();

        assert_eq!(walls.cell_segments(&g, Cartesian2DCoordinate::new(0, 0)),
                   vec![seg(0.0, 0.0, 1.0, 0.0), seg(0.0, 0.0, 0.0, 0.7), seg(0.0, 0.7, 1.0, 0.7)]);
        assert_eq!(walls.cell_segments(&g, Cartesian2DCoordinate::new(1, 0)),
                   vec![seg(1.0, 0.0, 1.7, 0.0), seg(1.0, 0.7, 1.7, 0.7), seg(1.7, 0.0, 1.7, 0.7)]);
    }

    #[test]
    fn open_top_side_runs_left_wall_to_the_corner() {
        let mut g = Grid::new(RowLength(1), ColumnLength(2));
        g.carve_passage(Cartesian2DCoordinate::new(0, 0), Wall::Top);
        let walls = unit_walls();

        assert_eq!(walls.cell_segments(&g, Cartesian2DCoordinate::new(0, 0)),
                   vec![seg(0.0, 0.0, 0.7, 0.0), seg(0.0, 0.0, 0.0, 1.0), seg(0.7, 0.0, 0.7, 1.0)]);
    }

    #[test]
    fn corner_patch_below_right() {
        // (1, 1) is open below and to the right, and (1, 0) keeps its right wall.
        let mut g = Grid::new(RowLength(3), ColumnLength(2));
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.carve_passage(gc(1, 1), Wall::Bottom);
        g.carve_passage(gc(1, 1), Wall::Right);

        let segments = unit_walls().cell_segments(&g, gc(1, 1));
        assert!(segments.contains(&seg(1.7, 1.0, 2.0, 1.0)));
        // No patch along the top, the right hand cell still has its top wall.
        assert!(!segments.iter().any(|s| s.start.x == 1.7 && s.start.y == 2.0));
    }

    #[test]
    fn corner_patch_above_right() {
        // (0, 0) is open above and to the right, and (1, 0) is open above too.
        let mut g = Grid::new(RowLength(2), ColumnLength(2));
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        g.carve_passage(gc(0, 0), Wall::Top);
        g.carve_passage(gc(0, 0), Wall::Right);
        g.carve_passage(gc(1, 0), Wall::Top);

        let segments = unit_walls().cell_segments(&g, gc(0, 0));
        assert_eq!(segments,
                   vec![seg(0.0, 0.0, 1.0, 0.0), seg(0.0, 0.0, 0.0, 1.0), seg(0.7, 1.0, 1.0, 1.0)]);
    }

    #[test]
    fn scaling_applies_per_axis() {
        let g = Grid::new(RowLength(2), ColumnLength(2));
        let walls = LineWalls::new(Scale::new(10.0, 100.0));
        let segments = walls.cell_segments(&g, Cartesian2DCoordinate::new(1, 1));
        assert_eq!(segments[0], seg(10.0, 100.0, 17.0, 100.0));
        assert_eq!(segments[1], seg(10.0, 100.0, 10.0, 170.0));
    }

    #[test]
    fn custom_corner_offset() {
        let g = Grid::new(RowLength(1), ColumnLength(1));
        let walls = LineWalls::with_corner_offset(Scale::default(), 0.5);
        assert_eq!(walls.corner_offset(), 0.5);
        assert_eq!(walls.cell_segments(&g, Cartesian2DCoordinate::new(0, 0))[3],
                   seg(0.5, 0.0, 0.5, 0.5));
    }

    #[test]
    fn render_walls_deduplicates_across_cells() {
        // Two disconnected fully walled cells: nothing is shared, nothing collapses.
        let g = Grid::new(RowLength(2), ColumnLength(1));
        let set = render_walls(&g, &unit_walls());
        assert_eq!(set.len(), 8);

        // Same cell rendered twice collapses entirely.
        let walls = unit_walls();
        let mut canvas = walls.canvas(&g);
        walls.render_cell(&g, Cartesian2DCoordinate::new(0, 0), &mut canvas);
        walls.render_cell(&g, Cartesian2DCoordinate::new(0, 0), &mut canvas);
        assert_eq!(canvas.len(), 4);
    }
}
