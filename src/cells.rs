use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Position of a cell inside a grid. `y` grows upwards, so the `Top` wall of a cell is shared with
/// the cell at `y + 1`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    /// Row major index into a grid whose rows are `width` cells long.
    #[inline]
    pub fn row_major_index(&self, width: u32) -> usize {
        self.y as usize * width as usize + self.x as usize
    }

    #[inline]
    pub fn from_row_major_index(index: usize, width: u32) -> Cartesian2DCoordinate {
        let w = width as usize;
        Cartesian2DCoordinate::new((index % w) as u32, (index / w) as u32)
    }

    /// The coordinate one step across `wall`, which may be off the grid.
    #[inline]
    pub fn across(&self, wall: Wall) -> (i64, i64) {
        let (dx, dy) = wall.offset();
        (i64::from(self.x) + dx, i64::from(self.y) + dy)
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// One of the four sides of a square cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Wall {
    Bottom,
    Right,
    Top,
    Left,
}

const OPPOSITE_WALLS: [Wall; 4] = [Wall::Top, Wall::Left, Wall::Bottom, Wall::Right];

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Bottom, Wall::Right, Wall::Top, Wall::Left];

    #[inline]
    fn index(self) -> usize {
        match self {
            Wall::Bottom => 0,
            Wall::Right => 1,
            Wall::Top => 2,
            Wall::Left => 3,
        }
    }

    /// The wall on the far side of a shared edge, e.g. my `Right` is my neighbour's `Left`.
    #[inline]
    pub fn opposite(self) -> Wall {
        OPPOSITE_WALLS[self.index()]
    }

    #[inline]
    pub fn flag(self) -> CellState {
        match self {
            Wall::Bottom => CellState::BOTTOM,
            Wall::Right => CellState::RIGHT,
            Wall::Top => CellState::TOP,
            Wall::Left => CellState::LEFT,
        }
    }

    /// Grid displacement to the cell on the other side of this wall.
    #[inline]
    pub fn offset(self) -> (i64, i64) {
        match self {
            Wall::Bottom => (0, -1),
            Wall::Right => (1, 0),
            Wall::Top => (0, 1),
            Wall::Left => (-1, 0),
        }
    }
}

/// Wall bitmask of one cell plus the carving phase `VISITED` marker.
#[derive(Eq, PartialEq, Copy, Clone, Hash, Default)]
pub struct CellState(u8);

impl CellState {
    pub const EMPTY: CellState = CellState(0);
    pub const BOTTOM: CellState = CellState(1);
    pub const RIGHT: CellState = CellState(2);
    pub const TOP: CellState = CellState(4);
    pub const LEFT: CellState = CellState(8);
    pub const VISITED: CellState = CellState(128);
    /// Fully walled and unvisited.
    pub const INITIAL: CellState = CellState(1 | 2 | 4 | 8);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Are all the bits of `flag` set?
    #[inline]
    pub fn contains(self, flag: CellState) -> bool {
        self.0 & flag.0 == flag.0
    }

    #[inline]
    pub fn has_wall(self, wall: Wall) -> bool {
        self.contains(wall.flag())
    }

    #[inline]
    pub fn is_visited(self) -> bool {
        self.contains(CellState::VISITED)
    }

    #[inline]
    pub fn insert(&mut self, flag: CellState) {
        self.0 |= flag.0;
    }

    #[inline]
    pub fn remove(&mut self, flag: CellState) {
        self.0 &= !flag.0;
    }

    /// Only the wall bits, `VISITED` stripped.
    #[inline]
    pub fn walls(self) -> CellState {
        CellState(self.0 & CellState::INITIAL.0)
    }

    pub fn wall_count(self) -> usize {
        Wall::ALL.iter().filter(|w| self.has_wall(**w)).count()
    }
}

impl BitOr for CellState {
    type Output = CellState;
    fn bitor(self, rhs: CellState) -> CellState {
        CellState(self.0 | rhs.0)
    }
}

impl BitOrAssign for CellState {
    fn bitor_assign(&mut self, rhs: CellState) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for CellState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = [(CellState::BOTTOM, "Bottom"),
                     (CellState::RIGHT, "Right"),
                     (CellState::TOP, "Top"),
                     (CellState::LEFT, "Left"),
                     (CellState::VISITED, "Visited")];
        let set = names.iter()
            .filter(|&&(flag, _)| self.contains(flag))
            .map(|&(_, name)| name)
            .collect::<Vec<_>>();
        write!(f, "CellState({})", set.join(" | "))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn opposite_walls_pair_up() {
        assert_eq!(Wall::Bottom.opposite(), Wall::Top);
        assert_eq!(Wall::Top.opposite(), Wall::Bottom);
        assert_eq!(Wall::Left.opposite(), Wall::Right);
        assert_eq!(Wall::Right.opposite(), Wall::Left);
        for wall in Wall::ALL.iter() {
            assert_eq!(wall.opposite().opposite(), *wall);
            let (dx, dy) = wall.offset();
            let (ox, oy) = wall.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn initial_is_all_walls_and_unvisited() {
        let s = CellState::INITIAL;
        for wall in Wall::ALL.iter() {
            assert!(s.has_wall(*wall));
        }
        assert!(!s.is_visited());
        assert_eq!(s.wall_count(), 4);
        assert_eq!(s.bits(), 15);
    }

    #[test]
    fn visited_is_never_a_wall() {
        let mut s = CellState::EMPTY;
        s.insert(CellState::VISITED);
        assert!(s.is_visited());
        assert_eq!(s.walls(), CellState::EMPTY);
        assert_eq!(s.wall_count(), 0);
        for wall in Wall::ALL.iter() {
            assert!(!s.has_wall(*wall));
        }
    }

    #[test]
    fn removing_walls() {
        let mut s = CellState::INITIAL | CellState::VISITED;
        s.remove(Wall::Right.flag());
        assert!(!s.has_wall(Wall::Right));
        assert!(s.has_wall(Wall::Left));
        assert!(s.is_visited());
        assert_eq!(s.walls(), CellState::BOTTOM | CellState::TOP | CellState::LEFT);
        assert_eq!(format!("{:?}", s), "CellState(Bottom | Top | Left | Visited)");
    }

    #[test]
    fn row_major_indices() {
        let c = Cartesian2DCoordinate::new(2, 3);
        assert_eq!(c.row_major_index(5), 17);
        assert_eq!(Cartesian2DCoordinate::from_row_major_index(17, 5), c);
        assert_eq!(c.across(Wall::Bottom), (2, 2));
        assert_eq!(Cartesian2DCoordinate::new(0, 0).across(Wall::Left), (-1, 0));
    }
}
