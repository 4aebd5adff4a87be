use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

/// A grid cell address. `row` counts down from the top edge, `col` counts right from the left edge.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

pub type CoordinateSmallVec = SmallVec<[Cell; 4]>;

/// What occupies a grid cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellState {
    Wall,
    Path,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    /// (row, column) delta of a single step in this direction.
    #[inline]
    pub fn delta(self) -> (isize, isize) {
        match self {
            CompassPrimary::North => (-1, 0),
            CompassPrimary::South => (1, 0),
            CompassPrimary::East => (0, 1),
            CompassPrimary::West => (0, -1),
        }
    }
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// Creates a new `Cell` offset `distance` cells away in the given direction.
    /// Returns None if the result would have a negative row or column. There is no upper bound
    /// check here, that depends on the grid.
    pub fn offset(self, dir: CompassPrimary, distance: usize) -> Option<Cell> {
        let (row, col) = (self.row, self.col);
        match dir {
            CompassPrimary::North => row.checked_sub(distance).map(|r| Cell::new(r, col)),
            CompassPrimary::South => row.checked_add(distance).map(|r| Cell::new(r, col)),
            CompassPrimary::East => col.checked_add(distance).map(|c| Cell::new(row, c)),
            CompassPrimary::West => col.checked_sub(distance).map(|c| Cell::new(row, c)),
        }
    }

    /// Number of unit steps along the grid axes between two cells.
    #[inline]
    pub fn manhattan_distance(self, other: Cell) -> usize {
        abs_diff(self.row, other.row) + abs_diff(self.col, other.col)
    }

    /// Do the cells share an edge? Diagonal neighbours do not count.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan_distance(other) == 1
    }
}

#[inline]
fn abs_diff(a: usize, b: usize) -> usize {
    if a > b { a - b } else { b - a }
}

impl From<(usize, usize)> for Cell {
    fn from(row_col_pair: (usize, usize)) -> Cell {
        Cell::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn offset_one_step() {
        let c = Cell::new(3, 3);
        assert_eq!(c.offset(CompassPrimary::North, 1), Some(Cell::new(2, 3)));
        assert_eq!(c.offset(CompassPrimary::South, 1), Some(Cell::new(4, 3)));
        assert_eq!(c.offset(CompassPrimary::East, 1), Some(Cell::new(3, 4)));
        assert_eq!(c.offset(CompassPrimary::West, 1), Some(Cell::new(3, 2)));
    }

    #[test]
    fn offset_below_zero_is_none() {
        let c = Cell::new(1, 0);
        assert_eq!(c.offset(CompassPrimary::North, 2), None);
        assert_eq!(c.offset(CompassPrimary::West, 1), None);
        assert_eq!(c.offset(CompassPrimary::North, 1), Some(Cell::new(0, 0)));
    }

    #[test]
    fn deltas_match_offsets() {
        let c = Cell::new(5, 5);
        for dir in CompassPrimary::ALL.iter() {
            let (dr, dc) = dir.delta();
            let moved = c.offset(*dir, 1).unwrap();
            assert_eq!(moved.row as isize, 5 + dr);
            assert_eq!(moved.col as isize, 5 + dc);
        }
    }

    #[test]
    fn manhattan() {
        let a = Cell::new(0, 0);
        assert_eq!(a.manhattan_distance(Cell::new(4, 4)), 8);
        assert_eq!(Cell::new(4, 1).manhattan_distance(Cell::new(2, 3)), 4);
        assert_eq!(a.manhattan_distance(a), 0);
        assert!(a.is_adjacent(Cell::new(0, 1)));
        assert!(!a.is_adjacent(Cell::new(1, 1)));
        assert!(!a.is_adjacent(a));
    }

    #[test]
    fn from_row_col_pair() {
        assert_eq!(Cell::from((2, 7)), Cell { row: 2, col: 7 });
    }
}
