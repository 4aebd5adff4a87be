use bit_set::BitSet;
use petgraph::graph::UnGraph;
use std::fmt;
use std::str::FromStr;

use crate::cells::{Cell, CellState, CompassPrimary, CoordinateSmallVec};
use crate::errors::*;
use crate::units::{Height, NodesCount, Width};
use crate::utils;

pub const WALL_CHAR: char = '#';
pub const PATH_CHAR: char = '.';

/// A fixed size rectangular grid of `Wall`/`Path` cells.
///
/// Cells are addressed `(row, col)` with `(0, 0)` the top left corner. The dimensions are set on
/// construction and never change. Only the path cells are stored, as a row-major bit set.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: Width,
    height: Height,
    passages: BitSet,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {}, height: {}, path cells: {}",
               self.width.0, self.height.0, self.path_count())
    }
}

impl Grid {
    /// A grid of walls.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let NodesCount(cells_count) = checked_size(width, height)?;
        Ok(Grid {
            width,
            height,
            passages: BitSet::with_capacity(cells_count),
        })
    }

    /// A grid where every cell is a path.
    pub fn open(width: Width, height: Height) -> Result<Grid> {
        let mut grid = Grid::new(width, height)?;
        for index in 0..grid.size() {
            grid.passages.insert(index);
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    /// Total number of cells, walls included.
    #[inline]
    pub fn size(&self) -> usize {
        self.width.0 * self.height.0
    }

    /// Number of `Path` cells.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.passages.len()
    }

    /// The top left cell.
    #[inline]
    pub fn top_left(&self) -> Cell {
        Cell::new(0, 0)
    }

    /// The bottom right cell.
    #[inline]
    pub fn bottom_right(&self) -> Cell {
        Cell::new(self.height.0 - 1, self.width.0 - 1)
    }

    /// Is the cell within the grid's dimensions
    #[inline]
    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        cell.row < self.height.0 && cell.col < self.width.0
    }

    /// Convert a cell to a one dimensional row-major index in the range 0..grid.size().
    /// Returns None if the cell is outside the grid.
    #[inline]
    pub fn cell_to_index(&self, cell: Cell) -> Option<usize> {
        if self.is_valid_cell(cell) {
            Some(cell.row * self.width.0 + cell.col)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_cell(&self, index: usize) -> Option<Cell> {
        if index < self.size() {
            Some(Cell::new(index / self.width.0, index % self.width.0))
        } else {
            None
        }
    }

    /// State of the cell at `(row, col)`, None when outside the grid.
    #[inline]
    pub fn cell_state(&self, row: usize, col: usize) -> Option<CellState> {
        self.state_at(Cell::new(row, col))
    }

    pub fn state_at(&self, cell: Cell) -> Option<CellState> {
        self.cell_to_index(cell).map(|index| {
            if self.passages.contains(index) {
                CellState::Path
            } else {
                CellState::Wall
            }
        })
    }

    #[inline]
    pub fn is_path(&self, cell: Cell) -> bool {
        self.state_at(cell) == Some(CellState::Path)
    }

    pub fn set_state(&mut self, cell: Cell, state: CellState) -> Result<()> {
        let index = self.cell_to_index(cell)
            .ok_or_else(|| ErrorKind::OutOfBounds(cell, self.width, self.height))?;
        match state {
            CellState::Path => self.passages.insert(index),
            CellState::Wall => self.passages.remove(index),
        };
        Ok(())
    }

    /// Turn an in bounds cell into a path.
    #[inline]
    pub(crate) fn carve(&mut self, cell: Cell) {
        debug_assert!(self.is_valid_cell(cell), "carving outside the grid {:?}", cell);
        let index = cell.row * self.width.0 + cell.col;
        self.passages.insert(index);
    }

    pub fn neighbour_at_direction(&self, cell: Cell, direction: CompassPrimary) -> Option<Cell> {
        cell.offset(direction, 1).and_then(|neighbour| {
            if self.is_valid_cell(neighbour) {
                Some(neighbour)
            } else {
                None
            }
        })
    }

    /// Cells to the North, South, East or West of a cell that lie inside the grid, whatever their
    /// state.
    pub fn neighbours(&self, cell: Cell) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(cell, *dir))
            .collect()
    }

    /// Neighbours that are `Path` cells, i.e. one step moves a walker can make from `cell`.
    pub fn passable_neighbours(&self, cell: Cell) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(cell, *dir))
            .filter(|neighbour| self.is_path(*neighbour))
            .collect()
    }

    /// Every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> {
        let Width(width) = self.width;
        (0..self.size()).map(move |index| Cell::new(index / width, index % width))
    }

    /// Rows of cells, top to bottom.
    pub fn iter_row(&self) -> impl Iterator<Item = Vec<Cell>> {
        let Width(width) = self.width;
        (0..self.height.0).map(move |row| (0..width).map(|col| Cell::new(row, col)).collect())
    }

    /// The `Path` cells in row-major order.
    pub fn iter_paths<'a>(&'a self) -> impl Iterator<Item = Cell> + 'a {
        let Width(width) = self.width;
        self.passages.iter().map(move |index| Cell::new(index / width, index % width))
    }

    /// The connectivity of the path cells as an undirected graph.
    ///
    /// One node per `Path` cell, weighted by the cell, and one edge per pair of `Path` cells that
    /// share a side. Nodes are added in row-major order.
    pub fn passage_graph(&self) -> UnGraph<Cell, ()> {
        let nodes = self.path_count();
        // Each cell owns at most its east and south edge.
        let mut graph = UnGraph::with_capacity(nodes, 2 * nodes);

        let mut node_indices = utils::fnv_hashmap(nodes);
        for cell in self.iter_paths() {
            node_indices.insert(cell, graph.add_node(cell));
        }

        for cell in self.iter_paths() {
            let node = node_indices[&cell];
            for dir in &[CompassPrimary::East, CompassPrimary::South] {
                let linked = self.neighbour_at_direction(cell, *dir)
                    .and_then(|neighbour| node_indices.get(&neighbour));
                if let Some(&other) = linked {
                    graph.add_edge(node, other, ());
                }
            }
        }
        graph
    }
}

fn checked_size(width: Width, height: Height) -> Result<NodesCount> {
    if width.0 == 0 || height.0 == 0 {
        bail!(ErrorKind::InvalidDimensions(width, height));
    }
    width.0
        .checked_mul(height.0)
        .map(NodesCount)
        .ok_or_else(|| ErrorKind::InvalidDimensions(width, height).into())
}

/// Parses the text form written by the grid's `Display` impl: one line per row, `#` for a wall
/// and `.` for a path.
impl FromStr for Grid {
    type Err = Error;

    fn from_str(text: &str) -> Result<Grid> {
        let rows: Vec<&str> = text.trim_end_matches(|c| c == '\n' || c == '\r')
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();

        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            bail!(ErrorKind::GridParse(String::from("no cells in the first row")));
        }

        let mut grid = Grid::new(Width(width), Height(rows.len()))?;
        for (row_index, row) in rows.iter().enumerate() {
            let row_width = row.chars().count();
            if row_width != width {
                bail!(ErrorKind::GridParse(format!("row {} has {} cells, expected {}",
                                                   row_index, row_width, width)));
            }
            for (col_index, glyph) in row.chars().enumerate() {
                match glyph {
                    PATH_CHAR => grid.carve(Cell::new(row_index, col_index)),
                    WALL_CHAR => {}
                    other => {
                        bail!(ErrorKind::GridParse(format!("unexpected character {:?} at row {}, col {}",
                                                           other, row_index, col_index)))
                    }
                }
            }
        }
        Ok(grid)
    }
}
