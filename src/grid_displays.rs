use itertools::Itertools;
use std::fmt;

use crate::cells::{Cell, CellState};
use crate::grid::{Grid, PATH_CHAR, WALL_CHAR};
use crate::maze::Maze;
use crate::utils::{self, FnvHashSet};

/// One line per row, no trailing newline. `Grid::from_str` reads this back.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = self.iter_row()
            .map(|row| {
                row.into_iter()
                    .map(|cell| if self.is_path(cell) { PATH_CHAR } else { WALL_CHAR })
                    .collect::<String>()
            })
            .join("\n");
        f.write_str(&text)
    }
}

/// How a cell is drawn when a maze and maybe a route through it are shown.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellMarker {
    Wall,
    Path,
    Solution,
    Start,
    End,
}

impl CellMarker {
    /// The end marker wins over the start marker when they share a cell, and both win over the
    /// route and the underlying cell state.
    pub fn classify(maze: &Maze, cell: Cell, path: Option<&[Cell]>) -> CellMarker {
        let on_path = path.map_or(false, |p| p.contains(&cell));
        CellMarker::classify_with(maze, cell, |_| on_path)
    }

    fn classify_with<F>(maze: &Maze, cell: Cell, on_path: F) -> CellMarker
        where F: Fn(Cell) -> bool
    {
        if cell == maze.end() {
            CellMarker::End
        } else if cell == maze.start() {
            CellMarker::Start
        } else if on_path(cell) {
            CellMarker::Solution
        } else {
            match maze.grid().state_at(cell) {
                Some(CellState::Path) => CellMarker::Path,
                _ => CellMarker::Wall,
            }
        }
    }

    pub fn glyph(self) -> char {
        match self {
            CellMarker::Wall => WALL_CHAR,
            CellMarker::Path => ' ',
            CellMarker::Solution => 'o',
            CellMarker::Start => 'S',
            CellMarker::End => 'E',
        }
    }
}

/// Renders a maze, and optionally a route through it, one glyph per cell with a space between
/// neighbouring glyphs.
#[derive(Debug)]
pub struct MazeDisplay<'a> {
    maze: &'a Maze,
    on_path_cells: FnvHashSet<Cell>,
}

impl<'a> MazeDisplay<'a> {
    pub fn new(maze: &'a Maze) -> MazeDisplay<'a> {
        MazeDisplay { maze, on_path_cells: utils::fnv_hashset(0) }
    }

    pub fn with_path(maze: &'a Maze, path: &[Cell]) -> MazeDisplay<'a> {
        let mut on_path_cells = utils::fnv_hashset(path.len());
        on_path_cells.extend(path.iter().cloned());
        MazeDisplay { maze, on_path_cells }
    }

    pub fn marker(&self, cell: Cell) -> CellMarker {
        CellMarker::classify_with(self.maze, cell, |c| self.on_path_cells.contains(&c))
    }
}

impl<'a> fmt::Display for MazeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = self.maze
            .grid()
            .iter_row()
            .map(|row| row.into_iter().map(|cell| self.marker(cell).glyph()).join(" "))
            .join("\n");
        f.write_str(&text)
    }
}
