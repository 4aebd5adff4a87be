use log::debug;
use serde_derive::{Deserialize, Serialize};

use crate::cells::Cell;
use crate::errors::*;
use crate::generators::{self, DEFAULT_SEED};
use crate::grid::Grid;
use crate::pathing;
use crate::units::{Height, Width};

/// Everything needed to reproduce a maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct MazeConfig {
    pub width: Width,
    pub height: Height,
    pub seed: u64,
}

impl Default for MazeConfig {
    fn default() -> MazeConfig {
        MazeConfig {
            width: Width(21),
            height: Height(21),
            seed: DEFAULT_SEED,
        }
    }
}

/// A grid together with the corners a solver walks between.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
    start: Cell,
    end: Cell,
}

impl Maze {
    pub fn generate(config: &MazeConfig) -> Result<Maze> {
        let grid = generators::generate(config.width, config.height, config.seed)?;
        Ok(Maze::from_grid(grid))
    }

    /// Wrap an existing grid, starting at the top left and ending at the bottom right.
    pub fn from_grid(grid: Grid) -> Maze {
        let start = grid.top_left();
        let end = grid.bottom_right();
        Maze { grid, start, end }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Cell {
        self.end
    }

    /// Shortest route from `start()` to `end()`.
    pub fn solve(&self) -> Result<Option<Vec<Cell>>> {
        self.solve_between(self.start, self.end)
    }

    pub fn solve_between(&self, start: Cell, end: Cell) -> Result<Option<Vec<Cell>>> {
        let path = pathing::shortest_path(&self.grid, start, end)?;
        match path {
            Some(ref cells) => debug!("solved {} -> {} in {} cells", start, end, cells.len()),
            None => debug!("no route from {} to {}", start, end),
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn default_config() {
        let config = MazeConfig::default();
        assert_eq!(config.width, Width(21));
        assert_eq!(config.height, Height(21));
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn corners() {
        let maze = Maze::generate(&MazeConfig { width: Width(7), height: Height(5), seed: 1 })
            .unwrap();
        assert_eq!(maze.start(), Cell::new(0, 0));
        assert_eq!(maze.end(), Cell::new(4, 6));
        assert_eq!(maze.grid().width(), Width(7));
        assert_eq!(maze.grid().height(), Height(5));
    }

    #[test]
    fn generation_failure_propagates() {
        let config = MazeConfig { width: Width(0), ..MazeConfig::default() };
        assert!(Maze::generate(&config).is_err());
    }

    #[test]
    fn default_maze_solves() {
        let maze = Maze::generate(&MazeConfig::default()).unwrap();
        let path = maze.solve().unwrap().unwrap();
        assert!(pathing::is_valid_path(maze.grid(), &path, maze.start(), maze.end()));
    }

    #[test]
    fn golden_maze_solution() {
        let maze = Maze::generate(&MazeConfig { width: Width(5), height: Height(5), seed: 42 })
            .unwrap();
        let path = maze.solve().unwrap().unwrap();
        let expected: Vec<Cell> = vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0),
                                       (3, 0), (4, 0), (4, 1), (4, 2), (4, 3), (4, 4)]
            .into_iter()
            .map(Cell::from)
            .collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn solve_between_inner_cells() {
        let grid: Grid = "...\n.#.\n...".parse().unwrap();
        let maze = Maze::from_grid(grid);
        let path = maze.solve_between(Cell::new(0, 1), Cell::new(2, 1)).unwrap().unwrap();
        assert_eq!(path.len(), 5);
        assert!(maze.solve_between(Cell::new(0, 0), Cell::new(1, 1)).unwrap().is_none());
        assert!(maze.solve_between(Cell::new(0, 0), Cell::new(3, 0)).is_err());
    }

    #[test]
    fn config_is_copyable_into_generation() {
        let config = MazeConfig { seed: 7, ..MazeConfig::default() };
        assert_eq!(Maze::generate(&config).unwrap(), Maze::generate(&config).unwrap());
    }
}
