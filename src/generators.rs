use bit_set::BitSet;
use log::{debug, trace};
use rand::{Rng, SeedableRng, XorShiftRng};

use crate::cells::{Cell, CompassPrimary};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// The seed used when the caller does not pick one. Every maze of a given size is the same under it.
pub const DEFAULT_SEED: u64 = 42;

/// Carving moves between cells two apart so the cell in between can be left standing as a wall
/// or knocked through as a passage.
const LATTICE_STEP: usize = 2;

/// Direction order before shuffling. The shuffle is a permutation of this array, so changing it
/// changes every seeded maze.
const CARVE_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::South,
                                               CompassPrimary::East,
                                               CompassPrimary::North,
                                               CompassPrimary::West];

/// A random number generator fully determined by `seed`.
///
/// The 64 bit seed is spread over the four XorShift state words, xor'd with fixed constants so that
/// no seed (zero included) produces the all zero state XorShift cannot start from.
pub fn seeded_rng(seed: u64) -> XorShiftRng {
    let low = seed as u32;
    let high = (seed >> 32) as u32;
    XorShiftRng::from_seed([low ^ 0x193a_6754, high ^ 0xa8a7_d469, low ^ 0x9783_0e05, high ^ 0x113b_a7bb])
}

/// Generate a perfect maze of the given size.
///
/// The maze is carved by `recursive_backtracker` from the top left cell with an rng seeded from
/// `seed`, then the top left and bottom right cells are forced open. The same arguments always
/// give the same grid.
///
/// Odd dimensions suit the carving lattice best. With an even width the last column is never
/// carved (likewise the last row for an even height) so the bottom right cell may end up opened
/// but cut off from the rest of the maze.
pub fn generate(width: Width, height: Height, seed: u64) -> Result<Grid> {
    let mut grid = Grid::new(width, height)?;
    let mut rng = seeded_rng(seed);

    recursive_backtracker(&mut grid, &mut rng);

    let start = grid.top_left();
    let end = grid.bottom_right();
    grid.carve(start);
    grid.carve(end);

    debug!("generated {}x{} maze with seed {}: {} path cells",
           width.0, height.0, seed, grid.path_count());
    Ok(grid)
}

/// One level of the depth first carving: a cell and the directions still to try from it.
struct Frame {
    cell: Cell,
    directions: [CompassPrimary; 4],
    next: usize,
}

impl Frame {
    /// Shuffling on entry consumes the rng in the same order a recursive implementation would.
    fn enter<R: Rng>(cell: Cell, rng: &mut R) -> Frame {
        let mut directions = CARVE_DIRECTIONS;
        rng.shuffle(&mut directions);
        Frame { cell, directions, next: 0 }
    }

    fn next_direction(&mut self) -> Option<CompassPrimary> {
        let direction = self.directions.get(self.next).cloned();
        self.next += 1;
        direction
    }
}

/// Apply the recursive backtracker maze generation algorithm to an all wall grid.
///
/// Starting from the top left cell it walks a depth first path over the cells two steps apart,
/// trying the four directions in a random order at every cell. Moving to an unvisited cell
/// carves both that cell and the one between, and the walk continues from the new cell before
/// trying the remaining directions. Cells with nothing left to try are backtracked out of.
///
/// Every lattice cell (even row, even column) is visited exactly once, and each visit carves the
/// single passage that joins it to the cell it was reached from, so the carved cells form a
/// spanning tree. The walk uses an explicit stack, so large grids do not exhaust the call stack.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid, rng: &mut R) {
    let start = grid.top_left();
    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(0);
    grid.carve(start);

    let mut stack = vec![Frame::enter(start, rng)];
    let mut deepest = 1;

    loop {
        let step = match stack.last_mut() {
            Some(frame) => frame.next_direction().map(|dir| (frame.cell, dir)),
            None => break,
        };

        let (current, direction) = match step {
            Some(step) => step,
            None => {
                // Exhausted every direction from this cell.
                stack.pop();
                continue;
            }
        };

        let candidate = current.offset(direction, LATTICE_STEP)
            .and_then(|cell| grid.cell_to_index(cell).map(|index| (cell, index)));

        if let Some((candidate, candidate_index)) = candidate {
            if visited.insert(candidate_index) {
                if let Some(between) = current.offset(direction, 1) {
                    grid.carve(between);
                }
                grid.carve(candidate);
                trace!("carved {} -> {}", current, candidate);

                stack.push(Frame::enter(candidate, rng));
                deepest = deepest.max(stack.len());
            }
        }
    }

    debug!("recursive backtracker visited {} lattice cells, max stack depth {}",
           visited.len(), deepest);
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::CellState;
    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::{quickcheck, TestResult};

    /// Small grid dimensions from arbitrary bytes, 1 to 15 cells a side.
    fn small_dimensions(w: u8, h: u8) -> (Width, Height) {
        (Width(1 + (w as usize % 15)), Height(1 + (h as usize % 15)))
    }

    #[test]
    fn golden_five_by_five() {
        let grid = generate(Width(5), Height(5), 42).unwrap();
        let expected: Grid = "...#.\n\
                              ##.#.\n\
                              ...#.\n\
                              .###.\n\
                              ....."
            .parse()
            .unwrap();
        assert_eq!(grid, expected);
    }

    #[test]
    fn default_seed() {
        assert_eq!(generate(Width(5), Height(5), DEFAULT_SEED).unwrap(),
                   generate(Width(5), Height(5), 42).unwrap());
    }

    #[test]
    fn seeds_change_the_layout() {
        let a = generate(Width(21), Height(21), 42).unwrap();
        let differing = (0..20u64)
            .map(|seed| generate(Width(21), Height(21), seed).unwrap())
            .filter(|g| *g != a)
            .count();
        assert!(differing > 0);
    }

    #[test]
    fn zero_dimensions_rejected() {
        for &(w, h) in &[(0, 5), (5, 0), (0, 0)] {
            let err = generate(Width(w), Height(h), DEFAULT_SEED).unwrap_err();
            match *err.kind() {
                ErrorKind::InvalidDimensions(..) => {}
                ref other => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[test]
    fn single_cell_maze() {
        let grid = generate(Width(1), Height(1), DEFAULT_SEED).unwrap();
        assert_eq!(grid.cell_state(0, 0), Some(CellState::Path));
        assert_eq!(grid.path_count(), 1);
    }

    #[test]
    fn even_dimensions_leave_the_last_row_and_column_walled() {
        for seed in 0..10 {
            let grid = generate(Width(4), Height(6), seed).unwrap();
            let end = grid.bottom_right();
            for cell in grid.iter().filter(|c| c.row == 5 || c.col == 3) {
                let expected = if cell == end { CellState::Path } else { CellState::Wall };
                assert_eq!(grid.state_at(cell), Some(expected), "seed {} cell {}", seed, cell);
            }
        }
    }

    #[test]
    fn seeded_rng_accepts_zero_seed() {
        let mut rng = seeded_rng(0);
        let _: u32 = rng.gen();
        let mut rng = seeded_rng(u64::max_value());
        let _: u32 = rng.gen();
    }

    #[test]
    fn backtracker_on_caller_rng() {
        let mut grid = Grid::new(Width(7), Height(7)).unwrap();
        let mut rng = seeded_rng(3);
        recursive_backtracker(&mut grid, &mut rng);
        // 16 lattice cells joined by 15 passages.
        assert_eq!(grid.path_count(), 16 + 15);
    }

    #[test]
    fn generation_is_deterministic() {
        fn prop(w: u8, h: u8, seed: u64) -> bool {
            let (width, height) = small_dimensions(w, h);
            generate(width, height, seed).unwrap() == generate(width, height, seed).unwrap()
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn start_and_end_always_open() {
        fn prop(w: u8, h: u8, seed: u64) -> bool {
            let (width, height) = small_dimensions(w, h);
            let grid = generate(width, height, seed).unwrap();
            grid.is_path(grid.top_left()) && grid.is_path(grid.bottom_right())
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn every_lattice_cell_is_carved() {
        fn prop(w: u8, h: u8, seed: u64) -> bool {
            let (width, height) = small_dimensions(w, h);
            let grid = generate(width, height, seed).unwrap();
            let end = grid.bottom_right();
            grid.iter().all(|cell| {
                match (cell.row % 2, cell.col % 2) {
                    (0, 0) => grid.is_path(cell),
                    // Never between two lattice cells, only the forced end can be open here.
                    (1, 1) => !grid.is_path(cell) || cell == end,
                    _ => true,
                }
            })
        }
        quickcheck(prop as fn(u8, u8, u64) -> bool);
    }

    #[test]
    fn carved_passages_form_a_tree() {
        fn prop(w: u8, h: u8, seed: u64) -> TestResult {
            let (width, height) = small_dimensions(w, h);
            let grid = generate(width, height, seed).unwrap();
            let graph = grid.passage_graph();

            // The carved cells are one tree. A forced end cell can only be a separate island
            // when it was not reached by carving.
            let end_is_island = grid.passable_neighbours(grid.bottom_right()).is_empty() &&
                                grid.bottom_right() != grid.top_left();
            let expected_components = if end_is_island { 2 } else { 1 };

            TestResult::from_bool(!is_cyclic_undirected(&graph) &&
                                  connected_components(&graph) == expected_components)
        }
        quickcheck(prop as fn(u8, u8, u64) -> TestResult);
    }
}
