// Route finding over a binary grid.
//
// Two searches live here. `shortest_path` is an A* search guided by the Manhattan distance to the
// goal, which is what the maze solver uses. `Distances` is a plain breadth first flood fill from a
// single cell: it answers "how far is every reachable cell" in one pass, which makes it the
// independent check that A* really returned a shortest route.
//
// Every move is one step North, South, East or West onto a `Path` cell and costs 1. On such a grid
// the Manhattan distance never overestimates the remaining cost and never drops by more than
// the cost of a step (admissible and consistent), so the first time A* pops the goal off the
// frontier its route is a shortest one.

use itertools::Itertools;
use log::{debug, trace};
use smallvec::SmallVec;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::cells::Cell;
use crate::errors::*;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};

/// A* heuristic: steps between `a` and `b` ignoring walls.
#[inline]
pub fn manhattan_distance(a: Cell, b: Cell) -> usize {
    a.manhattan_distance(b)
}

/// Find a minimum step route from `start` to `end` through `Path` cells.
///
/// Returns the route with both endpoints included, or `Ok(None)` when `end` cannot be reached from
/// `start` (a wall endpoint included). It is an error for either endpoint to lie outside the grid.
/// When several routes share the shortest length which one comes back depends on the frontier's
/// tie breaking and is not otherwise specified.
///
/// The grid is only read.
pub fn shortest_path(grid: &Grid, start: Cell, end: Cell) -> Result<Option<Vec<Cell>>> {
    for &endpoint in &[start, end] {
        if !grid.is_valid_cell(endpoint) {
            bail!(ErrorKind::OutOfBounds(endpoint, grid.width(), grid.height()));
        }
    }

    if !grid.is_path(start) || !grid.is_path(end) {
        debug!("no path from {} to {}: an endpoint is a wall", start, end);
        return Ok(None);
    }

    let capacity = grid.path_count();
    let mut g_scores: FnvHashMap<Cell, usize> = utils::fnv_hashmap(capacity);
    let mut came_from: FnvHashMap<Cell, Cell> = utils::fnv_hashmap(capacity);

    // Min-heap on (f-score, g-score, cell). A cell can be queued more than once as better routes
    // to it turn up; the older entries are skipped when popped.
    let mut frontier = BinaryHeap::new();
    g_scores.insert(start, 0);
    frontier.push(Reverse((manhattan_distance(start, end), 0, start)));

    let mut expanded = 0usize;

    while let Some(Reverse((_, g_score, current))) = frontier.pop() {

        let is_stale = g_scores.get(&current).map_or(false, |&best| g_score > best);
        if is_stale {
            continue;
        }

        if current == end {
            let path = reconstruct_path(&came_from, start, end);
            debug!("path from {} to {} found: {} cells, {} nodes expanded",
                   start, end, path.len(), expanded);
            return Ok(Some(path));
        }

        expanded += 1;
        let tentative_g_score = g_score + 1;

        for &neighbour in grid.passable_neighbours(current).iter() {
            let improves = g_scores.get(&neighbour).map_or(true, |&best| tentative_g_score < best);
            if improves {
                came_from.insert(neighbour, current);
                g_scores.insert(neighbour, tentative_g_score);
                let f_score = tentative_g_score + manhattan_distance(neighbour, end);
                trace!("queue {} g={} f={}", neighbour, tentative_g_score, f_score);
                frontier.push(Reverse((f_score, tentative_g_score, neighbour)));
            }
        }
    }

    debug!("no path from {} to {}: frontier exhausted after {} nodes", start, end, expanded);
    Ok(None)
}

/// Walk the back pointers from `end` to `start` and return the route in start to end order.
fn reconstruct_path(came_from: &FnvHashMap<Cell, Cell>, start: Cell, end: Cell) -> Vec<Cell> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                current = previous;
                path.push(current);
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Does `path` walk from `start` to `end` over `Path` cells, one orthogonal step at a time?
pub fn is_valid_path(grid: &Grid, path: &[Cell], start: Cell, end: Cell) -> bool {
    path.first() == Some(&start) &&
    path.last() == Some(&end) &&
    path.iter().all(|cell| grid.is_path(*cell)) &&
    path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(*b))
}

/// Breadth first distances from one start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cell,
    distances: FnvHashMap<Cell, usize>,
    max_distance: usize,
}

impl Distances {
    /// Flood fill outwards from `start_coordinate`.
    ///
    /// None if the start is outside the grid or is a wall.
    pub fn new(grid: &Grid, start_coordinate: Cell) -> Option<Distances> {

        if !grid.is_path(start_coordinate) {
            return None;
        }

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.path_count());
        distances.insert(start_coordinate, 0);

        // Every step costs the same, so the first time a cell is reached is along a shortest
        // route and its distance never needs revisiting. The distances map doubles as the
        // visited set.
        let mut frontier = vec![start_coordinate];
        let mut distance = 0;
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell in &frontier {
                for &neighbour in grid.passable_neighbours(*cell).iter() {
                    if !distances.contains_key(&neighbour) {
                        distances.insert(neighbour, distance + 1);
                        new_frontier.push(neighbour);
                    }
                }
            }

            if !new_frontier.is_empty() {
                distance += 1;
                max = distance;
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline]
    pub fn start(&self) -> Cell {
        self.start_coordinate
    }

    /// Distance to the furthest reachable cell.
    #[inline]
    pub fn max(&self) -> usize {
        self.max_distance
    }

    /// Number of cells reachable from the start, the start included.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// None for cells that are unreachable or outside the grid.
    #[inline]
    pub fn distance_from_start_to(&self, coord: Cell) -> Option<usize> {
        self.distances.get(&coord).cloned()
    }

    /// All the cells at the maximum distance from the start, in row-major order.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cell; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .sorted()
            .collect()
    }
}
