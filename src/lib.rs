//! **mazes** generates perfect mazes on a grid of wall and path cells and finds the shortest
//! route through them.
//!
//! Generation is a seeded recursive backtracker, so a width, height and seed always give the same
//! maze. Routes are found with A* under a Manhattan distance heuristic.

#[macro_use]
extern crate error_chain;

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod maze;
pub mod pathing;
pub mod units;
mod utils;
