use docopt::Docopt;
use log::{debug, info, LevelFilter};
use serde_derive::Deserialize;
use mazes::{
    cells::Cell,
    grid::Grid,
    grid_displays::MazeDisplay,
    maze::{Maze, MazeConfig},
    pathing::Distances,
    units::{Height, Width},
};
use std::{
    io,
    io::prelude::*,
    fs::File,
};

const USAGE: &str = "Mazes

Usage:
    maze_driver -h | --help
    maze_driver [--width=<w>] [--height=<h>] [--seed=<s>] [--solve] [--start-row=<r> --start-col=<c>] [--end-row=<r> --end-col=<c>] [--text-out=<path>] [--save-edges=<path>] [--verbose]

Options:
    -h --help              Show this screen.
    --width=<w>            Number of columns in the maze [default: 21].
    --height=<h>           Number of rows in the maze [default: 21].
    --seed=<s>             Seed for the maze generator. The same seed and size always give the same maze [default: 42].
    --solve                Find and show the shortest path through the maze.
    --start-row=<r>        Row of the path start. Defaults to the top left corner.
    --start-col=<c>        Column of the path start.
    --end-row=<r>          Row of the path end. Defaults to the bottom right corner.
    --end-col=<c>          Column of the path end.
    --text-out=<path>      Output file path for a textual rendering of the maze instead of stdout.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --verbose              Log the generator and solver progress.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: usize,
    flag_seed: u64,
    flag_solve: bool,
    flag_start_row: Option<usize>,
    flag_start_col: Option<usize>,
    flag_end_row: Option<usize>,
    flag_end_col: Option<usize>,
    flag_text_out: String,
    flag_save_edges: String,
    flag_verbose: bool,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    #![allow(deprecated)]
    // Create the Error, ErrorKind, ResultExt, and Result types
    // Result is a typedef of std `Result` with the error type our own `Error`
    // Defines the From conversions that let ? work for our `Error`.
    // ResultExt adds the `chain_err` trait method.
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }
    }
}
use crate::errors::*;

fn main() {
    if let Err(ref e) = run() {
        eprintln!("error: {}", e);
        for cause in e.iter().skip(1) {
            eprintln!("caused by: {}", cause);
        }
        ::std::process::exit(1);
    }
}

fn run() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let level = if args.flag_verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = MazeConfig {
        width: Width(args.flag_width),
        height: Height(args.flag_height),
        seed: args.flag_seed,
    };
    info!("generating maze {:?}", config);
    let maze = Maze::generate(&config)?;

    if !args.flag_save_edges.is_empty() {

        save_maze_graph(maze.grid(), &args.flag_save_edges)?;
    }

    let (rendering, summary) = if args.flag_solve {
        let start = start_point(&args, &maze);
        let end = end_point(&args, &maze);

        match maze.solve_between(start, end)? {
            Some(path) => {
                report_reachable(&maze, start);
                (MazeDisplay::with_path(&maze, &path).to_string(),
                 Some(format!("Path length: {} steps", path.len())))
            }
            None => (MazeDisplay::new(&maze).to_string(), Some(String::from("No solution found!"))),
        }
    } else {
        (MazeDisplay::new(&maze).to_string(), None)
    };

    if args.flag_text_out.is_empty() {
        println!("{}", rendering);
    } else {
        write_text_to_file(&rendering, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if let Some(summary) = summary {
        println!("{}", summary);
    }

    Ok(())
}

fn start_point(maze_args: &MazeArgs, maze: &Maze) -> Cell {
    match (maze_args.flag_start_row, maze_args.flag_start_col) {
        (Some(row), Some(col)) => Cell::new(row, col),
        _ => maze.start(),
    }
}

fn end_point(maze_args: &MazeArgs, maze: &Maze) -> Cell {
    match (maze_args.flag_end_row, maze_args.flag_end_col) {
        (Some(row), Some(col)) => Cell::new(row, col),
        _ => maze.end(),
    }
}

fn report_reachable(maze: &Maze, start: Cell) {
    if let Some(distances) = Distances::new(maze.grid(), start) {
        debug!("{} of {} path cells reachable from {}, furthest {} steps away",
               distances.reachable_count(),
               maze.grid().path_count(),
               start,
               distances.max());
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {

    let graph = maze_grid.passage_graph();

    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = graph.edge_count();
    graph_data.push_str(vertices_count.to_string().as_ref());
    graph_data.push(' ');
    graph_data.push_str(edges_count.to_string().as_ref());
    graph_data.push('\n');

    for edge in graph.raw_edges() {
        let index_a = maze_grid
            .cell_to_index(graph[edge.source()])
            .ok_or("Passage graph node outside the grid")?;
        let index_b = maze_grid
            .cell_to_index(graph[edge.target()])
            .ok_or("Passage graph node outside the grid")?;
        let src_as_1_based_index = index_a + 1;
        let dst_as_1_based_index = index_b + 1;

        graph_data.push_str(src_as_1_based_index.to_string().as_ref());
        graph_data.push(' ');
        graph_data.push_str(dst_as_1_based_index.to_string().as_ref());
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
