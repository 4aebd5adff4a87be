// `error_chain!` creates the Error, ErrorKind, ResultExt and Result types.
// Result is a typedef of std `Result` with the error type our own `Error`.
#![allow(deprecated)]

use crate::cells::Cell;
use crate::units::{Height, Width};

error_chain! {

    errors {
        InvalidDimensions(width: Width, height: Height) {
            description("maze dimensions must be positive")
            display("invalid maze dimensions {}x{}: width and height must both be positive",
                    width.0, height.0)
        }

        OutOfBounds(cell: Cell, width: Width, height: Height) {
            description("cell lies outside the grid")
            display("cell (row {}, col {}) lies outside the {}x{} grid",
                    cell.row, cell.col, width.0, height.0)
        }

        GridParse(reason: String) {
            description("malformed text grid")
            display("malformed text grid: {}", reason)
        }
    }
}
