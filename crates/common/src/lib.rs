//! Shared types for the navgrid workspace: quantized coordinates and cell-size rules.

mod types;

pub use types::{Coordinate, DEFAULT_CELL_SIZE, ParseCoordinateError, is_valid_cell_size};
