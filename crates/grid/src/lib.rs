//! Navigation grid: quantized nodes joined by symmetric, distance-weighted edges.
//!
//! # Invariants
//! - A coordinate is the sole identity of a node within a grid.
//! - Adjacency is symmetric: `a -> b` with cost `c` implies `b -> a` with cost `c`.
//! - A node is in `unused` iff its adjacency is empty.
//! - Every key of the adjacency, unused and locked indexes is a live node;
//!   removing a node cascades to all three.

mod grid;
mod node;
mod query;
mod sides;

pub use grid::Grid;
pub use node::Node;
pub use query::HIDE_DEPTH;
pub use sides::Sides;
