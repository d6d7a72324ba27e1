//! Pathfinding: A* over a navigation grid.
//!
//! # Invariants
//! - The heuristic never overestimates, so returned costs are optimal.
//! - "No path" is an explicit outcome, never an empty success.
//! - Locked nodes are only ever skipped as intermediates; the goal is always eligible.

mod finder;
mod path;
mod queue;

pub use finder::{LockPolicy, PathFinder, find_path};
pub use path::{Path, PathOutcome, simplify};
pub use queue::PriorityQueue;
