//! Persistence: navigation grids as JSON documents.
//!
//! # Invariants
//! - Only structure is stored: name, cell size, nodes with foot positions, and sides.
//! - Edge costs are recomputed on load; stored costs are informational.
//! - A loaded grid satisfies every grid invariant or loading fails.
//! - Locks are runtime state and are never written.

mod error;
mod format;
mod store;

pub use error::PersistError;
pub use format::{GridDocument, NodeRecord, from_json, to_json, to_json_pretty};
pub use store::{load, save};
