//! Grid registry and navigation facade.
//!
//! [`GridRegistry`] is an explicit owner of named grids, constructed by the
//! host and passed to whatever needs it. [`Navigator`] pairs a registry with a
//! [`navgrid_jobs::PathJobManager`] and exposes every grid operation by name,
//! taking world-space positions that are quantized against the named grid.
//!
//! # Invariants
//! - Grid names are unique within a registry.
//! - Grids are shared as `Arc` snapshots; mutation is copy-on-write, so a
//!   snapshot handed out earlier (to a caller or a queued search) never changes.
//! - Every facade call reports failure through `bool`/`Option` and never panics.

mod navigator;
mod registry;

pub use navigator::{GridInfo, Navigator};
pub use registry::GridRegistry;
