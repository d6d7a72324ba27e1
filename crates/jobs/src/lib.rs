//! Asynchronous path requests.
//!
//! A [`PathJobManager`] owns a pool of worker threads and a result cache keyed
//! by caller-chosen ids. Callers submit, then poll with `drain`/`take`; nothing
//! here ever blocks on a search except [`PathJobManager::wait_idle`].
//!
//! # Invariants
//! - An id is pending, completed, or absent. It is never two at once.
//! - A completed result is handed out exactly once.
//! - A discarded id never reappears, even if its search was already running.
//! - Each search runs against the grid snapshot captured at submission.

mod config;
mod error;
mod manager;

pub use config::JobConfig;
pub use error::SubmitError;
pub use manager::{JobStatus, PathJobManager};
