use std::num::NonZeroUsize;

/// Worker pool configuration for [`crate::PathJobManager`].
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Number of search threads. Zero is treated as one.
    pub workers: usize,
    /// Prefix for worker thread names; the worker index is appended.
    pub thread_name: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(2),
            thread_name: "navgrid-path".into(),
        }
    }
}

impl JobConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Self::default()
        }
    }
}
