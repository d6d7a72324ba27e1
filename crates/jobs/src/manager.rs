use glam::Vec3;
use navgrid_common::Coordinate;
use navgrid_grid::Grid;
use navgrid_paths::{LockPolicy, PathFinder, PathOutcome};
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::JobConfig;
use crate::error::SubmitError;

/// Visible state of a job id in the result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed,
}

/// Unit of work handed to a worker. Owns a snapshot of the grid.
struct Task {
    id: String,
    ticket: u64,
    grid: Arc<Grid>,
    start: Coordinate,
    goal: Coordinate,
    policy: LockPolicy,
}

enum Slot {
    /// Accepted; only the worker holding `ticket` may complete it.
    Pending { ticket: u64 },
    Completed(PathOutcome),
}

#[derive(Default)]
struct Cache {
    slots: HashMap<String, Slot>,
    next_ticket: u64,
    pending: usize,
}

/// Result cache shared between callers and workers.
///
/// Every read and write of the slot table happens under one mutex, so an id is
/// never observed as both pending and completed, never returned twice, and
/// never silently lost.
#[derive(Default)]
struct Shared {
    cache: Mutex<Cache>,
    settled: Condvar,
}

impl Shared {
    /// Store a worker's result if its slot is still the one it was issued for.
    fn complete(&self, id: String, ticket: u64, outcome: PathOutcome) {
        let mut cache = self.cache.lock();
        let current = matches!(
            cache.slots.get(&id),
            Some(Slot::Pending { ticket: t }) if *t == ticket
        );
        if current {
            tracing::debug!(%id, found = outcome.is_found(), "path job completed");
            cache.slots.insert(id, Slot::Completed(outcome));
            cache.pending -= 1;
        } else {
            tracing::debug!(%id, ticket, "dropping result for discarded job");
        }
        if cache.pending == 0 {
            self.settled.notify_all();
        }
    }
}

/// Runs path requests on a pool of worker threads.
///
/// Each request searches an `Arc<Grid>` snapshot captured at submission, so
/// mutating the caller's grid afterwards (copy-on-write through
/// `Arc::make_mut`) never disturbs a search in flight. Results wait in the
/// cache, keyed by the caller's id, until drained or taken.
pub struct PathJobManager {
    shared: Arc<Shared>,
    sender: Option<mpsc::Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl PathJobManager {
    /// Start the worker pool.
    pub fn new(config: JobConfig) -> std::io::Result<Self> {
        let shared = Arc::new(Shared::default());
        let (sender, receiver) = mpsc::channel::<Task>();
        let receiver = Arc::new(Mutex::new(receiver));

        let count = config.workers.max(1);
        let mut workers = Vec::with_capacity(count);
        for index in 0..count {
            let receiver = Arc::clone(&receiver);
            let shared = Arc::clone(&shared);
            let handle = thread::Builder::new()
                .name(format!("{}-{index}", config.thread_name))
                .spawn(move || run_worker(&receiver, &shared))?;
            workers.push(handle);
        }
        tracing::debug!(workers = count, "path job pool started");

        Ok(Self {
            shared,
            sender: Some(sender),
            workers,
        })
    }

    pub fn with_defaults() -> std::io::Result<Self> {
        Self::new(JobConfig::default())
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Queue a lock-avoiding search between two world positions.
    ///
    /// Returns `false` if `id` already has a cache entry or either position
    /// does not quantize onto a node of `grid`. Never waits for the search.
    pub fn submit(&self, grid: &Arc<Grid>, id: &str, from: Vec3, to: Vec3) -> bool {
        self.submit_with(grid, id, from, to, LockPolicy::Avoid)
    }

    /// [`PathJobManager::submit`] with an explicit lock policy.
    pub fn submit_with(
        &self,
        grid: &Arc<Grid>,
        id: &str,
        from: Vec3,
        to: Vec3,
        policy: LockPolicy,
    ) -> bool {
        match self.try_submit(grid, id, from, to, policy) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%id, %err, "path request rejected");
                false
            }
        }
    }

    /// Queue a search, reporting why a request was rejected.
    pub fn try_submit(
        &self,
        grid: &Arc<Grid>,
        id: impl Into<String>,
        from: Vec3,
        to: Vec3,
        policy: LockPolicy,
    ) -> Result<(), SubmitError> {
        let id = id.into();
        let start = grid.quantize(from);
        let goal = grid.quantize(to);
        if !grid.has_node(start) {
            return Err(SubmitError::UnknownStart(start));
        }
        if !grid.has_node(goal) {
            return Err(SubmitError::UnknownGoal(goal));
        }
        let sender = self.sender.as_ref().ok_or(SubmitError::ShutDown)?;

        let mut cache = self.shared.cache.lock();
        if cache.slots.contains_key(&id) {
            return Err(SubmitError::DuplicateId(id));
        }
        let ticket = cache.next_ticket;
        cache.next_ticket += 1;

        let task = Task {
            id: id.clone(),
            ticket,
            grid: Arc::clone(grid),
            start,
            goal,
            policy,
        };
        sender.send(task).map_err(|_| SubmitError::ShutDown)?;
        cache.slots.insert(id.clone(), Slot::Pending { ticket });
        cache.pending += 1;
        tracing::debug!(%id, %start, %goal, revision = grid.revision(), "path job accepted");
        Ok(())
    }

    /// Remove and return every completed result. Pending ids are left alone.
    pub fn drain(&self) -> HashMap<String, PathOutcome> {
        let mut cache = self.shared.cache.lock();
        let done: Vec<String> = cache
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Completed(_)))
            .map(|(id, _)| id.clone())
            .collect();
        let mut results = HashMap::with_capacity(done.len());
        for id in done {
            if let Some(Slot::Completed(outcome)) = cache.slots.remove(&id) {
                results.insert(id, outcome);
            }
        }
        if !results.is_empty() {
            tracing::trace!(count = results.len(), "path results drained");
        }
        results
    }

    /// Remove and return one completed result. `None` while pending or unknown.
    pub fn take(&self, id: &str) -> Option<PathOutcome> {
        let mut cache = self.shared.cache.lock();
        if !matches!(cache.slots.get(id), Some(Slot::Completed(_))) {
            return None;
        }
        match cache.slots.remove(id) {
            Some(Slot::Completed(outcome)) => Some(outcome),
            _ => None,
        }
    }

    /// Forget `id`. A search already running for it still finishes, but its
    /// result is dropped instead of stored.
    pub fn discard(&self, id: &str) -> bool {
        let mut cache = self.shared.cache.lock();
        let Some(slot) = cache.slots.remove(id) else {
            return false;
        };
        if matches!(slot, Slot::Pending { .. }) {
            cache.pending -= 1;
            if cache.pending == 0 {
                self.shared.settled.notify_all();
            }
        }
        tracing::debug!(%id, "path job discarded");
        true
    }

    pub fn status(&self, id: &str) -> Option<JobStatus> {
        self.shared.cache.lock().slots.get(id).map(|slot| match slot {
            Slot::Pending { .. } => JobStatus::Pending,
            Slot::Completed(_) => JobStatus::Completed,
        })
    }

    pub fn pending_count(&self) -> usize {
        self.shared.cache.lock().pending
    }

    /// Stop accepting requests and join the workers.
    ///
    /// Jobs already queued still run and their results stay drainable.
    /// Later submissions fail with [`SubmitError::ShutDown`]. Calling this
    /// more than once is harmless.
    pub fn shutdown(&mut self) {
        // Closing the channel lets every worker fall out of its loop once the
        // queue is empty.
        if self.sender.take().is_none() {
            return;
        }
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::error!("path worker panicked");
            }
        }
        tracing::debug!("path job pool stopped");
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender.is_none()
    }

    /// Block until no job is pending or `timeout` elapses. Returns whether idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut cache = self.shared.cache.lock();
        while cache.pending > 0 {
            if self
                .shared
                .settled
                .wait_until(&mut cache, deadline)
                .timed_out()
            {
                return cache.pending == 0;
            }
        }
        true
    }
}

impl Drop for PathJobManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(receiver: &Mutex<mpsc::Receiver<Task>>, shared: &Shared) {
    loop {
        let next = receiver.lock().recv();
        let Ok(task) = next else {
            break;
        };
        let _span = tracing::info_span!("path_job", id = %task.id).entered();
        let outcome = match PathFinder::new(&task.grid, task.start, task.goal) {
            Some(finder) => finder.with_lock_policy(task.policy).find(),
            None => PathOutcome::NoPath,
        };
        shared.complete(task.id, task.ticket, outcome);
    }
}
