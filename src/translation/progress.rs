/*!
 * Progress tracking for translation jobs.
 *
 * The dispatcher pushes `(total, completed)` pairs through a caller supplied
 * callback. `ProgressReporter` keeps those pairs monotonic when a fallback
 * backend restarts from the first unit, and `ProgressRegistry` is the
 * outer-layer job id to progress map polled by front ends.
 */

use chrono::{DateTime, Duration, Utc};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// A single progress observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressUpdate {
    /// Number of units in the job
    pub total: usize,
    /// Number of units translated so far
    pub completed: usize,
}

impl ProgressUpdate {
    /// Completion percentage, 100 for an empty job
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }

    /// Whether every unit is done
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Wraps a progress callback and never reports a smaller value twice
pub struct ProgressReporter<F>
where
    F: Fn(usize, usize),
{
    callback: F,
    total: usize,
    high_water: usize,
}

impl<F> ProgressReporter<F>
where
    F: Fn(usize, usize),
{
    // @returns: Reporter for a job of `total` units, nothing reported yet
    pub fn new(total: usize, callback: F) -> Self {
        Self {
            callback,
            total,
            high_water: 0,
        }
    }

    /// Report the initial `(total, 0)` observation
    pub fn start(&mut self) {
        (self.callback)(self.total, 0);
    }

    /// Report `completed`, clamped to `[high_water, total]`
    pub fn report(&mut self, completed: usize) {
        let completed = completed.min(self.total).max(self.high_water);
        self.high_water = completed;
        (self.callback)(self.total, completed);
    }

    /// Report `(total, total)`
    pub fn finish(&mut self) {
        self.report(self.total);
    }

    /// Highest value reported so far
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

/// State of a job in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Finished,
    Failed,
}

/// Progress entry of one registered job
#[derive(Debug, Clone)]
pub struct JobProgress {
    // @field: Latest observation
    pub progress: ProgressUpdate,
    // @field: Job state
    pub status: JobStatus,
    // @field: Registration time
    pub created_at: DateTime<Utc>,
    // @field: Last update time
    pub updated_at: DateTime<Utc>,
}

/// Shared job id to progress map
#[derive(Debug, Default)]
pub struct ProgressRegistry {
    jobs: RwLock<HashMap<Uuid, JobProgress>>,
}

impl ProgressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new running job and return its id
    pub fn register(&self) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        self.jobs.write().insert(id, JobProgress {
            progress: ProgressUpdate::default(),
            status: JobStatus::Running,
            created_at: now,
            updated_at: now,
        });
        debug!("Registered job {}", id);
        id
    }

    /// Record an observation for a job; unknown ids are ignored
    pub fn update(&self, id: Uuid, total: usize, completed: usize) {
        if let Some(job) = self.jobs.write().get_mut(&id) {
            job.progress = ProgressUpdate { total, completed };
            job.updated_at = Utc::now();
        }
    }

    /// Snapshot of a job
    pub fn get(&self, id: Uuid) -> Option<JobProgress> {
        self.jobs.read().get(&id).cloned()
    }

    /// Mark a job finished or failed
    pub fn finish(&self, id: Uuid, success: bool) {
        if let Some(job) = self.jobs.write().get_mut(&id) {
            job.status = if success { JobStatus::Finished } else { JobStatus::Failed };
            if success {
                job.progress.completed = job.progress.total;
            }
            job.updated_at = Utc::now();
        }
    }

    /// Drop jobs that are no longer running and were last touched before `ttl` ago
    ///
    /// Returns the number of removed jobs.
    pub fn sweep_expired(&self, ttl: Duration) -> usize {
        let cutoff = Utc::now() - ttl;
        let mut jobs = self.jobs.write();
        let before = jobs.len();
        jobs.retain(|_, job| job.status == JobStatus::Running || job.updated_at > cutoff);
        before - jobs.len()
    }

    /// Every tracked job, oldest first
    pub fn snapshot(&self) -> Vec<(Uuid, JobProgress)> {
        let mut jobs: Vec<_> = self.jobs.read().iter().map(|(id, job)| (*id, job.clone())).collect();
        jobs.sort_by_key(|(_, job)| job.created_at);
        jobs
    }

    /// Number of tracked jobs
    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}
