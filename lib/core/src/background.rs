// Background job system modelled on Redis BIO: a FIFO queue per job type,
// drained by a dedicated worker thread.

use crate::collection::VectorCollection;
use crate::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundJobType {
    IndexRebuild = 0,
}

pub trait BackgroundJob: Send + 'static {
    fn execute(self: Box<Self>);
    fn job_type(&self) -> BackgroundJobType;
}

struct Queue {
    jobs: Mutex<VecDeque<Box<dyn BackgroundJob>>>,
    condvar: Condvar,
    running: AtomicBool,
    submitted: AtomicU64,
    completed: AtomicU64,
}

impl Queue {
    fn run(&self) {
        loop {
            let job = {
                let mut jobs = self.jobs.lock();
                while jobs.is_empty() && self.running.load(Ordering::Acquire) {
                    self.condvar.wait(&mut jobs);
                }
                match jobs.pop_front() {
                    Some(job) => job,
                    // Shut down with an empty queue
                    None => break,
                }
            };
            job.execute();
            self.completed.fetch_add(1, Ordering::AcqRel);
        }
    }
}

/// Owns the worker thread that runs index rebuilds off the search path.
pub struct BackgroundJobSystem {
    queue: Arc<Queue>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl BackgroundJobSystem {
    pub fn start() -> Result<Self> {
        let queue = Arc::new(Queue {
            jobs: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            running: AtomicBool::new(true),
            submitted: AtomicU64::new(0),
            completed: AtomicU64::new(0),
        });

        let worker = queue.clone();
        let handle = thread::Builder::new()
            .name(format!("bg-worker-{:?}", BackgroundJobType::IndexRebuild))
            .spawn(move || worker.run())
            .map_err(Error::Io)?;

        Ok(Self {
            queue,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Queue a job. Returns false once the system is shut down.
    pub fn submit(&self, job: Box<dyn BackgroundJob>) -> bool {
        if !self.queue.running.load(Ordering::Acquire) {
            tracing::warn!(job_type = ?job.job_type(), "background system stopped, job dropped");
            return false;
        }
        self.queue.submitted.fetch_add(1, Ordering::AcqRel);
        self.queue.jobs.lock().push_back(job);
        self.queue.condvar.notify_one();
        true
    }

    pub fn pending_jobs(&self) -> usize {
        self.queue.jobs.lock().len()
    }

    pub fn jobs_completed(&self) -> u64 {
        self.queue.completed.load(Ordering::Acquire)
    }

    /// Block until every submitted job has run, or the timeout expires.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let submitted = self.queue.submitted.load(Ordering::Acquire);
            if self.queue.completed.load(Ordering::Acquire) >= submitted {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(2));
        }
    }

    /// Stop accepting work, drain the queue and join the worker.
    pub fn shutdown(&self) {
        self.queue.running.store(false, Ordering::Release);
        self.queue.condvar.notify_all();
        if let Some(handle) = self.handle.lock().take() {
            if handle.join().is_err() {
                tracing::error!("background worker panicked");
            }
        }
    }
}

impl Drop for BackgroundJobSystem {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Rebuilds one collection's index and releases its scheduling claim.
pub struct IndexRebuildJob {
    collection: Arc<VectorCollection>,
}

impl IndexRebuildJob {
    pub fn new(collection: Arc<VectorCollection>) -> Self {
        Self { collection }
    }
}

impl BackgroundJob for IndexRebuildJob {
    fn execute(self: Box<Self>) {
        let stats = self.collection.rebuild();
        self.collection.release_rebuild_claim();
        tracing::debug!(
            entity_type = %stats.entity_type,
            generation = stats.generation,
            "background rebuild finished"
        );
    }

    fn job_type(&self) -> BackgroundJobType {
        BackgroundJobType::IndexRebuild
    }
}
