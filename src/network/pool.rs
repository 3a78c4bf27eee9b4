//! Worker Pool
//!
//! Fixed set of threads draining a bounded queue of connection jobs.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender, TrySendError};

use crate::error::{KvError, Result};

/// A unit of work: in practice one connection's whole request loop
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size pool of workers
///
/// ## Back-pressure
/// The queue holds at most `queue_capacity` jobs. `try_submit` never
/// blocks: when the queue is full it returns `KvError::PoolSaturated` and
/// the caller decides what to do with the rejected job.
///
/// ## Fault isolation
/// Each job runs under `catch_unwind`. A panicking job is logged and the
/// worker goes back to polling; other workers and connections are unaffected.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    busy: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Spawn `size` workers sharing a queue of `queue_capacity` slots
    pub fn new(size: usize, queue_capacity: usize) -> Result<Self> {
        if size == 0 {
            return Err(KvError::Config("worker pool needs at least one worker".to_string()));
        }
        if queue_capacity == 0 {
            return Err(KvError::Config("worker queue needs at least one slot".to_string()));
        }

        let (sender, receiver) = channel::bounded::<Job>(queue_capacity);
        let busy = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let busy = Arc::clone(&busy);
            let handle = thread::Builder::new()
                .name(format!("lrukv-worker-{}", id))
                .spawn(move || worker_loop(id, receiver, busy))?;
            workers.push(handle);
        }

        tracing::debug!(size, queue_capacity, "Worker pool started");

        Ok(Self {
            sender: Some(sender),
            workers,
            busy,
        })
    }

    /// Queue a job without blocking
    pub fn try_submit<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(KvError::PoolClosed)?;
        match sender.try_send(Box::new(job)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(KvError::PoolSaturated),
            Err(TrySendError::Disconnected(_)) => Err(KvError::PoolClosed),
        }
    }

    /// Number of worker threads
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Jobs waiting for a free worker
    pub fn queued(&self) -> usize {
        self.sender.as_ref().map(|s| s.len()).unwrap_or(0)
    }

    /// Workers currently running a job
    pub fn busy(&self) -> usize {
        self.busy.load(Ordering::Acquire)
    }

    /// Stop accepting jobs, let queued jobs finish, and join every worker
    pub fn shutdown(mut self) {
        self.close_and_join();
    }

    fn close_and_join(&mut self) {
        // Dropping the sender disconnects the channel once the queue drains
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                tracing::warn!("Worker thread exited abnormally");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

fn worker_loop(id: usize, receiver: Receiver<Job>, busy: Arc<AtomicUsize>) {
    while let Ok(job) = receiver.recv() {
        busy.fetch_add(1, Ordering::AcqRel);
        let outcome = panic::catch_unwind(AssertUnwindSafe(job));
        busy.fetch_sub(1, Ordering::AcqRel);

        if outcome.is_err() {
            tracing::error!(worker = id, "Job panicked, worker recovered");
        }
    }
    tracing::debug!(worker = id, "Worker exiting");
}
