//! A generic FIFO producer/consumer worker pool over long-lived OS threads.
//!
//! Mirrors the classic pthreads-style pool: a mutex-protected job queue, a
//! "work-available" condition variable workers wait on, a "work-done"
//! condition variable `wait()` blocks on, and a stop flag checked under the
//! same lock. Jobs are boxed `FnOnce() + Send` closures rather than a C-style
//! `fn(*mut c_void)` pair (spec.md §9 "job argument as opaque pointer").

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::error::Error;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    jobs: Mutex<QueueState>,
    work_available: Condvar,
    work_done: Condvar,
}

struct QueueState {
    queue: std::collections::VecDeque<Job>,
    num_working: usize,
    stop: bool,
}

/// A fixed-size FIFO worker pool.
///
/// `queue_size + num_working == 0` iff the pool is idle; jobs dequeue in
/// FIFO order; after `stop_and_free` no further `add()` succeeds.
pub struct Pool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    stopped: bool,
}

impl Pool {
    /// Starts `max(n, 1)` worker threads.
    pub fn new(n: u32) -> Result<Pool, Error> {
        let n = n.max(1);
        let shared = Arc::new(Shared {
            jobs: Mutex::new(QueueState {
                queue: std::collections::VecDeque::new(),
                num_working: 0,
                stop: false,
            }),
            work_available: Condvar::new(),
            work_done: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(n as usize);
        for id in 0..n {
            let shared_for_worker = shared.clone();
            let handle = thread::Builder::new()
                .name(format!("pool-worker-{id}"))
                .spawn(move || Self::worker_loop(&shared_for_worker))
                .map_err(|e| Error::Concurrency(format!("failed to spawn worker thread: {e}")))?;
            workers.push(handle);
        }
        tracing::trace!(workers = n, "worker pool started");
        Ok(Pool {
            shared,
            workers,
            stopped: false,
        })
    }

    fn worker_loop(shared: &Arc<Shared>) {
        loop {
            let job = {
                let mut state = shared.jobs.lock().unwrap();
                loop {
                    if state.stop {
                        shared.work_done.notify_all();
                        return;
                    }
                    if let Some(job) = state.queue.pop_front() {
                        state.num_working += 1;
                        break job;
                    }
                    state = shared.work_available.wait(state).unwrap();
                }
            };
            job();
            let mut state = shared.jobs.lock().unwrap();
            state.num_working -= 1;
            if state.queue.is_empty() && state.num_working == 0 {
                shared.work_done.notify_all();
            }
        }
    }

    /// Enqueues a job at the tail. Returns an error if the pool has already
    /// been told to stop.
    pub fn add(&self, job: impl FnOnce() + Send + 'static) -> Result<(), Error> {
        let mut state = self.shared.jobs.lock().unwrap();
        if state.stop {
            tracing::warn!("job submitted to a stopped worker pool");
            return Err(Error::Concurrency("worker pool is stopped".into()));
        }
        state.queue.push_back(Box::new(job));
        self.shared.work_available.notify_one();
        Ok(())
    }

    /// Blocks until the queue is empty and no worker is running a job.
    pub fn wait(&self) -> Result<(), Error> {
        let mut state = self.shared.jobs.lock().unwrap();
        while !(state.queue.is_empty() && state.num_working == 0) {
            state = self.shared.work_done.wait(state).unwrap();
        }
        Ok(())
    }

    /// Number of worker threads. Fixed for the life of the pool.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Currently unstarted jobs.
    pub fn queue_size(&self) -> usize {
        self.shared.jobs.lock().unwrap().queue.len()
    }

    /// Signals stop, discards queued jobs, lets running jobs finish, joins
    /// all workers. No further `add()` succeeds afterwards.
    pub fn stop_and_free(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        {
            let mut state = self.shared.jobs.lock().unwrap();
            state.stop = true;
            state.queue.clear();
        }
        self.shared.work_available.notify_all();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        tracing::trace!("worker pool stopped");
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.stop_and_free();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn jobs_increment_shared_counter_and_wait_drains() {
        let pool = Pool::new(4).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..100 {
            let counter = counter.clone();
            pool.add(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.wait().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
        assert_eq!(pool.queue_size(), 0);
    }

    #[test]
    fn stop_and_free_rejects_further_submissions() {
        let mut pool = Pool::new(2).unwrap();
        pool.stop_and_free();
        assert!(pool.add(|| {}).is_err());
    }

    #[test]
    fn size_never_changes() {
        let pool = Pool::new(3).unwrap();
        assert_eq!(pool.size(), 3);
    }

    #[test]
    fn new_clamps_zero_to_one_worker() {
        let pool = Pool::new(0).unwrap();
        assert_eq!(pool.size(), 1);
    }
}
