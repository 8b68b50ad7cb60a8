// Tue Jan 13 2026 - Alex

use crate::engine::error::TaskError;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub const DEFAULT_THREAD_NAME_PREFIX: &str = "DependingOnTaskThread";

pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that runs submitted jobs and can be torn down without waiting.
pub trait Executor: Send {
    fn submit(&mut self, job: Job) -> Result<(), TaskError>;

    /// Stops accepting work and discards queued jobs. Jobs already running are
    /// abandoned, not joined. Returns the number of discarded jobs.
    fn shutdown_now(&mut self) -> usize;

    fn is_shutdown(&self) -> bool;
}

struct Queue {
    jobs: VecDeque<Job>,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
}

/// Fixed-size pool. Threads start lazily, one per submission, until `size` are running.
pub struct WorkerPool {
    size: usize,
    name_prefix: String,
    shared: Arc<Shared>,
    started: usize,
    completed: Arc<AtomicUsize>,
    shutdown: bool,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self::with_name_prefix(size, DEFAULT_THREAD_NAME_PREFIX)
    }

    pub fn with_name_prefix(size: usize, name_prefix: &str) -> Self {
        Self {
            size,
            name_prefix: name_prefix.to_string(),
            shared: Arc::new(Shared {
                queue: Mutex::new(Queue {
                    jobs: VecDeque::new(),
                    shutdown: false,
                }),
                available: Condvar::new(),
            }),
            started: 0,
            completed: Arc::new(AtomicUsize::new(0)),
            shutdown: false,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn threads_started(&self) -> usize {
        self.started
    }

    pub fn jobs_completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn pending_count(&self) -> usize {
        self.shared.queue.lock().jobs.len()
    }

    fn spawn_worker(&mut self, first: Job) -> Result<(), TaskError> {
        let id = self.started;
        let shared = self.shared.clone();
        let completed = self.completed.clone();

        thread::Builder::new()
            .name(format!("{}-{}", self.name_prefix, id))
            .spawn(move || {
                WorkerPool::worker_loop(first, shared, completed);
            })
            .map_err(TaskError::Spawn)?;

        self.started += 1;
        log::trace!("started worker {}-{}", self.name_prefix, id);
        Ok(())
    }

    fn worker_loop(first: Job, shared: Arc<Shared>, completed: Arc<AtomicUsize>) {
        WorkerPool::run_job(first, &completed);

        loop {
            let job = {
                let mut queue = shared.queue.lock();
                loop {
                    if queue.shutdown {
                        return;
                    }
                    if let Some(job) = queue.jobs.pop_front() {
                        break job;
                    }
                    shared.available.wait(&mut queue);
                }
            };

            WorkerPool::run_job(job, &completed);
        }
    }

    fn run_job(job: Job, completed: &AtomicUsize) {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            let name = thread::current().name().unwrap_or("worker").to_string();
            log::error!("Job panicked on {}", name);
        }
        completed.fetch_add(1, Ordering::SeqCst);
    }
}

impl Executor for WorkerPool {
    fn submit(&mut self, job: Job) -> Result<(), TaskError> {
        if self.shutdown {
            return Err(TaskError::PoolShutdown);
        }

        if self.started < self.size {
            return self.spawn_worker(job);
        }

        let mut queue = self.shared.queue.lock();
        queue.jobs.push_back(job);
        self.shared.available.notify_one();
        Ok(())
    }

    fn shutdown_now(&mut self) -> usize {
        self.shutdown = true;

        let discarded = {
            let mut queue = self.shared.queue.lock();
            queue.shutdown = true;
            let discarded = queue.jobs.len();
            queue.jobs.clear();
            discarded
        };
        self.shared.available.notify_all();

        log::debug!(
            "{} pool shut down, {} queued job(s) discarded",
            self.name_prefix,
            discarded
        );
        discarded
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if !self.shutdown {
            self.shutdown_now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::{Duration, Instant};

    #[test]
    fn test_no_threads_before_submit() {
        let mut pool = WorkerPool::new(4);
        assert_eq!(pool.threads_started(), 0);
        assert_eq!(pool.shutdown_now(), 0);
        assert_eq!(pool.threads_started(), 0);
    }

    #[test]
    fn test_jobs_run_on_named_threads() {
        let mut pool = WorkerPool::with_name_prefix(2, "fanout");
        let (tx, rx) = channel();

        for _ in 0..2 {
            let tx = tx.clone();
            pool.submit(Box::new(move || {
                let name = thread::current().name().map(str::to_string);
                tx.send(name).unwrap();
            }))
            .unwrap();
        }

        let mut names: Vec<_> = (0..2)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap())
            .collect();
        names.sort();

        assert_eq!(names, vec!["fanout-0".to_string(), "fanout-1".to_string()]);
        assert_eq!(pool.threads_started(), 2);
    }

    #[test]
    fn test_jobs_run_concurrently() {
        let mut pool = WorkerPool::new(3);
        let (tx, rx) = channel();
        let start = Instant::now();

        for _ in 0..3 {
            let tx = tx.clone();
            pool.submit(Box::new(move || {
                thread::sleep(Duration::from_millis(300));
                tx.send(()).unwrap();
            }))
            .unwrap();
        }

        for _ in 0..3 {
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
        }

        assert!(start.elapsed() < Duration::from_millis(800));
    }

    #[test]
    fn test_extra_jobs_are_queued_then_discarded() {
        let mut pool = WorkerPool::new(1);
        let (tx, rx) = channel::<()>();

        pool.submit(Box::new(move || {
            let _ = rx.recv_timeout(Duration::from_secs(5));
        }))
        .unwrap();
        pool.submit(Box::new(|| {})).unwrap();
        pool.submit(Box::new(|| {})).unwrap();

        assert_eq!(pool.threads_started(), 1);
        assert_eq!(pool.pending_count(), 2);
        assert_eq!(pool.shutdown_now(), 2);
        assert!(pool.is_shutdown());
        drop(tx);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut pool = WorkerPool::new(1);
        pool.shutdown_now();

        let err = pool.submit(Box::new(|| {})).unwrap_err();
        assert!(matches!(err, TaskError::PoolShutdown));
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        let mut pool = WorkerPool::new(1);
        let (tx, rx) = channel();

        pool.submit(Box::new(|| panic!("job failure"))).unwrap();
        pool.submit(Box::new(move || tx.send(7).unwrap())).unwrap();

        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    }
}
