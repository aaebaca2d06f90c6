//! Fixed-size pool of OS worker threads.

use super::job::{DrainReport, FailureReason, Job};
use super::queue::{JobQueue, Message, PushRejected};
use crate::log::{Logger, NoOpLogger};
use crate::{log_debug, log_warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Default number of worker threads.
pub const DEFAULT_WORKERS: usize = 8;

/// Default thread name prefix. Threads are named `<prefix>-<index>`.
pub const DEFAULT_THREAD_PREFIX: &str = "tile-writer";

/// Errors from pool lifecycle operations.
///
/// Job failures are never reported here; they are collected into the
/// [`DrainReport`] returned by [`WorkerPool::drain`].
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Worker pool is already running")]
    AlreadyRunning,

    #[error("Worker pool is not running")]
    NotRunning,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Runs submitted jobs on a fixed set of worker threads.
///
/// Jobs are taken in submission order. With a capacity, `submit` blocks
/// while that many jobs are waiting, so a fast producer cannot run ahead
/// of the writers.
///
/// ```
/// use teyeler::executor::{FnJob, WorkerPool};
///
/// let mut pool = WorkerPool::new(2);
/// pool.start().unwrap();
/// for i in 0..4 {
///     pool.submit(FnJob::new(i, move || if i == 3 { Err("odd") } else { Ok(()) })).unwrap();
/// }
/// let report = pool.stop().unwrap();
/// assert_eq!(report.completed, 4);
/// assert_eq!(report.failures.len(), 1);
/// ```
pub struct WorkerPool<J: Job> {
    queue: Arc<JobQueue<J>>,
    size: usize,
    thread_prefix: String,
    logger: Arc<dyn Logger>,
    workers: Vec<JoinHandle<()>>,
}

impl<J: Job> WorkerPool<J> {
    /// Creates a stopped pool with an unbounded queue.
    ///
    /// # Panics
    ///
    /// Panics if `size` is 0.
    pub fn new(size: usize) -> Self {
        Self::with_capacity(size, None)
    }

    /// Creates a stopped pool whose queue holds at most `capacity` waiting
    /// jobs. `None` or `Some(0)` means unbounded.
    ///
    /// # Panics
    ///
    /// Panics if `size` is 0.
    pub fn with_capacity(size: usize, capacity: Option<usize>) -> Self {
        assert!(size > 0, "worker pool needs at least one thread");
        Self {
            queue: Arc::new(JobQueue::new(capacity)),
            size,
            thread_prefix: DEFAULT_THREAD_PREFIX.to_string(),
            logger: Arc::new(NoOpLogger),
            workers: Vec::new(),
        }
    }

    pub fn with_thread_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_prefix = prefix.into();
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    /// Jobs submitted but not yet picked up by a worker.
    pub fn queued(&self) -> usize {
        self.queue.queued_jobs()
    }

    /// Launches the worker threads.
    pub fn start(&mut self) -> Result<(), PoolError> {
        if self.is_running() {
            return Err(PoolError::AlreadyRunning);
        }

        self.queue.set_running(true);
        for index in 0..self.size {
            let queue = Arc::clone(&self.queue);
            let logger = Arc::clone(&self.logger);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", self.thread_prefix, index))
                .spawn(move || worker_loop(queue, logger));

            match spawned {
                Ok(handle) => self.workers.push(handle),
                Err(e) => {
                    self.shutdown_workers();
                    return Err(PoolError::Spawn(e));
                }
            }
        }

        log_debug!(self.logger, "Started {} worker threads", self.size);
        Ok(())
    }

    /// Queues a job. Blocks while a bounded queue is full.
    ///
    /// Jobs may be submitted before `start`, up to the queue capacity; they
    /// run once the workers are up.
    pub fn submit(&self, job: J) -> Result<(), PoolError> {
        self.queue
            .push_job(job)
            .map_err(|PushRejected::NotRunning(_)| PoolError::NotRunning)
    }

    /// Blocks until every submitted job has finished and returns what
    /// completed since the previous drain.
    pub fn drain(&self) -> Result<DrainReport<J::Key>, PoolError> {
        self.queue.wait_idle().ok_or(PoolError::NotRunning)
    }

    /// Drains the queue, then stops and joins every worker.
    ///
    /// A stopped pool can be started again.
    pub fn stop(&mut self) -> Result<DrainReport<J::Key>, PoolError> {
        if !self.is_running() {
            return Err(PoolError::NotRunning);
        }
        let report = self.drain()?;
        self.shutdown_workers();
        log_debug!(self.logger, "Stopped worker pool");
        Ok(report)
    }

    fn shutdown_workers(&mut self) {
        self.queue.push_stops(self.workers.len());
        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                log_warn!(self.logger, "Worker thread {} terminated abnormally", name);
            }
        }
        self.queue.set_running(false);
    }
}

impl<J: Job> Drop for WorkerPool<J> {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.stop();
        }
    }
}

fn worker_loop<J: Job>(queue: Arc<JobQueue<J>>, logger: Arc<dyn Logger>) {
    loop {
        let (key, job) = match queue.pop() {
            Message::Run(key, job) => (key, job),
            Message::Stop => break,
        };

        // Anything the job hands back (its error's Display, the log line
        // naming its key) can panic too. The job is finished either way.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let failure = match panic::catch_unwind(AssertUnwindSafe(move || job.run())) {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(FailureReason::Error(e.to_string())),
                Err(payload) => Some(FailureReason::Panicked(panic_message(payload.as_ref()))),
            };
            if let Some(reason) = &failure {
                log_warn!(logger, "Job {:?} failed: {}", key, reason);
            }
            failure
        }));
        let failure = outcome.unwrap_or_else(|payload| {
            Some(FailureReason::Panicked(panic_message(payload.as_ref())))
        });

        queue.finish(key, failure);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::FnJob;
    use crate::log::{LogLevel, RecordingLogger};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    type BoxedRun = Box<dyn FnOnce() -> Result<(), String> + Send>;
    type TestJob = FnJob<usize, BoxedRun, String>;

    fn job(key: usize, run: impl FnOnce() -> Result<(), String> + Send + 'static) -> TestJob {
        FnJob::new(key, Box::new(run) as BoxedRun)
    }

    #[test]
    fn test_runs_every_job() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut pool: WorkerPool<TestJob> = WorkerPool::new(4);
        pool.start().unwrap();

        for i in 0..100 {
            let counter = Arc::clone(&counter);
            pool.submit(job(i, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
            .unwrap();
        }

        let report = pool.stop().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
        assert_eq!(report.completed, 100);
        assert!(report.is_clean());
        assert!(!pool.is_running());
    }

    #[test]
    fn test_failures_and_panics_are_reported() {
        let mut pool: WorkerPool<TestJob> = WorkerPool::new(2);
        pool.start().unwrap();

        pool.submit(job(0, || Ok(()))).unwrap();
        pool.submit(job(1, || Err("disk full".to_string()))).unwrap();
        pool.submit(job(2, || panic!("encoder exploded"))).unwrap();
        pool.submit(job(3, || Ok(()))).unwrap();

        let report = pool.drain().unwrap();
        assert_eq!(report.completed, 4);
        assert_eq!(report.succeeded(), 2);

        let mut failures = report.failures.clone();
        failures.sort_by_key(|f| f.key);
        assert_eq!(failures[0].key, 1);
        assert_eq!(failures[0].reason, FailureReason::Error("disk full".into()));
        assert_eq!(failures[1].key, 2);
        assert_eq!(
            failures[1].reason,
            FailureReason::Panicked("encoder exploded".into())
        );

        // Workers survive a panicking job.
        pool.submit(job(4, || Ok(()))).unwrap();
        let report = pool.stop().unwrap();
        assert_eq!(report.completed, 1);
    }

    #[test]
    fn test_failure_is_logged() {
        let logger = Arc::new(RecordingLogger::new());
        let mut pool: WorkerPool<TestJob> = WorkerPool::new(1).with_logger(logger.clone());
        pool.start().unwrap();
        pool.submit(job(9, || Err("bad tile".to_string()))).unwrap();
        pool.stop().unwrap();

        let warnings = logger.messages_at(LogLevel::Warn);
        assert_eq!(warnings, vec!["Job 9 failed: bad tile".to_string()]);
    }

    struct LoudError;

    impl std::fmt::Display for LoudError {
        fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            panic!("cannot describe error")
        }
    }

    #[test]
    fn test_error_display_panic_still_finishes_job() {
        let mut pool: WorkerPool<FnJob<u32, fn() -> Result<(), LoudError>, LoudError>> =
            WorkerPool::new(1);
        pool.start().unwrap();
        let fail: fn() -> Result<(), LoudError> = || Err(LoudError);
        pool.submit(FnJob::new(7, fail)).unwrap();

        let (done_tx, done_rx) = mpsc::channel();
        let drainer = thread::spawn(move || {
            let report = pool.stop().unwrap();
            let _ = done_tx.send(report);
        });

        let report = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("pool did not finish the job");
        drainer.join().unwrap();
        assert_eq!(report.completed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].key, 7);
        assert_eq!(
            report.failures[0].reason,
            FailureReason::Panicked("cannot describe error".into())
        );
    }

    #[test]
    fn test_start_twice_fails() {
        let mut pool: WorkerPool<TestJob> = WorkerPool::new(1);
        pool.start().unwrap();
        assert!(matches!(pool.start(), Err(PoolError::AlreadyRunning)));
        pool.stop().unwrap();
    }

    #[test]
    fn test_stop_when_stopped_fails() {
        let mut pool: WorkerPool<TestJob> = WorkerPool::new(1);
        assert!(matches!(pool.stop(), Err(PoolError::NotRunning)));
    }

    #[test]
    fn test_restart_after_stop() {
        let mut pool: WorkerPool<TestJob> = WorkerPool::new(2);
        pool.start().unwrap();
        pool.stop().unwrap();
        pool.start().unwrap();
        pool.submit(job(0, || Ok(()))).unwrap();
        assert_eq!(pool.stop().unwrap().completed, 1);
    }

    #[test]
    fn test_jobs_submitted_before_start_run_after_start() {
        let mut pool: WorkerPool<TestJob> = WorkerPool::with_capacity(1, Some(4));
        for i in 0..4 {
            pool.submit(job(i, || Ok(()))).unwrap();
        }
        assert_eq!(pool.queued(), 4);
        assert!(matches!(
            pool.submit(job(4, || Ok(()))),
            Err(PoolError::NotRunning)
        ));
        assert!(matches!(pool.drain(), Err(PoolError::NotRunning)));

        pool.start().unwrap();
        assert_eq!(pool.stop().unwrap().completed, 4);
    }

    #[test]
    fn test_bounded_queue_applies_backpressure() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let release_rx = Arc::new(parking_lot::Mutex::new(release_rx));

        let mut pool: WorkerPool<TestJob> = WorkerPool::with_capacity(1, Some(1));
        pool.start().unwrap();

        // First job blocks the only worker until released.
        let rx = Arc::clone(&release_rx);
        pool.submit(job(0, move || {
            let _ = rx.lock().recv();
            Ok(())
        }))
        .unwrap();

        let pool = Arc::new(parking_lot::Mutex::new(pool));
        let (done_tx, done_rx) = mpsc::channel();
        let producer = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                // Wait for the worker to take job 0 so the queue is empty.
                while pool.lock().queued() > 0 {
                    thread::sleep(Duration::from_millis(1));
                }
                let guard = pool.lock();
                guard.submit(job(1, || Ok(()))).unwrap();
                let _ = done_tx.send(1);
                // Queue now full: this submit blocks until job 1 is taken.
                guard.submit(job(2, || Ok(()))).unwrap();
                let _ = done_tx.send(2);
            })
        };

        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), 1);
        assert!(done_rx.recv_timeout(Duration::from_millis(100)).is_err());

        release_tx.send(()).unwrap();
        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), 2);
        producer.join().unwrap();

        let report = pool.lock().stop().unwrap();
        assert_eq!(report.completed, 3);
    }

    #[test]
    fn test_threads_are_named() {
        let names = Arc::new(parking_lot::Mutex::new(HashSet::new()));
        let mut pool: WorkerPool<TestJob> = WorkerPool::new(3).with_thread_prefix("writer");
        pool.start().unwrap();
        for i in 0..30 {
            let names = Arc::clone(&names);
            pool.submit(job(i, move || {
                let name = thread::current().name().unwrap_or_default().to_string();
                names.lock().insert(name);
                thread::sleep(Duration::from_millis(1));
                Ok(())
            }))
            .unwrap();
        }
        pool.stop().unwrap();

        for name in names.lock().iter() {
            assert!(name.starts_with("writer-"), "unexpected name {}", name);
        }
    }

    #[test]
    fn test_drop_stops_running_pool() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let mut pool: WorkerPool<TestJob> = WorkerPool::new(2);
            pool.start().unwrap();
            for i in 0..10 {
                let counter = Arc::clone(&counter);
                pool.submit(job(i, move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }))
                .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}
