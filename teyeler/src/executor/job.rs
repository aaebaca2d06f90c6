//! Job trait and failure records.

use std::fmt;
use std::marker::PhantomData;

/// A unit of work executed by a [`super::WorkerPool`].
///
/// Jobs are consumed when they run. `key()` is taken when the job is submitted
/// so that a failure, including a panic, can still be attributed to it.
pub trait Job: Send + 'static {
    /// Identifies the job in failure reports.
    type Key: Clone + fmt::Debug + Send + 'static;

    /// Error returned by a failed run.
    type Error: fmt::Display;

    fn key(&self) -> Self::Key;

    fn run(self) -> Result<(), Self::Error>;
}

/// A keyed closure job.
///
/// ```
/// use teyeler::executor::{FnJob, Job};
///
/// let job = FnJob::new("greeting", || Ok::<(), String>(()));
/// assert_eq!(job.key(), "greeting");
/// assert!(job.run().is_ok());
/// ```
pub struct FnJob<K, F, E> {
    key: K,
    run: F,
    _error: PhantomData<fn() -> E>,
}

impl<K, F, E> FnJob<K, F, E>
where
    F: FnOnce() -> Result<(), E>,
{
    pub fn new(key: K, run: F) -> Self {
        Self {
            key,
            run,
            _error: PhantomData,
        }
    }
}

impl<K, F, E> Job for FnJob<K, F, E>
where
    K: Clone + fmt::Debug + Send + 'static,
    F: FnOnce() -> Result<(), E> + Send + 'static,
    E: fmt::Display + 'static,
{
    type Key = K;
    type Error = E;

    fn key(&self) -> K {
        self.key.clone()
    }

    fn run(self) -> Result<(), E> {
        (self.run)()
    }
}

impl<K: fmt::Debug, F, E> fmt::Debug for FnJob<K, F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnJob").field("key", &self.key).finish()
    }
}

/// Why a job did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The job returned an error.
    Error(String),
    /// The job panicked; the payload message is kept when it is a string.
    Panicked(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Error(msg) => write!(f, "{}", msg),
            FailureReason::Panicked(msg) => write!(f, "panicked: {}", msg),
        }
    }
}

/// A failed job, identified by its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure<K> {
    pub key: K,
    pub reason: FailureReason,
}

impl<K: fmt::Display> fmt::Display for JobFailure<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.reason)
    }
}

/// Outcome of everything that completed since the previous drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport<K> {
    /// Jobs that finished, successfully or not.
    pub completed: usize,
    pub failures: Vec<JobFailure<K>>,
}

impl<K> DrainReport<K> {
    pub fn succeeded(&self) -> usize {
        self.completed - self.failures.len()
    }

    /// True when no job failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Folds a later report into this one.
    pub fn merge(&mut self, other: DrainReport<K>) {
        self.completed += other.completed;
        self.failures.extend(other.failures);
    }
}

impl<K> Default for DrainReport<K> {
    fn default() -> Self {
        Self {
            completed: 0,
            failures: Vec::new(),
        }
    }
}
