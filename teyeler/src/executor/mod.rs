//! Background execution of tile writes.
//!
//! [`WorkerPool`] runs [`Job`]s on a fixed number of named OS threads fed
//! from a FIFO queue. The producer submits work and calls
//! [`WorkerPool::drain`] to wait for it; a job that fails or panics is
//! recorded as a [`JobFailure`] and never takes a worker down with it.

mod job;
mod pool;
mod queue;

pub use job::{DrainReport, FailureReason, FnJob, Job, JobFailure};
pub use pool::{PoolError, WorkerPool, DEFAULT_THREAD_PREFIX, DEFAULT_WORKERS};
