//! Shared FIFO queue between the pool handle and its workers.
//!
//! The queue also does the pool's bookkeeping: how many submitted jobs are
//! still outstanding, how many completed, and which failed. All of it lives
//! under one lock so that `drain` can observe a consistent "nothing pending"
//! state.

use super::job::{DrainReport, FailureReason, Job, JobFailure};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

// =============================================================================
// Messages
// =============================================================================

/// What a worker receives from the queue.
///
/// A job travels with its key, taken when it was submitted.
pub(crate) enum Message<J: Job> {
    Run(J::Key, J),
    Stop,
}

// =============================================================================
// Queue
// =============================================================================

struct State<J: Job> {
    messages: VecDeque<Message<J>>,
    /// Jobs in the queue this many. Stop messages are not counted.
    queued_jobs: usize,
    /// Submitted and not yet finished.
    outstanding: usize,
    completed: usize,
    failures: Vec<JobFailure<J::Key>>,
    running: bool,
}

pub(crate) struct JobQueue<J: Job> {
    state: Mutex<State<J>>,
    capacity: Option<usize>,
    available: Condvar,
    space: Condvar,
    idle: Condvar,
}

/// Returned by `push_job` when the job cannot be accepted.
pub(crate) enum PushRejected<J> {
    /// Queue is full and no worker is running to make room.
    NotRunning(J),
}

impl<J: Job> JobQueue<J> {
    pub(crate) fn new(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(State {
                messages: VecDeque::new(),
                queued_jobs: 0,
                outstanding: 0,
                completed: 0,
                failures: Vec::new(),
                running: false,
            }),
            capacity: capacity.filter(|&c| c > 0),
            available: Condvar::new(),
            space: Condvar::new(),
            idle: Condvar::new(),
        }
    }

    pub(crate) fn set_running(&self, running: bool) {
        let mut state = self.state.lock();
        state.running = running;
        // Producers blocked on a full queue must re-check the flag.
        self.space.notify_all();
    }

    pub(crate) fn queued_jobs(&self) -> usize {
        self.state.lock().queued_jobs
    }

    /// Enqueues a job, blocking while a bounded queue is full.
    pub(crate) fn push_job(&self, job: J) -> Result<(), PushRejected<J>> {
        let key = job.key();
        let mut state = self.state.lock();
        if let Some(capacity) = self.capacity {
            while state.queued_jobs >= capacity {
                if !state.running {
                    return Err(PushRejected::NotRunning(job));
                }
                self.space.wait(&mut state);
            }
        }
        state.messages.push_back(Message::Run(key, job));
        state.queued_jobs += 1;
        state.outstanding += 1;
        self.available.notify_one();
        Ok(())
    }

    /// Enqueues `count` stop messages, ignoring capacity.
    pub(crate) fn push_stops(&self, count: usize) {
        let mut state = self.state.lock();
        for _ in 0..count {
            state.messages.push_back(Message::Stop);
        }
        self.available.notify_all();
    }

    /// Blocks until a message is available.
    pub(crate) fn pop(&self) -> Message<J> {
        let mut state = self.state.lock();
        loop {
            if let Some(message) = state.messages.pop_front() {
                if matches!(message, Message::Run(..)) {
                    state.queued_jobs -= 1;
                    self.space.notify_one();
                }
                return message;
            }
            self.available.wait(&mut state);
        }
    }

    /// Records a finished job. Every popped job is finished exactly once.
    pub(crate) fn finish(&self, key: J::Key, failure: Option<FailureReason>) {
        let mut state = self.state.lock();
        state.outstanding -= 1;
        state.completed += 1;
        if let Some(reason) = failure {
            state.failures.push(JobFailure { key, reason });
        }
        if state.outstanding == 0 {
            self.idle.notify_all();
        }
    }

    /// Waits until every submitted job has finished and takes the tally.
    ///
    /// Returns `None` without waiting when jobs are outstanding but no
    /// worker is running, since nothing could ever finish them.
    pub(crate) fn wait_idle(&self) -> Option<DrainReport<J::Key>> {
        let mut state = self.state.lock();
        while state.outstanding > 0 {
            if !state.running {
                return None;
            }
            self.idle.wait(&mut state);
        }
        Some(DrainReport {
            completed: std::mem::take(&mut state.completed),
            failures: std::mem::take(&mut state.failures),
        })
    }
}
