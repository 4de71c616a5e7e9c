//! Aggregate progress tracking for a running batch
//!
//! Holds a single shared [`ProgressStatus`] snapshot that is replaced
//! wholesale on every transition. Observers only ever receive owned clones,
//! so a snapshot handed out can never be mutated by a later transition.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Aggregate progress of one batch.
///
/// Invariant after every transition: `completed + running + pending == total`
/// and `errors <= completed`. `current_task_ids` is exactly the set of task
/// identifiers currently between claim and finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStatus {
    pub total: usize,
    pub completed: usize,
    pub running: usize,
    pub pending: usize,
    pub errors: usize,
    pub current_task_ids: Vec<String>,
}

impl ProgressStatus {
    /// Fresh status for a batch of `total` tasks: everything pending.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            running: 0,
            pending: total,
            errors: 0,
            current_task_ids: Vec::new(),
        }
    }

    /// True once every task has finished.
    pub fn is_done(&self) -> bool {
        self.completed == self.total
    }
}

/// Tracks batch progress across concurrent workers.
///
/// Each transition is an atomic read-modify-replace of the whole snapshot
/// under the lock; the snapshot is never field-mutated in place.
pub struct StatusTracker {
    inner: Mutex<ProgressStatus>,
}

impl StatusTracker {
    pub fn new(total: usize) -> Self {
        Self {
            inner: Mutex::new(ProgressStatus::new(total)),
        }
    }

    /// Claim transition: pending-1, running+1, task id enters the running set.
    ///
    /// Returns an owned snapshot of the state after the transition.
    pub fn begin(&self, task_id: &str) -> ProgressStatus {
        let mut guard = self.inner.lock().unwrap();
        let mut next = guard.clone();
        next.pending -= 1;
        next.running += 1;
        next.current_task_ids.push(task_id.to_string());
        *guard = next;
        guard.clone()
    }

    /// Finish transition: running-1, completed+1, errors bumped when the task
    /// errored, task id leaves the running set.
    pub fn finish(&self, task_id: &str, errored: bool) -> ProgressStatus {
        let mut guard = self.inner.lock().unwrap();
        let mut next = guard.clone();
        next.running -= 1;
        next.completed += 1;
        if errored {
            next.errors += 1;
        }
        // Remove one occurrence only: tasks may share an identifier, and a
        // sibling with the same id can still be running.
        if let Some(pos) = next.current_task_ids.iter().position(|id| id == task_id) {
            next.current_task_ids.remove(pos);
        }
        *guard = next;
        guard.clone()
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> ProgressStatus {
        self.inner.lock().unwrap().clone()
    }
}
