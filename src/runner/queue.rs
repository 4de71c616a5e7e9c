//! Task queue with stable index assignment
//!
//! Binds each submitted task to its submission-order position and hands out
//! (task, index) pairs one at a time. Exactly one worker can claim any given
//! index, even when several workers call [`TaskQueue::claim`] concurrently.

use std::collections::VecDeque;
use std::sync::Mutex;

/// A task bound to its submission-order position.
///
/// The index is assigned once when the queue is built and never changes.
#[derive(Debug, Clone)]
pub struct TaskRecord<T> {
    pub index: usize,
    pub task: T,
}

/// Shared work queue drained by the worker pool.
///
/// Claims always follow submission order; completion order is up to the
/// workers and says nothing about ordering of the final results.
pub struct TaskQueue<T> {
    records: Mutex<VecDeque<TaskRecord<T>>>,
}

impl<T> TaskQueue<T> {
    /// Build a queue from the ordered task collection.
    pub fn new(tasks: Vec<T>) -> Self {
        let records = tasks
            .into_iter()
            .enumerate()
            .map(|(index, task)| TaskRecord { index, task })
            .collect();

        Self {
            records: Mutex::new(records),
        }
    }

    /// Claim the next (task, index) pair, or `None` when the queue is exhausted.
    ///
    /// The pop happens under the lock, so no two workers can receive the same
    /// record and no record is ever skipped.
    pub fn claim(&self) -> Option<TaskRecord<T>> {
        self.records.lock().unwrap().pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_claim_follows_submission_order() {
        let queue = TaskQueue::new(vec!["a", "b", "c"]);

        let first = queue.claim().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.task, "a");

        let second = queue.claim().unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.task, "b");

        let third = queue.claim().unwrap();
        assert_eq!(third.index, 2);
        assert_eq!(third.task, "c");

        assert!(queue.claim().is_none());
    }

    #[test]
    fn test_empty_queue_is_exhausted() {
        let queue: TaskQueue<String> = TaskQueue::new(vec![]);
        assert!(queue.claim().is_none());
    }

    #[test]
    fn test_concurrent_claims_are_unique() {
        let queue = Arc::new(TaskQueue::new((0..100).collect::<Vec<_>>()));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let queue = Arc::clone(&queue);
            handles.push(std::thread::spawn(move || {
                let mut claimed = Vec::new();
                while let Some(record) = queue.claim() {
                    claimed.push(record.index);
                }
                claimed
            }));
        }

        let mut all: Vec<usize> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();

        // Every index claimed exactly once, none skipped or duplicated
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }
}
