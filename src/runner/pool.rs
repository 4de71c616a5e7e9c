//! Worker pool and per-task executor
//!
//! [`run_tasks`] runs a batch of tasks through the caller's async processing
//! function with a fixed, clamped number of concurrent workers. Each worker
//! loops claim → execute → store until the queue is exhausted. Per-task
//! failures are isolated: an error value or a panic from the processing
//! function becomes a structured outcome in that task's result slot and
//! never aborts sibling tasks or the batch.

use futures::future::join_all;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::task::JoinError;

use super::outcome::{TaskError, TaskIdentity, TaskOutcome};
use super::queue::{TaskQueue, TaskRecord};
use super::status::{ProgressStatus, StatusTracker};

/// Concurrency used when the caller does not ask for one.
pub const DEFAULT_CONCURRENCY: usize = 3;
/// Lower bound of the effective concurrency range.
pub const MIN_CONCURRENCY: usize = 1;
/// Upper bound of the effective concurrency range, independent of task
/// count, to bound load on whatever resource the processing function drives.
pub const MAX_CONCURRENCY: usize = 5;

/// Observer for progress snapshots. Receives an owned copy after every
/// claim and finish transition.
pub type ProgressCallback = Arc<dyn Fn(ProgressStatus) + Send + Sync>;

/// Observer fired exactly once per task with the original task value and
/// its outcome, in completion order.
pub type CompletionCallback<T, R> = Arc<dyn Fn(&T, &TaskOutcome<R>) + Send + Sync>;

/// Batch execution configuration.
pub struct RunnerConfig<T, R> {
    /// Requested concurrency; clamped into `[1, 5]` before use.
    pub max_concurrency: usize,
    pub on_progress: Option<ProgressCallback>,
    pub on_task_complete: Option<CompletionCallback<T, R>>,
    /// Emit structured tracing lines for batch and task lifecycle events.
    pub verbose: bool,
}

impl<T, R> Default for RunnerConfig<T, R> {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_CONCURRENCY,
            on_progress: None,
            on_task_complete: None,
            verbose: false,
        }
    }
}

impl<T, R> RunnerConfig<T, R> {
    pub fn with_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_progress(
        mut self,
        callback: impl Fn(ProgressStatus) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub fn with_completion(
        mut self,
        callback: impl Fn(&T, &TaskOutcome<R>) + Send + Sync + 'static,
    ) -> Self {
        self.on_task_complete = Some(Arc::new(callback));
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Concurrency after clamping into the effective range.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY)
    }
}

/// Execute a batch of tasks with bounded concurrency.
///
/// Returns one outcome per task, aligned index-for-index with `tasks`
/// regardless of completion order. An empty batch short-circuits: no workers
/// spawn and no callbacks fire.
///
/// The processing function returns `Ok(value)` for success or
/// `Err(TaskError)` for an application-level failure; a panic inside it is
/// caught at the executor boundary and converted into an outcome with error
/// code `EXECUTION_ERROR`. Either failure increments the batch error tally;
/// neither aborts the batch.
pub async fn run_tasks<T, R, F, Fut>(
    tasks: Vec<T>,
    process: F,
    config: RunnerConfig<T, R>,
) -> Vec<TaskOutcome<R>>
where
    T: TaskIdentity + Clone + Send + Sync + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, TaskError>> + Send + 'static,
{
    let total = tasks.len();
    if total == 0 {
        return Vec::new();
    }

    let concurrency = config.effective_concurrency();
    let workers = concurrency.min(total);

    if config.verbose {
        tracing::info!(total, concurrency, workers, "batch started");
    }

    let queue = Arc::new(TaskQueue::new(tasks));
    let status = Arc::new(StatusTracker::new(total));
    let results: Arc<Mutex<Vec<Option<TaskOutcome<R>>>>> =
        Arc::new(Mutex::new((0..total).map(|_| None).collect()));
    let process = Arc::new(process);

    let mut handles = Vec::with_capacity(workers);
    for worker in 0..workers {
        let queue = Arc::clone(&queue);
        let status = Arc::clone(&status);
        let results = Arc::clone(&results);
        let process = Arc::clone(&process);
        let on_progress = config.on_progress.clone();
        let on_task_complete = config.on_task_complete.clone();
        let verbose = config.verbose;

        handles.push(tokio::spawn(async move {
            while let Some(TaskRecord { index, task }) = queue.claim() {
                let task_id = task
                    .task_id()
                    .unwrap_or_else(|| format!("task-{index}"));

                let snapshot = status.begin(&task_id);
                if let Some(callback) = &on_progress {
                    callback(snapshot);
                }
                if verbose {
                    tracing::info!(worker, index, task_id = %task_id, "task started");
                }

                // Each task runs on its own spawned task so a panic is
                // caught at the join boundary and the worker loop survives.
                let outcome = match tokio::spawn((*process)(task.clone())).await {
                    Ok(Ok(value)) => TaskOutcome::Completed {
                        task_id: task_id.clone(),
                        value,
                    },
                    Ok(Err(error)) => TaskOutcome::Errored {
                        task_id: task_id.clone(),
                        error,
                    },
                    Err(join_error) => TaskOutcome::Errored {
                        task_id: task_id.clone(),
                        error: TaskError::execution(fault_message(join_error)),
                    },
                };

                let errored = outcome.is_error();
                let snapshot = status.finish(&task_id, errored);
                if verbose {
                    let result = if errored { "error" } else { "ok" };
                    tracing::info!(worker, index, task_id = %task_id, result, "task finished");
                }
                if let Some(callback) = &on_task_complete {
                    callback(&task, &outcome);
                }
                if let Some(callback) = &on_progress {
                    callback(snapshot);
                }

                results.lock().unwrap()[index] = Some(outcome);
            }
        }));
    }

    join_all(handles).await;

    if config.verbose {
        let summary = status.snapshot();
        tracing::info!(
            completed = summary.completed,
            total = summary.total,
            errors = summary.errors,
            "batch finished"
        );
    }

    let mut slots = results.lock().unwrap();
    slots
        .drain(..)
        .map(|slot| slot.expect("every claimed task stores its outcome"))
        .collect()
}

/// Extract a readable message from a joined fault.
fn fault_message(error: JoinError) -> String {
    if error.is_panic() {
        match error.into_panic().downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "task panicked".to_string(),
            },
        }
    } else {
        "task was cancelled".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: RunnerConfig<String, String> = RunnerConfig::default();
        assert_eq!(config.max_concurrency, DEFAULT_CONCURRENCY);
        assert!(!config.verbose);
        assert!(config.on_progress.is_none());
        assert!(config.on_task_complete.is_none());
    }

    #[test]
    fn test_concurrency_clamping() {
        let config: RunnerConfig<String, String> = RunnerConfig::default().with_concurrency(0);
        assert_eq!(config.effective_concurrency(), 1);

        let config: RunnerConfig<String, String> = RunnerConfig::default().with_concurrency(99);
        assert_eq!(config.effective_concurrency(), 5);

        let config: RunnerConfig<String, String> = RunnerConfig::default().with_concurrency(4);
        assert_eq!(config.effective_concurrency(), 4);
    }

    #[tokio::test]
    async fn test_single_task_batch() {
        let outcomes = run_tasks(
            vec!["hello".to_string()],
            |task: String| async move { Ok::<_, TaskError>(task.to_uppercase()) },
            RunnerConfig::default(),
        )
        .await;

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].task_id(), "task-0");
        assert_eq!(outcomes[0].value(), Some(&"HELLO".to_string()));
    }
}
