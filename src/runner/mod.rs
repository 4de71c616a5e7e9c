//! Bounded-concurrency task execution engine
//!
//! Runs an ordered batch of opaque tasks through an async processing
//! function with a fixed, clamped number of concurrent workers, tracking
//! live aggregate progress and isolating per-task failures so one failing
//! task cannot abort the batch. Results come back aligned with submission
//! order regardless of completion order.
//!
//! # Components
//!
//! - [`queue`] - task queue with race-free claim-next semantics
//! - [`status`] - shared progress snapshot, replaced wholesale per transition
//! - [`outcome`] - per-task outcomes, structured errors, identity resolution
//! - [`pool`] - worker pool, per-task executor, ordered result collection
//!
//! # Example
//!
//! ```rust,no_run
//! use planrun::runner::{run_tasks, RunnerConfig, TaskError};
//!
//! # async fn example() {
//! let tasks = vec!["build".to_string(), "test".to_string()];
//! let outcomes = run_tasks(
//!     tasks,
//!     |task| async move { Ok::<_, TaskError>(format!("ran {task}")) },
//!     RunnerConfig::default().with_concurrency(2),
//! )
//! .await;
//! assert_eq!(outcomes.len(), 2);
//! # }
//! ```

pub mod outcome;
pub mod pool;
pub mod queue;
pub mod status;

pub use outcome::{TaskError, TaskIdentity, TaskOutcome, EXECUTION_ERROR};
pub use pool::{
    run_tasks, CompletionCallback, ProgressCallback, RunnerConfig, DEFAULT_CONCURRENCY,
    MAX_CONCURRENCY, MIN_CONCURRENCY,
};
pub use queue::{TaskQueue, TaskRecord};
pub use status::{ProgressStatus, StatusTracker};
