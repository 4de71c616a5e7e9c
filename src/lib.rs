//! Planrun - Bounded-concurrency runner for markdown plan documents
//!
//! Planrun parses plan documents (phases, checkbox tasks, priority markers)
//! and executes their tasks through a bounded-concurrency engine that tracks
//! live progress, isolates per-task failures, and returns outcomes in
//! submission order regardless of completion order.
//!
//! # Módulos Principales
//!
//! - [`runner`] - The task execution engine: queue, worker pool, progress
//!   tracking, failure isolation
//! - [`plan`] - Markdown plan extraction into plain task data
//! - [`config`] - Application configuration with file/env/CLI layering
//!
//! # Ejemplo de Uso
//!
//! ```rust,no_run
//! use planrun::plan::PlanDocument;
//! use planrun::runner::{run_tasks, RunnerConfig, TaskError};
//!
//! # async fn example() {
//! let doc = PlanDocument::parse("## Phase 1: Setup\n- [ ] Write config (HIGH)\n");
//! let tasks: Vec<_> = doc.pending_tasks().into_iter().cloned().collect();
//!
//! let outcomes = run_tasks(
//!     tasks,
//!     |task| async move { Ok::<_, TaskError>(format!("ran {}", task.title)) },
//!     RunnerConfig::default().with_concurrency(2),
//! )
//! .await;
//! # }
//! ```

pub mod config;
pub mod plan;
pub mod runner;

pub use config::AppConfig;
pub use plan::{Phase, PlanDocument, PlanTask, Priority};
pub use runner::{run_tasks, ProgressStatus, RunnerConfig, TaskError, TaskIdentity, TaskOutcome};
