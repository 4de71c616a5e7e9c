//! Per-task outcomes and identity resolution

use serde::{Deserialize, Serialize};

/// Error code used when the processing function raises a fault (panics)
/// instead of returning an error value.
pub const EXECUTION_ERROR: &str = "EXECUTION_ERROR";

/// Structured error carried by a failed task outcome.
///
/// Returned by the processing function for application-level failures, or
/// synthesized with code [`EXECUTION_ERROR`] when the function panics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    pub code: String,
    pub message: String,
}

impl TaskError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Error for a fault raised inside the processing function.
    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(EXECUTION_ERROR, message)
    }
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for TaskError {}

/// Final result of one task, occupying its slot in the ordered result
/// sequence. A batch never produces missing slots: every claimed task ends
/// up as either `Completed` or `Errored`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum TaskOutcome<R> {
    /// The processing function returned a value.
    #[serde(rename = "OK")]
    Completed { task_id: String, value: R },
    /// The processing function returned an error value, or raised a fault
    /// that was caught at the executor boundary.
    #[serde(rename = "ERROR")]
    Errored { task_id: String, error: TaskError },
}

impl<R> TaskOutcome<R> {
    pub fn task_id(&self) -> &str {
        match self {
            Self::Completed { task_id, .. } => task_id,
            Self::Errored { task_id, .. } => task_id,
        }
    }

    /// True for both application-level failures and raised faults.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Errored { .. })
    }

    pub fn value(&self) -> Option<&R> {
        match self {
            Self::Completed { value, .. } => Some(value),
            Self::Errored { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&TaskError> {
        match self {
            Self::Completed { .. } => None,
            Self::Errored { error, .. } => Some(error),
        }
    }
}

/// Optional stable identifier for a task.
///
/// Tasks are opaque to the runner; when a task carries no identifier of its
/// own the runner synthesizes `task-<index>` from its submission position.
pub trait TaskIdentity {
    fn task_id(&self) -> Option<String> {
        None
    }
}

/// JSON tasks may carry their identifier under `id` or `task_id`.
impl TaskIdentity for serde_json::Value {
    fn task_id(&self) -> Option<String> {
        self.get("id")
            .or_else(|| self.get("task_id"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

impl TaskIdentity for String {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execution_error_code() {
        let error = TaskError::execution("boom");
        assert_eq!(error.code, "EXECUTION_ERROR");
        assert_eq!(error.message, "boom");
        assert_eq!(error.to_string(), "[EXECUTION_ERROR] boom");
    }

    #[test]
    fn test_errored_outcome_wire_shape() {
        let outcome: TaskOutcome<String> = TaskOutcome::Errored {
            task_id: "bad".to_string(),
            error: TaskError::execution("boom"),
        };

        let wire = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            wire,
            json!({
                "status": "ERROR",
                "task_id": "bad",
                "error": { "code": "EXECUTION_ERROR", "message": "boom" }
            })
        );
    }

    #[test]
    fn test_completed_outcome_accessors() {
        let outcome = TaskOutcome::Completed {
            task_id: "t1".to_string(),
            value: 42,
        };

        assert!(!outcome.is_error());
        assert_eq!(outcome.task_id(), "t1");
        assert_eq!(outcome.value(), Some(&42));
        assert!(outcome.error().is_none());
    }

    #[test]
    fn test_json_task_identity_probes_id_then_task_id() {
        let with_id = json!({"id": "alpha", "task_id": "ignored"});
        assert_eq!(with_id.task_id(), Some("alpha".to_string()));

        let with_task_id = json!({"task_id": "beta"});
        assert_eq!(with_task_id.task_id(), Some("beta".to_string()));

        let without = json!({"title": "no identifier"});
        assert_eq!(without.task_id(), None);
    }
}
