// Tue Jan 13 2026 - Alex

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task failed: {0}")]
    Failed(String),
    #[error("Timeout reached after {timeout:?} with {pending} dependent task(s) still running")]
    Timeout { timeout: Duration, pending: usize },
    #[error("Task finished with error, dependent task(s) not done: {}", failed.join(", "))]
    Incomplete { failed: Vec<String> },
    #[error("Thread interrupted before completion")]
    Interrupted,
    #[error("Execution vetoed by hook: {phase}")]
    Vetoed { phase: &'static str },
    #[error("Task has already been executed")]
    AlreadyExecuted,
    #[error("Timeout not set")]
    MissingTimeout,
    #[error("Timeout must be positive, got {0:?}")]
    InvalidTimeout(Duration),
    #[error("Worker pool has been shut down")]
    PoolShutdown,
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TaskError {
    pub fn failed(msg: impl Into<String>) -> Self {
        TaskError::Failed(msg.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskError::Timeout { .. })
    }

    pub fn is_incomplete(&self) -> bool {
        matches!(self, TaskError::Incomplete { .. })
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, TaskError::Interrupted)
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", TaskError::Interrupted), "Thread interrupted before completion");
        assert_eq!(format!("{}", TaskError::failed("boom")), "Task failed: boom");

        let err = TaskError::Incomplete {
            failed: vec!["Deploy".to_string(), "Notify".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Task finished with error, dependent task(s) not done: Deploy, Notify"
        );
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let timeout = TaskError::Timeout { timeout: Duration::from_secs(1), pending: 2 };
        let incomplete = TaskError::Incomplete { failed: Vec::new() };

        assert!(timeout.is_timeout());
        assert!(!timeout.is_incomplete());
        assert!(incomplete.is_incomplete());
        assert!(!incomplete.is_timeout());
        assert!(TaskError::Interrupted.is_interrupted());
    }
}
