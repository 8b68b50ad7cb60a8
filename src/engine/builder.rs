// Tue Jan 13 2026 - Alex

use crate::config::OrchestratorConfig;
use crate::engine::error::TaskError;
use crate::engine::task::{shared, Runnable, SharedTask};
use crate::engine::worker::DEFAULT_THREAD_NAME_PREFIX;
use std::fmt;
use std::time::Duration;

/// Validated, immutable input to `DependencyOrchestrator::new`.
#[derive(Clone)]
pub struct OrchestratorSpec {
    dependents: Vec<SharedTask>,
    timeout: Duration,
    thread_name_prefix: String,
}

impl OrchestratorSpec {
    pub fn dependents(&self) -> &[SharedTask] {
        &self.dependents
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn thread_name_prefix(&self) -> &str {
        &self.thread_name_prefix
    }

    pub fn dependent_count(&self) -> usize {
        self.dependents.len()
    }

    pub(crate) fn into_parts(self) -> (Vec<SharedTask>, Duration, String) {
        (self.dependents, self.timeout, self.thread_name_prefix)
    }
}

impl fmt::Debug for OrchestratorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorSpec")
            .field("dependents", &self.dependents.len())
            .field("timeout", &self.timeout)
            .field("thread_name_prefix", &self.thread_name_prefix)
            .finish()
    }
}

pub struct OrchestratorBuilder {
    dependents: Vec<SharedTask>,
    timeout: Option<Duration>,
    thread_name_prefix: String,
}

impl OrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            dependents: Vec::new(),
            timeout: None,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
        }
    }

    pub fn from_config(config: &OrchestratorConfig) -> Self {
        Self::new()
            .with_timeout_secs(config.timeout_seconds)
            .with_thread_name_prefix(&config.thread_name_prefix)
    }

    pub fn with_depending_task<T: Runnable + 'static>(self, task: T) -> Self {
        self.with_shared_task(shared(task))
    }

    /// Adds a task the caller keeps a handle to, e.g. to read its result afterwards.
    pub fn with_shared_task(mut self, task: SharedTask) -> Self {
        self.dependents.push(task);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_secs(self, seconds: u64) -> Self {
        self.with_timeout(Duration::from_secs(seconds))
    }

    pub fn with_thread_name_prefix(mut self, prefix: &str) -> Self {
        self.thread_name_prefix = prefix.to_string();
        self
    }

    pub fn dependent_count(&self) -> usize {
        self.dependents.len()
    }

    pub fn build(self) -> Result<OrchestratorSpec, TaskError> {
        let timeout = self.timeout.ok_or(TaskError::MissingTimeout)?;

        if timeout.is_zero() {
            return Err(TaskError::InvalidTimeout(timeout));
        }

        Ok(OrchestratorSpec {
            dependents: self.dependents,
            timeout,
            thread_name_prefix: self.thread_name_prefix,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
