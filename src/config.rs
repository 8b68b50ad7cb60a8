// Tue Jan 13 2026 - Alex

use crate::engine::error::TaskError;
use crate::engine::worker::DEFAULT_THREAD_NAME_PREFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub timeout_seconds: u64,
    pub thread_name_prefix: String,
    pub verbose: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 300,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            verbose: false,
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, TaskError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, TaskError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String, TaskError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_thread_name_prefix(mut self, prefix: &str) -> Self {
        self.thread_name_prefix = prefix.to_string();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Result<(), TaskError> {
        if self.timeout_seconds == 0 {
            return Err(TaskError::Config("timeout_seconds must be greater than 0".to_string()));
        }
        if self.thread_name_prefix.trim().is_empty() {
            return Err(TaskError::Config("thread_name_prefix must not be empty".to_string()));
        }
        Ok(())
    }
}
