//! Per-flow execution context (§3): constructed once by the flow
//! executor and passed by reference to the step executor and driver adapter.

use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverOptions {
    pub headed: bool,
    pub command_timeout_ms: u64,
    pub working_dir: Option<PathBuf>,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            headed: false,
            command_timeout_ms: 30_000,
            working_dir: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoWaitPolicy {
    pub timeout_ms: u64,
    pub interval_ms: u64,
}

impl Default for AutoWaitPolicy {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub session_name: String,
    pub driver: DriverOptions,
    pub env: HashMap<String, String>,
    pub auto_wait: AutoWaitPolicy,
    pub bail: bool,
    pub screenshots_enabled: bool,
    pub screenshot_dir: PathBuf,
}

impl ExecutionContext {
    pub fn screenshot_path(&self, step_index: usize) -> PathBuf {
        self.screenshot_dir
            .join(format!("{}-step{}.png", self.session_name, step_index))
    }
}
