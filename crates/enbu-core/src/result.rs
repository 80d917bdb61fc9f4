//! Outcome types (§3). Implemented as sum types so "passed with error"
//! is unrepresentable, per the design note in §9.

use std::path::PathBuf;

use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    NotInstalled,
    CommandFailed,
    AssertionFailed,
    ParseError,
    OutputParseError,
    Timeout,
    ValidationError,
}

impl ExecutionErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionErrorKind::NotInstalled => "not_installed",
            ExecutionErrorKind::CommandFailed => "command_failed",
            ExecutionErrorKind::AssertionFailed => "assertion_failed",
            ExecutionErrorKind::ParseError => "parse_error",
            ExecutionErrorKind::OutputParseError => "output_parse_error",
            ExecutionErrorKind::Timeout => "timeout",
            ExecutionErrorKind::ValidationError => "validation_error",
        }
    }
}

impl std::fmt::Display for ExecutionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenshotOutcome {
    Captured { path: PathBuf },
    Disabled,
    CaptureFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepError {
    pub kind: ExecutionErrorKind,
    pub message: String,
    pub screenshot: ScreenshotOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Passed {
        index: usize,
        command: Command,
        duration_ms: u64,
        stdout: Option<String>,
    },
    Failed {
        index: usize,
        command: Command,
        duration_ms: u64,
        error: StepError,
    },
}

impl StepResult {
    pub fn index(&self) -> usize {
        match self {
            StepResult::Passed { index, .. } | StepResult::Failed { index, .. } => *index,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, StepResult::Passed { .. })
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            StepResult::Passed { duration_ms, .. } | StepResult::Failed { duration_ms, .. } => {
                *duration_ms
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowError {
    pub step_index: usize,
    pub message: String,
    pub screenshot: ScreenshotOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowResult {
    Passed {
        flow: String,
        session_name: String,
        duration_ms: u64,
        steps: Vec<StepResult>,
    },
    Failed {
        flow: String,
        session_name: String,
        duration_ms: u64,
        steps: Vec<StepResult>,
        error: FlowError,
    },
}

impl FlowResult {
    pub fn flow_name(&self) -> &str {
        match self {
            FlowResult::Passed { flow, .. } | FlowResult::Failed { flow, .. } => flow,
        }
    }

    pub fn session_name(&self) -> &str {
        match self {
            FlowResult::Passed { session_name, .. } | FlowResult::Failed { session_name, .. } => {
                session_name
            }
        }
    }

    pub fn steps(&self) -> &[StepResult] {
        match self {
            FlowResult::Passed { steps, .. } | FlowResult::Failed { steps, .. } => steps,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            FlowResult::Passed { duration_ms, .. } | FlowResult::Failed { duration_ms, .. } => {
                *duration_ms
            }
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, FlowResult::Passed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub duration_ms: u64,
    pub flows: Vec<FlowResult>,
}

impl RunSummary {
    pub fn from_flows(flows: Vec<FlowResult>, duration_ms: u64) -> Self {
        let passed = flows.iter().filter(|f| f.is_passed()).count();
        let total = flows.len();
        Self {
            passed,
            failed: total - passed,
            total,
            duration_ms,
            flows,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passed_step(index: usize) -> StepResult {
        StepResult::Passed {
            index,
            command: Command::Snapshot,
            duration_ms: 10,
            stdout: None,
        }
    }

    #[test]
    fn unit_run_summary_counts_pass_and_fail_totals() {
        let passed_flow = FlowResult::Passed {
            flow: "a".to_string(),
            session_name: "enbu-a-aaaaaa".to_string(),
            duration_ms: 5,
            steps: vec![passed_step(0)],
        };
        let failed_flow = FlowResult::Failed {
            flow: "b".to_string(),
            session_name: "enbu-b-bbbbbb".to_string(),
            duration_ms: 5,
            steps: vec![passed_step(0)],
            error: FlowError {
                step_index: 1,
                message: "boom".to_string(),
                screenshot: ScreenshotOutcome::Disabled,
            },
        };
        let summary = RunSummary::from_flows(vec![passed_flow, failed_flow], 10);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn functional_all_passed_run_summary_has_zero_exit_code() {
        let flow = FlowResult::Passed {
            flow: "a".to_string(),
            session_name: "enbu-a-aaaaaa".to_string(),
            duration_ms: 5,
            steps: vec![passed_step(0)],
        };
        let summary = RunSummary::from_flows(vec![flow], 5);
        assert_eq!(summary.exit_code(), 0);
    }
}
