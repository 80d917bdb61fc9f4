//! The driver error taxonomy (§4.2): every way a subprocess invocation
//! can fail to yield a usable result, mapped onto the shared execution-error
//! kind used to build a `Failed` `StepResult`.

use enbu_core::ExecutionErrorKind;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DriverError {
    #[error("browser driver binary not found: {0}")]
    NotInstalled(String),

    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    #[error("driver reported invalid input: {0}")]
    ValidationError(String),

    #[error("driver command failed: {0}")]
    CommandFailed(String),

    #[error("failed to parse driver stdout: {raw_output}")]
    ParseError { raw_output: String },

    #[error("driver command timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("driver output did not match the expected shape: {issues:?}")]
    OutputParseError {
        issues: Vec<String>,
        raw_output: String,
    },
}

impl DriverError {
    pub fn kind(&self) -> ExecutionErrorKind {
        match self {
            DriverError::NotInstalled(_) => ExecutionErrorKind::NotInstalled,
            DriverError::AssertionFailed(_) => ExecutionErrorKind::AssertionFailed,
            DriverError::ValidationError(_) => ExecutionErrorKind::ValidationError,
            DriverError::CommandFailed(_) => ExecutionErrorKind::CommandFailed,
            DriverError::ParseError { .. } => ExecutionErrorKind::ParseError,
            DriverError::Timeout { .. } => ExecutionErrorKind::Timeout,
            DriverError::OutputParseError { .. } => ExecutionErrorKind::OutputParseError,
        }
    }
}

/// An "Assertion..."-prefixed driver error message is a failed assertion; a
/// "Validation..."-prefixed one rejects the command's own input rather than
/// failing to carry it out. Anything else is a generic command failure
/// (§4.2, §7).
pub fn classify_driver_failure(message: String) -> DriverError {
    if message.starts_with("Assertion") {
        DriverError::AssertionFailed(message)
    } else if message.starts_with("Validation") {
        DriverError::ValidationError(message)
    } else {
        DriverError::CommandFailed(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_assertion_prefixed_message_classifies_as_assertion_failed() {
        let err = classify_driver_failure("Assertion failed: expected visible".to_string());
        assert!(matches!(err, DriverError::AssertionFailed(_)));
        assert_eq!(err.kind(), ExecutionErrorKind::AssertionFailed);
    }

    #[test]
    fn unit_other_message_classifies_as_command_failed() {
        let err = classify_driver_failure("Connection refused".to_string());
        assert!(matches!(err, DriverError::CommandFailed(_)));
        assert_eq!(err.kind(), ExecutionErrorKind::CommandFailed);
    }

    #[test]
    fn unit_validation_prefixed_message_classifies_as_validation_error() {
        let err = classify_driver_failure("Validation failed: unknown key 'Fnord'".to_string());
        assert!(matches!(err, DriverError::ValidationError(_)));
        assert_eq!(err.kind(), ExecutionErrorKind::ValidationError);
    }
}
