//! Validation/setup errors (§7): returned in place of a `FlowResult`,
//! never folded into a step's execution error.

use std::path::PathBuf;

use crate::branded::BrandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Known { line: usize, column: Option<usize> },
    NoInfo,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Known {
                line,
                column: Some(column),
            } => write!(f, "{line}:{column}"),
            Location::Known { line, column: None } => write!(f, "{line}"),
            Location::NoInfo => f.write_str("<unknown location>"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidYaml,
    InvalidCommand,
    MissingField,
    UnknownCommand,
}

impl ParseErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseErrorKind::InvalidYaml => "invalid_yaml",
            ParseErrorKind::InvalidCommand => "invalid_command",
            ParseErrorKind::MissingField => "missing_field",
            ParseErrorKind::UnknownCommand => "unknown_command",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("{location}: {kind}: {snippet}")]
pub struct ParseError {
    pub location: Location,
    pub kind: ParseErrorKind,
    pub snippet: String,
}

/// Errors surfaced before a flow ever produces a `FlowResult` (§7).
#[derive(Debug, Clone, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("undefined environment variable(s): {0:?}")]
    UndefinedEnv(Vec<String>),

    #[error("driver binary not found: {0}")]
    DriverNotInstalled(String),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error(transparent)]
    InvalidValue(#[from] BrandError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_undefined_env_error_lists_every_missing_name() {
        let err = SetupError::UndefinedEnv(vec!["BASE".to_string(), "TOKEN".to_string()]);
        let message = err.to_string();
        assert!(message.contains("BASE"));
        assert!(message.contains("TOKEN"));
    }

    #[test]
    fn unit_parse_error_display_includes_location_and_kind() {
        let err = ParseError {
            location: Location::Known {
                line: 4,
                column: Some(3),
            },
            kind: ParseErrorKind::UnknownCommand,
            snippet: "klick: Login".to_string(),
        };
        assert_eq!(err.to_string(), "4:3: unknown_command: klick: Login");
    }

    #[test]
    fn functional_no_info_location_formats_without_column() {
        assert_eq!(Location::NoInfo.to_string(), "<unknown location>");
    }
}
