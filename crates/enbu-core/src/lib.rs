//! Foundational data model shared by every other `enbu` crate: branded
//! string types, the typed `Command` union, the parsed `Flow`, the
//! per-run `ExecutionContext`, outcome types, and setup/validation errors.
//!
//! Carries a couple of low-level utilities (atomic file writes, time
//! helpers) used by the orchestrator and CLI for session/state scaffolding.

pub mod atomic_io;
pub mod branded;
pub mod command;
pub mod context;
pub mod error;
pub mod flow;
pub mod result;
pub mod time_utils;

pub use atomic_io::write_text_atomic;
pub use branded::{
    BrandError, BrandErrorKind, CssSelector, ElementRef, FilePath, InteractableText, JsExpression,
    KeyboardKey, Selector, Url, XpathSelector,
};
pub use command::{Command, ScrollDirection, WaitState};
pub use context::{AutoWaitPolicy, DriverOptions, ExecutionContext};
pub use error::{Location, ParseError, ParseErrorKind, SetupError};
pub use flow::Flow;
pub use result::{
    ExecutionErrorKind, FlowError, FlowResult, RunSummary, ScreenshotOutcome, StepError,
    StepResult,
};
pub use time_utils::current_unix_timestamp;

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use super::*;

    #[test]
    fn write_text_atomic_writes_content() {
        let tempdir = tempfile::tempdir().expect("tempdir");
        let path = tempdir.path().join("sample.txt");
        write_text_atomic(&path, "hello world").expect("write");
        let contents = read_to_string(&path).expect("read");
        assert_eq!(contents, "hello world");
    }
}
