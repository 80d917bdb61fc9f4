//! Step executor (§4.6): dispatches one command, times it, builds a
//! `StepResult`, and captures a screenshot on failure.

use std::time::Instant;

use enbu_core::{Command, ExecutionContext, FilePath, ScreenshotOutcome, StepError, StepResult};
use enbu_driver::{DriverAdapter, DriverError};

use crate::auto_wait::{wait_for_state, wait_until_resolved};

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis().try_into().unwrap_or(u64::MAX)
}

async fn capture_screenshot(
    driver: &DriverAdapter,
    context: &ExecutionContext,
    index: usize,
) -> ScreenshotOutcome {
    if !context.screenshots_enabled {
        return ScreenshotOutcome::Disabled;
    }
    let path = context.screenshot_path(index);
    let branded_path = match FilePath::new(path.to_string_lossy().into_owned()) {
        Ok(value) => value,
        Err(error) => {
            return ScreenshotOutcome::CaptureFailed {
                reason: error.to_string(),
            }
        }
    };
    match driver
        .screenshot(&branded_path, false, &context.session_name)
        .await
    {
        Ok(()) => ScreenshotOutcome::Captured { path },
        Err(error) => ScreenshotOutcome::CaptureFailed {
            reason: error.to_string(),
        },
    }
}

async fn failed_step(
    driver: &DriverAdapter,
    context: &ExecutionContext,
    index: usize,
    command: Command,
    start: Instant,
    error: DriverError,
) -> StepResult {
    let duration_ms = elapsed_ms(start);
    let screenshot = capture_screenshot(driver, context, index).await;
    StepResult::Failed {
        index,
        command,
        duration_ms,
        error: StepError {
            kind: error.kind(),
            message: error.to_string(),
            screenshot,
        },
    }
}

/// Runs one step end to end: auto-wait (if applicable), dispatch, timing,
/// and screenshot-on-failure (§4.6).
pub async fn execute_step(
    driver: &DriverAdapter,
    context: &ExecutionContext,
    index: usize,
    command: Command,
) -> StepResult {
    let start = Instant::now();

    if command.requires_auto_wait() {
        if let Some(selector) = command.selector() {
            if let Err(error) =
                wait_until_resolved(driver, selector, context.auto_wait, &context.session_name).await
            {
                return failed_step(driver, context, index, command, start, error).await;
            }
        }
    }

    let dispatch = match &command {
        Command::WaitFor { selector, state } => {
            wait_for_state(driver, selector, *state, context.auto_wait, &context.session_name)
                .await
                .map(|()| None)
        }
        _ => driver.dispatch(&command, &context.session_name).await.map(Some),
    };

    match dispatch {
        Ok(response) => {
            let duration_ms = elapsed_ms(start);
            let stdout = response.and_then(|value| value.data).map(|data| data.to_string());
            StepResult::Passed {
                index,
                command,
                duration_ms,
                stdout,
            }
        }
        Err(error) => failed_step(driver, context, index, command, start, error).await,
    }
}
