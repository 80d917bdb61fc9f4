//! Flow executor (§4.7): sequential step iteration, bail/continue
//! policy, progress events, and `FlowResult` aggregation.

use std::time::Instant;

use enbu_core::{ExecutionContext, Flow, FlowError, FlowResult, SetupError, StepResult};
use enbu_driver::DriverAdapter;

use crate::progress::{ProgressEvent, ProgressSink};
use crate::step::execute_step;

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis().try_into().unwrap_or(u64::MAX)
}

/// Runs every step of an already-expanded flow, emitting `started`/
/// `completed` progress around each one. Stops at the first failure when
/// `context.bail` is set.
pub async fn execute_flow(
    driver: &DriverAdapter,
    context: &ExecutionContext,
    flow: &Flow,
    progress: &dyn ProgressSink,
) -> FlowResult {
    let start = Instant::now();
    let mut steps = Vec::with_capacity(flow.steps.len());
    let mut first_failure = None;

    progress
        .on_event(ProgressEvent::FlowStart {
            flow_name: flow.name.clone(),
            step_total: flow.steps.len(),
        })
        .await;

    for (index, command) in flow.steps.iter().cloned().enumerate() {
        progress
            .on_event(ProgressEvent::StepStart {
                flow_name: flow.name.clone(),
                step_index: index,
            })
            .await;

        let result = execute_step(driver, context, index, command).await;
        let passed = result.is_passed();
        let duration_ms = result.duration_ms();

        if let StepResult::Failed { error, .. } = &result {
            if first_failure.is_none() {
                first_failure = Some(FlowError {
                    step_index: index,
                    message: error.message.clone(),
                    screenshot: error.screenshot.clone(),
                });
            }
        }

        let should_bail = !passed && context.bail;
        steps.push(result);

        progress
            .on_event(ProgressEvent::StepComplete {
                flow_name: flow.name.clone(),
                step_index: index,
                passed,
                duration_ms,
            })
            .await;

        if should_bail {
            break;
        }
    }

    let duration_ms = elapsed_ms(start);
    let flow_result = match first_failure {
        None => FlowResult::Passed {
            flow: flow.name.clone(),
            session_name: context.session_name.clone(),
            duration_ms,
            steps,
        },
        Some(error) => FlowResult::Failed {
            flow: flow.name.clone(),
            session_name: context.session_name.clone(),
            duration_ms,
            steps,
            error,
        },
    };

    progress
        .on_event(ProgressEvent::FlowComplete {
            flow_name: flow.name.clone(),
            passed: flow_result.is_passed(),
            duration_ms,
        })
        .await;

    flow_result
}

/// Merges `context.env` (the caller-supplied overrides) over `flow.env`,
/// expands `${VAR}` references, then runs the flow (§4.7). A failed
/// expansion is a setup error, never a `FlowResult` (§7).
pub async fn run_flow(
    driver: &DriverAdapter,
    mut context: ExecutionContext,
    flow: Flow,
    progress: &dyn ProgressSink,
) -> Result<FlowResult, SetupError> {
    let mut merged_env = flow.env.clone();
    merged_env.extend(context.env.clone());
    context.env = merged_env.clone();

    let expanded = enbu_parser::expand_flow(flow, &merged_env)?;
    Ok(execute_flow(driver, &context, &expanded, progress).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enbu_core::{Command, DriverOptions, Url};
    use std::collections::HashMap;

    fn context() -> ExecutionContext {
        ExecutionContext {
            session_name: "enbu-test-000000".to_string(),
            driver: DriverOptions::default(),
            env: HashMap::new(),
            auto_wait: Default::default(),
            bail: true,
            screenshots_enabled: false,
            screenshot_dir: std::path::PathBuf::from("./enbu-screenshots"),
        }
    }

    #[tokio::test]
    async fn functional_bail_truncates_steps_at_first_failure() {
        let driver = DriverAdapter::new("/nonexistent/driver-binary", DriverOptions::default());
        let flow = Flow::new(
            "demo",
            HashMap::new(),
            vec![
                Command::Open {
                    url: Url::new("https://example.com").unwrap(),
                },
                Command::Snapshot,
            ],
        );
        let result = execute_flow(&driver, &context(), &flow, &crate::progress::NoopProgressSink).await;
        match result {
            FlowResult::Failed { steps, error, .. } => {
                assert_eq!(steps.len(), 1);
                assert_eq!(error.step_index, 0);
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn regression_undefined_env_variable_fails_run_flow_before_any_step_runs() {
        let driver = DriverAdapter::new("/nonexistent/driver-binary", DriverOptions::default());
        let flow = Flow::new(
            "demo",
            HashMap::new(),
            vec![Command::Open {
                url: Url::new("${BASE}").unwrap(),
            }],
        );
        let result = run_flow(&driver, context(), flow, &crate::progress::NoopProgressSink).await;
        assert!(matches!(result, Err(SetupError::UndefinedEnv(_))));
    }
}
