//! Final human-readable report (§7 "User-visible behavior"): a
//! one-line summary per flow, then per failed step `stepIndex: kind:
//! message [screenshot path]`, then a final summary line.

use enbu_core::{RunSummary, ScreenshotOutcome, StepResult};

fn screenshot_suffix(outcome: &ScreenshotOutcome) -> String {
    match outcome {
        ScreenshotOutcome::Captured { path } => format!(" [screenshot: {}]", path.display()),
        ScreenshotOutcome::CaptureFailed { reason } => format!(" [screenshot capture failed: {reason}]"),
        ScreenshotOutcome::Disabled => String::new(),
    }
}

pub fn print_run_summary(summary: &RunSummary) {
    for flow in &summary.flows {
        let status = if flow.is_passed() { "PASS" } else { "FAIL" };
        println!("{status} {} ({}ms)", flow.flow_name(), flow.duration_ms());

        for step in flow.steps() {
            if let StepResult::Failed { index, error, .. } = step {
                println!(
                    "  {index}: {}: {}{}",
                    error.kind,
                    error.message,
                    screenshot_suffix(&error.screenshot)
                );
            }
        }
    }

    println!(
        "{} passed, {} failed, {} total ({}ms)",
        summary.passed, summary.failed, summary.total, summary.duration_ms
    );
}
