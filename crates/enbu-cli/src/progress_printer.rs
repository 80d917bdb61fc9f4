//! Human and NDJSON progress printers (§6 "Progress stream"). Both
//! implement `enbu_exec::ProgressSink`; `--progress-json` picks between them.
//! Progress output goes straight to stdout rather than through `tracing`
//! since it's for the operator, not diagnostics.

use async_trait::async_trait;
use enbu_exec::{ProgressEvent, ProgressSink};
use serde::Serialize;

/// One line per step start/complete and flow start/complete, matching
/// §7's "one-line summary per flow ... per failed step" shape.
pub struct HumanProgressPrinter;

#[async_trait]
impl ProgressSink for HumanProgressPrinter {
    async fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FlowStart { flow_name, step_total } => {
                println!("=== {flow_name} ({step_total} steps) ===");
            }
            ProgressEvent::StepStart { flow_name, step_index } => {
                println!("[{flow_name}] step {step_index} ...");
            }
            ProgressEvent::StepComplete {
                flow_name,
                step_index,
                passed,
                duration_ms,
            } => {
                let status = if passed { "ok" } else { "FAILED" };
                println!("[{flow_name}] step {step_index} {status} ({duration_ms}ms)");
            }
            ProgressEvent::FlowComplete {
                flow_name,
                passed,
                duration_ms,
            } => {
                let status = if passed { "passed" } else { "failed" };
                println!("=== {flow_name} {status} ({duration_ms}ms) ===");
            }
        }
    }
}

/// NDJSON event kinds, one JSON object per line (§6).
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum NdjsonEvent<'a> {
    #[serde(rename = "flow:start")]
    FlowStart { flow_name: &'a str, step_total: usize },
    #[serde(rename = "step:start")]
    StepStart { flow_name: &'a str, step_index: usize },
    #[serde(rename = "step:complete")]
    StepComplete {
        flow_name: &'a str,
        step_index: usize,
        status: &'static str,
        duration: u64,
    },
    #[serde(rename = "flow:complete")]
    FlowComplete {
        flow_name: &'a str,
        status: &'static str,
        duration: u64,
    },
}

pub struct NdjsonProgressPrinter;

#[async_trait]
impl ProgressSink for NdjsonProgressPrinter {
    async fn on_event(&self, event: ProgressEvent) {
        let line = match &event {
            ProgressEvent::FlowStart { flow_name, step_total } => NdjsonEvent::FlowStart {
                flow_name,
                step_total: *step_total,
            },
            ProgressEvent::StepStart { flow_name, step_index } => NdjsonEvent::StepStart {
                flow_name,
                step_index: *step_index,
            },
            ProgressEvent::StepComplete {
                flow_name,
                step_index,
                passed,
                duration_ms,
            } => NdjsonEvent::StepComplete {
                flow_name,
                step_index: *step_index,
                status: if *passed { "passed" } else { "failed" },
                duration: *duration_ms,
            },
            ProgressEvent::FlowComplete {
                flow_name,
                passed,
                duration_ms,
            } => NdjsonEvent::FlowComplete {
                flow_name,
                status: if *passed { "passed" } else { "failed" },
                duration: *duration_ms,
            },
        };
        match serde_json::to_string(&line) {
            Ok(json) => println!("{json}"),
            Err(error) => tracing::warn!(%error, "failed to serialize progress event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_ndjson_event_serializes_with_tag_field() {
        let event = NdjsonEvent::FlowStart {
            flow_name: "login",
            step_total: 2,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"flow:start\""));
        assert!(json.contains("\"flow_name\":\"login\""));
    }

    #[tokio::test]
    async fn functional_human_printer_accepts_every_event_kind_without_panicking() {
        let printer = HumanProgressPrinter;
        printer
            .on_event(ProgressEvent::FlowStart {
                flow_name: "demo".to_string(),
                step_total: 1,
            })
            .await;
        printer
            .on_event(ProgressEvent::StepComplete {
                flow_name: "demo".to_string(),
                step_index: 0,
                passed: false,
                duration_ms: 12,
            })
            .await;
    }
}
