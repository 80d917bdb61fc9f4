//! The progress callback interface (§4.7, §9): fire-and-forget but
//! awaited so observers see events in causal order within a flow.

use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    FlowStart {
        flow_name: String,
        step_total: usize,
    },
    StepStart {
        flow_name: String,
        step_index: usize,
    },
    StepComplete {
        flow_name: String,
        step_index: usize,
        passed: bool,
        duration_ms: u64,
    },
    FlowComplete {
        flow_name: String,
        passed: bool,
        duration_ms: u64,
    },
}

#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn on_event(&self, event: ProgressEvent);
}

/// The no-op sentinel for callers that don't need progress events (§9).
pub struct NoopProgressSink;

#[async_trait]
impl ProgressSink for NoopProgressSink {
    async fn on_event(&self, _event: ProgressEvent) {}
}
