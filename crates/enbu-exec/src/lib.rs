//! Sequential step/flow execution: auto-wait polling, per-step dispatch,
//! screenshot-on-failure, bail/continue policy, and progress events
//! (§4.5, §4.6, §4.7).

pub mod auto_wait;
pub mod flow_exec;
pub mod progress;
pub mod step;

pub use flow_exec::{execute_flow, run_flow};
pub use progress::{NoopProgressSink, ProgressEvent, ProgressSink};
pub use step::execute_step;
