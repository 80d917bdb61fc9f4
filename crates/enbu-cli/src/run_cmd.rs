//! Wires parsed CLI flags into `enbu_orchestrator::RunOptions`, runs the
//! orchestrator, prints the final report, and decides the process exit code
//! (§6: `0` success, `1` one or more flows failed, `2` argument/
//! execution error).

use std::sync::Arc;

use anyhow::{Context, Result};
use enbu_core::{AutoWaitPolicy, DriverOptions};
use enbu_exec::ProgressSink;
use enbu_orchestrator::{run as run_orchestrator, RunOptions};

use crate::cli_args::RunArgs;
use crate::progress_printer::{HumanProgressPrinter, NdjsonProgressPrinter};
use crate::report::print_run_summary;

/// Exit code per §6; `2` signals a setup/validation error rather than
/// any flow actually failing.
pub async fn run_command(args: RunArgs) -> Result<i32> {
    let env = args.parsed_env().context("invalid --env flag")?;
    let cwd = match &args.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    if args.session.is_some() && args.files.len() > 1 {
        tracing::warn!("--session is ignored when more than one flow file is resolved");
    }

    let options = RunOptions {
        files: args.files.clone(),
        cwd,
        env,
        driver_executable: args.driver.clone(),
        driver_options: DriverOptions {
            headed: args.headed,
            command_timeout_ms: args.timeout,
            working_dir: None,
        },
        auto_wait: AutoWaitPolicy::default(),
        bail: args.resolved_bail(),
        screenshots_enabled: args.resolved_screenshot(),
        screenshot_dir: std::path::PathBuf::from("./enbu-screenshots"),
        parallel: args.parallel,
        session_override: args.session.clone(),
    };

    let progress: Arc<dyn ProgressSink> = if args.progress_json {
        Arc::new(NdjsonProgressPrinter)
    } else {
        Arc::new(HumanProgressPrinter)
    };

    let summary = run_orchestrator(options, progress).await?;

    if !args.progress_json {
        print_run_summary(&summary);
    }

    Ok(summary.exit_code())
}
