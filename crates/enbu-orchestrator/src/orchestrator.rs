//! Fans out file discovery, per-flow session naming, and flow execution,
//! then aggregates into a `RunSummary` (§4.8).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use enbu_core::{AutoWaitPolicy, DriverOptions, ExecutionContext, RunSummary, SetupError};
use enbu_driver::DriverAdapter;
use enbu_exec::{run_flow, ProgressSink};
use tokio::sync::Semaphore;

use crate::discover::resolve_files;
use crate::session::{flow_name_from_path, generate_session_name};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub files: Vec<String>,
    pub cwd: PathBuf,
    pub env: HashMap<String, String>,
    pub driver_executable: String,
    pub driver_options: DriverOptions,
    pub auto_wait: AutoWaitPolicy,
    pub bail: bool,
    pub screenshots_enabled: bool,
    pub screenshot_dir: PathBuf,
    pub parallel: usize,
    /// Overrides the generated session name (§6 `--session`); only
    /// meaningful when exactly one flow file is resolved, since every
    /// concurrent flow otherwise needs a distinct session (§5).
    pub session_override: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            cwd: PathBuf::from("."),
            env: HashMap::new(),
            driver_executable: "enbu-driver-playwright".to_string(),
            driver_options: DriverOptions::default(),
            auto_wait: AutoWaitPolicy::default(),
            bail: true,
            screenshots_enabled: true,
            screenshot_dir: PathBuf::from("./enbu-screenshots"),
            parallel: 1,
            session_override: None,
        }
    }
}

async fn run_one_flow(
    path: PathBuf,
    session_override: Option<String>,
    options: RunOptions,
    progress: Arc<dyn ProgressSink>,
) -> Result<enbu_core::FlowResult, SetupError> {
    let source = std::fs::read_to_string(&path).map_err(|_| SetupError::FileNotFound(path.clone()))?;
    let parsed = enbu_parser::parse_flow_document(&source)?;

    let flow_name = flow_name_from_path(&path);
    let absolute_path = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
    let session_name =
        session_override.unwrap_or_else(|| generate_session_name(&flow_name, &absolute_path));

    let context = ExecutionContext {
        session_name,
        driver: options.driver_options.clone(),
        env: options.env.clone(),
        auto_wait: options.auto_wait,
        bail: options.bail,
        screenshots_enabled: options.screenshots_enabled,
        screenshot_dir: options.screenshot_dir.clone(),
    };

    let driver = DriverAdapter::new(options.driver_executable.clone(), options.driver_options.clone());
    run_flow(&driver, context, parsed.flow, progress.as_ref()).await
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

/// True when `executable` can actually be spawned: an absolute/relative
/// path must exist as an executable file, a bare name must resolve
/// somewhere on `PATH` (§7's "missing driver binary when known before
/// first command" case).
fn driver_is_resolvable(executable: &str) -> bool {
    let trimmed = executable.trim();
    if trimmed.is_empty() {
        return false;
    }
    let path = Path::new(trimmed);
    if path.is_absolute() || trimmed.contains(std::path::MAIN_SEPARATOR) {
        return is_executable_file(path);
    }
    std::env::var_os("PATH")
        .map(|paths| {
            std::env::split_paths(&paths).any(|dir| is_executable_file(&dir.join(trimmed)))
        })
        .unwrap_or(false)
}

/// Runs every resolved flow file, up to `options.parallel` concurrently,
/// and aggregates the results (§4.8, §5).
pub async fn run(
    options: RunOptions,
    progress: Arc<dyn ProgressSink>,
) -> Result<RunSummary, SetupError> {
    let started = std::time::Instant::now();
    let files = resolve_files(&options.files, &options.cwd)?;
    if !driver_is_resolvable(&options.driver_executable) {
        return Err(SetupError::DriverNotInstalled(options.driver_executable.clone()));
    }
    let parallel = options.parallel.max(1);
    let semaphore = Arc::new(Semaphore::new(parallel));
    let session_override = if files.len() == 1 {
        options.session_override.clone()
    } else {
        None
    };

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let semaphore = semaphore.clone();
        let options = options.clone();
        let progress = progress.clone();
        let session_override = session_override.clone();
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore never closed");
            run_one_flow(path, session_override, options, progress).await
        }));
    }

    let mut flows = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await.map_err(|join_error| {
            SetupError::FileNotFound(PathBuf::from(format!("flow task panicked: {join_error}")))
        })?;
        flows.push(result?);
    }

    let duration_ms = started.elapsed().as_millis().try_into().unwrap_or(u64::MAX);
    Ok(RunSummary::from_flows(flows, duration_ms))
}
