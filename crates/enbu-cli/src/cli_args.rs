//! Argument surface (§6): a thin layer that still needs a concrete shape
//! to drive the core via `enbu-orchestrator`.
//!
//! `run` is the implicit default (flow files/globs given directly on the
//! command line); `init` is the only named subcommand, matching §6's
//! "Subcommands: init, run (default)".

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "enbu", about = "Declarative browser-automation flow runner", version)]
pub struct Cli {
    /// Raise the default log level from `info` to `debug`.
    #[arg(long, global = true, env = "ENBU_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scaffolds `.enbuflow/` with a starter flow file.
    Init,
}

#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Flow files or globs to run. Defaults to `.enbuflow/*.enbu.yaml`.
    pub files: Vec<String>,

    /// Run the browser driver headed instead of headless.
    #[arg(long, env = "ENBU_HEADED")]
    pub headed: bool,

    /// `KEY=VALUE` environment override, repeatable. Wins over the flow's own `env` block.
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Per-command driver subprocess timeout, in milliseconds.
    #[arg(long, env = "ENBU_TIMEOUT_MS", default_value_t = 30_000)]
    pub timeout: u64,

    /// Capture a screenshot when a step fails.
    #[arg(long, overrides_with = "no_screenshot", default_value_t = true)]
    pub screenshot: bool,

    /// Disable screenshot capture on step failure.
    #[arg(long, overrides_with = "screenshot")]
    pub no_screenshot: bool,

    /// Stop a flow at its first failing step.
    #[arg(long, overrides_with = "no_bail", default_value_t = true)]
    pub bail: bool,

    /// Run every step even after one fails.
    #[arg(long, overrides_with = "bail")]
    pub no_bail: bool,

    /// Override the driver session name (only valid with exactly one flow file).
    #[arg(long)]
    pub session: Option<String>,

    /// Emit one NDJSON progress event per line instead of the human summary.
    #[arg(long)]
    pub progress_json: bool,

    /// Number of flow files to run concurrently.
    #[arg(long, default_value_t = 1)]
    pub parallel: usize,

    /// Path to the browser-driver executable.
    #[arg(long, env = "ENBU_DRIVER", default_value = "enbu-driver-playwright")]
    pub driver: String,

    /// Working directory used to resolve relative flow file globs.
    #[arg(long)]
    pub cwd: Option<PathBuf>,
}

impl RunArgs {
    /// Parses `--env KEY=VALUE` entries, rejecting malformed ones up front
    /// rather than silently dropping them.
    pub fn parsed_env(&self) -> anyhow::Result<std::collections::HashMap<String, String>> {
        let mut map = std::collections::HashMap::new();
        for entry in &self.env {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("--env '{entry}' is not in KEY=VALUE form"))?;
            if key.is_empty() {
                anyhow::bail!("--env '{entry}' has an empty key");
            }
            map.insert(key.to_string(), value.to_string());
        }
        Ok(map)
    }

    pub fn resolved_screenshot(&self) -> bool {
        !self.no_screenshot && self.screenshot
    }

    pub fn resolved_bail(&self) -> bool {
        !self.no_bail && self.bail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(env: Vec<&str>) -> RunArgs {
        RunArgs {
            files: vec![],
            headed: false,
            env: env.into_iter().map(str::to_string).collect(),
            timeout: 1,
            screenshot: true,
            no_screenshot: false,
            bail: true,
            no_bail: false,
            session: None,
            progress_json: false,
            parallel: 1,
            driver: "x".to_string(),
            cwd: None,
        }
    }

    #[test]
    fn unit_parsed_env_splits_key_value_pairs() {
        let args = run_args(vec!["BASE=https://example.com", "TOKEN=abc"]);
        let env = args.parsed_env().unwrap();
        assert_eq!(env.get("BASE").map(String::as_str), Some("https://example.com"));
        assert_eq!(env.get("TOKEN").map(String::as_str), Some("abc"));
    }

    #[test]
    fn regression_parsed_env_rejects_entries_without_equals() {
        assert!(run_args(vec!["NOTKEYVALUE"]).parsed_env().is_err());
        assert!(run_args(vec!["=value"]).parsed_env().is_err());
    }

    #[test]
    fn functional_no_screenshot_flag_overrides_the_default() {
        let args = Cli::parse_from(["enbu", "--no-screenshot"]);
        assert!(!args.run.resolved_screenshot());
    }

    #[test]
    fn functional_no_bail_flag_overrides_the_default() {
        let args = Cli::parse_from(["enbu", "--no-bail"]);
        assert!(!args.run.resolved_bail());
    }

    #[test]
    fn functional_init_subcommand_parses_without_run_args() {
        let args = Cli::parse_from(["enbu", "init"]);
        assert!(matches!(args.command, Some(Command::Init)));
    }

    #[test]
    fn functional_bare_file_args_populate_run_files() {
        let args = Cli::parse_from(["enbu", "a.enbu.yaml", "b.enbu.yaml"]);
        assert!(args.command.is_none());
        assert_eq!(args.run.files, vec!["a.enbu.yaml", "b.enbu.yaml"]);
    }
}
