//! Spawns the browser-driver subprocess per command (§4.2, §6).
//!
//! The adapter is stateless between calls: every operation is a fresh
//! subprocess, timed out independently, with no persistent handle kept.

use std::process::Stdio;
use std::time::Duration;

use enbu_core::{Command, DriverOptions, FilePath, ScrollDirection, Selector, WaitState};
use serde::Deserialize;
use tokio::process::Command as TokioCommand;

use crate::error::{classify_driver_failure, DriverError};
use crate::response::{DriverResponse, SnapshotData};

#[derive(Debug, Clone)]
pub struct DriverAdapter {
    executable: String,
    options: DriverOptions,
}

impl DriverAdapter {
    pub fn new(executable: impl Into<String>, options: DriverOptions) -> Self {
        Self {
            executable: executable.into(),
            options,
        }
    }

    /// Builds the argument vector for `command` and dispatches it under
    /// `command.tag()` (§3 tag table).
    pub async fn dispatch(
        &self,
        command: &Command,
        session_name: &str,
    ) -> Result<DriverResponse, DriverError> {
        let args = command_args(command);
        self.invoke(command.tag(), &args, session_name).await
    }

    /// Polled by the auto-wait engine for `css`/`xpath` selectors (§4.5).
    pub async fn is_visible(
        &self,
        selector: &Selector,
        session_name: &str,
    ) -> Result<bool, DriverError> {
        let args = selector_args(selector);
        let (response, raw) = self.invoke_raw("is-visible", &args, session_name).await?;
        #[derive(Deserialize)]
        struct IsVisibleData {
            visible: bool,
        }
        let data: IsVisibleData = decode(&response, &raw)?;
        Ok(data.visible)
    }

    /// Polled by the auto-wait engine for `interactableText`/`ref` selectors,
    /// matching the target `name` against the returned refs (§4.5).
    pub async fn snapshot(&self, session_name: &str) -> Result<SnapshotData, DriverError> {
        let (response, raw) = self.invoke_raw("snapshot", &[], session_name).await?;
        decode(&response, &raw)
    }

    pub async fn screenshot(
        &self,
        path: &FilePath,
        full_page: bool,
        session_name: &str,
    ) -> Result<(), DriverError> {
        let mut args = vec![path.as_str().to_string()];
        if full_page {
            args.push("--full-page".to_string());
        }
        self.invoke("screenshot", &args, session_name).await?;
        Ok(())
    }

    async fn invoke(
        &self,
        verb: &str,
        args: &[String],
        session_name: &str,
    ) -> Result<DriverResponse, DriverError> {
        self.invoke_raw(verb, args, session_name).await.map(|(r, _)| r)
    }

    async fn invoke_raw(
        &self,
        verb: &str,
        args: &[String],
        session_name: &str,
    ) -> Result<(DriverResponse, String), DriverError> {
        tracing::debug!(verb, session_name, "dispatching driver command");
        let mut command = TokioCommand::new(&self.executable);
        command.kill_on_drop(true);
        command.arg(verb);
        command.args(args);
        command.arg("--json");
        command.arg("--session");
        command.arg(session_name);
        if self.options.headed {
            command.arg("--headed");
        }
        if let Some(dir) = &self.options.working_dir {
            command.current_dir(dir);
        }
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let child = command.spawn().map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                DriverError::NotInstalled(self.executable.clone())
            } else {
                DriverError::CommandFailed(format!(
                    "failed to spawn driver '{}': {error}",
                    self.executable
                ))
            }
        })?;

        let timeout_ms = self.options.command_timeout_ms;
        let output = tokio::time::timeout(Duration::from_millis(timeout_ms), child.wait_with_output())
            .await
            .map_err(|_| DriverError::Timeout { timeout_ms })?
            .map_err(|error| {
                DriverError::CommandFailed(format!("driver process failed: {error}"))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let response = DriverResponse::parse(&stdout)?;

        if !output.status.success() || !response.success {
            let message = response
                .error
                .clone()
                .unwrap_or_else(|| "driver reported failure with no message".to_string());
            tracing::warn!(verb, session_name, %message, "driver command failed");
            return Err(classify_driver_failure(message));
        }

        Ok((response, stdout))
    }
}

fn decode<T: for<'de> Deserialize<'de>>(
    response: &DriverResponse,
    raw: &str,
) -> Result<T, DriverError> {
    response.data_as(raw)
}

fn selector_args(selector: &Selector) -> Vec<String> {
    vec![
        format!("--{}", selector.kind_tag()),
        selector.as_str().to_string(),
    ]
}

fn command_args(command: &Command) -> Vec<String> {
    match command {
        Command::Open { url } => vec![url.as_str().to_string()],
        Command::Click { selector }
        | Command::DblClick { selector }
        | Command::Hover { selector }
        | Command::Focus { selector }
        | Command::ScrollIntoView { selector }
        | Command::Check { selector }
        | Command::Uncheck { selector }
        | Command::AssertVisible { selector }
        | Command::AssertNotVisible { selector }
        | Command::AssertEnabled { selector }
        | Command::AssertChecked { selector } => selector_args(selector),
        Command::Type { selector, value } | Command::Fill { selector, value } => {
            let mut args = selector_args(selector);
            args.push(value.clone());
            args
        }
        Command::Press { key } => vec![key.as_str().to_string()],
        Command::Select { selector, value } => {
            let mut args = selector_args(selector);
            args.push(value.clone());
            args
        }
        Command::Upload { selector, files } => {
            let mut args = selector_args(selector);
            args.extend(files.iter().map(|f| f.as_str().to_string()));
            args
        }
        Command::Drag { source, target } => {
            let mut args = selector_args(source);
            args.push("--target".to_string());
            args.extend(selector_args(target));
            args
        }
        Command::Scroll { direction, amount } => {
            vec![direction_arg(*direction).to_string(), amount.to_string()]
        }
        Command::WaitMs { ms } => vec!["--ms".to_string(), ms.to_string()],
        Command::WaitFor { selector, state } => {
            let mut args = selector_args(selector);
            args.push("--state".to_string());
            args.push(wait_state_arg(*state).to_string());
            args
        }
        Command::Screenshot { path, full_page } => {
            let mut args = vec![path.as_str().to_string()];
            if *full_page {
                args.push("--full-page".to_string());
            }
            args
        }
        Command::Snapshot => Vec::new(),
        Command::Eval { script } => vec![script.as_str().to_string()],
    }
}

fn direction_arg(direction: ScrollDirection) -> &'static str {
    direction.as_str()
}

fn wait_state_arg(state: WaitState) -> &'static str {
    state.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use enbu_core::{CssSelector, InteractableText, Url};

    #[test]
    fn unit_open_command_args_is_just_the_url() {
        let command = Command::Open {
            url: Url::new("https://example.com").unwrap(),
        };
        assert_eq!(command_args(&command), vec!["https://example.com"]);
    }

    #[test]
    fn unit_selector_args_prefixes_with_kind_tag() {
        let selector = Selector::Css(CssSelector::new("#go").unwrap());
        assert_eq!(selector_args(&selector), vec!["--css", "#go"]);
    }

    #[test]
    fn functional_drag_command_args_include_both_selectors() {
        let command = Command::Drag {
            source: Selector::InteractableText(InteractableText::new("Card").unwrap()),
            target: Selector::Css(CssSelector::new("#bin").unwrap()),
        };
        let args = command_args(&command);
        assert_eq!(
            args,
            vec!["--text", "Card", "--target", "--css", "#bin"]
        );
    }

    #[tokio::test]
    async fn integration_dispatch_reports_not_installed_for_missing_binary() {
        let adapter = DriverAdapter::new("/nonexistent/driver-binary", DriverOptions::default());
        let result = adapter.dispatch(&Command::Snapshot, "enbu-test-000000").await;
        assert!(matches!(result, Err(DriverError::NotInstalled(_))));
    }

    /// Writes a stand-in driver binary that echoes back `{success,data,error}`
    /// for a handful of verbs, the same shape
    /// `write_mock_playwright_cli` uses in the browser-automation crate this
    /// adapter is modeled on.
    fn write_mock_driver_cli(path: &std::path::Path) {
        std::fs::write(
            path,
            r#"#!/usr/bin/env python3
import json
import sys

verb = sys.argv[1] if len(sys.argv) > 1 else ""

if verb == "snapshot":
    print(json.dumps({
        "success": True,
        "data": {"refs": {"e1": {"name": "Login", "role": "button"}}},
        "error": None,
    }))
    raise SystemExit(0)

if verb == "is-visible":
    print(json.dumps({"success": True, "data": {"visible": True}, "error": None}))
    raise SystemExit(0)

print(json.dumps({"success": True, "data": {"verb": verb}, "error": None}))
"#,
        )
        .expect("write mock driver cli");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path).expect("stat").permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn integration_dispatch_decodes_success_json_from_a_real_subprocess() {
        let tempdir = tempfile::tempdir().unwrap();
        let script_path = tempdir.path().join("mock-driver.py");
        write_mock_driver_cli(&script_path);

        let adapter = DriverAdapter::new(script_path.to_string_lossy().into_owned(), DriverOptions::default());
        let response = adapter
            .dispatch(&Command::Open { url: Url::new("https://example.com").unwrap() }, "enbu-test-000000")
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(
            response.data.unwrap().get("verb").and_then(|v| v.as_str()),
            Some("open")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn integration_snapshot_decodes_refs_from_a_real_subprocess() {
        let tempdir = tempfile::tempdir().unwrap();
        let script_path = tempdir.path().join("mock-driver.py");
        write_mock_driver_cli(&script_path);

        let adapter = DriverAdapter::new(script_path.to_string_lossy().into_owned(), DriverOptions::default());
        let snapshot = adapter.snapshot("enbu-test-000000").await.unwrap();
        let login = snapshot.refs.get("e1").unwrap();
        assert_eq!(login.name, "Login");
        assert_eq!(login.role, "button");
    }
}
