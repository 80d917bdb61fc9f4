//! The typed command model every YAML step resolves to (§3).

use serde::{Deserialize, Serialize};

use crate::branded::{FilePath, JsExpression, KeyboardKey, Selector, Url};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitState {
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::Left => "left",
            ScrollDirection::Right => "right",
        }
    }
}

/// One step of a flow. A command carries exactly one selector kind where
/// applicable; the branded wrappers keep that distinction through every
/// internal API (§3, §4.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Open { url: Url },
    Click { selector: Selector },
    DblClick { selector: Selector },
    Hover { selector: Selector },
    Focus { selector: Selector },
    ScrollIntoView { selector: Selector },
    Type { selector: Selector, value: String },
    Fill { selector: Selector, value: String },
    Press { key: KeyboardKey },
    Select { selector: Selector, value: String },
    Check { selector: Selector },
    Uncheck { selector: Selector },
    Upload { selector: Selector, files: Vec<FilePath> },
    Drag { source: Selector, target: Selector },
    Scroll { direction: ScrollDirection, amount: f64 },
    WaitMs { ms: u64 },
    WaitFor { selector: Selector, state: WaitState },
    Screenshot { path: FilePath, full_page: bool },
    Snapshot,
    Eval { script: JsExpression },
    AssertVisible { selector: Selector },
    AssertNotVisible { selector: Selector },
    AssertEnabled { selector: Selector },
    AssertChecked { selector: Selector },
}

impl Command {
    /// The YAML tag / driver verb name for this command (§3 table).
    pub fn tag(&self) -> &'static str {
        match self {
            Command::Open { .. } => "open",
            Command::Click { .. } => "click",
            Command::DblClick { .. } => "dblclick",
            Command::Hover { .. } => "hover",
            Command::Focus { .. } => "focus",
            Command::ScrollIntoView { .. } => "scrollIntoView",
            Command::Type { .. } => "type",
            Command::Fill { .. } => "fill",
            Command::Press { .. } => "press",
            Command::Select { .. } => "select",
            Command::Check { .. } => "check",
            Command::Uncheck { .. } => "uncheck",
            Command::Upload { .. } => "upload",
            Command::Drag { .. } => "drag",
            Command::Scroll { .. } => "scroll",
            Command::WaitMs { .. } | Command::WaitFor { .. } => "wait",
            Command::Screenshot { .. } => "screenshot",
            Command::Snapshot => "snapshot",
            Command::Eval { .. } => "eval",
            Command::AssertVisible { .. } => "assertVisible",
            Command::AssertNotVisible { .. } => "assertNotVisible",
            Command::AssertEnabled { .. } => "assertEnabled",
            Command::AssertChecked { .. } => "assertChecked",
        }
    }

    /// The primary selector this command dispatches against, if any.
    pub fn selector(&self) -> Option<&Selector> {
        match self {
            Command::Click { selector }
            | Command::DblClick { selector }
            | Command::Hover { selector }
            | Command::Focus { selector }
            | Command::ScrollIntoView { selector }
            | Command::Type { selector, .. }
            | Command::Fill { selector, .. }
            | Command::Select { selector, .. }
            | Command::Check { selector }
            | Command::Uncheck { selector }
            | Command::Upload { selector, .. }
            | Command::WaitFor { selector, .. }
            | Command::AssertVisible { selector }
            | Command::AssertNotVisible { selector }
            | Command::AssertEnabled { selector }
            | Command::AssertChecked { selector } => Some(selector),
            Command::Drag { source, .. } => Some(source),
            Command::Open { .. }
            | Command::Press { .. }
            | Command::Scroll { .. }
            | Command::WaitMs { .. }
            | Command::Screenshot { .. }
            | Command::Snapshot
            | Command::Eval { .. } => None,
        }
    }

    /// Whether the step executor must run the auto-wait loop before dispatch
    /// (§4.5): only when the primary selector is text/ref-kind.
    pub fn requires_auto_wait(&self) -> bool {
        self.selector().map(Selector::requires_auto_wait).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branded::{CssSelector, InteractableText};

    #[test]
    fn unit_command_tag_matches_spec_table() {
        let click = Command::Click {
            selector: Selector::InteractableText(InteractableText::new("Login").unwrap()),
        };
        assert_eq!(click.tag(), "click");
        assert_eq!(Command::Snapshot.tag(), "snapshot");
    }

    #[test]
    fn functional_wait_for_and_wait_ms_share_the_wait_tag() {
        let wait_ms = Command::WaitMs { ms: 100 };
        let wait_for = Command::WaitFor {
            selector: Selector::Css(CssSelector::new("#x").unwrap()),
            state: WaitState::Visible,
        };
        assert_eq!(wait_ms.tag(), "wait");
        assert_eq!(wait_for.tag(), "wait");
    }

    #[test]
    fn regression_css_xpath_selectors_do_not_require_auto_wait_unless_drag_source_is_text() {
        let click_css = Command::Click {
            selector: Selector::Css(CssSelector::new("#go").unwrap()),
        };
        assert!(!click_css.requires_auto_wait());

        let drag_text_source = Command::Drag {
            source: Selector::InteractableText(InteractableText::new("Card").unwrap()),
            target: Selector::Css(CssSelector::new("#bin").unwrap()),
        };
        assert!(drag_text_source.requires_auto_wait());
    }
}
