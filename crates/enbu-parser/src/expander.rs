//! `${VAR}` substitution across every string field of every step (§4.4).
//!
//! Per-variant explicit traversal (§9 design note), not reflection:
//! each `Command` arm lists exactly the string fields it carries.

use std::collections::{BTreeSet, HashMap};

use enbu_core::{
    Command, CssSelector, ElementRef, FilePath, InteractableText, JsExpression, KeyboardKey,
    Selector, SetupError, Url, XpathSelector,
};

fn collect_vars(raw: &str, out: &mut BTreeSet<String>) {
    let mut index = 0;
    while index < raw.len() {
        if raw[index..].starts_with("${") {
            if let Some(relative_end) = raw[index..].find('}') {
                out.insert(raw[index + 2..index + relative_end].to_string());
                index += relative_end + 1;
                continue;
            }
            break;
        }
        let next = raw[index..].chars().next().expect("index within bounds");
        index += next.len_utf8();
    }
}

fn expand_text(raw: &str, env: &HashMap<String, String>) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut index = 0;
    while index < raw.len() {
        if raw[index..].starts_with("${") {
            if let Some(relative_end) = raw[index..].find('}') {
                let name = &raw[index + 2..index + relative_end];
                result.push_str(env.get(name).map(String::as_str).unwrap_or(""));
                index += relative_end + 1;
                continue;
            }
        }
        let next = raw[index..].chars().next().expect("index within bounds");
        result.push(next);
        index += next.len_utf8();
    }
    result
}

fn collect_selector_vars(selector: &Selector, out: &mut BTreeSet<String>) {
    collect_vars(selector.as_str(), out);
}

fn expand_selector(selector: Selector, env: &HashMap<String, String>) -> Selector {
    match selector {
        Selector::Css(v) => Selector::Css(CssSelector::substituted(expand_text(v.as_str(), env))),
        Selector::Xpath(v) => {
            Selector::Xpath(XpathSelector::substituted(expand_text(v.as_str(), env)))
        }
        Selector::InteractableText(v) => Selector::InteractableText(InteractableText::substituted(
            expand_text(v.as_str(), env),
        )),
        Selector::Ref(v) => Selector::Ref(ElementRef::substituted(expand_text(v.as_str(), env))),
    }
}

fn collect_command_vars(command: &Command, out: &mut BTreeSet<String>) {
    match command {
        Command::Open { url } => collect_vars(url.as_str(), out),
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
        | Command::AssertChecked { selector } => collect_selector_vars(selector, out),
        Command::Type { selector, value } | Command::Fill { selector, value } => {
            collect_selector_vars(selector, out);
            collect_vars(value, out);
        }
        Command::Press { key } => collect_vars(key.as_str(), out),
        Command::Select { selector, value } => {
            collect_selector_vars(selector, out);
            collect_vars(value, out);
        }
        Command::Upload { selector, files } => {
            collect_selector_vars(selector, out);
            for file in files {
                collect_vars(file.as_str(), out);
            }
        }
        Command::Drag { source, target } => {
            collect_selector_vars(source, out);
            collect_selector_vars(target, out);
        }
        Command::Scroll { .. } | Command::WaitMs { .. } | Command::Snapshot => {}
        Command::WaitFor { selector, .. } => collect_selector_vars(selector, out),
        Command::Screenshot { path, .. } => collect_vars(path.as_str(), out),
        Command::Eval { script } => collect_vars(script.as_str(), out),
    }
}

fn expand_command(command: Command, env: &HashMap<String, String>) -> Command {
    match command {
        Command::Open { url } => Command::Open {
            url: Url::substituted(expand_text(url.as_str(), env)),
        },
        Command::Click { selector } => Command::Click {
            selector: expand_selector(selector, env),
        },
        Command::DblClick { selector } => Command::DblClick {
            selector: expand_selector(selector, env),
        },
        Command::Hover { selector } => Command::Hover {
            selector: expand_selector(selector, env),
        },
        Command::Focus { selector } => Command::Focus {
            selector: expand_selector(selector, env),
        },
        Command::ScrollIntoView { selector } => Command::ScrollIntoView {
            selector: expand_selector(selector, env),
        },
        Command::Check { selector } => Command::Check {
            selector: expand_selector(selector, env),
        },
        Command::Uncheck { selector } => Command::Uncheck {
            selector: expand_selector(selector, env),
        },
        Command::AssertVisible { selector } => Command::AssertVisible {
            selector: expand_selector(selector, env),
        },
        Command::AssertNotVisible { selector } => Command::AssertNotVisible {
            selector: expand_selector(selector, env),
        },
        Command::AssertEnabled { selector } => Command::AssertEnabled {
            selector: expand_selector(selector, env),
        },
        Command::AssertChecked { selector } => Command::AssertChecked {
            selector: expand_selector(selector, env),
        },
        Command::Type { selector, value } => Command::Type {
            selector: expand_selector(selector, env),
            value: expand_text(&value, env),
        },
        Command::Fill { selector, value } => Command::Fill {
            selector: expand_selector(selector, env),
            value: expand_text(&value, env),
        },
        Command::Press { key } => Command::Press {
            key: KeyboardKey::substituted(expand_text(key.as_str(), env)),
        },
        Command::Select { selector, value } => Command::Select {
            selector: expand_selector(selector, env),
            value: expand_text(&value, env),
        },
        Command::Upload { selector, files } => Command::Upload {
            selector: expand_selector(selector, env),
            files: files
                .into_iter()
                .map(|file| FilePath::substituted(expand_text(file.as_str(), env)))
                .collect(),
        },
        Command::Drag { source, target } => Command::Drag {
            source: expand_selector(source, env),
            target: expand_selector(target, env),
        },
        Command::Scroll { direction, amount } => Command::Scroll { direction, amount },
        Command::WaitMs { ms } => Command::WaitMs { ms },
        Command::WaitFor { selector, state } => Command::WaitFor {
            selector: expand_selector(selector, env),
            state,
        },
        Command::Screenshot { path, full_page } => Command::Screenshot {
            path: FilePath::substituted(expand_text(path.as_str(), env)),
            full_page,
        },
        Command::Snapshot => Command::Snapshot,
        Command::Eval { script } => Command::Eval {
            script: JsExpression::substituted(expand_text(script.as_str(), env)),
        },
    }
}

/// Expands every `${VAR}` in `flow`'s steps against `env`. Fails once with
/// every undefined name, rather than on the first one encountered (spec
/// §4.4 policy).
pub fn expand_flow(
    mut flow: enbu_core::Flow,
    env: &HashMap<String, String>,
) -> Result<enbu_core::Flow, SetupError> {
    let mut referenced = BTreeSet::new();
    for command in &flow.steps {
        collect_command_vars(command, &mut referenced);
    }
    let undefined: Vec<String> = referenced
        .into_iter()
        .filter(|name| !env.contains_key(name))
        .collect();
    if !undefined.is_empty() {
        return Err(SetupError::UndefinedEnv(undefined));
    }

    flow.steps = flow
        .steps
        .into_iter()
        .map(|command| expand_command(command, env))
        .collect();
    Ok(flow)
}
