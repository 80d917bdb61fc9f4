//! Per-command YAML schemas (§4.3): each command tag accepts a short
//! form (bare scalar) and a long form (`{css|xpath|text|ref: ..., ...}`).

use enbu_core::{
    Command, CssSelector, ElementRef, FilePath, InteractableText, JsExpression, KeyboardKey,
    Location, ParseError, ParseErrorKind, ScrollDirection, Selector, Url, WaitState,
};
use serde_yaml::{Mapping, Value};

fn err(location: &Location, kind: ParseErrorKind, snippet: impl Into<String>) -> ParseError {
    ParseError {
        location: location.clone(),
        kind,
        snippet: snippet.into(),
    }
}

fn as_mapping<'a>(value: &'a Value, location: &Location) -> Result<&'a Mapping, ParseError> {
    value.as_mapping().ok_or_else(|| {
        err(
            location,
            ParseErrorKind::InvalidCommand,
            format!("expected a mapping, got {value:?}"),
        )
    })
}

fn field<'a>(map: &'a Mapping, key: &str) -> Option<&'a Value> {
    map.get(Value::String(key.to_string()))
}

fn require_field<'a>(map: &'a Mapping, key: &str, location: &Location) -> Result<&'a Value, ParseError> {
    field(map, key).ok_or_else(|| err(location, ParseErrorKind::MissingField, key.to_string()))
}

fn require_str<'a>(value: &'a Value, location: &Location) -> Result<&'a str, ParseError> {
    value.as_str().ok_or_else(|| {
        err(
            location,
            ParseErrorKind::InvalidCommand,
            format!("expected a string, got {value:?}"),
        )
    })
}

fn require_f64(value: &Value, location: &Location) -> Result<f64, ParseError> {
    value.as_f64().ok_or_else(|| {
        err(
            location,
            ParseErrorKind::InvalidCommand,
            format!("expected a number, got {value:?}"),
        )
    })
}

fn require_u64(value: &Value, location: &Location) -> Result<u64, ParseError> {
    value.as_u64().ok_or_else(|| {
        err(
            location,
            ParseErrorKind::InvalidCommand,
            format!("expected a non-negative integer, got {value:?}"),
        )
    })
}

fn brand<T>(result: Result<T, enbu_core::BrandError>, location: &Location) -> Result<T, ParseError> {
    result.map_err(|brand_error| {
        err(
            location,
            ParseErrorKind::InvalidCommand,
            brand_error.to_string(),
        )
    })
}

/// Rejects any mapping key outside `allowed` (§4.3: "unknown keys cause
/// a validation error tied to the offending step").
fn ensure_known_keys(map: &Mapping, allowed: &[&str], location: &Location) -> Result<(), ParseError> {
    for key in map.keys() {
        let key_str = key.as_str().ok_or_else(|| {
            err(
                location,
                ParseErrorKind::InvalidCommand,
                format!("expected string field names, got {key:?}"),
            )
        })?;
        if !allowed.contains(&key_str) {
            return Err(err(
                location,
                ParseErrorKind::InvalidCommand,
                format!("unknown field '{key_str}'"),
            ));
        }
    }
    Ok(())
}

const SELECTOR_KEYS: &[&str] = &["css", "xpath", "text", "ref"];

/// A mapping carrying one of `css`/`xpath`/`text`/`ref` plus optional
/// command-specific fields, or a bare string interpreted as `text`.
fn selector_from_value(value: &Value, location: &Location) -> Result<Selector, ParseError> {
    if let Some(text) = value.as_str() {
        return Ok(Selector::InteractableText(brand(
            InteractableText::new(text),
            location,
        )?));
    }
    let map = as_mapping(value, location)?;
    ensure_known_keys(map, SELECTOR_KEYS, location)?;
    selector_from_mapping(map, location)
}

fn selector_from_mapping(map: &Mapping, location: &Location) -> Result<Selector, ParseError> {
    if let Some(v) = field(map, "css") {
        return Ok(Selector::Css(brand(
            CssSelector::new(require_str(v, location)?),
            location,
        )?));
    }
    if let Some(v) = field(map, "xpath") {
        return Ok(Selector::Xpath(brand(
            enbu_core::XpathSelector::new(require_str(v, location)?),
            location,
        )?));
    }
    if let Some(v) = field(map, "text") {
        return Ok(Selector::InteractableText(brand(
            InteractableText::new(require_str(v, location)?),
            location,
        )?));
    }
    if let Some(v) = field(map, "ref") {
        return Ok(Selector::Ref(brand(
            ElementRef::new(require_str(v, location)?),
            location,
        )?));
    }
    Err(err(
        location,
        ParseErrorKind::MissingField,
        "expected one of css, xpath, text, ref",
    ))
}

/// A command whose sole payload is a selector (`click`, `hover`, ...).
fn selector_only(value: &Value, location: &Location) -> Result<Selector, ParseError> {
    selector_from_value(value, location)
}

fn value_field_from_mapping(map: &Mapping, location: &Location) -> Result<String, ParseError> {
    let value = require_field(map, "value", location)?;
    Ok(require_str(value, location)?.to_string())
}

/// Dispatches `tag` with its YAML `value` to the matching command schema
/// (§4.3). `value` is the payload under the single tag key.
pub fn parse_command(tag: &str, value: &Value, location: &Location) -> Result<Command, ParseError> {
    match tag {
        "open" => {
            let raw = require_str(value, location)?;
            Ok(Command::Open {
                url: brand(Url::new(raw), location)?,
            })
        }
        "click" => Ok(Command::Click {
            selector: selector_only(value, location)?,
        }),
        "dblclick" => Ok(Command::DblClick {
            selector: selector_only(value, location)?,
        }),
        "hover" => Ok(Command::Hover {
            selector: selector_only(value, location)?,
        }),
        "focus" => Ok(Command::Focus {
            selector: selector_only(value, location)?,
        }),
        "scrollIntoView" => Ok(Command::ScrollIntoView {
            selector: selector_only(value, location)?,
        }),
        "check" => Ok(Command::Check {
            selector: selector_only(value, location)?,
        }),
        "uncheck" => Ok(Command::Uncheck {
            selector: selector_only(value, location)?,
        }),
        "assertVisible" => Ok(Command::AssertVisible {
            selector: selector_only(value, location)?,
        }),
        "assertNotVisible" => Ok(Command::AssertNotVisible {
            selector: selector_only(value, location)?,
        }),
        "assertEnabled" => Ok(Command::AssertEnabled {
            selector: selector_only(value, location)?,
        }),
        "assertChecked" => Ok(Command::AssertChecked {
            selector: selector_only(value, location)?,
        }),
        "type" | "fill" => {
            let map = as_mapping(value, location)?;
            ensure_known_keys(map, &["css", "xpath", "text", "ref", "value"], location)?;
            let selector = selector_from_mapping(map, location)?;
            let value = value_field_from_mapping(map, location)?;
            Ok(if tag == "type" {
                Command::Type { selector, value }
            } else {
                Command::Fill { selector, value }
            })
        }
        "press" => {
            let raw = require_str(value, location)?;
            Ok(Command::Press {
                key: brand(KeyboardKey::new(raw), location)?,
            })
        }
        "select" => {
            let map = as_mapping(value, location)?;
            ensure_known_keys(map, &["css", "xpath", "text", "ref", "value"], location)?;
            let selector = selector_from_mapping(map, location)?;
            let value = value_field_from_mapping(map, location)?;
            Ok(Command::Select { selector, value })
        }
        "upload" => {
            let map = as_mapping(value, location)?;
            ensure_known_keys(map, &["css", "xpath", "text", "ref", "files"], location)?;
            let selector = selector_from_mapping(map, location)?;
            let files_value = require_field(map, "files", location)?;
            let files = match files_value {
                Value::Sequence(items) => items
                    .iter()
                    .map(|item| brand(FilePath::new(require_str(item, location)?), location))
                    .collect::<Result<Vec<_>, _>>()?,
                other => vec![brand(FilePath::new(require_str(other, location)?), location)?],
            };
            Ok(Command::Upload { selector, files })
        }
        "drag" => {
            let map = as_mapping(value, location)?;
            ensure_known_keys(map, &["source", "target"], location)?;
            let source_value = require_field(map, "source", location)?;
            let target_value = require_field(map, "target", location)?;
            Ok(Command::Drag {
                source: selector_from_value(source_value, location)?,
                target: selector_from_value(target_value, location)?,
            })
        }
        "scroll" => {
            let map = as_mapping(value, location)?;
            ensure_known_keys(map, &["direction", "amount"], location)?;
            let direction_value = require_field(map, "direction", location)?;
            let direction = match require_str(direction_value, location)? {
                "up" => ScrollDirection::Up,
                "down" => ScrollDirection::Down,
                "left" => ScrollDirection::Left,
                "right" => ScrollDirection::Right,
                other => {
                    return Err(err(
                        location,
                        ParseErrorKind::InvalidCommand,
                        format!("unknown scroll direction '{other}'"),
                    ))
                }
            };
            let amount = require_f64(require_field(map, "amount", location)?, location)?;
            Ok(Command::Scroll { direction, amount })
        }
        "wait" => {
            if let Some(ms) = value.as_u64() {
                return Ok(Command::WaitMs { ms });
            }
            let map = as_mapping(value, location)?;
            if let Some(ms_value) = field(map, "ms") {
                ensure_known_keys(map, &["ms"], location)?;
                return Ok(Command::WaitMs {
                    ms: require_u64(ms_value, location)?,
                });
            }
            ensure_known_keys(map, &["css", "xpath", "text", "ref", "state"], location)?;
            let selector = selector_from_mapping(map, location)?;
            let state_value = require_field(map, "state", location)?;
            let state = match require_str(state_value, location)? {
                "visible" => WaitState::Visible,
                "hidden" => WaitState::Hidden,
                "attached" => WaitState::Attached,
                "detached" => WaitState::Detached,
                other => {
                    return Err(err(
                        location,
                        ParseErrorKind::InvalidCommand,
                        format!("unknown wait state '{other}'"),
                    ))
                }
            };
            Ok(Command::WaitFor { selector, state })
        }
        "screenshot" => {
            if let Some(raw) = value.as_str() {
                return Ok(Command::Screenshot {
                    path: brand(FilePath::new(raw), location)?,
                    full_page: false,
                });
            }
            let map = as_mapping(value, location)?;
            ensure_known_keys(map, &["path", "fullPage"], location)?;
            let path_value = require_field(map, "path", location)?;
            let full_page = field(map, "fullPage")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            Ok(Command::Screenshot {
                path: brand(FilePath::new(require_str(path_value, location)?), location)?,
                full_page,
            })
        }
        "snapshot" => Ok(Command::Snapshot),
        "eval" => {
            let raw = require_str(value, location)?;
            Ok(Command::Eval {
                script: brand(JsExpression::new(raw), location)?,
            })
        }
        other => Err(err(
            location,
            ParseErrorKind::UnknownCommand,
            other.to_string(),
        )),
    }
}
