//! Top-level flow document parsing (§4.3, §6): `{ name, env?, steps }`.

use std::collections::HashMap;

use enbu_core::{Flow, Location, ParseError, ParseErrorKind, SetupError};
use serde_yaml::Value;

use crate::line_index::step_line_numbers;
use crate::schema::parse_command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFlow {
    pub flow: Flow,
    pub step_lines: Vec<usize>,
}

fn invalid_yaml(error: &serde_yaml::Error, source: &str) -> SetupError {
    let location = error
        .location()
        .map(|loc| Location::Known {
            line: loc.line(),
            column: Some(loc.column()),
        })
        .unwrap_or(Location::NoInfo);
    SetupError::Parse(ParseError {
        location,
        kind: ParseErrorKind::InvalidYaml,
        snippet: source.lines().take(3).collect::<Vec<_>>().join("\n"),
    })
}

fn missing(field: &str) -> SetupError {
    SetupError::Parse(ParseError {
        location: Location::NoInfo,
        kind: ParseErrorKind::MissingField,
        snippet: field.to_string(),
    })
}

fn invalid(snippet: impl Into<String>) -> SetupError {
    SetupError::Parse(ParseError {
        location: Location::NoInfo,
        kind: ParseErrorKind::InvalidCommand,
        snippet: snippet.into(),
    })
}

/// Parses a complete `.enbu.yaml` document (§6).
pub fn parse_flow_document(source: &str) -> Result<ParsedFlow, SetupError> {
    let document: Value = serde_yaml::from_str(source).map_err(|error| invalid_yaml(&error, source))?;
    let map = document.as_mapping().ok_or_else(|| invalid("expected a top-level mapping"))?;

    let name = map
        .get(Value::String("name".to_string()))
        .and_then(Value::as_str)
        .ok_or_else(|| missing("name"))?
        .to_string();

    let env: HashMap<String, String> = match map.get(Value::String("env".to_string())) {
        Some(Value::Mapping(entries)) => entries
            .iter()
            .filter_map(|(key, value)| {
                Some((key.as_str()?.to_string(), value.as_str()?.to_string()))
            })
            .collect(),
        Some(Value::Null) | None => HashMap::new(),
        Some(_) => return Err(invalid("env must be a mapping of string to string")),
    };

    let steps_value = map
        .get(Value::String("steps".to_string()))
        .ok_or_else(|| missing("steps"))?;
    let steps_sequence = steps_value
        .as_sequence()
        .ok_or_else(|| invalid("steps must be a list"))?;

    let step_lines = step_line_numbers(source);

    let mut steps = Vec::with_capacity(steps_sequence.len());
    for (index, step_value) in steps_sequence.iter().enumerate() {
        let step_mapping = step_value
            .as_mapping()
            .ok_or_else(|| invalid(format!("step {index} is not a one-key mapping")))?;
        if step_mapping.len() != 1 {
            return Err(invalid(format!(
                "step {index} must have exactly one command key, found {}",
                step_mapping.len()
            )));
        }
        let (tag_value, payload) = step_mapping.iter().next().expect("length checked above");
        let tag = tag_value
            .as_str()
            .ok_or_else(|| invalid(format!("step {index} key must be a string")))?;

        let location = step_lines
            .get(index)
            .map(|&line| Location::Known { line, column: None })
            .unwrap_or(Location::NoInfo);

        let command = parse_command(tag, payload, &location).map_err(SetupError::Parse)?;
        steps.push(command);
    }

    Ok(ParsedFlow {
        flow: Flow::new(name, env, steps),
        step_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use enbu_core::Command;

    #[test]
    fn functional_parses_happy_path_two_step_flow() {
        let source = "name: login\nsteps:\n  - open: https://example.com\n  - click: Login\n";
        let parsed = parse_flow_document(source).unwrap();
        assert_eq!(parsed.flow.name, "login");
        assert_eq!(parsed.flow.steps.len(), 2);
        assert!(matches!(parsed.flow.steps[0], Command::Open { .. }));
        assert_eq!(parsed.step_lines, vec![3, 4]);
    }

    #[test]
    fn unit_env_block_is_collected_into_a_string_map() {
        let source = "name: login\nenv:\n  BASE: https://example.com\nsteps:\n  - open: \"${BASE}\"\n";
        let parsed = parse_flow_document(source).unwrap();
        assert_eq!(
            parsed.flow.env.get("BASE").map(String::as_str),
            Some("https://example.com")
        );
    }

    #[test]
    fn regression_missing_name_field_is_a_setup_error() {
        let source = "steps:\n  - open: https://example.com\n";
        let err = parse_flow_document(source).unwrap_err();
        assert!(matches!(
            err,
            SetupError::Parse(enbu_core::ParseError {
                kind: ParseErrorKind::MissingField,
                ..
            })
        ));
    }

    #[test]
    fn regression_multi_key_step_mapping_is_rejected() {
        let source = "name: login\nsteps:\n  - open: https://example.com\n    click: Login\n";
        let err = parse_flow_document(source).unwrap_err();
        assert!(matches!(err, SetupError::Parse(_)));
    }

    /// Parse → serialize → parse yields the same typed `Flow` for a corpus
    /// of fixtures spanning short-form/long-form steps, selector kinds, and
    /// an empty `steps` list (§8).
    #[test]
    fn functional_flow_survives_a_serialize_deserialize_round_trip() {
        let fixtures = [
            "name: empty\nsteps: []\n",
            "name: login\nenv:\n  BASE: https://example.com\nsteps:\n  - open: \"${BASE}\"\n  - click: Login\n  - type:\n      css: \"#email\"\n      value: a@b.com\n",
            "name: drag-and-drop\nsteps:\n  - drag:\n      source:\n        text: Card\n      target:\n        css: \"#bin\"\n  - assertChecked:\n      xpath: \"/html/body/input\"\n  - snapshot:\n  - wait:\n      ms: 250\n",
        ];

        for source in fixtures {
            let parsed = parse_flow_document(source).unwrap();
            let encoded = serde_json::to_string(&parsed.flow).expect("serialize flow");
            let decoded: Flow = serde_json::from_str(&encoded).expect("deserialize flow");
            assert_eq!(decoded, parsed.flow, "round trip diverged for fixture {source:?}");
        }
    }
}
