//! The single-line JSON document every driver verb writes to stdout
//! (§6): `{ success, data, error }`.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::DriverError;

#[derive(Debug, Clone, Deserialize)]
pub struct DriverResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DriverResponse {
    pub fn parse(raw: &str) -> Result<Self, DriverError> {
        serde_json::from_str(raw.trim()).map_err(|_| DriverError::ParseError {
            raw_output: raw.to_string(),
        })
    }

    /// Decodes `data` into `T`, per §4.2's "`success=true` with schema
    /// mismatch on `data`" case.
    pub fn data_as<T: for<'de> Deserialize<'de>>(&self, raw_output: &str) -> Result<T, DriverError> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| DriverError::ParseError {
                raw_output: raw_output.to_string(),
            })?;
        serde_json::from_value(data).map_err(|err| DriverError::OutputParseError {
            issues: vec![err.to_string()],
            raw_output: raw_output.to_string(),
        })
    }
}

/// `snapshot.data.refs`: a map from `eN` to `{ name, role }` (§6,
/// open question (b): unknown extra fields on each entry are ignored).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SnapshotRef {
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct SnapshotData {
    pub refs: HashMap<String, SnapshotRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parse_accepts_well_formed_response_line() {
        let response =
            DriverResponse::parse(r#"{"success":true,"data":{"url":"https://x"},"error":null}"#)
                .unwrap();
        assert!(response.success);
        assert!(response.data.is_some());
    }

    #[test]
    fn unit_parse_rejects_malformed_json() {
        let err = DriverResponse::parse("not json").unwrap_err();
        assert!(matches!(err, DriverError::ParseError { .. }));
    }

    #[test]
    fn functional_snapshot_data_ignores_unknown_extra_fields_per_ref() {
        let response = DriverResponse::parse(
            r#"{"success":true,"data":{"refs":{"e1":{"name":"Login","role":"button","extra":1}}},"error":null}"#,
        )
        .unwrap();
        let snapshot: SnapshotData = response.data_as("raw").unwrap();
        let login = snapshot.refs.get("e1").unwrap();
        assert_eq!(login.name, "Login");
        assert_eq!(login.role, "button");
    }
}
