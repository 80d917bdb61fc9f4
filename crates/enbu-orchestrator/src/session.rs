//! Deterministic session naming (§4.8): `enbu-<flowName>-<hash6>`.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Basename with the `.enbu.yaml` suffix stripped.
pub fn flow_name_from_path(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.strip_suffix(".enbu.yaml").unwrap_or(name).to_string())
        .unwrap_or_default()
}

/// Same absolute path always yields the same session name; distinct paths
/// differ with collision probability ~2⁻²⁴ (§8).
pub fn generate_session_name(flow_name: &str, absolute_path: &Path) -> String {
    let digest = Sha256::digest(absolute_path.to_string_lossy().as_bytes());
    let hash6 = digest[..3]
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    format!("enbu-{flow_name}-{hash6}")
}
