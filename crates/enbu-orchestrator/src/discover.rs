//! Resolves CLI/config file inputs into a deduplicated, stably-ordered file
//! list (§4.8).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use enbu_core::SetupError;

fn has_glob_metachars(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// When `inputs` is empty, globs `.enbuflow/*.enbu.yaml` under `cwd`.
/// Otherwise expands each entry as a literal path or a glob pattern.
pub fn resolve_files(inputs: &[String], cwd: &Path) -> Result<Vec<PathBuf>, SetupError> {
    let default_pattern = cwd.join(".enbuflow").join("*.enbu.yaml");
    let patterns: Vec<String> = if inputs.is_empty() {
        vec![default_pattern.to_string_lossy().into_owned()]
    } else {
        inputs.to_vec()
    };

    let mut seen = HashSet::new();
    let mut ordered = Vec::new();

    for pattern in &patterns {
        let resolved_pattern = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            cwd.join(pattern).to_string_lossy().into_owned()
        };

        let entries = glob::glob(&resolved_pattern)
            .map_err(|error| SetupError::FileNotFound(PathBuf::from(format!("{pattern}: {error}"))))?;

        let mut matched_any = false;
        for entry in entries {
            let path = entry.map_err(|error| SetupError::FileNotFound(error.path().to_path_buf()))?;
            matched_any = true;
            if seen.insert(path.clone()) {
                ordered.push(path);
            }
        }

        if !matched_any && !inputs.is_empty() && !has_glob_metachars(pattern) {
            return Err(SetupError::FileNotFound(PathBuf::from(pattern)));
        }
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn functional_resolve_files_expands_glob_pattern_and_dedupes() {
        let tempdir = tempfile::tempdir().unwrap();
        fs::write(tempdir.path().join("a.enbu.yaml"), "name: a\nsteps: []\n").unwrap();
        fs::write(tempdir.path().join("b.enbu.yaml"), "name: b\nsteps: []\n").unwrap();

        let pattern = tempdir.path().join("*.enbu.yaml").to_string_lossy().into_owned();
        let files = resolve_files(&[pattern], tempdir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn regression_literal_missing_file_is_reported_as_file_not_found() {
        let tempdir = tempfile::tempdir().unwrap();
        let missing = tempdir.path().join("missing.enbu.yaml");
        let err = resolve_files(&[missing.to_string_lossy().into_owned()], tempdir.path()).unwrap_err();
        assert!(matches!(err, SetupError::FileNotFound(_)));
    }

    #[test]
    fn unit_empty_inputs_default_to_dot_enbuflow_glob() {
        let tempdir = tempfile::tempdir().unwrap();
        fs::create_dir_all(tempdir.path().join(".enbuflow")).unwrap();
        fs::write(
            tempdir.path().join(".enbuflow/default.enbu.yaml"),
            "name: default\nsteps: []\n",
        )
        .unwrap();

        let files = resolve_files(&[], tempdir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }
}
