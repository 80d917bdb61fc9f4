//! `enbu init` (§6): scaffolds `.enbuflow/` with a starter flow file and a
//! `.gitignore` entry for the screenshot output directory.

use std::path::Path;

use anyhow::{Context, Result};
use enbu_core::write_text_atomic;

const STARTER_FLOW: &str = r#"name: example
env:
  BASE_URL: https://example.com
steps:
  - open: "${BASE_URL}"
  - assertVisible:
      css: body
"#;

const GITIGNORE: &str = "enbu-screenshots/\n";

pub fn run_init(cwd: &Path) -> Result<()> {
    let flow_dir = cwd.join(".enbuflow");
    std::fs::create_dir_all(&flow_dir)
        .with_context(|| format!("failed to create {}", flow_dir.display()))?;

    let flow_path = flow_dir.join("example.enbu.yaml");
    if !flow_path.exists() {
        write_text_atomic(&flow_path, STARTER_FLOW)
            .with_context(|| format!("failed to write {}", flow_path.display()))?;
    }

    let gitignore_path = flow_dir.join(".gitignore");
    if !gitignore_path.exists() {
        write_text_atomic(&gitignore_path, GITIGNORE)
            .with_context(|| format!("failed to write {}", gitignore_path.display()))?;
    }

    println!("scaffolded {}", flow_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functional_init_creates_starter_flow_and_gitignore() {
        let tempdir = tempfile::tempdir().unwrap();
        run_init(tempdir.path()).unwrap();

        let flow_path = tempdir.path().join(".enbuflow/example.enbu.yaml");
        let gitignore_path = tempdir.path().join(".enbuflow/.gitignore");
        assert!(flow_path.exists());
        assert!(gitignore_path.exists());

        let contents = std::fs::read_to_string(&flow_path).unwrap();
        assert!(contents.contains("name: example"));
    }

    #[test]
    fn regression_init_is_idempotent_and_does_not_clobber_edits() {
        let tempdir = tempfile::tempdir().unwrap();
        run_init(tempdir.path()).unwrap();

        let flow_path = tempdir.path().join(".enbuflow/example.enbu.yaml");
        std::fs::write(&flow_path, "name: customized\nsteps: []\n").unwrap();

        run_init(tempdir.path()).unwrap();
        let contents = std::fs::read_to_string(&flow_path).unwrap();
        assert_eq!(contents, "name: customized\nsteps: []\n");
    }
}
