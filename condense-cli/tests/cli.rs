use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the built `condense` binary inside `dir`
fn condense(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_condense"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .env_remove("CONDENSE_CONFIG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to create a small project with Python and non-Python files
fn create_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("proj");
    std::fs::create_dir_all(root.join("pkg")).unwrap();
    std::fs::create_dir_all(root.join("docs")).unwrap();

    std::fs::write(
        root.join("pkg/service.py"),
        r#"import logging
from typing import (
    Any,
    Dict,
)

logger = logging.getLogger(__name__)


class Service:
    """Talks to the backend."""

    def call(self, payload: Dict[str, Any]) -> bool:
        """
        Send the payload.
        """
        logger.debug(
            "sending %s",
            payload,
        )
        try:
            return self._send(payload)  # may raise
        except ConnectionError as e:
            logger.error("failed: %s", e)
            return False
"#,
    )
    .unwrap();

    std::fs::write(root.join("docs/notes.md"), "# Notes\n\nplain text\n").unwrap();
    dir
}

#[test]
fn test_pack_condenses_python_and_labels_files() {
    let dir = create_project();
    let output = condense(dir.path(), &["pack", "proj", "--modify-python"]);
    assert!(
        output.status.success(),
        "pack failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let expected_py = r#"# Imports omitted for brevity...
logger = logging.getLogger(__name__)
class Service:
    def call(self, payload: Dict[str, Any]) -> bool:
        try:
            return self._send(payload)
        except ConnectionError as e:
        # Code omitted for brevity...
         pass"#;

    let docs = Path::new("proj").join("docs").join("notes.md");
    let service = Path::new("proj").join("pkg").join("service.py");
    let expected = format!(
        "# File: {}\n# Notes\n\nplain text\n\n\n# File: {}\n{}\n\n",
        docs.display(),
        service.display(),
        expected_py
    );
    assert_eq!(stdout(&output), expected);
}

#[test]
fn test_pack_without_flag_leaves_python_untouched() {
    let dir = create_project();
    let output = condense(dir.path(), &["pack", "proj", "--include-ext", ".py"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("import logging"));
    assert!(text.contains("\"\"\"Talks to the backend.\"\"\""));
    assert!(!text.contains("notes.md"));
}

#[test]
fn test_pack_reads_config_file() {
    let dir = create_project();
    std::fs::write(
        dir.path().join("proj/.condense.toml"),
        "[filter]\nexclude_dirs = [\"docs\"]\n\n[condense]\nenabled = true\n",
    )
    .unwrap();

    let output = condense(dir.path(), &["pack", "proj"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(!text.contains("notes.md"));
    assert!(text.contains("# Imports omitted for brevity..."));
    assert!(!text.contains(".condense.toml"));
}

#[test]
fn test_pack_json_output() {
    let dir = create_project();
    let output = condense(
        dir.path(),
        &["pack", "proj", "--modify-python", "--json", "--exclude-dirs", "docs"],
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["stats"]["files_included"], 1);
    assert_eq!(value["stats"]["files_condensed"], 1);
    assert!(value["bundle"]
        .as_str()
        .unwrap()
        .contains("# Code omitted for brevity..."));
}

#[test]
fn test_pack_to_output_file() {
    let dir = create_project();
    let output = condense(dir.path(), &["pack", "proj", "-o", "bundle.txt"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "");

    let written = std::fs::read_to_string(dir.path().join("bundle.txt")).unwrap();
    assert!(written.contains("# File: "));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Bundled"));
}

#[test]
fn test_file_command_and_raw() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.py"), "import os\nx = 1  # one\n").unwrap();

    let output = condense(dir.path(), &["file", "a.py"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "# Imports omitted for brevity...\nx = 1\n");

    let output = condense(dir.path(), &["file", "a.py", "--raw"]);
    assert_eq!(stdout(&output), "import os\nx = 1  # one\n\n");
}

#[test]
fn test_file_command_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.py"), "import os\nx = 1  # one\n").unwrap();

    let output = condense(dir.path(), &["--json", "file", "a.py"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["path"], "a.py");
    assert_eq!(value["condensed"], true);
    assert_eq!(value["original_lines"], 2);
    assert_eq!(value["lines"], 2);
    assert_eq!(value["content"], "# Imports omitted for brevity...\nx = 1");
}

#[test]
fn test_missing_source_fails() {
    let dir = TempDir::new().unwrap();
    let output = condense(dir.path(), &["pack", "nope"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Source not found"));

    let output = condense(dir.path(), &["--json", "pack", "nope"]);
    let err: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stderr).trim()).unwrap();
    assert_eq!(err["code"], "source_not_found");
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let output = condense(dir.path(), &["init"]);
    assert!(output.status.success());
    assert!(dir.path().join(".condense.toml").exists());

    let output = condense(dir.path(), &["init"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config already exists"));
}
