use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "content_schema_cli_test_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn write(&self, rel: &str, contents: &str) {
        let path = self.path.join(rel);
        fs::create_dir_all(path.parent().unwrap()).expect("failed to create parent dir");
        fs::write(path, contents).expect("failed to write file");
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

const AUTHORS_CONFIG: &str = r#"collections:
  - filepattern: authors/*.md
    schema:
      - name:
          - type: str
"#;

fn run(root: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_content-schema"))
        .arg(root)
        .args(extra)
        .env_remove("GITHUB_WORKSPACE")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run content-schema")
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

#[test]
fn passing_site_prints_checkmarks_and_exits_zero() {
    let dir = TempDir::new("pass");
    dir.write("content-schema.yml", AUTHORS_CONFIG);
    dir.write("authors/a.md", "name: Alice\n");
    dir.write("authors/b.md", "name: Bob\n");

    let out = run(dir.path(), &[]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("✅ authors/*.md: files exist"), "stdout: {stdout}");
    assert!(stdout.contains("✅ authors/*.md: unique values valid"), "stdout: {stdout}");
    assert!(stdout.contains("2 file(s)"), "stdout: {stdout}");
}

#[test]
fn missing_config_exits_with_not_found_code() {
    let dir = TempDir::new("no_config");

    let out = run(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("❌"), "stderr: {stderr}");
    assert!(stderr.contains("content-schema.yml"), "stderr: {stderr}");
}

#[test]
fn missing_field_exits_with_missing_fields_code() {
    let dir = TempDir::new("missing_field");
    dir.write("content-schema.yml", AUTHORS_CONFIG);
    dir.write("authors/a.md", "name: Alice\n");
    dir.write("authors/b.md", "bio: Unknown\n");

    let out = run(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(5));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("authors/b.md"), "stderr: {stderr}");
    assert!(stderr.contains("name"), "stderr: {stderr}");
}

#[test]
fn custom_config_name() {
    let dir = TempDir::new("config_name");
    dir.write("rules.yml", AUTHORS_CONFIG);
    dir.write("authors/a.md", "name: Alice\n");

    let out = run(dir.path(), &["--config-name", "rules.yml"]);
    assert!(out.status.success());
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[test]
fn json_report_on_success() {
    let dir = TempDir::new("json_pass");
    dir.write("content-schema.yml", AUTHORS_CONFIG);
    dir.write("authors/a.md", "name: Alice\n---\nname: Alicia\n");

    let out = run(dir.path(), &["--format", "json"]);
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["collections"][0]["filepattern"], "authors/*.md");
    assert_eq!(report["collections"][0]["files"], 1);
    assert_eq!(report["collections"][0]["documents"], 2);
    assert_eq!(report["collections"][0]["phases"][3], "uniqueness_validated");
}

#[test]
fn json_error_on_duplicate() {
    let dir = TempDir::new("json_dup");
    dir.write(
        "content-schema.yml",
        r#"collections:
  - filepattern: posts/*.md
    schema:
      - slug:
          - type: str
          - unique: true
"#,
    );
    dir.write("posts/a.md", "slug: foo\n");
    dir.write("posts/b.md", "slug: foo\n");

    let out = run(dir.path(), &["--format", "json"]);
    assert_eq!(out.status.code(), Some(9));
    let error: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(error["kind"], "duplicate-unique-value");
    assert!(error["file"].as_str().unwrap().ends_with("b.md"));
    assert!(error["message"].as_str().unwrap().contains("a.md"));
}
