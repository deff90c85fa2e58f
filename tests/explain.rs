use std::path::Path;
use std::process::Command;

fn explain(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ownercheck"))
        .arg("explain")
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn repo_with_owners() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let status = Command::new("git")
        .args(["init", "-q"])
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success());
    std::fs::create_dir_all(dir.path().join(".gitlab")).unwrap();
    std::fs::write(
        dir.path().join(".gitlab/CODEOWNERS"),
        "* @maintainers\n/src/ @core\n\n^[Docs][2] @writers\n*.md\n",
    )
    .unwrap();
    dir
}

#[test]
fn explain_shows_deciding_rule_and_owners() {
    let repo = repo_with_owners();
    let output = explain(repo.path(), &["src/README.md", "setup.py"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rule:   *.md (line 5, section Docs)"));
    assert!(stdout.contains("section: Docs (optional), 2 approval(s) required"));
    assert!(stdout.contains("owners: @core, @writers"));
    assert!(stdout.contains("rule:   * (line 1) (catch-all)"));
}

#[test]
fn explain_json() {
    let repo = repo_with_owners();
    let output = explain(repo.path(), &["--format", "json", "src/a.cpp"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["path"], "src/a.cpp");
    assert_eq!(value[0]["rule"]["path"], "/src/");
    assert_eq!(value[0]["catchAll"], false);
    assert_eq!(value[0]["owners"][0]["name"], "@core");
    assert_eq!(value[0]["owners"][0]["kind"], "username");
}

#[test]
fn explain_without_codeowners_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::new("git")
        .args(["init", "-q"])
        .current_dir(dir.path())
        .status()
        .unwrap();
    let output = explain(dir.path(), &["a.txt"]);
    assert!(!output.status.success());
}

#[test]
fn explain_json_includes_section_header() {
    let repo = repo_with_owners();
    let output = explain(repo.path(), &["--format", "json", "guide.md", "src/a.cpp"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[0]["section"]["name"], "Docs");
    assert_eq!(value[0]["section"]["optional"], true);
    assert_eq!(value[0]["section"]["approvals"], 2);
    assert!(value[1]["section"].is_null());
}
