use std::path::Path;
use std::process::{Command, Output};

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=ownercheck",
            "-c",
            "user.email=ownercheck@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn ownercheck(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ownercheck"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

const CODEOWNERS: &str = "\
* @maintainers
/.gitlab/ @maintainers
/src/ @core
/doc/ @writers
";

fn covered_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    write(dir.path(), ".gitlab/CODEOWNERS", CODEOWNERS);
    write(dir.path(), "src/main.cpp", "int main() {}\n");
    write(dir.path(), "doc/index.md", "# docs\n");
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "initial"]);
    dir
}

#[test]
fn clean_repository_exits_zero() {
    let repo = covered_repo();
    let output = ownercheck(repo.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stderr.is_empty(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn exit_code_is_violation_count() {
    let repo = covered_repo();
    write(
        repo.path(),
        ".gitlab/CODEOWNERS",
        &format!("{CODEOWNERS}/old_module/ @nobody\n"),
    );
    write(repo.path(), "tools/a.sh", "echo a\n");
    write(repo.path(), "tools/b.sh", "echo b\n");
    git(repo.path(), &["add", "."]);

    let output = ownercheck(repo.path(), &[]);
    assert_eq!(output.status.code(), Some(3));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("The following CODEOWNER rules do not represent files or directories:"));
    assert!(stderr.contains("/old_module/"));
    assert!(stderr.contains("The following files do not exist in the CODEOWNERS file:"));
    assert!(stderr.contains("tools/a.sh"));
    assert!(stderr.contains("tools/b.sh"));
}

#[test]
fn out_flag_writes_report_to_file() {
    let repo = covered_repo();
    write(repo.path(), "setup.py", "\n");
    git(repo.path(), &["add", "."]);
    let report = repo.path().join("codeowners_report.txt");

    let output = ownercheck(repo.path(), &["--out", "codeowners_report.txt"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stderr).contains("setup.py"));
    let written = std::fs::read_to_string(report).unwrap();
    assert!(written.contains("The following files do not exist in the CODEOWNERS file:"));
    assert!(written.contains("setup.py"));
}

#[test]
fn diff_only_checks_staged_files() {
    let repo = covered_repo();
    // Committed, unowned, and an unused rule: both invisible to --diff_only.
    write(
        repo.path(),
        ".gitlab/CODEOWNERS",
        &format!("{CODEOWNERS}/old_module/ @nobody\n"),
    );
    write(repo.path(), "legacy.py", "\n");
    git(repo.path(), &["add", "."]);
    git(repo.path(), &["commit", "-q", "-m", "more"]);

    write(repo.path(), "src/new.cpp", "\n");
    write(repo.path(), "scripts/new.py", "\n");
    git(repo.path(), &["add", "src/new.cpp", "scripts/new.py"]);

    for flag in ["--diff_only", "--diff-only"] {
        let output = ownercheck(repo.path(), &[flag]);
        assert_eq!(output.status.code(), Some(1), "flag {flag}");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("scripts/new.py"));
        assert!(!stderr.contains("legacy.py"));
        assert!(!stderr.contains("/old_module/"));
    }
}

#[test]
fn json_format_is_machine_readable() {
    let repo = covered_repo();
    write(repo.path(), "setup.py", "\n");
    git(repo.path(), &["add", "."]);

    let output = ownercheck(repo.path(), &["--format", "json", "--out", "report.json"]);
    assert_eq!(output.status.code(), Some(1));
    let json = std::fs::read_to_string(repo.path().join("report.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["violations"], 1);
    assert_eq!(value["report"]["unownedFiles"][0], "setup.py");
}

#[test]
fn missing_codeowners_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    write(dir.path(), "a.txt", "a\n");
    git(dir.path(), &["add", "."]);

    let output = ownercheck(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Something went wrong!"));
    assert!(stderr.contains("CODEOWNERS"));
}

#[test]
fn codeowners_flag_overrides_location() {
    let repo = covered_repo();
    write(repo.path(), "OWNERS", "* @all\n/src/ @core\n");
    git(repo.path(), &["add", "."]);

    let output = ownercheck(repo.path(), &["--codeowners", "OWNERS"]);
    // .gitlab/CODEOWNERS, doc/index.md and OWNERS itself are unowned.
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn config_file_in_repository_root_is_used() {
    let repo = covered_repo();
    write(repo.path(), "OWNERS", CODEOWNERS);
    write(
        repo.path(),
        ".ownercheck.toml",
        "[codeowners]\npath = \"OWNERS\"\ntreat_unmatched_as_unowned = true\n",
    );
    std::fs::remove_file(repo.path().join(".gitlab/CODEOWNERS")).unwrap();
    git(repo.path(), &["add", "-A"]);

    let output = ownercheck(repo.path(), &[]);
    // OWNERS and .ownercheck.toml fall to the catch-all; /.gitlab/ is now unused.
    assert_eq!(output.status.code(), Some(3), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn runs_from_subdirectory() {
    let repo = covered_repo();
    let output = ownercheck(&repo.path().join("src"), &[]);
    assert_eq!(output.status.code(), Some(0));
}
