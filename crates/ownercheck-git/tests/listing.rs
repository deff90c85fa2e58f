//! Integration test: listing against a throwaway repository.

use std::path::Path;
use std::process::Command;

use ownercheck_core::FileScope;
use ownercheck_git::{discover_root, list_files};

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

#[test]
fn tracked_files_lists_index_only() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    write(dir.path(), "src/main.cpp", "int main() {}\n");
    write(dir.path(), "doc/user guide.md", "# guide\n");
    write(dir.path(), "untracked.txt", "scratch\n");
    git(dir.path(), &["add", "src/main.cpp", "doc/user guide.md"]);

    let mut files = list_files(dir.path(), FileScope::Tracked, "MRAC").unwrap();
    files.sort();
    assert_eq!(files, vec!["doc/user guide.md", "src/main.cpp"]);
}

#[test]
fn staged_files_respect_diff_filter() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    write(dir.path(), "keep.txt", "one\n");
    write(dir.path(), "gone.txt", "bye\n");
    write(dir.path(), "same.txt", "unchanged\n");
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "-q", "-m", "initial"]);

    write(dir.path(), "keep.txt", "two\n");
    write(dir.path(), "src/new.cpp", "// new\n");
    write(dir.path(), "unstaged.txt", "not added\n");
    git(dir.path(), &["add", "keep.txt", "src/new.cpp"]);
    git(dir.path(), &["rm", "-q", "gone.txt"]);

    let mut files = list_files(dir.path(), FileScope::Staged, "MRAC").unwrap();
    files.sort();
    assert_eq!(files, vec!["keep.txt", "src/new.cpp"]);

    let added = list_files(dir.path(), FileScope::Staged, "A").unwrap();
    assert_eq!(added, vec!["src/new.cpp"]);
}

#[test]
fn staged_files_on_unborn_branch() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    write(dir.path(), "first.txt", "hello\n");
    git(dir.path(), &["add", "first.txt"]);

    let files = list_files(dir.path(), FileScope::Staged, "MRAC").unwrap();
    assert_eq!(files, vec!["first.txt"]);
}

#[test]
fn listing_from_discovered_root() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    write(dir.path(), "a/b/c.txt", "x\n");
    git(dir.path(), &["add", "."]);

    let root = discover_root(&dir.path().join("a").join("b")).unwrap();
    let files = list_files(&root, FileScope::Tracked, "MRAC").unwrap();
    assert_eq!(files, vec!["a/b/c.txt"]);
}
