//! File listing through the `git` command line.
//!
//! Both queries run with `-z` so that paths containing spaces, quotes, or
//! non-ASCII characters come back verbatim instead of C-quoted.

use std::path::Path;
use std::process::Command;

use ownercheck_core::{FileScope, OwnerCheckError, Result};

/// List repository-relative paths for the given scope.
///
/// - [`FileScope::Tracked`]: `git ls-files`
/// - [`FileScope::Staged`]: `git diff --name-only --cached --diff-filter=<filter>`
///
/// Empty entries are never returned.
///
/// # Errors
///
/// Returns [`OwnerCheckError::Git`] if `git` cannot be spawned or exits
/// unsuccessfully.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ownercheck_core::FileScope;
/// use ownercheck_git::listing::list_files;
///
/// let files = list_files(Path::new("."), FileScope::Tracked, "MRAC").unwrap();
/// for f in &files {
///     println!("{f}");
/// }
/// ```
pub fn list_files(
    root: &Path,
    scope: FileScope,
    diff_filter: &str,
) -> Result<Vec<String>> {
    let files = match scope {
        FileScope::Tracked => tracked_files(root)?,
        FileScope::Staged => staged_files(root, diff_filter)?,
    };
    tracing::debug!(%scope, files = files.len(), "listed repository files");
    Ok(files)
}

/// Every file in the index.
///
/// # Errors
///
/// Returns [`OwnerCheckError::Git`] on git failure.
pub fn tracked_files(root: &Path) -> Result<Vec<String>> {
    let output = run_git(root, &["ls-files", "-z"])?;
    Ok(split_paths(&output))
}

/// Files with staged changes relative to `HEAD`, restricted by `diff_filter`.
///
/// # Errors
///
/// Returns [`OwnerCheckError::Git`] on git failure.
pub fn staged_files(root: &Path, diff_filter: &str) -> Result<Vec<String>> {
    let filter_arg = format!("--diff-filter={diff_filter}");
    let output = run_git(
        root,
        &["diff", "--name-only", "--cached", "-z", filter_arg.as_str()],
    )?;
    Ok(split_paths(&output))
}

fn run_git(root: &Path, args: &[&str]) -> Result<Vec<u8>> {
    tracing::debug!(args = ?args, "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|e| OwnerCheckError::Git(format!("failed to run git {}: {e}", args[0])))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OwnerCheckError::Git(format!(
            "git {} failed ({}): {}",
            args[0],
            output.status,
            stderr.trim()
        )));
    }
    Ok(output.stdout)
}

/// Split NUL- or newline-terminated git output into paths, dropping empties.
///
/// # Examples
///
/// ```
/// use ownercheck_git::listing::split_paths;
///
/// let paths = split_paths(b"src/a.rs\0docs/read me.md\0\0");
/// assert_eq!(paths, vec!["src/a.rs", "docs/read me.md"]);
/// ```
pub fn split_paths(output: &[u8]) -> Vec<String> {
    let sep = if output.contains(&0) { 0 } else { b'\n' };
    output
        .split(|b| *b == sep)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}
