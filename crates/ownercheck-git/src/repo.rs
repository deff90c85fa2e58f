//! Repository discovery via git2.

use std::path::{Path, PathBuf};

use git2::Repository;
use ownercheck_core::{OwnerCheckError, Result};

/// Find the working-tree root of the repository containing `start`.
///
/// Walks up from `start` the way `git` itself does, so the checker can be run
/// from any subdirectory.
///
/// # Errors
///
/// Returns [`OwnerCheckError::Git`] if `start` is not inside a repository or
/// the repository is bare.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ownercheck_git::repo::discover_root;
///
/// let root = discover_root(Path::new(".")).unwrap();
/// println!("checking {}", root.display());
/// ```
pub fn discover_root(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start).map_err(|e| {
        OwnerCheckError::Git(format!("not a git repository ({}): {e}", start.display()))
    })?;
    let root = repo
        .workdir()
        .ok_or_else(|| OwnerCheckError::Git("bare repository has no working tree".into()))?
        .to_path_buf();
    tracing::debug!(root = %root.display(), "discovered repository root");
    Ok(root)
}
