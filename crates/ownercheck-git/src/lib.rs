//! Repository access: root discovery via git2 and file listing through the
//! `git` command line (all tracked files, or only staged changes).

pub mod listing;
pub mod repo;

pub use listing::list_files;
pub use repo::discover_root;
