use std::path::PathBuf;

/// Errors that can occur while checking code ownership.
///
/// Library crates return this type directly; the binary converts to
/// `miette::Report` at the boundary, except around the core checks where a
/// failure is counted as one violation instead of aborting the run.
///
/// # Examples
///
/// ```
/// use ownercheck_core::OwnerCheckError;
///
/// let err = OwnerCheckError::Config("unknown key".into());
/// assert!(err.to_string().contains("unknown key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum OwnerCheckError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git invocation or repository discovery failure.
    #[error("git error: {0}")]
    #[diagnostic(help("run from inside a git work tree, or pass --repo <path>"))]
    Git(String),

    /// A CODEOWNERS path could not be turned into a matcher.
    #[error("invalid pattern '{pattern}' on line {line}: {reason}")]
    Pattern {
        /// Raw path as declared.
        pattern: String,
        /// 1-based declaration line.
        line: usize,
        /// Underlying compile error.
        reason: String,
    },

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    #[diagnostic(help("pass --codeowners <path> or set codeowners.path in .ownercheck.toml"))]
    FileNotFound(PathBuf),
}
