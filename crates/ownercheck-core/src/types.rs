use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which set of repository files a run looks at.
///
/// # Examples
///
/// ```
/// use ownercheck_core::FileScope;
///
/// assert!(FileScope::Tracked.checks_rule_usage());
/// assert!(!FileScope::Staged.checks_rule_usage());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileScope {
    /// Every file tracked in the index (`git ls-files`).
    #[default]
    Tracked,
    /// Only files with staged changes (`git diff --cached`).
    Staged,
}

impl FileScope {
    /// Unused-rule detection needs the full file list; a partial list would
    /// report every rule outside the change set.
    pub fn checks_rule_usage(self) -> bool {
        matches!(self, FileScope::Tracked)
    }
}

impl fmt::Display for FileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileScope::Tracked => write!(f, "tracked"),
            FileScope::Staged => write!(f, "staged"),
        }
    }
}

/// Output format for the report.
///
/// # Examples
///
/// ```
/// use ownercheck_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text framed by separator lines.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
