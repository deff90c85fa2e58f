use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::OwnerCheckError;
use crate::Result;

/// File name of the optional per-repository configuration.
pub const CONFIG_FILE_NAME: &str = ".ownercheck.toml";

/// Top-level configuration loaded from `.ownercheck.toml`.
///
/// Resolution order: CLI flags > config file > defaults.
///
/// # Examples
///
/// ```
/// use ownercheck_core::OwnerCheckConfig;
///
/// let config = OwnerCheckConfig::default();
/// assert_eq!(config.codeowners.catch_all, "*");
/// assert_eq!(config.git.diff_filter, "MRAC");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnerCheckConfig {
    /// Where the ownership file lives and how it is interpreted.
    #[serde(default)]
    pub codeowners: CodeownersConfig,
    /// Git listing options.
    #[serde(default)]
    pub git: GitConfig,
}

impl OwnerCheckConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerCheckError::Io`] if the file cannot be read, or
    /// [`OwnerCheckError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerCheckError::Toml`] if parsing fails, or
    /// [`OwnerCheckError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use ownercheck_core::OwnerCheckConfig;
    ///
    /// let toml = r#"
    /// [codeowners]
    /// path = ".github/CODEOWNERS"
    /// "#;
    /// let config = OwnerCheckConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.codeowners.path.to_str(), Some(".github/CODEOWNERS"));
    /// ```
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.codeowners.catch_all.trim().is_empty() {
            return Err(OwnerCheckError::Config(
                "codeowners.catch_all must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .git
            .diff_filter
            .chars()
            .find(|c| !"ACDMRTUXB".contains(c.to_ascii_uppercase()))
        {
            return Err(OwnerCheckError::Config(format!(
                "git.diff_filter contains unknown status letter '{bad}'"
            )));
        }
        Ok(())
    }
}

/// Ownership file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeownersConfig {
    /// Path of the ownership file relative to the repository root.
    #[serde(default = "default_codeowners_path")]
    pub path: PathBuf,
    /// Raw path of the catch-all rule. A file whose best match is this rule
    /// counts as unowned.
    #[serde(default = "default_catch_all")]
    pub catch_all: String,
    /// Also report files that match no rule at all.
    #[serde(default)]
    pub treat_unmatched_as_unowned: bool,
}

fn default_codeowners_path() -> PathBuf {
    PathBuf::from(".gitlab/CODEOWNERS")
}

fn default_catch_all() -> String {
    "*".into()
}

impl Default for CodeownersConfig {
    fn default() -> Self {
        Self {
            path: default_codeowners_path(),
            catch_all: default_catch_all(),
            treat_unmatched_as_unowned: false,
        }
    }
}

/// Git listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitConfig {
    /// `--diff-filter` letters used when only staged changes are checked.
    #[serde(default = "default_diff_filter")]
    pub diff_filter: String,
}

fn default_diff_filter() -> String {
    "MRAC".into()
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            diff_filter: default_diff_filter(),
        }
    }
}
