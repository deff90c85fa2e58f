//! Coverage checks in both directions.
//!
//! - rules → files: every rule has to match at least one tracked file;
//! - files → rules: every file has to be owned by something more specific
//!   than the catch-all rule.

use ownercheck_core::OwnerCheckConfig;
use ownercheck_rules::RuleSet;
use serde::Serialize;

/// A rule that matched none of the listed files.
///
/// # Examples
///
/// ```
/// use ownercheck_audit::coverage::UnusedRule;
///
/// let rule = UnusedRule { path: "/old/module/".into(), line: 12, section: None };
/// assert_eq!(rule.line, 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedRule {
    /// Path as declared.
    pub path: String,
    /// 1-based declaration line.
    pub line: usize,
    /// Enclosing section, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

/// What counts as "not owned".
///
/// # Examples
///
/// ```
/// use ownercheck_audit::coverage::OwnershipPolicy;
///
/// let policy = OwnershipPolicy::default();
/// assert_eq!(policy.catch_all, "*");
/// assert!(!policy.treat_unmatched_as_unowned);
/// ```
#[derive(Debug, Clone)]
pub struct OwnershipPolicy {
    /// Raw path of the catch-all rule.
    pub catch_all: String,
    /// Also flag files that no rule matches.
    pub treat_unmatched_as_unowned: bool,
}

impl Default for OwnershipPolicy {
    fn default() -> Self {
        Self::from_config(&OwnerCheckConfig::default())
    }
}

impl OwnershipPolicy {
    /// Build the policy from the `[codeowners]` config table.
    pub fn from_config(config: &OwnerCheckConfig) -> Self {
        Self {
            catch_all: config.codeowners.catch_all.clone(),
            treat_unmatched_as_unowned: config.codeowners.treat_unmatched_as_unowned,
        }
    }
}

/// Rules that match none of `files`, in declaration order.
///
/// Every file is checked against every rule; a rule is settled as soon as one
/// file matches it.
///
/// # Examples
///
/// ```
/// use ownercheck_audit::coverage::find_unused_rules;
/// use ownercheck_rules::RuleSet;
///
/// let rules = RuleSet::parse("* @all\n/src/ @dev\n/legacy/ @old\n").unwrap();
/// let files = vec!["src/main.cpp".to_string(), "README.md".to_string()];
/// let unused = find_unused_rules(&rules, &files);
/// assert_eq!(unused.len(), 1);
/// assert_eq!(unused[0].path, "/legacy/");
/// ```
pub fn find_unused_rules(rules: &RuleSet, files: &[String]) -> Vec<UnusedRule> {
    let mut pending = vec![true; rules.len()];

    for file in files.iter().filter(|f| !f.is_empty()) {
        for (idx, _) in rules.matching_rules(file) {
            pending[idx] = false;
        }
    }

    let unused: Vec<UnusedRule> = rules
        .rules()
        .iter()
        .zip(pending)
        .filter(|(_, is_pending)| *is_pending)
        .map(|(rule, _)| UnusedRule {
            path: rule.path().to_string(),
            line: rule.line,
            section: rule.section.clone(),
        })
        .collect();

    tracing::debug!(
        rules = rules.len(),
        files = files.len(),
        unused = unused.len(),
        "checked rule usage"
    );
    unused
}

/// Files whose deciding rule is the catch-all, in listing order.
///
/// Empty entries are skipped.
///
/// # Examples
///
/// ```
/// use ownercheck_audit::coverage::{find_unowned_files, OwnershipPolicy};
/// use ownercheck_rules::RuleSet;
///
/// let rules = RuleSet::parse("* @all\n/src/ @dev\n").unwrap();
/// let files = vec!["src/main.cpp".to_string(), "setup.py".to_string(), String::new()];
/// let unowned = find_unowned_files(&rules, &files, &OwnershipPolicy::default());
/// assert_eq!(unowned, vec!["setup.py"]);
/// ```
pub fn find_unowned_files(
    rules: &RuleSet,
    files: &[String],
    policy: &OwnershipPolicy,
) -> Vec<String> {
    let unowned: Vec<String> = files
        .iter()
        .filter(|f| !f.is_empty())
        .filter(|f| match rules.best_match(f) {
            Some(rule) => rule.path() == policy.catch_all,
            None => policy.treat_unmatched_as_unowned,
        })
        .cloned()
        .collect();

    tracing::debug!(files = files.len(), unowned = unowned.len(), "checked file ownership");
    unowned
}
