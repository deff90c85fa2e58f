//! CODEOWNERS coverage checks and reporting.
//!
//! [`run_check`] is the whole pipeline: load the rules, list the repository
//! files, check coverage in both directions, and collect the findings into a
//! [`Report`]. Failures of the pipeline itself are recorded in the report and
//! counted, never propagated.

pub mod coverage;
pub mod report;

use std::path::{Path, PathBuf};

use ownercheck_core::{FileScope, OwnerCheckConfig, Result};
use ownercheck_rules::RuleSet;

pub use coverage::{find_unowned_files, find_unused_rules, OwnershipPolicy, UnusedRule};
pub use report::{write_report, Report};

/// Run the ownership check on the repository at `root`.
///
/// With [`FileScope::Tracked`] both checks run over `git ls-files`; with
/// [`FileScope::Staged`] only the unowned-file check runs, over the staged
/// changes.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use ownercheck_audit::run_check;
/// use ownercheck_core::{FileScope, OwnerCheckConfig};
///
/// let report = run_check(Path::new("."), &OwnerCheckConfig::default(), FileScope::Tracked);
/// std::process::exit(i32::from(report.exit_code()));
/// ```
pub fn run_check(root: &Path, config: &OwnerCheckConfig, scope: FileScope) -> Report {
    let mut report = Report::new(scope);
    if let Err(e) = check_into(&mut report, root, config, scope) {
        report.record_failure(e.to_string());
    }
    report
}

/// Resolve the ownership file path against the repository root.
pub fn codeowners_path(root: &Path, config: &OwnerCheckConfig) -> PathBuf {
    let path = &config.codeowners.path;
    if path.is_absolute() {
        path.clone()
    } else {
        root.join(path)
    }
}

fn check_into(
    report: &mut Report,
    root: &Path,
    config: &OwnerCheckConfig,
    scope: FileScope,
) -> Result<()> {
    let rules = RuleSet::from_path(&codeowners_path(root, config))?;
    let files = ownercheck_git::list_files(root, scope, &config.git.diff_filter)?;

    if scope.checks_rule_usage() {
        report.unused_rules = find_unused_rules(&rules, &files);
    }
    report.unowned_files = find_unowned_files(&rules, &files, &OwnershipPolicy::from_config(config));
    Ok(())
}
