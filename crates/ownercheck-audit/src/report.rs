//! Accumulated findings and their rendering.

use std::io::Write;
use std::path::Path;

use ownercheck_core::{FileScope, OutputFormat, Result};
use serde::Serialize;

use crate::coverage::UnusedRule;

/// Heading printed above unused rules.
pub const UNUSED_RULES_TITLE: &str =
    "The following CODEOWNER rules do not represent files or directories:";

/// Heading printed above unowned files.
pub const UNOWNED_FILES_TITLE: &str = "The following files do not exist in the CODEOWNERS file:";

/// Heading printed above check failures.
pub const FAILURES_TITLE: &str =
    "Something went wrong! The ownership check could not be completed:";

const RULE_WIDTH: usize = 72;

/// Findings of one run.
///
/// Nothing fails fast: every finding is collected and the total becomes the
/// exit status.
///
/// # Examples
///
/// ```
/// use ownercheck_audit::report::Report;
/// use ownercheck_core::FileScope;
///
/// let mut report = Report::new(FileScope::Tracked);
/// report.unowned_files.push("setup.py".into());
/// report.record_failure("git ls-files failed");
/// assert_eq!(report.violation_count(), 2);
/// assert_eq!(report.exit_code(), 2);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Which files were checked.
    pub scope: FileScope,
    /// Rules that matched nothing. Always empty for staged-only runs.
    pub unused_rules: Vec<UnusedRule>,
    /// Files owned only by the catch-all rule.
    pub unowned_files: Vec<String>,
    /// Errors that stopped a check; each counts as one violation.
    pub failures: Vec<String>,
}

impl Report {
    /// Empty report for a run over `scope`.
    pub fn new(scope: FileScope) -> Self {
        Self {
            scope,
            unused_rules: Vec::new(),
            unowned_files: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Record a check that could not complete.
    pub fn record_failure(&mut self, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::error!(%detail, "ownership check failed");
        self.failures.push(detail);
    }

    /// Total number of findings.
    pub fn violation_count(&self) -> usize {
        self.unused_rules.len() + self.unowned_files.len() + self.failures.len()
    }

    /// Whether the run found nothing.
    pub fn is_clean(&self) -> bool {
        self.violation_count() == 0
    }

    /// Process exit status: the violation count, saturated so that a count
    /// that is a multiple of 256 still signals failure.
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.violation_count()).unwrap_or(u8::MAX)
    }

    /// The report as an ordered list of lines, one titled block per kind of
    /// finding, blocks separated by an empty line.
    ///
    /// # Examples
    ///
    /// ```
    /// use ownercheck_audit::report::{Report, UNOWNED_FILES_TITLE};
    /// use ownercheck_core::FileScope;
    ///
    /// let mut report = Report::new(FileScope::Staged);
    /// report.unowned_files.push("new_tool.py".into());
    /// assert_eq!(report.lines(), vec![UNOWNED_FILES_TITLE.to_string(), "new_tool.py".into()]);
    /// ```
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut push_block = |title: &str, entries: Vec<String>| {
            if entries.is_empty() {
                return;
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(title.to_string());
            lines.extend(entries);
        };

        push_block(
            UNUSED_RULES_TITLE,
            self.unused_rules.iter().map(|r| r.path.clone()).collect(),
        );
        push_block(UNOWNED_FILES_TITLE, self.unowned_files.clone());
        push_block(FAILURES_TITLE, self.failures.clone());
        lines
    }

    /// Render in the requested format. A clean report renders as an empty
    /// string in text and markdown.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerCheckError::Serialization`](ownercheck_core::OwnerCheckError::Serialization) if JSON encoding fails.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Markdown => Ok(self.render_markdown()),
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "violations": self.violation_count(),
                    "report": self,
                });
                Ok(format!("{}\n", serde_json::to_string_pretty(&json)?))
            }
        }
    }

    fn render_text(&self) -> String {
        if self.is_clean() {
            return String::new();
        }
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();
        out.push('\n');
        out.push_str(&rule);
        out.push('\n');
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }

    fn render_markdown(&self) -> String {
        if self.is_clean() {
            return String::new();
        }
        let mut out = String::from("# CODEOWNERS check\n");
        if !self.unused_rules.is_empty() {
            out.push_str("\n## Unused rules\n\n");
            for rule in &self.unused_rules {
                out.push_str(&format!("- `{}` (line {})\n", rule.path, rule.line));
            }
        }
        if !self.unowned_files.is_empty() {
            out.push_str("\n## Unowned files\n\n");
            for file in &self.unowned_files {
                out.push_str(&format!("- `{file}`\n"));
            }
        }
        if !self.failures.is_empty() {
            out.push_str("\n## Failures\n\n");
            for failure in &self.failures {
                out.push_str(&format!("- {failure}\n"));
            }
        }
        out.push_str(&format!(
            "\n**{} violation(s)** ({} files)\n",
            self.violation_count(),
            self.scope
        ));
        out
    }
}

/// Write the rendered report to `out`, or to standard error when no file is
/// given.
///
/// The output file is created or truncated on every run, so a clean run leaves
/// it empty rather than holding stale findings.
///
/// # Errors
///
/// Returns [`OwnerCheckError::Io`](ownercheck_core::OwnerCheckError::Io) if writing fails.
pub fn write_report(
    report: &Report,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<()> {
    let rendered = report.render(format)?;
    match out {
        Some(path) => {
            std::fs::write(path, rendered.as_bytes())?;
            tracing::debug!(path = %path.display(), "wrote report");
        }
        None if !rendered.is_empty() => {
            let mut stderr = std::io::stderr().lock();
            stderr.write_all(rendered.as_bytes())?;
            stderr.flush()?;
        }
        None => {}
    }
    Ok(())
}
