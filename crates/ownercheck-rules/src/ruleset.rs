use std::path::Path;

use ownercheck_core::{OwnerCheckError, Result};

use crate::parser::{parse_entries, Entry, Owner, SectionHeader};
use crate::pattern::PathPattern;

/// One compiled ownership rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Matcher compiled from the declared path.
    pub pattern: PathPattern,
    /// Owners for the rule (section defaults already applied).
    pub owners: Vec<Owner>,
    /// 1-based declaration line.
    pub line: usize,
    /// GitLab section the rule was declared in.
    pub section: Option<String>,
}

impl Rule {
    /// The path as declared in the ownership file.
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }
}

/// All rules of a CODEOWNERS file, in declaration order.
///
/// Later rules take precedence over earlier ones, so lookups walk the rules
/// from the bottom of the file up.
///
/// # Examples
///
/// ```
/// use ownercheck_rules::RuleSet;
///
/// let rules = RuleSet::parse("* @admins\nsrc/ @devs\n").unwrap();
/// assert_eq!(rules.best_match("src/main.cpp").unwrap().path(), "src/");
/// assert_eq!(rules.best_match("README.md").unwrap().path(), "*");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    sections: Vec<SectionHeader>,
}

impl RuleSet {
    /// Parse and compile CODEOWNERS content.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerCheckError::Pattern`] if a path cannot be compiled.
    pub fn parse(content: &str) -> Result<Self> {
        let mut rules = Vec::new();
        let mut sections = Vec::new();
        for entry in parse_entries(content) {
            let raw = match entry {
                Entry::Section(header) => {
                    sections.push(header);
                    continue;
                }
                Entry::Rule(raw) => raw,
            };
            let pattern = PathPattern::new(&raw.path).map_err(|e| OwnerCheckError::Pattern {
                pattern: raw.path.clone(),
                line: raw.line,
                reason: e.to_string(),
            })?;
            rules.push(Rule {
                pattern,
                owners: raw.owners,
                line: raw.line,
                section: raw.section,
            });
        }

        tracing::debug!(
            rules = rules.len(),
            sections = sections.len(),
            "compiled ownership rules"
        );
        Ok(Self { rules, sections })
    }

    /// Read and compile the ownership file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerCheckError::FileNotFound`] if the file does not exist,
    /// [`OwnerCheckError::Io`] if it cannot be read, or a pattern error.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(OwnerCheckError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Section headers in declaration order.
    pub fn sections(&self) -> &[SectionHeader] {
        &self.sections
    }

    /// The header a rule's `section` refers to. A repeated section name
    /// resolves to its first declaration.
    ///
    /// # Examples
    ///
    /// ```
    /// use ownercheck_rules::RuleSet;
    ///
    /// let rules = RuleSet::parse("^[Docs][2] @writers\n*.md\n").unwrap();
    /// let rule = rules.best_match("README.md").unwrap();
    /// let header = rules.section_of(rule).unwrap();
    /// assert!(header.optional);
    /// assert_eq!(header.approvals, Some(2));
    /// ```
    pub fn section_of(&self, rule: &Rule) -> Option<&SectionHeader> {
        let name = rule.section.as_deref()?;
        self.sections.iter().find(|s| s.name == name)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the file declared no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule covering `path`, highest precedence first, with its index
    /// into [`RuleSet::rules`].
    pub fn matching_rules<'a, 'p>(
        &'a self,
        path: &'p str,
    ) -> impl Iterator<Item = (usize, &'a Rule)> + use<'a, 'p> {
        self.rules
            .iter()
            .enumerate()
            .rev()
            .filter(move |(_, rule)| rule.pattern.is_match(path))
    }

    /// The rule that decides ownership of `path`: the last declared match.
    pub fn best_match(&self, path: &str) -> Option<&Rule> {
        self.matching_rules(path).next().map(|(_, rule)| rule)
    }

    /// Effective owners of `path`.
    ///
    /// Each section is resolved on its own (last match wins inside the
    /// section) and the owners of all sections are combined, in section
    /// declaration order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ownercheck_rules::RuleSet;
    ///
    /// let rules = RuleSet::parse("src/ @dev\n[Docs]\n*.md @writer\n").unwrap();
    /// let owners: Vec<&str> = rules.owners_of("src/README.md").iter().map(|o| o.name.as_str()).collect();
    /// assert_eq!(owners, vec!["@dev", "@writer"]);
    /// ```
    pub fn owners_of(&self, path: &str) -> Vec<&Owner> {
        let mut sections: Vec<(Option<&str>, &Rule)> = Vec::new();
        for (_, rule) in self.matching_rules(path) {
            let section = rule.section.as_deref();
            if !sections.iter().any(|(s, _)| *s == section) {
                sections.push((section, rule));
            }
        }
        sections.sort_by_key(|(_, rule)| rule.line);

        let mut owners: Vec<&Owner> = Vec::new();
        for (_, rule) in sections {
            for owner in &rule.owners {
                if !owners.iter().any(|o| o.name == owner.name) {
                    owners.push(owner);
                }
            }
        }
        owners
    }
}
