//! Line-level parsing of CODEOWNERS files.
//!
//! Understands comments, blank lines, GitLab section headers
//! (`[Name]`, `^[Optional]`, `[Name][2] @default-owner`) and rule lines
//! (`path owner...`, with `\ ` for a literal space in the path).

use serde::Serialize;

/// How an owner token was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    /// `someone@example.com`
    Email,
    /// `@group/subgroup`
    Team,
    /// `@someone`
    Username,
}

/// A single approver named on a rule or section header.
///
/// # Examples
///
/// ```
/// use ownercheck_rules::parser::{Owner, OwnerKind};
///
/// let owner = Owner::classify("@core/solvers").unwrap();
/// assert_eq!(owner.kind, OwnerKind::Team);
/// assert!(Owner::classify("nobody").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Owner {
    /// Classification of the token.
    pub kind: OwnerKind,
    /// Token as written.
    pub name: String,
}

impl Owner {
    /// Classify a token, returning `None` for anything that is not an
    /// email, team, or username.
    pub fn classify(token: &str) -> Option<Self> {
        let kind = if let Some(rest) = token.strip_prefix('@') {
            match rest.split_once('/') {
                Some((group, sub)) if !group.is_empty() && !sub.is_empty() => OwnerKind::Team,
                _ if !rest.is_empty() => OwnerKind::Username,
                _ => return None,
            }
        } else {
            match token.split_once('@') {
                Some((user, domain)) if !user.is_empty() && !domain.is_empty() => {
                    OwnerKind::Email
                }
                _ => return None,
            }
        };
        Some(Self {
            kind,
            name: token.to_string(),
        })
    }
}

/// GitLab section header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// Section name between the first pair of brackets.
    pub name: String,
    /// Declared with a leading `^`.
    pub optional: bool,
    /// Required approval count, from a second `[N]`.
    pub approvals: Option<u32>,
    /// Owners applied to rules in the section that name none.
    pub default_owners: Vec<Owner>,
}

/// A rule line before its path is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine {
    /// Path as written, escapes included.
    pub path: String,
    /// Owners named on the line, or the section defaults if none.
    pub owners: Vec<Owner>,
    /// 1-based line number.
    pub line: usize,
    /// Enclosing section, if any.
    pub section: Option<String>,
}

/// One meaningful line of a CODEOWNERS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A section header; it is not a rule.
    Section(SectionHeader),
    /// A path rule.
    Rule(RuleLine),
}

/// Parse CODEOWNERS content into rule lines in declaration order.
///
/// Comment and blank lines are skipped. Section headers only change the
/// `section` of the rules that follow them.
///
/// # Examples
///
/// ```
/// use ownercheck_rules::parser::parse_codeowners;
///
/// let rules = parse_codeowners("# owners\n* @admins\n\n[Docs]\ndoc/ @writers\n");
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules[0].path, "*");
/// assert_eq!(rules[1].line, 5);
/// assert_eq!(rules[1].section.as_deref(), Some("Docs"));
/// ```
pub fn parse_codeowners(content: &str) -> Vec<RuleLine> {
    parse_entries(content)
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Rule(rule) => Some(rule),
            Entry::Section(_) => None,
        })
        .collect()
}

/// Parse CODEOWNERS content into section headers and rule lines.
pub fn parse_entries(content: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current: Option<SectionHeader> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') || line.starts_with("^[") {
            if let Some(header) = parse_section_header(line) {
                current = Some(header.clone());
                entries.push(Entry::Section(header));
                continue;
            }
            tracing::warn!(line = idx + 1, "unterminated section header treated as a rule");
        }

        let mut tokens = split_tokens(line).into_iter();
        let Some(path) = tokens.next() else {
            continue;
        };
        let mut owners: Vec<Owner> = tokens
            .take_while(|t| !t.starts_with('#'))
            .filter_map(|t| Owner::classify(&t))
            .collect();
        if owners.is_empty() {
            if let Some(section) = &current {
                owners = section.default_owners.clone();
            }
        }

        entries.push(Entry::Rule(RuleLine {
            path,
            owners,
            line: idx + 1,
            section: current.as_ref().map(|s| s.name.clone()),
        }));
    }

    entries
}

fn parse_section_header(line: &str) -> Option<SectionHeader> {
    let (optional, rest) = match line.strip_prefix('^') {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let rest = rest.strip_prefix('[')?;
    let close = rest.find(']')?;
    let name = rest[..close].trim().to_string();
    if name.is_empty() {
        return None;
    }
    let mut rest = rest[close + 1..].trim_start();

    let mut approvals = None;
    if let Some(after) = rest.strip_prefix('[') {
        if let Some(end) = after.find(']') {
            approvals = after[..end].trim().parse().ok();
            rest = after[end + 1..].trim_start();
        }
    }

    let default_owners = rest
        .split_whitespace()
        .take_while(|t| !t.starts_with('#'))
        .filter_map(Owner::classify)
        .collect();

    Some(SectionHeader {
        name,
        optional,
        approvals,
        default_owners,
    })
}

/// Split on whitespace, except for spaces escaped as `\ `. Escapes are kept
/// in the returned tokens.
fn split_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(space) = chars.next_if_eq(&' ') {
                    current.push(space);
                }
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
