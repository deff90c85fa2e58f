//! Translation of CODEOWNERS paths into regular expressions.
//!
//! Follows gitignore-style semantics:
//! - a path containing `/` anywhere except at the end is anchored to the
//!   repository root, otherwise it matches at any depth;
//! - a trailing `/` matches directories only, a trailing `/*` matches only
//!   direct children;
//! - `*` and `?` never cross a `/`; a `**` segment matches any text,
//!   separators included, and absorbs the `/` that follows it.
//!
//! Anchored patterns are then widened by [`Anchor::Widened`]: a path written
//! with a leading `/` keeps matching only at the root, one written without
//! also matches the same relative path inside any subdirectory.

use regex::Regex;

/// How the leading anchor of a translated pattern is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Plain gitignore semantics.
    Strict,
    /// Widened anchors used for ownership checking.
    Widened,
}

/// A CODEOWNERS path split into its anchoring and its regex body.
///
/// # Examples
///
/// ```
/// use ownercheck_rules::pattern::{Anchor, Translation};
///
/// let t = Translation::new("src/core");
/// assert!(t.anchored);
/// assert_eq!(t.to_regex(Anchor::Strict), r"\Asrc/core(?:\z|/)");
/// assert_eq!(t.to_regex(Anchor::Widened), r"(?:\A|/)src/core(?:\z|/)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Whether the path is tied to a location rather than matching at any depth.
    pub anchored: bool,
    /// Whether the declared path started with `/`.
    pub rooted: bool,
    /// Regex source after the leading anchor.
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tok {
    ch: char,
    escaped: bool,
}

impl Tok {
    fn is(self, ch: char) -> bool {
        !self.escaped && self.ch == ch
    }
}

impl Translation {
    /// Translate a raw CODEOWNERS path.
    pub fn new(path: &str) -> Self {
        let mut toks = tokenize(path);
        let rooted = toks.first().is_some_and(|t| t.is('/'));

        let slash_pos = toks.iter().position(|t| t.is('/'));
        let anchored = matches!(slash_pos, Some(pos) if pos + 1 != toks.len());

        let matches_dir = toks.last().is_some_and(|t| t.is('/'));
        while toks.last().is_some_and(|t| t.is('/')) {
            toks.pop();
        }

        // "/" alone names the repository root.
        if toks.is_empty() {
            return Self {
                anchored: true,
                rooted,
                body: String::new(),
            };
        }

        let len = toks.len();
        let trailing_slash_star = len > 1 && toks[len - 1].is('*') && toks[len - 2].is('/');

        let mut body = String::new();
        let mut i = 0;
        if anchored && toks[0].is('/') {
            body.push_str("/?");
            i = 1;
        }

        while i < len {
            let tok = toks[i];
            if tok.is('*') {
                if i + 1 < len && toks[i + 1].is('*') {
                    let left_bounded = i == 0 || toks[i - 1].is('/');
                    let right_end = i + 2 == len;
                    let right_slash = i + 2 < len && toks[i + 2].is('/');
                    if left_bounded && (right_end || right_slash) {
                        body.push_str(".*");
                        i += if right_slash { 3 } else { 2 };
                        continue;
                    }
                }
                body.push_str("[^/]*");
            } else if tok.is('?') {
                body.push_str("[^/]");
            } else {
                let mut buf = [0u8; 4];
                body.push_str(&regex::escape(tok.ch.encode_utf8(&mut buf)));
            }
            i += 1;
        }

        if matches_dir {
            body.push('/');
        } else if trailing_slash_star {
            body.push_str(r"\z");
        } else {
            body.push_str(r"(?:\z|/)");
        }

        Self {
            anchored,
            rooted,
            body,
        }
    }

    /// Full regex source with the requested anchoring.
    pub fn to_regex(&self, anchor: Anchor) -> String {
        let prefix = match (self.anchored, anchor) {
            (false, _) => r"(?:\A|/)",
            (true, Anchor::Strict) => r"\A",
            (true, Anchor::Widened) if self.rooted => r"(?:\A|\A/)",
            (true, Anchor::Widened) => r"(?:\A|/)",
        };
        format!("{prefix}{}", self.body)
    }
}

/// Compiled matcher for one CODEOWNERS path.
///
/// # Examples
///
/// ```
/// use ownercheck_rules::pattern::PathPattern;
///
/// let pattern = PathPattern::new("/docs/").unwrap();
/// assert!(pattern.is_match("docs/index.md"));
/// assert!(!pattern.is_match("src/docs/index.md"));
///
/// let nested = PathPattern::new("docs/").unwrap();
/// assert!(nested.is_match("src/docs/index.md"));
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    regex: Regex,
}

impl PathPattern {
    /// Compile `raw` with widened anchors.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error; every translation is escaped, so this
    /// only fires on size limits.
    pub fn new(raw: &str) -> Result<Self, regex::Error> {
        Self::with_anchor(raw, Anchor::Widened)
    }

    /// Compile `raw` with the given anchoring.
    pub fn with_anchor(raw: &str, anchor: Anchor) -> Result<Self, regex::Error> {
        let source = Translation::new(raw).to_regex(anchor);
        Ok(Self {
            raw: raw.to_string(),
            regex: Regex::new(&source)?,
        })
    }

    /// Whether a repository-relative file path is covered by this pattern.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// The path as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The compiled regex source.
    pub fn regex_source(&self) -> &str {
        self.regex.as_str()
    }
}

/// `\ ` is a literal space. Any other backslash is itself a literal
/// character and leaves the next one untouched.
fn tokenize(path: &str) -> Vec<Tok> {
    let mut toks = Vec::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.next_if_eq(&' ').is_some() {
            toks.push(Tok {
                ch: ' ',
                escaped: true,
            });
        } else {
            toks.push(Tok {
                ch: c,
                escaped: c == '\\',
            });
        }
    }
    toks
}
