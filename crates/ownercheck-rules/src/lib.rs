//! CODEOWNERS parsing and path matching.
//!
//! Parses GitLab/GitHub style ownership files, translates every declared path
//! into a regex with widened anchors, and answers "which rule owns this path"
//! queries with last-match-wins precedence.

pub mod parser;
pub mod pattern;
mod ruleset;

pub use parser::{Owner, OwnerKind, SectionHeader};
pub use pattern::PathPattern;
pub use ruleset::{Rule, RuleSet};
