//! SQL LIKE matching
//!
//! `%` matches any run of characters, `_` matches exactly one, everything
//! else is literal. Matching is case-insensitive and anchored to the whole
//! value.

use regex::{Regex, RegexBuilder};

/// A compiled LIKE pattern
#[derive(Debug, Clone)]
pub struct LikePattern {
    regex: Regex,
}

impl LikePattern {
    /// Compiles a LIKE pattern
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&Self::translate(pattern))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;
        Ok(Self { regex })
    }

    /// Returns true if the whole value matches the pattern
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    fn translate(pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 8);
        let mut literal = String::new();
        out.push('^');
        for c in pattern.chars() {
            match c {
                '%' | '_' => {
                    out.push_str(&regex::escape(&literal));
                    literal.clear();
                    out.push_str(if c == '%' { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        out.push_str(&regex::escape(&literal));
        out.push('$');
        out
    }
}

/// One-shot LIKE match.
///
/// A pattern the regex engine refuses (size limits only, all literals are
/// escaped) matches nothing.
pub fn like_match(value: &str, pattern: &str) -> bool {
    LikePattern::new(pattern)
        .map(|p| p.matches(value))
        .unwrap_or(false)
}
