//! Key pattern matching.
//!
//! A pattern is either an exact key or a wildcard pattern where `*` stands
//! for any run of characters, dots included. Only `.` is escaped when the
//! pattern is translated to a regular expression; every other character
//! keeps its regular-expression meaning.

use confdrift_core::errors::DetectionError;
use regex::Regex;

/// A key pattern compiled once and matched many times.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    source: String,
    regex: Regex,
}

impl KeyPattern {
    /// Compile `pattern`. Fails if the translated expression is not a valid
    /// regular expression.
    pub fn compile(pattern: &str) -> Result<Self, DetectionError> {
        let regex =
            Regex::new(&translate(pattern)).map_err(|e| DetectionError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Exact equality first, then the anchored expression.
    pub fn matches(&self, key: &str) -> bool {
        key == self.source || self.regex.is_match(key)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// One-off match without keeping the compiled pattern. A pattern that does
/// not compile only matches itself.
pub fn matches(key: &str, pattern: &str) -> bool {
    if key == pattern {
        return true;
    }
    match KeyPattern::compile(pattern) {
        Ok(compiled) => compiled.matches(key),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "pattern does not compile");
            false
        }
    }
}

/// `^` + pattern with dots escaped and `*` expanded to `.*` + `$`.
fn translate(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');
    for c in pattern.chars() {
        match c {
            '.' => out.push_str("\\."),
            '*' => out.push_str(".*"),
            other => out.push(other),
        }
    }
    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_escapes_dots_and_expands_stars() {
        assert_eq!(translate("logging.level.*"), "^logging\\.level\\..*$");
        assert_eq!(translate("server.port"), "^server\\.port$");
        assert_eq!(translate("*"), "^.*$");
    }

    #[test]
    fn test_other_characters_keep_regex_meaning() {
        let p = KeyPattern::compile("feature.[ab]").unwrap();
        assert!(p.matches("feature.a"));
        assert!(p.matches("feature.[ab]"));
        assert!(!p.matches("feature.c"));
    }

    #[test]
    fn test_unbalanced_pattern_is_rejected() {
        let err = KeyPattern::compile("broken.(").unwrap_err();
        assert!(matches!(err, DetectionError::InvalidPattern { .. }));
        assert!(matches("broken.(", "broken.("));
        assert!(!matches("broken.x", "broken.("));
    }
}
