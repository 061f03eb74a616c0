//! Literal substring matchers for keyword terms.
//!
//! Keyword terms are never regular-expression syntax: every term is escaped
//! before compilation, so `1.5` matches the three characters `1.5` and
//! nothing else. Case sensitivity is one flag per term set, applied uniformly
//! at compile time.

use crate::error::{LogsieveError, Result};
use regex::RegexBuilder;

/// A compiled literal matcher for one keyword term.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: regex::Regex,
}

impl Matcher {
    /// True if the term occurs anywhere in the line.
    pub fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Compile a set of literal terms into matchers sharing one case flag.
///
/// Escaping guarantees any literal input compiles; the error path exists only
/// for the regex engine's internal size limit and never fires on keyword
/// input a user can type.
pub fn compile(terms: &[String], case_sensitive: bool) -> Result<Vec<Matcher>> {
    terms
        .iter()
        .map(|term| {
            RegexBuilder::new(&regex::escape(term))
                .case_insensitive(!case_sensitive)
                .build()
                .map(|regex| Matcher { regex })
                .map_err(|e| LogsieveError::pattern(format!("term {:?}: {}", term, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_one(term: &str, case_sensitive: bool) -> Matcher {
        compile(&[term.to_string()], case_sensitive)
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_case_insensitive_by_default_flag() {
        let matcher = compile_one("error", false);
        assert!(matcher.matches("an ERROR occurred"));
        assert!(matcher.matches("an error occurred"));
    }

    #[test]
    fn test_case_sensitive_flag() {
        let matcher = compile_one("Error", true);
        assert!(matcher.matches("Error: disk full"));
        assert!(!matcher.matches("error: disk full"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let matcher = compile_one("a.b*c", false);
        assert!(matcher.matches("xx a.b*c yy"));
        assert!(!matcher.matches("aXbbbc"));
    }

    #[test]
    fn test_substring_not_whole_line() {
        let matcher = compile_one("time", true);
        assert!(matcher.matches("uptime check"));
    }

    #[test]
    fn test_compile_never_fails_on_literals() {
        let terms: Vec<String> = ["(", ")", "[", "\\", "^$", "a|b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let matchers = compile(&terms, true).unwrap();
        assert_eq!(matchers.len(), terms.len());
        assert!(matchers[5].matches("contains a|b literally"));
        assert!(!matchers[5].matches("contains only a"));
    }

    #[test]
    fn test_empty_set_compiles_to_empty() {
        assert!(compile(&[], false).unwrap().is_empty());
    }
}
