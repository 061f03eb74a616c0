//! Keyword tokenization for the include/exclude filter fields.
//!
//! Input is a single line of text: whitespace-separated terms, with
//! double-quoted spans forming one term even when they contain spaces.
//! Tokenization never fails; the worst outcome is an empty term list.

use regex::Regex;
use std::sync::OnceLock;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

// Quoted span (quotes stripped) or a maximal run of non-whitespace.
fn token_regex() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r#""([^"]*)"|\S+"#).expect("token pattern is valid"))
}

/// Split a raw keyword field into literal terms.
///
/// A span wrapped in double quotes becomes a single term with the quotes
/// removed. Outside quotes, any run of non-whitespace is a term. Terms are
/// trimmed and empty terms dropped. An unterminated quote gets no special
/// treatment: the remainder tokenizes as plain whitespace-separated runs,
/// with the quote character left attached to its run.
pub fn parse_keywords(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    token_regex()
        .captures_iter(input)
        .filter_map(|caps| {
            let token = match caps.get(1) {
                Some(quoted) => quoted.as_str(),
                None => caps.get(0).map_or("", |m| m.as_str()),
            };
            let token = token.trim();
            if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            }
        })
        .collect()
}
