//! The line-filter evaluation core.
//!
//! One spec, one pass: [`filter`] applies an immutable [`FilterSpec`] to a
//! sequence of lines and produces the matching subsequence plus a count. The
//! full-file filter and every incremental tail batch go through this same
//! function, so their semantics cannot drift apart.
//!
//! Per line, the checks run in a fixed order:
//!
//! 1. any exclude match rejects the line immediately (exclude wins over
//!    include),
//! 2. a non-empty include set requires at least one match (OR across terms),
//! 3. an active time window rejects lines whose leading timestamp falls
//!    outside it.
//!
//! Lines without a recognizable leading timestamp pass through step 3
//! unfiltered. Continuation lines and stack traces carry no timestamp of
//! their own; rejecting them would silently hide content.

use crate::buffer::LogLine;
use crate::error::{Result, TimeBound};
use crate::filter::keywords::parse_keywords;
use crate::filter::pattern::{self, Matcher};
use crate::filter::time::{self, leading_timestamp, TimeWindow};

/// Raw filter field values as the viewer holds them.
///
/// This is also the FilterSpec-relevant subset of the persisted
/// configuration; see [`crate::config::ViewerConfig::filter_inputs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInputs {
    pub include_text: String,
    pub exclude_text: String,
    pub include_case_sensitive: bool,
    pub exclude_case_sensitive: bool,
    pub start_time_text: String,
    pub end_time_text: String,
}

/// The complete, immutable parameter set for one filter evaluation.
///
/// Rebuilt from current field values on every filter invocation. Terms are
/// literal strings, never regex syntax; insertion order is preserved for
/// display but irrelevant to matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    include_terms: Vec<String>,
    exclude_terms: Vec<String>,
    include_case_sensitive: bool,
    exclude_case_sensitive: bool,
    window: TimeWindow,
}

impl FilterSpec {
    /// Parse raw field values into a spec.
    ///
    /// This is the single place a time-format error can surface: if either
    /// provided bound fails to parse, no spec exists and the whole filter
    /// operation aborts before touching any line.
    pub fn from_inputs(inputs: &FilterInputs) -> Result<Self> {
        let start = time::parse_bound(&inputs.start_time_text, TimeBound::Start)?;
        let end = time::parse_bound(&inputs.end_time_text, TimeBound::End)?;

        Ok(Self {
            include_terms: parse_keywords(&inputs.include_text),
            exclude_terms: parse_keywords(&inputs.exclude_text),
            include_case_sensitive: inputs.include_case_sensitive,
            exclude_case_sensitive: inputs.exclude_case_sensitive,
            window: TimeWindow::new(start, end),
        })
    }

    pub fn include_terms(&self) -> &[String] {
        &self.include_terms
    }

    pub fn exclude_terms(&self) -> &[String] {
        &self.exclude_terms
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// True if the spec rejects nothing: every line passes unchanged.
    pub fn is_pass_through(&self) -> bool {
        self.include_terms.is_empty() && self.exclude_terms.is_empty() && !self.window.is_active()
    }
}

/// The outcome of one filter evaluation: the matching lines concatenated in
/// original order with terminators preserved, and how many matched.
///
/// `match_count == 0` is a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub filtered_text: String,
    pub match_count: usize,
}

/// Apply a spec to a sequence of lines.
///
/// Output order is file order; no reordering or deduplication. Each term
/// evaluation is a single substring scan over the line.
pub fn filter(lines: &[LogLine], spec: &FilterSpec) -> Result<MatchResult> {
    let exclude = pattern::compile(&spec.exclude_terms, spec.exclude_case_sensitive)?;
    let include = pattern::compile(&spec.include_terms, spec.include_case_sensitive)?;
    let window = spec.window;

    let mut filtered_text = String::new();
    let mut match_count = 0;

    for line in lines {
        if matches_line(line, &exclude, &include, window) {
            filtered_text.push_str(line);
            match_count += 1;
        }
    }

    Ok(MatchResult {
        filtered_text,
        match_count,
    })
}

/// Check a single line against compiled matchers and the time window.
fn matches_line(line: &str, exclude: &[Matcher], include: &[Matcher], window: TimeWindow) -> bool {
    // Exclude short-circuits before include is evaluated.
    if exclude.iter().any(|m| m.matches(line)) {
        return false;
    }

    if !include.is_empty() && !include.iter().any(|m| m.matches(line)) {
        return false;
    }

    if window.is_active() {
        if let Some(ts) = leading_timestamp(line) {
            if !window.contains(ts) {
                return false;
            }
        }
        // No leading timestamp: the line stays a candidate.
    }

    true
}
