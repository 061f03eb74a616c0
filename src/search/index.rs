//! Batched occurrence scanning and wraparound navigation.
//!
//! A [`SearchScanner`] discovers literal occurrences of a term in rendered
//! text. Each [`scan_step`](SearchScanner::scan_step) call processes a
//! bounded number of occurrences and returns, letting the caller interleave
//! steps with event handling; batch size adapts to observed step time within
//! fixed bounds. The finished [`SearchIndex`] supports next/previous
//! navigation that wraps at both ends.
//!
//! Search is case-insensitive by policy — a fixed choice, separate from the
//! per-side case toggles of the keyword filter.

use crate::error::{LogsieveError, Result};
use regex::RegexBuilder;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Hard cap on total occurrences; bounds memory and scan time on
/// pathological inputs. Reaching it truncates the index, it is not an error.
pub const MAX_MATCHES: usize = 10_000;

const INITIAL_BATCH: usize = 1_000;
const MIN_BATCH: usize = 100;
const MAX_BATCH: usize = 5_000;

// Feedback thresholds: a batch finishing under FAST doubles the batch size,
// one over SLOW halves it.
const FAST_BATCH: Duration = Duration::from_millis(50);
const SLOW_BATCH: Duration = Duration::from_millis(200);

/// Progress report from one scan step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStatus {
    pub found: usize,
    pub done: bool,
    pub truncated: bool,
}

/// Incremental scanner for one (text, term) pair.
///
/// Bound to its term: when the user types a newer term, drop this scanner
/// and start a fresh one — a stale scanner's results must never be applied.
pub struct SearchScanner {
    term: String,
    regex: regex::Regex,
    text: Arc<str>,
    pos: usize,
    batch_size: usize,
    offsets: Vec<usize>,
    truncated: bool,
    done: bool,
}

impl SearchScanner {
    /// Create a scanner over the given rendered text.
    ///
    /// An empty term produces an already-finished scanner with no matches.
    pub fn new(text: Arc<str>, term: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .map_err(|e| LogsieveError::pattern(format!("search term {:?}: {}", term, e)))?;

        Ok(Self {
            term: term.to_string(),
            regex,
            text,
            pos: 0,
            batch_size: INITIAL_BATCH,
            offsets: Vec::new(),
            truncated: false,
            done: term.is_empty(),
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn status(&self) -> ScanStatus {
        ScanStatus {
            found: self.offsets.len(),
            done: self.done,
            truncated: self.truncated,
        }
    }

    /// Process at most one batch of occurrences.
    ///
    /// Occurrences are non-overlapping; each scan resumes where the previous
    /// match ended, so offsets always index the original text.
    pub fn scan_step(&mut self) -> ScanStatus {
        if self.done {
            return self.status();
        }

        let started = Instant::now();
        let mut in_batch = 0;

        while in_batch < self.batch_size && self.offsets.len() < MAX_MATCHES {
            match self.regex.find_at(&self.text, self.pos) {
                Some(m) => {
                    self.offsets.push(m.start());
                    self.pos = m.end();
                    in_batch += 1;
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if self.offsets.len() >= MAX_MATCHES && !self.done {
            self.truncated = true;
            self.done = true;
        }

        if !self.done {
            let elapsed = started.elapsed();
            if elapsed < FAST_BATCH {
                self.batch_size = (self.batch_size * 2).min(MAX_BATCH);
            } else if elapsed > SLOW_BATCH {
                self.batch_size = (self.batch_size / 2).max(MIN_BATCH);
            }
        }

        self.status()
    }

    /// Drive the scan to the end and produce the index. Convenient for small
    /// documents and tests; interactive callers step instead.
    pub fn run_to_completion(mut self) -> SearchIndex {
        while !self.done {
            self.scan_step();
        }
        self.finish()
    }

    /// Consume the scanner into a navigable index. Callable any time; an
    /// unfinished scan yields the offsets found so far.
    pub fn finish(self) -> SearchIndex {
        SearchIndex {
            term: self.term,
            offsets: self.offsets,
            cursor: 0,
            truncated: self.truncated,
        }
    }
}

/// Ordered occurrence offsets with a navigation cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    term: String,
    offsets: Vec<usize>,
    cursor: usize,
    truncated: bool,
}

impl SearchIndex {
    /// An index with no term and no matches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// All occurrence offsets, in text order, regardless of visibility.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// True when the scan stopped at [`MAX_MATCHES`]; the offsets held are
    /// still valid, just not exhaustive.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// The selected occurrence's offset; the first match on a fresh index.
    pub fn current(&self) -> Option<usize> {
        self.offsets.get(self.cursor).copied()
    }

    /// Zero-based position of the selection, for "match i of n" displays.
    pub fn current_position(&self) -> Option<usize> {
        if self.offsets.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Move the selection by `direction` (+1 next, -1 previous), wrapping at
    /// both ends. A no-op returning `None` when there are no matches.
    pub fn navigate(&mut self, direction: i32) -> Option<usize> {
        if self.offsets.is_empty() {
            return None;
        }
        let len = self.offsets.len() as i64;
        self.cursor = (self.cursor as i64 + i64::from(direction)).rem_euclid(len) as usize;
        Some(self.offsets[self.cursor])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str, term: &str) -> SearchIndex {
        SearchScanner::new(Arc::from(text), term)
            .unwrap()
            .run_to_completion()
    }

    #[test]
    fn test_finds_all_offsets_in_order() {
        let index = scan("abc abc abc", "abc");
        assert_eq!(index.offsets(), &[0, 4, 8]);
        assert_eq!(index.current(), Some(0));
    }

    #[test]
    fn test_case_insensitive_policy() {
        let index = scan("Error error ERROR", "error");
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_term_is_literal() {
        let index = scan("a.c abc", "a.c");
        assert_eq!(index.offsets(), &[0]);
    }

    #[test]
    fn test_empty_term_yields_empty_index() {
        let index = scan("anything at all", "");
        assert!(index.is_empty());
        assert!(index.current().is_none());
    }

    #[test]
    fn test_no_matches() {
        let index = scan("nothing here", "zzz");
        assert!(index.is_empty());
        assert!(!index.is_truncated());
    }

    #[test]
    fn test_occurrences_do_not_overlap() {
        let index = scan("aaaa", "aa");
        assert_eq!(index.offsets(), &[0, 2]);
    }

    #[test]
    fn test_navigation_wraps_both_directions() {
        let mut index = scan("x x x", "x");
        assert_eq!(index.len(), 3);
        assert_eq!(index.current(), Some(0));

        assert_eq!(index.navigate(1), Some(2));
        assert_eq!(index.navigate(1), Some(4));
        assert_eq!(index.navigate(1), Some(0)); // past last wraps to first

        assert_eq!(index.navigate(-1), Some(4)); // before first wraps to last
        assert_eq!(index.current_position(), Some(2));
    }

    #[test]
    fn test_navigate_with_zero_matches_is_noop() {
        let mut index = SearchIndex::empty();
        assert_eq!(index.navigate(1), None);
        assert_eq!(index.navigate(-1), None);
    }

    #[test]
    fn test_cap_truncates_scan() {
        let text = "a".repeat(MAX_MATCHES * 2);
        let index = scan(&text, "a");
        assert_eq!(index.len(), MAX_MATCHES);
        assert!(index.is_truncated());
    }

    #[test]
    fn test_scan_step_reports_progress() {
        let text = "b ".repeat(2_500);
        let mut scanner = SearchScanner::new(Arc::from(text.as_str()), "b").unwrap();

        let first = scanner.scan_step();
        assert!(first.found >= INITIAL_BATCH.min(2_500));
        assert!(!first.truncated);

        let index = scanner.run_to_completion();
        assert_eq!(index.len(), 2_500);
    }

    #[test]
    fn test_batch_size_stays_within_bounds() {
        let text = "c".repeat(30_000);
        let mut scanner = SearchScanner::new(Arc::from(text.as_str()), "c").unwrap();
        while !scanner.is_done() {
            scanner.scan_step();
            assert!(scanner.batch_size >= MIN_BATCH && scanner.batch_size <= MAX_BATCH);
        }
    }
}
