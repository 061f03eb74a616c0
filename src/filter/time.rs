//! Time-of-day parsing for the filter's time window.
//!
//! The accepted format is exactly `HH:MM:SS.mmm`: 24-hour zero-padded hour
//! and a fixed 3-digit millisecond fraction. An anchored shape check gates
//! the chrono parse so sloppy inputs (`9:5:1.2`) are rejected even where
//! chrono alone would accept them.

use crate::error::{LogsieveError, Result, TimeBound};
use chrono::NaiveTime;
use regex::Regex;
use std::sync::OnceLock;

/// A clock time within one day, millisecond precision.
pub type TimeOfDay = NaiveTime;

const TIME_FORMAT: &str = "%H:%M:%S%.3f";

static FORMAT_RE: OnceLock<Regex> = OnceLock::new();
static LEADING_RE: OnceLock<Regex> = OnceLock::new();

fn format_regex() -> &'static Regex {
    FORMAT_RE.get_or_init(|| {
        Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3}$").expect("time format pattern is valid")
    })
}

fn leading_regex() -> &'static Regex {
    LEADING_RE.get_or_init(|| {
        Regex::new(r"^(\d{2}:\d{2}:\d{2}\.\d{3})").expect("leading time pattern is valid")
    })
}

/// Parse a strict `HH:MM:SS.mmm` string. `None` if the shape or the field
/// values are invalid (e.g. hour 25).
pub fn parse_time(text: &str) -> Option<TimeOfDay> {
    if !format_regex().is_match(text) {
        return None;
    }
    NaiveTime::parse_from_str(text, TIME_FORMAT).ok()
}

/// True if the text is a valid bound value: either empty (no bound) or a
/// parseable `HH:MM:SS.mmm`. Suitable for live per-keystroke validation.
pub fn validate_format(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || parse_time(text).is_some()
}

/// Parse one bound of the time range. Empty text means the bound is absent;
/// non-empty text that fails to parse aborts with a bound-specific error.
pub fn parse_bound(text: &str, bound: TimeBound) -> Result<Option<TimeOfDay>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    parse_time(text)
        .map(Some)
        .ok_or_else(|| LogsieveError::time_format(bound, text))
}

/// Extract the timestamp token anchored at the start of a log line.
///
/// Returns `None` when the line has no leading `HH:MM:SS.mmm` token or the
/// token's field values don't parse (hour 99 matches the shape but is not a
/// time).
pub fn leading_timestamp(line: &str) -> Option<TimeOfDay> {
    let caps = leading_regex().captures(line)?;
    parse_time(caps.get(1)?.as_str())
}

/// An optional closed interval of time-of-day values.
///
/// Both bounds present: closed interval. Only start: at-or-after. Only end:
/// at-or-before. Neither: time filtering disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
}

impl TimeWindow {
    pub fn new(start: Option<TimeOfDay>, end: Option<TimeOfDay>) -> Self {
        Self { start, end }
    }

    /// True if at least one bound is set.
    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// True if the time falls within the window. Bounds are inclusive.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        if let Some(start) = self.start {
            if time < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if time > end {
                return false;
            }
        }
        true
    }
}
