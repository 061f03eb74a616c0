//! Line-filtering core.
//!
//! This module turns the viewer's raw filter inputs (include/exclude keyword
//! text, case flags, time-range text) into an immutable [`FilterSpec`] and
//! applies it to sequences of log lines. The same evaluation path serves both
//! the full-file filter pass and every incremental tail-append batch.

pub mod engine;
pub mod keywords;
pub mod pattern;
pub mod time;

pub use engine::{filter, FilterInputs, FilterSpec, MatchResult};
pub use keywords::parse_keywords;
pub use pattern::Matcher;
pub use time::{TimeOfDay, TimeWindow};
