//! Find-in-results: incremental occurrence scanning over rendered text.
//!
//! Independent of the include/exclude filter: this searches whatever text is
//! currently displayed, in bounded batches so the control thread stays
//! responsive on large documents.

pub mod index;

pub use index::{ScanStatus, SearchIndex, SearchScanner, MAX_MATCHES};
