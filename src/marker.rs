//! The `AB#<id>` back-reference marker embedded in issue and PR bodies.
//!
//! The marker is the only durable record that a mirror exists: finding one
//! means a previous run already created a work item, so the pipeline must
//! not create another.

use once_cell::sync::Lazy;
use regex::Regex;

static MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"AB#(\d+)").unwrap());

/// Returns the work-item id from the first `AB#<digits>` occurrence, if any.
/// This is a presence check only; the id is not validated remotely.
pub fn find(body: &str) -> Option<String> {
    MARKER
        .captures(body)
        .map(|captures| captures[1].to_string())
}

/// Appends the marker for `id` to `body` on its own paragraph.
pub fn append(body: &str, id: i64) -> String {
    format!("{body}\n\nAB#{id}")
}
