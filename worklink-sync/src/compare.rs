//! Field comparison with pluggable normalization.
//!
//! Both sides go through the same normalization before the equality check,
//! so representation differences (e.g. two encodings of one instant) never
//! show up as a diff.

use chrono::{DateTime, Utc};
use serde_json::Value;

use worklink_core::ISSUE_TRACKER;

/// True when `actual` and `expected` differ after normalization.
pub fn differs<T, K, F>(actual: &T, expected: &T, normalize: F) -> bool
where
    T: ?Sized,
    K: PartialEq,
    F: Fn(&T) -> K,
{
    normalize(actual) != normalize(expected)
}

/// Raw equality.
pub fn identity<T: Clone>(value: &T) -> T {
    value.clone()
}

/// Decode an issue-tracker timestamp; values that do not decode compare by their raw form.
pub fn issue_timestamp(value: &Value) -> Result<DateTime<Utc>, Value> {
    value
        .as_str()
        .and_then(|raw| ISSUE_TRACKER.decode(raw).ok())
        .ok_or_else(|| value.clone())
}
