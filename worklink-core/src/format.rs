//! Timestamp codecs for the two external systems.
//!
//! The time tracker and the issue tracker encode the same instant differently
//! (`2024-01-01T10:00:00+00:00` vs `2024-01-01T10:00:00.000+0000`). Each codec
//! round-trips its own output; decoding accepts any UTC offset and normalizes
//! to UTC so instants compare equal regardless of representation.

use chrono::{DateTime, Utc};

use crate::error::TimestampError;

/// A pair of pure encode/decode functions for one external system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeFormat {
    pattern: &'static str,
}

/// Time-tracking system format, e.g. `2024-01-01T10:00:00+00:00`.
pub const TIME_TRACKER: DateTimeFormat = DateTimeFormat {
    pattern: "%Y-%m-%dT%H:%M:%S%:z",
};

/// Issue-tracker format, e.g. `2024-01-01T10:00:00.000+0000`.
pub const ISSUE_TRACKER: DateTimeFormat = DateTimeFormat {
    pattern: "%Y-%m-%dT%H:%M:%S%.3f%z",
};

impl DateTimeFormat {
    pub fn pattern(&self) -> &'static str {
        self.pattern
    }

    pub fn encode(&self, timestamp: DateTime<Utc>) -> String {
        timestamp.format(self.pattern).to_string()
    }

    /// Decode with this format's pattern, falling back to RFC 3339 (`Z` suffix,
    /// arbitrary fractional seconds).
    pub fn decode(&self, input: &str) -> Result<DateTime<Utc>, TimestampError> {
        DateTime::parse_from_str(input, self.pattern)
            .or_else(|err| DateTime::parse_from_rfc3339(input).map_err(|_| err))
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(|source| TimestampError {
                input: input.to_owned(),
                source,
            })
    }
}
