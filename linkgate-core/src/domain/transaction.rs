//! Transaction queries and opaque provider records

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Permissive integer parsing for query parameters
///
/// Reads an optional sign and the leading run of digits after any leading
/// whitespace, ignoring whatever follows ("12abc" is 12). Single underscores
/// between digits are skipped ("1_000" is 1000). Input without a leading
/// integer is 0. Values outside `i64` saturate.
pub fn parse_leading_int(raw: &str) -> i64 {
    let mut chars = raw.trim_start().chars().peekable();

    let negative = match chars.peek() {
        Some('-') => {
            chars.next();
            true
        }
        Some('+') => {
            chars.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    while let Some(&c) = chars.peek() {
        if let Some(digit) = c.to_digit(10) {
            let digit = i64::from(digit);
            value = if negative {
                value.saturating_mul(10).saturating_sub(digit)
            } else {
                value.saturating_mul(10).saturating_add(digit)
            };
            seen_digit = true;
            chars.next();
        } else if c == '_' && seen_digit {
            chars.next();
            match chars.peek() {
                Some(next) if next.is_ascii_digit() => continue,
                _ => break,
            }
        } else {
            break;
        }
    }

    value
}

/// Pagination window for a transaction listing
///
/// No bounds are enforced here; negative or oversized values go to the
/// provider as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub count: i64,
    pub offset: i64,
}

impl TransactionQuery {
    pub fn new(count: i64, offset: i64) -> Self {
        Self { count, offset }
    }

    /// Build a query from raw request parameters; absent or non-numeric values become 0
    pub fn from_raw(raw_count: Option<&str>, raw_offset: Option<&str>) -> Self {
        Self {
            count: raw_count.map(parse_leading_int).unwrap_or(0),
            offset: raw_offset.map(parse_leading_int).unwrap_or(0),
        }
    }
}

/// A provider transaction, passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(pub JsonValue);

impl TransactionRecord {
    pub fn as_json(&self) -> &JsonValue {
        &self.0
    }
}

impl From<JsonValue> for TransactionRecord {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}
