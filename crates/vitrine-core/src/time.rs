//! Timestamp normalization
//!
//! Upstream services encode timestamps three different ways: plain epoch
//! millis, a `{seconds, nanos}` pair, or an RFC 3339 string. Everything above
//! the store boundary works in integer epoch millis; a value that cannot be
//! normalized becomes `None` and surfaces as "recently" in the UI rather than
//! failing the record it belongs to.

use chrono::DateTime;
use serde_json::Value;

/// Normalize a loosely-typed upstream timestamp to epoch millis.
///
/// Accepted encodings:
/// - integer or float epoch millis (`1700000000000`)
/// - an object with `seconds` and optional `nanos`/`nanoseconds` fields
/// - an RFC 3339 string (`"2024-01-15T09:30:00Z"`)
///
/// Anything else yields `None`.
pub fn normalize_timestamp_ms(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(ms) = n.as_i64() {
                return Some(ms);
            }
            n.as_f64().map(|f| f as i64)
        }
        Value::Object(map) => {
            let seconds = map.get("seconds").and_then(Value::as_i64)?;
            let nanos = map
                .get("nanos")
                .or_else(|| map.get("nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            seconds
                .checked_mul(1_000)?
                .checked_add(nanos / 1_000_000)
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_millis() {
        assert_eq!(normalize_timestamp_ms(&json!(1_700_000_000_000i64)), Some(1_700_000_000_000));
    }

    #[test]
    fn test_seconds_nanos_pair() {
        let v = json!({ "seconds": 1_700_000_000i64, "nanos": 500_000_000 });
        assert_eq!(normalize_timestamp_ms(&v), Some(1_700_000_000_500));
    }

    #[test]
    fn test_seconds_without_nanos() {
        let v = json!({ "seconds": 10 });
        assert_eq!(normalize_timestamp_ms(&v), Some(10_000));
    }

    #[test]
    fn test_rfc3339_string() {
        let v = json!("1970-01-01T00:00:01Z");
        assert_eq!(normalize_timestamp_ms(&v), Some(1_000));
    }

    #[test]
    fn test_unparseable_inputs_degrade_to_none() {
        assert_eq!(normalize_timestamp_ms(&json!("yesterday-ish")), None);
        assert_eq!(normalize_timestamp_ms(&json!(null)), None);
        assert_eq!(normalize_timestamp_ms(&json!([1, 2])), None);
        assert_eq!(normalize_timestamp_ms(&json!({ "nanos": 5 })), None);
    }

    #[test]
    fn test_overflowing_seconds_degrade_to_none() {
        assert_eq!(normalize_timestamp_ms(&json!({ "seconds": i64::MAX })), None);
        assert_eq!(normalize_timestamp_ms(&json!({ "seconds": i64::MIN })), None);
        // a huge but representable pair still normalizes
        let near = json!({ "seconds": 9_000_000_000_000_000i64, "nanos": 999_000_000 });
        assert_eq!(normalize_timestamp_ms(&near), Some(9_000_000_000_000_000_999));
    }
}
