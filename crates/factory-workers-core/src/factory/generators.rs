//! Value helpers for deferred attributes.
//!
//! Timestamps are UTC RFC 3339 strings with nanosecond precision, so two
//! instantiations only share a value if they happen within the same
//! nanosecond.

use chrono::{Duration, SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Current time.
pub fn now() -> Value {
	timestamp(Utc::now())
}

/// Current time minus `days` days.
pub fn days_ago(days: i64) -> Value {
	timestamp(Utc::now() - Duration::days(days))
}

/// Current time minus `hours` hours.
pub fn hours_ago(hours: i64) -> Value {
	timestamp(Utc::now() - Duration::hours(hours))
}

/// Random v4 UUID.
pub fn uuid() -> Value {
	Value::String(Uuid::new_v4().to_string())
}

fn timestamp(at: chrono::DateTime<Utc>) -> Value {
	Value::String(at.to_rfc3339_opts(SecondsFormat::Nanos, true))
}
