use chrono::{DateTime, SecondsFormat, Utc};

/// Current UTC time as ISO-8601 text with microseconds, e.g.
/// `2025-09-18T15:48:32.245055+00:00`.
pub fn now_iso8601() -> String {
    to_iso8601(Utc::now())
}

pub fn to_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}
