//! Relative timestamp labels ("just now", "5m ago", ...)

use chrono::{DateTime, Local, Utc};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Format used for posts older than a week
pub const ABSOLUTE_DATE_FORMAT: &str = "%b %-d, %Y";

/// Label `created_at` relative to the current wall-clock time.
///
/// Not cached: two calls with the same input can differ.
pub fn relative_label(created_at: DateTime<Utc>) -> String {
    relative_label_at(created_at, Utc::now())
}

/// Label `created_at` relative to `now`.
///
/// Future timestamps (clock skew) read as "just now".
pub fn relative_label_at(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_ms = now.signed_duration_since(created_at).num_milliseconds().max(0);

    if elapsed_ms < MINUTE_MS {
        "just now".to_string()
    } else if elapsed_ms < HOUR_MS {
        format!("{}m ago", elapsed_ms / MINUTE_MS)
    } else if elapsed_ms < DAY_MS {
        format!("{}h ago", elapsed_ms / HOUR_MS)
    } else if elapsed_ms < WEEK_MS {
        format!("{}d ago", elapsed_ms / DAY_MS)
    } else {
        created_at
            .with_timezone(&Local)
            .format(ABSOLUTE_DATE_FORMAT)
            .to_string()
    }
}
