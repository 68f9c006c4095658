use chrono::{DateTime, Utc};

/// Describe how long ago `then` was, relative to `now`.
///
/// Timestamps in the future read as "just now".
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    format_elapsed(secs as u64)
}

pub fn format_elapsed(secs: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 3_600;
    const DAY: u64 = 86_400;
    const WEEK: u64 = 604_800;

    if secs < MINUTE {
        "just now".to_string()
    } else if secs < 2 * MINUTE {
        "1 minute ago".to_string()
    } else if secs < HOUR {
        format!("{} minutes ago", secs / MINUTE)
    } else if secs < 2 * HOUR {
        "1 hour ago".to_string()
    } else if secs < DAY {
        format!("{} hours ago", secs / HOUR)
    } else if secs < 2 * DAY {
        "yesterday".to_string()
    } else if secs < WEEK {
        format!("{} days ago", secs / DAY)
    } else {
        "recently".to_string()
    }
}
