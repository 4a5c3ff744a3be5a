//! Relative-time formatting for feed rows and presence lines.

use chrono::{DateTime, Datelike, Utc};

const MINUTE_MS: i64 = 60 * 1_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const WEEK_MS: i64 = 7 * DAY_MS;

/// Format a timestamp relative to `now_ms`.
///
/// `None` (a timestamp that failed normalization) renders as "recently"
/// rather than an error or a bogus date. Future timestamps from clock skew
/// collapse to "just now".
pub fn format_relative_time_ms(timestamp_ms: Option<i64>, now_ms: i64) -> String {
    let Some(ts) = timestamp_ms else {
        return "recently".to_owned();
    };
    let elapsed = now_ms - ts;
    if elapsed < MINUTE_MS {
        "just now".to_owned()
    } else if elapsed < HOUR_MS {
        format!("{}m ago", elapsed / MINUTE_MS)
    } else if elapsed < DAY_MS {
        format!("{}h ago", elapsed / HOUR_MS)
    } else if elapsed < WEEK_MS {
        format!("{}d ago", elapsed / DAY_MS)
    } else {
        match DateTime::<Utc>::from_timestamp_millis(ts) {
            Some(dt) => format!("{} {}", month_abbrev(dt.month()), dt.day()),
            None => "recently".to_owned(),
        }
    }
}

/// Presence line: when a user was last active.
pub fn format_last_active(last_active_ms: Option<i64>, now_ms: i64) -> String {
    match last_active_ms {
        None => "never active".to_owned(),
        Some(ts) if now_ms - ts < MINUTE_MS => "active now".to_owned(),
        Some(ts) => format!("last active {}", format_relative_time_ms(Some(ts), now_ms)),
    }
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_none_renders_recently() {
        assert_eq!(format_relative_time_ms(None, NOW), "recently");
    }

    #[test]
    fn test_buckets() {
        assert_eq!(format_relative_time_ms(Some(NOW - 10_000), NOW), "just now");
        assert_eq!(format_relative_time_ms(Some(NOW - 5 * MINUTE_MS), NOW), "5m ago");
        assert_eq!(format_relative_time_ms(Some(NOW - 3 * HOUR_MS), NOW), "3h ago");
        assert_eq!(format_relative_time_ms(Some(NOW - 2 * DAY_MS), NOW), "2d ago");
    }

    #[test]
    fn test_old_timestamps_render_as_dates() {
        // 2023-11-14T22:13:20Z minus 30 days
        let ts = NOW - 30 * DAY_MS;
        let rendered = format_relative_time_ms(Some(ts), NOW);
        assert!(rendered.starts_with("Oct"), "got {rendered}");
    }

    #[test]
    fn test_future_timestamps_collapse_to_just_now() {
        assert_eq!(format_relative_time_ms(Some(NOW + 60_000), NOW), "just now");
    }

    #[test]
    fn test_last_active() {
        assert_eq!(format_last_active(None, NOW), "never active");
        assert_eq!(format_last_active(Some(NOW - 1_000), NOW), "active now");
        assert_eq!(
            format_last_active(Some(NOW - 10 * MINUTE_MS), NOW),
            "last active 10m ago"
        );
    }
}
