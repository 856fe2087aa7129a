//! Submission date window derivation.

use chrono::{DateTime, Duration, Utc};

use crate::models::DateWindow;

/// Window length when the latest papers are requested
pub const LATEST_WINDOW_DAYS: i64 = 180;

/// Window length otherwise
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

/// Resolve a concrete date window relative to the current time.
pub fn resolve(
    is_latest: bool,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> DateWindow {
    resolve_at(is_latest, start, end, Utc::now())
}

/// Resolve a concrete date window relative to `now`.
///
/// Both bounds supplied: returned unchanged. Otherwise a supplied bound is
/// kept and the missing one is derived: `end` defaults to `now`, `start` to
/// `end` minus 180 days (latest) or 365 days.
pub fn resolve_at(
    is_latest: bool,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> DateWindow {
    if let (Some(start), Some(end)) = (start, end) {
        return DateWindow::new(Some(start), Some(end));
    }

    let end = end.unwrap_or(now);
    let span = if is_latest {
        LATEST_WINDOW_DAYS
    } else {
        DEFAULT_WINDOW_DAYS
    };
    let start = start.unwrap_or(end - Duration::days(span));

    DateWindow::new(Some(start), Some(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_latest_window_is_180_days() {
        let window = resolve_at(true, None, None, now());
        assert_eq!(window.end, Some(now()));
        assert_eq!(window.end.unwrap() - window.start.unwrap(), Duration::days(180));
    }

    #[test]
    fn test_default_window_is_365_days() {
        let window = resolve_at(false, None, None, now());
        assert_eq!(window.end, Some(now()));
        assert_eq!(window.end.unwrap() - window.start.unwrap(), Duration::days(365));
    }

    #[test]
    fn test_explicit_bounds_unchanged() {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();

        for latest in [true, false] {
            let window = resolve_at(latest, Some(start), Some(end), now());
            assert_eq!(window, DateWindow::new(Some(start), Some(end)));
        }
    }

    #[test]
    fn test_only_start_keeps_start() {
        let start = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        let window = resolve_at(true, Some(start), None, now());
        assert_eq!(window.start, Some(start));
        assert_eq!(window.end, Some(now()));
    }

    #[test]
    fn test_only_end_derives_start_from_end() {
        let end = Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap();
        let window = resolve_at(false, None, Some(end), now());
        assert_eq!(window.end, Some(end));
        assert_eq!(window.start, Some(end - Duration::days(365)));
    }

    #[test]
    fn test_resolve_uses_wall_clock() {
        let before = Utc::now();
        let window = resolve(true, None, None);
        let after = Utc::now();

        let end = window.end.unwrap();
        assert!(end >= before && end <= after);
        assert_eq!(end - window.start.unwrap(), Duration::days(180));
    }
}
