use std::time::Duration;

/// Whether `timestamp` lies within `window` of `now`, in either direction. Both are unix millis.
pub fn is_fresh(timestamp: i64, now: i64, window: Duration) -> bool {
    let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
    timestamp.abs_diff(now) <= window_ms
}
