use chrono::{DateTime, TimeZone, Utc};

/// Layout of the timestamps embedded in snapshot names, i.e `20231114-2213`
pub const SNAPSHOT_TIME_FORMAT: &str = "%Y%m%d-%H%M";

/// Convert an epoch-milliseconds aggregation value to a UTC date.
///
/// NOTE:
/// min/max aggregations return the value as a float, we truncate it to whole
/// seconds (toward zero) before building the DateTime, sub-second precision
/// is dropped.
pub fn from_epoch_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    let secs = (millis / 1000.0).trunc();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_opt(secs as i64, 0).single()
}

/// Format an epoch-milliseconds value as `YYYYMMDD-HHMM` in UTC.
pub fn format_epoch_millis(millis: f64) -> Option<String> {
    from_epoch_millis(millis)
        .map(|t| t.format(SNAPSHOT_TIME_FORMAT).to_string())
}
