//! Text formatting for ticks, tooltips, and value labels.

use chrono::{DateTime, TimeDelta, Utc};

const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Format a number in abbreviated form, e.g. `1.5M` or `10K`.
///
/// Values below one thousand keep up to two decimals with trailing zeros
/// removed.
pub fn abbreviate(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let magnitude = value.abs();
    for (scale, suffix) in SUFFIXES {
        // Round before choosing the suffix: 999_950 is "1M".
        if (magnitude / scale * 10.0).round() >= 10.0 {
            return format!("{}{suffix}", trim_decimals(value / scale, 1));
        }
    }
    trim_decimals(value, 2)
}

/// Wall-clock label for a point `offset_secs` after `start`.
pub fn format_time_of_day(start: DateTime<Utc>, offset_secs: f64) -> String {
    offset_timestamp(start, offset_secs)
        .map(|ts| ts.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Full timestamp label used by tooltips.
pub fn format_timestamp(start: DateTime<Utc>, offset_secs: f64) -> String {
    offset_timestamp(start, offset_secs)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub(crate) fn offset_timestamp(start: DateTime<Utc>, offset_secs: f64) -> Option<DateTime<Utc>> {
    if !offset_secs.is_finite() {
        return None;
    }
    let delta = TimeDelta::try_milliseconds((offset_secs * 1000.0).round() as i64)?;
    start.checked_add_signed(delta)
}

/// Seconds elapsed from `start` to `end`, with millisecond precision.
pub(crate) fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 1000.0
}

fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
