//! Wind unit conversions and display text

use crate::shared::PLACEHOLDER;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Miles per hour in one meter per second
pub const MPS_TO_MPH: f64 = 2.2369362920544;

/// 16-wind compass, clockwise from north
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// en-US numeric date and 12-hour clock. The layout is fixed; only the
/// timezone follows the host.
const LOCAL_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub fn mps_to_mph(mps: f64) -> f64 {
    mps * MPS_TO_MPH
}

/// Fold any degree value into `[0, 360)`.
///
/// `rem_euclid` can return exactly 360.0 for tiny negative inputs, so the
/// double modulo is used instead.
pub fn normalize_degrees(deg: f64) -> f64 {
    ((deg % 360.0) + 360.0) % 360.0
}

/// Map a bearing to one of the 16 compass points.
pub fn deg_to_cardinal(deg: f64) -> &'static str {
    let sector = (normalize_degrees(deg) / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[sector]
}

/// Speed text, e.g. `22.4 mph`
pub fn format_speed(mps: Option<f64>) -> String {
    match mps {
        Some(v) => format!("{:.1} mph", mps_to_mph(v)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Direction text, e.g. `270° W`
pub fn format_direction(deg: Option<f64>) -> String {
    match deg {
        Some(d) => {
            let d = normalize_degrees(d);
            format!("{}° {}", d.round() as i64, deg_to_cardinal(d))
        }
        None => PLACEHOLDER.to_string(),
    }
}

/// Parse an observation timestamp.
///
/// RFC 3339 is what the API sends; a bare `YYYY-MM-DDTHH:MM:SS` is read as
/// local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

/// e.g. `3/1/2024, 6:55:00 PM`
pub fn format_local(dt: &DateTime<Local>) -> String {
    dt.format(LOCAL_TIME_FORMAT).to_string()
}

/// Observation time in the local timezone, or the placeholder
pub fn format_timestamp(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| format_local(&dt))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
