//! Shared utilities for station-wind

use thiserror::Error;

/// Text shown on a surface that has no value to display
pub const PLACEHOLDER: &str = "—";

/// Everything that can go wrong during one fetch-and-render cycle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PollError {
    /// The request could not be sent or completed (DNS, connectivity, abort)
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("HTTP {status} {reason}")]
    Http { status: u16, reason: String },

    /// The body was not valid JSON or not shaped like an observation
    #[error("invalid observation data: {0}")]
    Parse(String),

    /// A renderer could not present the display state
    #[error("render failed: {0}")]
    Render(String),
}

/// Format a duration in seconds to human readable string
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        let mins = seconds / 60;
        let secs = seconds % 60;
        if secs == 0 {
            format!("{}m", mins)
        } else {
            format!("{}m {}s", mins, secs)
        }
    } else {
        let hours = seconds / 3600;
        let mins = (seconds % 3600) / 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}
