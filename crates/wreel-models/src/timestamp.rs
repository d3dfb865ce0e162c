//! Timestamp parsing and formatting utilities.
//!
//! Walk annotations carry textual timestamps like `M:SS`, `MM:SS` or
//! `H:MM:SS` (with optional fractional seconds). All curation arithmetic
//! happens on `f64` seconds; text is only parsed at the boundary and
//! re-emitted when annotations are rewritten onto the reel clock.

use thiserror::Error;

/// Maximum reasonable walk duration (24 hours in seconds).
pub const MAX_WALK_DURATION_SECS: f64 = 86400.0;

/// Parse a timestamp string to total seconds.
///
/// Supports formats:
/// - `H:MM:SS` or `H:MM:SS.mmm`
/// - `M:SS` or `M:SS.mmm`
/// - `SS` or `SS.mmm`
///
/// # Examples
/// ```
/// use wreel_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("1:30:00").unwrap(), 5400.0);
/// assert_eq!(parse_timestamp("5:30").unwrap(), 330.0);
/// assert_eq!(parse_timestamp("90").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let parts: Vec<&str> = ts.split(':').collect();
    match parts.len() {
        1 => {
            // Just seconds (SS or SS.mmm)
            let seconds: f64 = parts[0]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("seconds", parts[0].to_string()))?;
            if seconds < 0.0 {
                return Err(TimestampError::Negative);
            }
            Ok(seconds)
        }
        2 => {
            // M:SS or M:SS.mmm
            let minutes: f64 = parts[0]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("minutes", parts[0].to_string()))?;
            let seconds: f64 = parts[1]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("seconds", parts[1].to_string()))?;
            if minutes < 0.0 || seconds < 0.0 {
                return Err(TimestampError::Negative);
            }
            Ok(minutes * 60.0 + seconds)
        }
        3 => {
            // H:MM:SS or H:MM:SS.mmm
            let hours: f64 = parts[0]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("hours", parts[0].to_string()))?;
            let minutes: f64 = parts[1]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("minutes", parts[1].to_string()))?;
            let seconds: f64 = parts[2]
                .parse()
                .map_err(|_| TimestampError::InvalidValue("seconds", parts[2].to_string()))?;
            if hours < 0.0 || minutes < 0.0 || seconds < 0.0 {
                return Err(TimestampError::Negative);
            }
            Ok(hours * 3600.0 + minutes * 60.0 + seconds)
        }
        _ => Err(TimestampError::InvalidFormat(ts.to_string())),
    }
}

/// Parse a timestamp and clamp it into `[0, duration_secs]`.
///
/// Returns `None` for malformed text. Annotation items with unparseable
/// timestamps are skipped one at a time rather than failing the whole walk.
pub fn parse_clamped(ts: &str, duration_secs: f64) -> Option<f64> {
    parse_timestamp(ts)
        .ok()
        .map(|secs| secs.clamp(0.0, duration_secs.max(0.0)))
}

/// Format seconds into `M:SS` (or `H:MM:SS` past the hour mark).
///
/// Fractional seconds are kept with millisecond precision so a formatted
/// value parses back to the same instant.
///
/// # Examples
/// ```
/// use wreel_models::timestamp::format_seconds;
/// assert_eq!(format_seconds(90.0), "1:30");
/// assert_eq!(format_seconds(3661.0), "1:01:01");
/// ```
pub fn format_seconds(total_secs: f64) -> String {
    let total_secs = total_secs.max(0.0);
    let hours = (total_secs / 3600.0).floor() as u32;
    let mins = ((total_secs % 3600.0) / 60.0).floor() as u32;
    let secs = total_secs % 60.0;

    let fractional = (secs - secs.floor()).abs() > 0.0001;
    if hours > 0 {
        if fractional {
            format!("{}:{:02}:{:06.3}", hours, mins, secs)
        } else {
            format!("{}:{:02}:{:02}", hours, mins, secs.floor() as u32)
        }
    } else if fractional {
        format!("{}:{:06.3}", mins, secs)
    } else {
        format!("{}:{:02}", mins, secs.floor() as u32)
    }
}

/// Re-format a timestamp string into the canonical `M:SS` form.
pub fn normalize_timestamp(ts: &str) -> Result<String, TimestampError> {
    let total_secs = parse_timestamp(ts)?;
    Ok(format_seconds(total_secs))
}

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    /// Timestamp string is empty
    #[error("Timestamp cannot be empty")]
    Empty,
    /// Timestamp contains negative values
    #[error("Timestamp cannot be negative")]
    Negative,
    /// Invalid numeric value for a component
    #[error("Invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
    /// Invalid timestamp format
    #[error("Invalid timestamp format '{0}'. Use H:MM:SS, M:SS, or SS")]
    InvalidFormat(String),
}
