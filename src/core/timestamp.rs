//! Timestamp formatting utilities
//!
//! Formats used by the emission engine for the built-in `time` attribute and
//! by the time rewriter installed with the time format option.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use rust_log_facade::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    ///
    /// This is the default format, widely supported by log aggregation systems.
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_log_facade::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// assert!(format.validate().is_ok());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a `DateTime<Utc>` according to this format
    ///
    /// A custom format that cannot be rendered falls back to ISO 8601.
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        self.try_format(datetime)
            .unwrap_or_else(|| TimestampFormat::Iso8601.format(datetime))
    }

    /// Format a `DateTime<Utc>`, or `None` if a custom format string is malformed
    pub fn try_format(&self, datetime: &DateTime<Utc>) -> Option<String> {
        match self {
            TimestampFormat::Iso8601 => Some(datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
            TimestampFormat::Iso8601Micros => {
                Some(datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
            }
            TimestampFormat::Rfc3339 => Some(datetime.to_rfc3339()),
            TimestampFormat::Unix => Some(datetime.timestamp().to_string()),
            TimestampFormat::UnixMillis => Some(datetime.timestamp_millis().to_string()),
            TimestampFormat::Custom(format_str) => {
                // `to_string` panics on a malformed format; `write!` reports it
                let mut out = String::new();
                write!(out, "{}", datetime.format(format_str)).ok()?;
                Some(out)
            }
        }
    }

    /// Check that a custom format string only contains valid specifiers
    ///
    /// chrono panics when a malformed format is rendered, so the option
    /// engine calls this while building the config.
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(format_str) = self {
            if format_str.is_empty() {
                return Err(LoggerError::config("time_format", "format string is empty"));
            }
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "time_format",
                    format!("invalid strftime format '{}'", format_str),
                ));
            }
        }
        Ok(())
    }
}

impl From<&str> for TimestampFormat {
    fn from(format_str: &str) -> Self {
        TimestampFormat::Custom(format_str.to_string())
    }
}

impl From<String> for TimestampFormat {
    fn from(format_str: String) -> Self {
        TimestampFormat::Custom(format_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_iso8601_micros_format() {
        let result = TimestampFormat::Iso8601Micros.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_unix_formats() {
        let secs: i64 = TimestampFormat::Unix
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix timestamp");
        let millis: i64 = TimestampFormat::UnixMillis
            .format(&fixed_datetime())
            .parse()
            .expect("valid unix millis timestamp");
        assert_eq!(secs, 1736332245);
        assert_eq!(millis, 1736332245123);
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::from("%Y/%m/%d %H:%M");
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_malformed_custom_format_does_not_panic() {
        let format = TimestampFormat::from("%Q");
        assert_eq!(format.try_format(&fixed_datetime()), None);
        assert_eq!(format.format(&fixed_datetime()), "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_validate() {
        assert!(TimestampFormat::Iso8601.validate().is_ok());
        assert!(TimestampFormat::from("%H:%M:%S").validate().is_ok());
        assert!(TimestampFormat::from("%Y-%Q").validate().is_err());
        assert!(TimestampFormat::from("").validate().is_err());
    }

    #[test]
    fn test_deserialization() {
        let format: TimestampFormat =
            serde_json::from_str("\"Iso8601\"").expect("deserialize Iso8601");
        assert_eq!(format, TimestampFormat::Iso8601);

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%Y-%m-%d"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%Y-%m-%d".to_string()));
    }
}
