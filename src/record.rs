use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Default pattern for [`EventLogRecord::display_timestamp`], e.g.
/// `Tue, 07 Oct 2025 14:03:11.482 +02:00`.
pub const DEFAULT_DISPLAY_PATTERN: &str = "%a, %d %b %Y %H:%M:%S%.3f %:z";

/// How capture times are rendered for humans.
///
/// The pattern uses `chrono` strftime syntax and is applied in the local
/// time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    pub pattern: String,
}

impl TimestampFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into() }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_pattern(&self.pattern)
    }

    /// Render `at` in local time. An unusable pattern falls back to
    /// [`DEFAULT_DISPLAY_PATTERN`].
    pub fn render(&self, at: DateTime<Utc>) -> String {
        format_local(at, &self.pattern)
            .or_else(|| format_local(at, DEFAULT_DISPLAY_PATTERN))
            .unwrap_or_else(|| at.to_rfc3339())
    }
}

/// `true` if every item of a strftime pattern is understood by `chrono`.
pub fn is_valid_pattern(pattern: &str) -> bool {
    StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

/// Format `at` in local time with `pattern`, or `None` if chrono rejects it.
pub(crate) fn format_local(at: DateTime<Utc>, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", at.with_timezone(&Local).format(pattern)).ok()?;
    Some(out)
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_PATTERN)
    }
}

/// One rendered playback event.
///
/// Records are immutable once built; the buffer hands out clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventLogRecord {
    message: String,
    category: String,
    captured_at_epoch_millis: i64,
    display_timestamp: String,
}

impl EventLogRecord {
    /// Build a record stamped with the current wall-clock time.
    pub fn new(
        message: impl Into<String>,
        category: impl Into<String>,
        format: &TimestampFormat,
    ) -> Self {
        Self::captured_at(message, category, Utc::now(), format)
    }

    /// Build a record for an explicit capture instant.
    pub fn captured_at(
        message: impl Into<String>,
        category: impl Into<String>,
        at: DateTime<Utc>,
        format: &TimestampFormat,
    ) -> Self {
        Self {
            message: message.into(),
            category: category.into(),
            captured_at_epoch_millis: at.timestamp_millis(),
            display_timestamp: format.render(at),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn captured_at_epoch_millis(&self) -> i64 {
        self.captured_at_epoch_millis
    }

    pub fn display_timestamp(&self) -> &str {
        &self.display_timestamp
    }

    /// Plain-text export line: `<display timestamp> [<category>] <message>`.
    ///
    /// Line breaks inside the category or message are escaped so that one
    /// record always occupies exactly one line.
    pub fn to_line(&self) -> String {
        format!(
            "{} [{}] {}",
            self.display_timestamp,
            escape_line_breaks(&self.category),
            escape_line_breaks(&self.message)
        )
    }

    /// NDJSON export line.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn escape_line_breaks(s: &str) -> String {
    s.replace('\r', "\\r").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn captures_epoch_millis_and_display() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let format = TimestampFormat::new("%Y");
        let record = EventLogRecord::captured_at("Loading - true", "onIsLoadingChanged", at, &format);

        assert_eq!(record.captured_at_epoch_millis(), 1_700_000_000_123);
        assert_eq!(record.display_timestamp(), at.with_timezone(&Local).format("%Y").to_string());
        assert_eq!(record.category(), "onIsLoadingChanged");
    }

    #[test]
    fn invalid_pattern_falls_back_to_default() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let format = TimestampFormat::new("%Q");
        assert!(!format.is_valid());
        assert!(TimestampFormat::default().is_valid());

        let record = EventLogRecord::captured_at("Rendered first frame", "onRenderedFirstFrame", at, &format);
        assert_eq!(record.display_timestamp(), TimestampFormat::default().render(at));
        assert_eq!(record.captured_at_epoch_millis(), 1_700_000_000_123);
    }

    #[test]
    fn empty_strings_are_accepted() {
        let record = EventLogRecord::new("", "", &TimestampFormat::default());
        assert_eq!(record.message(), "");
        assert!(record.to_line().ends_with("[] "));
    }

    #[test]
    fn multiline_message_stays_on_one_line() {
        let record = EventLogRecord::new("a\nb\r\nc", "onTracksChanged", &TimestampFormat::default());
        let line = record.to_line();
        assert_eq!(line.lines().count(), 1);
        assert!(line.ends_with("a\\nb\\r\\nc"));

        let json = record.to_json_line().unwrap();
        assert_eq!(json.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["message"], "a\nb\r\nc");
        assert_eq!(value["category"], "onTracksChanged");
    }
}
