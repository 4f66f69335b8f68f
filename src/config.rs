use std::path::PathBuf;

use crate::buffer::RecordOrder;
use crate::env::*;
use crate::export::{parse_format, ExportFormat, FormatError, LogExporter, DEFAULT_FILE_TIMESTAMP_PATTERN};
use crate::record::{is_valid_pattern, TimestampFormat};

/// Configuration of a [`PlaybackEventLogger`](crate::logger::PlaybackEventLogger).
///
/// **Fields**
/// - `tag`: value of the `tag` field on every diagnostic line.
/// - `record_order`: tail append (chronological) or head insert.
/// - `capacity`: optional bound on buffered records; the oldest record is
///   evicted when full.
/// - `clear_on_transition`: keep only history since the last media item
///   change whose reason is not an automatic repeat.
/// - `display_format`: strftime pattern for record display timestamps.
/// - `logs_root` / `logs_dir` / `logs_subdir`: exported files go to
///   `<logs_root>/<logs_dir>/<logs_subdir>`.
/// - `file_prefix`, `file_timestamp_pattern`: export file name is
///   `<prefix>_<timestamp>.<ext>`. Two exports within one tick of the
///   pattern's finest unit collide.
/// - `export_format`: line format of exported files.
/// - `mime_type`: overrides the MIME type derived from `export_format`.
/// - `share_title`: title passed along with every share request.
#[derive(Clone, Debug)]
pub struct LoggerConfig {
    pub tag: String,
    pub record_order: RecordOrder,
    pub capacity: Option<usize>,
    pub clear_on_transition: bool,
    pub display_format: TimestampFormat,
    pub logs_root: PathBuf,
    pub logs_dir: String,
    pub logs_subdir: String,
    pub file_prefix: String,
    pub file_timestamp_pattern: String,
    pub export_format: ExportFormat,
    pub mime_type: Option<String>,
    pub share_title: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            tag: "EventLogger".to_string(),
            record_order: RecordOrder::Chronological,
            capacity: None,
            clear_on_transition: false,
            display_format: TimestampFormat::default(),
            logs_root: PathBuf::from("."),
            logs_dir: "logs".to_string(),
            logs_subdir: "playback_event_logs".to_string(),
            file_prefix: "playback_event_log".to_string(),
            file_timestamp_pattern: DEFAULT_FILE_TIMESTAMP_PATTERN.to_string(),
            export_format: ExportFormat::Text,
            mime_type: None,
            share_title: "Export Video Log".to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{key}: expected true/false, got {value:?}")]
    InvalidBool { key: &'static str, value: String },

    #[error("{key}: expected a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{field}: unusable timestamp pattern {pattern:?}")]
    InvalidPattern { field: &'static str, pattern: String },

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl LoggerConfig {
    /// Defaults overridden by `PLAYBACK_LOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let mut config = Self {
            tag: env_or(PLAYBACK_LOG_TAG_ENV, &defaults.tag),
            file_prefix: env_or(PLAYBACK_LOG_PREFIX_ENV, &defaults.file_prefix),
            ..defaults
        };

        if let Some(root) = env_opt(PLAYBACK_LOG_ROOT_ENV) {
            config.logs_root = PathBuf::from(root);
        }
        if let Some(format) = env_opt(PLAYBACK_LOG_FORMAT_ENV) {
            config.export_format = parse_format(&format)?;
        }
        if let Some(value) = env_opt(PLAYBACK_LOG_MOST_RECENT_FIRST_ENV) {
            if parse_bool(PLAYBACK_LOG_MOST_RECENT_FIRST_ENV, &value)? {
                config.record_order = RecordOrder::MostRecentFirst;
            }
        }
        if let Some(value) = env_opt(PLAYBACK_LOG_CLEAR_ON_TRANSITION_ENV) {
            config.clear_on_transition = parse_bool(PLAYBACK_LOG_CLEAR_ON_TRANSITION_ENV, &value)?;
        }
        if let Some(value) = env_opt(PLAYBACK_LOG_CAPACITY_ENV) {
            config.capacity = parse_capacity(PLAYBACK_LOG_CAPACITY_ENV, &value)?;
        }
        Ok(config)
    }

    /// Check the timestamp patterns before they reach a formatter.
    ///
    /// Unusable patterns never panic at format time (they fall back to the
    /// defaults), but hosts can call this to reject them up front.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.display_format.is_valid() {
            return Err(ConfigError::InvalidPattern {
                field: "display_format",
                pattern: self.display_format.pattern.clone(),
            });
        }
        if !is_valid_pattern(&self.file_timestamp_pattern) {
            return Err(ConfigError::InvalidPattern {
                field: "file_timestamp_pattern",
                pattern: self.file_timestamp_pattern.clone(),
            });
        }
        Ok(())
    }

    pub fn most_recent_first(mut self, enabled: bool) -> Self {
        self.record_order = if enabled {
            RecordOrder::MostRecentFirst
        } else {
            RecordOrder::Chronological
        };
        self
    }

    pub fn export_directory(&self) -> PathBuf {
        self.logs_root.join(&self.logs_dir).join(&self.logs_subdir)
    }

    pub fn effective_mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or_else(|| self.export_format.mime_type())
    }

    pub fn exporter(&self) -> LogExporter {
        LogExporter::new(
            self.export_directory(),
            self.file_prefix.clone(),
            self.file_timestamp_pattern.clone(),
            self.export_format,
        )
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}

fn parse_capacity(key: &'static str, value: &str) -> Result<Option<usize>, ConfigError> {
    let n: usize = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })?;
    Ok((n > 0).then_some(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.record_order, RecordOrder::Chronological);
        assert!(!config.clear_on_transition);
        assert_eq!(
            config.export_directory(),
            PathBuf::from(".").join("logs").join("playback_event_logs")
        );
        assert_eq!(config.effective_mime_type(), "text/plain");
    }

    #[test]
    fn mime_type_override() {
        let config = LoggerConfig {
            export_format: ExportFormat::Json,
            ..LoggerConfig::default()
        };
        assert_eq!(config.effective_mime_type(), "application/x-ndjson");

        let config = LoggerConfig {
            mime_type: Some("text/json".into()),
            ..config
        };
        assert_eq!(config.effective_mime_type(), "text/json");
    }

    #[test]
    fn parses_values() {
        assert!(parse_bool("K", "Yes").unwrap());
        assert!(!parse_bool("K", "0").unwrap());
        assert!(matches!(parse_bool("K", "maybe"), Err(ConfigError::InvalidBool { .. })));
        assert_eq!(parse_capacity("K", "500").unwrap(), Some(500));
        assert_eq!(parse_capacity("K", "0").unwrap(), None);
        assert!(matches!(parse_capacity("K", "-1"), Err(ConfigError::InvalidNumber { .. })));
    }

    #[test]
    fn validate_rejects_unusable_patterns() {
        assert!(LoggerConfig::default().validate().is_ok());

        let display = LoggerConfig {
            display_format: TimestampFormat::new("%Q"),
            ..LoggerConfig::default()
        };
        assert!(matches!(
            display.validate(),
            Err(ConfigError::InvalidPattern { field: "display_format", .. })
        ));

        let file = LoggerConfig {
            file_timestamp_pattern: "%Y-%Q".to_string(),
            ..LoggerConfig::default()
        };
        assert!(matches!(
            file.validate(),
            Err(ConfigError::InvalidPattern { field: "file_timestamp_pattern", .. })
        ));
    }

    #[test]
    fn most_recent_first_toggle() {
        let config = LoggerConfig::default().most_recent_first(true);
        assert_eq!(config.record_order, RecordOrder::MostRecentFirst);
    }
}
