//! Environment variable names read by [`LoggerConfig::from_env`].
//!
//! These are purely helpers; the logger itself never reads the
//! environment.
//!
//! [`LoggerConfig::from_env`]: crate::config::LoggerConfig::from_env

/// Tag attached to every diagnostic line.
pub const PLAYBACK_LOG_TAG_ENV: &str = "PLAYBACK_LOG_TAG";

/// Root directory under which the logs directory is created.
pub const PLAYBACK_LOG_ROOT_ENV: &str = "PLAYBACK_LOG_ROOT";

/// File name prefix of exported logs.
pub const PLAYBACK_LOG_PREFIX_ENV: &str = "PLAYBACK_LOG_PREFIX";

/// Export format, `text` or `json`.
pub const PLAYBACK_LOG_FORMAT_ENV: &str = "PLAYBACK_LOG_FORMAT";

/// `true` to insert new records at the head of the buffer.
pub const PLAYBACK_LOG_MOST_RECENT_FIRST_ENV: &str = "PLAYBACK_LOG_MOST_RECENT_FIRST";

/// `true` to drop history on non-repeat media item transitions.
pub const PLAYBACK_LOG_CLEAR_ON_TRANSITION_ENV: &str = "PLAYBACK_LOG_CLEAR_ON_TRANSITION";

/// Maximum number of buffered records; unset or `0` means unbounded.
pub const PLAYBACK_LOG_CAPACITY_ENV: &str = "PLAYBACK_LOG_CAPACITY";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read an environment variable, treating unset and empty the same.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
