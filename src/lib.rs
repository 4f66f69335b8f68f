pub mod record;
pub mod event;
pub mod render;
pub mod buffer;
pub mod export;
pub mod share;
pub mod logger;
pub mod queue;

#[cfg(feature = "command-share")]
pub mod command_share;

pub mod channel_share;
pub mod noop_share;
pub mod config;
pub mod env;
pub mod init;

pub use buffer::{LogBuffer, RecordOrder};
pub use config::LoggerConfig;
pub use event::PlaybackEvent;
pub use logger::{ExportOutcome, PlaybackEventLogger, PlaybackListener};
pub use record::EventLogRecord;
