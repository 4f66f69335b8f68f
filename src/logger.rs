use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, trace, warn};

use crate::buffer::LogBuffer;
use crate::config::LoggerConfig;
use crate::event::{PlaybackEvent, TransitionReason};
use crate::export::{Collision, ExportError, LogExporter};
use crate::record::EventLogRecord;
use crate::render::{Rendered, Renderers};
use crate::share::{ShareRequest, ShareTarget};

/// Observer attached to a playback engine.
///
/// Engines call `on_event` from their dispatch thread. Implementations must
/// not panic and must not block for long.
pub trait PlaybackListener: Send + Sync {
    fn on_event(&self, event: &PlaybackEvent);
}

impl<T: PlaybackListener + ?Sized> PlaybackListener for Arc<T> {
    fn on_event(&self, event: &PlaybackEvent) {
        (**self).on_event(event)
    }
}

/// Counters maintained by the logger.
#[derive(Debug, Default)]
pub struct LoggerStats {
    /// Notifications received, including no-ops.
    pub received: AtomicU64,
    /// Records added to the buffer.
    pub recorded: AtomicU64,
    /// Notifications that produced no record.
    pub ignored: AtomicU64,
    /// Records evicted because the buffer was full.
    pub evicted: AtomicU64,
    /// Records discarded by clear-on-transition.
    pub cleared: AtomicU64,
}

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    /// Records written, equal to the buffer length when the export began.
    pub records: usize,
    /// Whether the share target accepted the file.
    pub shared: bool,
}

/// Records playback notifications and exports them on request.
///
/// Notifications are rendered through the configured [`Renderers`] table,
/// written to the `tracing` diagnostic stream, and appended to a
/// [`LogBuffer`]. Exports snapshot the buffer and never modify it.
pub struct PlaybackEventLogger {
    config: LoggerConfig,
    renderers: Renderers,
    buffer: LogBuffer,
    exporter: LogExporter,
    share: Arc<dyn ShareTarget>,
    sharing: AtomicBool,
    stats: LoggerStats,
}

impl PlaybackEventLogger {
    /// Unusable timestamp patterns are reported with `warn!`; formatting
    /// then falls back to the default patterns.
    pub fn new(config: LoggerConfig, share: Arc<dyn ShareTarget>) -> Self {
        if let Err(e) = config.validate() {
            warn!(tag = %config.tag, error = %e, "falling back to default timestamp pattern");
        }
        let buffer = LogBuffer::new(config.record_order, config.capacity);
        let exporter = config.exporter();
        Self {
            config,
            renderers: Renderers::default(),
            buffer,
            exporter,
            share,
            sharing: AtomicBool::new(false),
            stats: LoggerStats::default(),
        }
    }

    /// Replace the kind-to-renderer table.
    pub fn with_renderers(mut self, renderers: Renderers) -> Self {
        self.renderers = renderers;
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> &LoggerStats {
        &self.stats
    }

    /// Current buffer contents in buffer order.
    pub fn records(&self) -> Vec<EventLogRecord> {
        self.buffer.snapshot()
    }

    /// `true` while an export-and-share flow is open.
    pub fn is_sharing(&self) -> bool {
        self.sharing.load(Ordering::Acquire)
    }

    /// Render and record one notification.
    ///
    /// Returns the record added to the buffer, if any.
    pub fn record(&self, event: &PlaybackEvent) -> Option<EventLogRecord> {
        self.stats.received.fetch_add(1, Ordering::Relaxed);

        let (message, category) = match self.renderers.render(event) {
            Some(Rendered::Record { message, category }) => (message, category),
            Some(Rendered::DiagnosticOnly { message }) => {
                debug!(tag = %self.config.tag, kind = %event.kind(), "{message}");
                self.stats.ignored.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            None => {
                trace!(tag = %self.config.tag, kind = %event.kind(), "no renderer, ignoring");
                self.stats.ignored.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        debug!(tag = %self.config.tag, category = %category, "{message}");
        let record = EventLogRecord::new(message, category, &self.config.display_format);

        if self.clears_history(event) {
            let discarded = self.buffer.reset_to(record.clone());
            self.stats.cleared.fetch_add(discarded as u64, Ordering::Relaxed);
            debug!(tag = %self.config.tag, discarded, "media item changed, log history cleared");
        } else {
            let evicted = self.buffer.push(record.clone());
            if evicted > 0 {
                self.stats.evicted.fetch_add(evicted as u64, Ordering::Relaxed);
            }
        }
        self.stats.recorded.fetch_add(1, Ordering::Relaxed);
        Some(record)
    }

    fn clears_history(&self, event: &PlaybackEvent) -> bool {
        self.config.clear_on_transition
            && matches!(
                event,
                PlaybackEvent::MediaItemTransition { reason, .. } if *reason != TransitionReason::Repeat
            )
    }

    /// Drop all buffered records.
    pub fn clear(&self) -> usize {
        self.buffer.clear()
    }

    /// Write the current buffer to a new export file.
    ///
    /// Blocks on file I/O; call it off the engine's dispatch thread.
    pub fn export(&self) -> Result<PathBuf, ExportError> {
        self.export_at(Utc::now())
    }

    /// Like [`export`](Self::export), naming the file after `at`.
    pub fn export_at(&self, at: DateTime<Utc>) -> Result<PathBuf, ExportError> {
        let records = self.buffer.snapshot();
        let path = self.exporter.write(&records, at)?;
        info!(tag = %self.config.tag, path = %path.display(), records = records.len(), "playback log exported");
        Ok(path)
    }

    /// Export the buffer and hand the file to the share target.
    ///
    /// Only one flow runs at a time; a call made while another is open
    /// fails with [`ExportError::ShareInProgress`] without writing anything.
    /// Share failures are logged and reported as `shared: false`.
    pub async fn export_and_share(&self) -> Result<ExportOutcome, ExportError> {
        self.export_and_share_with(Collision::Fail).await
    }

    /// Like [`export_and_share`](Self::export_and_share), with an explicit
    /// policy for file name collisions.
    pub async fn export_and_share_with(&self, collision: Collision) -> Result<ExportOutcome, ExportError> {
        let _guard = ShareGuard::acquire(&self.sharing).ok_or(ExportError::ShareInProgress)?;

        let records = self.buffer.snapshot();
        let count = records.len();
        let exporter = self.exporter.clone();
        let at = Utc::now();
        let path = tokio::task::spawn_blocking(move || exporter.write_with(&records, at, collision))
            .await
            .map_err(|e| ExportError::Task(e.to_string()))??;
        info!(tag = %self.config.tag, path = %path.display(), records = count, "playback log exported");

        let request = ShareRequest {
            path: path.clone(),
            mime_type: self.config.effective_mime_type().to_string(),
            title: self.config.share_title.clone(),
        };
        let shared = match self.share.share(&request).await {
            Ok(()) => true,
            Err(e) => {
                error!(tag = %self.config.tag, path = %path.display(), error = %e, "the exported file can't be shared");
                false
            }
        };

        Ok(ExportOutcome {
            path,
            records: count,
            shared,
        })
    }
}

impl PlaybackListener for PlaybackEventLogger {
    fn on_event(&self, event: &PlaybackEvent) {
        self.record(event);
    }
}

/// Holds the reentrancy flag for the duration of one export-and-share flow.
struct ShareGuard<'a>(&'a AtomicBool);

impl<'a> ShareGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ShareGuard(flag))
    }
}

impl Drop for ShareGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
