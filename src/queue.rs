use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::export::Collision;
use crate::logger::{ExportOutcome, PlaybackEventLogger};

/// Serializes export requests through a bounded channel and a background
/// task.
///
/// Gesture handlers and other request sources call [`request`] from any
/// thread without blocking; the task runs one export-and-share flow at a
/// time, so queued requests never hit the logger's reentrancy guard.
/// Requests arriving while the queue is full are dropped and counted.
///
/// Exports started within one tick of the file name pattern get `-1`,
/// `-2`, ... suffixes instead of failing with `AlreadyExists`.
///
/// [`request`]: ExportQueue::request
pub struct ExportQueue {
    sender: mpsc::Sender<ExportTicket>,
    /// Requests received, whether queued or not.
    pub requested: Arc<AtomicU64>,
    /// Dropped because the queue was full or closed.
    pub dropped: Arc<AtomicU64>,
    /// Exports that wrote a file.
    pub completed: Arc<AtomicU64>,
    /// Exports that failed before a file was written.
    pub failed: Arc<AtomicU64>,
}

struct ExportTicket {
    reply: Option<tokio::sync::oneshot::Sender<Option<ExportOutcome>>>,
}

impl ExportQueue {
    /// Create a queue and spawn its worker on the current Tokio runtime.
    ///
    /// `capacity` is raised to at least 1.
    pub fn new(logger: Arc<PlaybackEventLogger>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<ExportTicket>(capacity.max(1));

        let requested = Arc::new(AtomicU64::new(0));
        let dropped = Arc::new(AtomicU64::new(0));
        let completed = Arc::new(AtomicU64::new(0));
        let failed = Arc::new(AtomicU64::new(0));

        let completed_bg = Arc::clone(&completed);
        let failed_bg = Arc::clone(&failed);

        let handle = tokio::spawn(async move {
            while let Some(ticket) = rx.recv().await {
                let outcome = match logger.export_and_share_with(Collision::Suffix).await {
                    Ok(outcome) => {
                        completed_bg.fetch_add(1, Ordering::Relaxed);
                        info!(path = %outcome.path.display(), shared = outcome.shared, "queued export finished");
                        Some(outcome)
                    }
                    Err(e) => {
                        failed_bg.fetch_add(1, Ordering::Relaxed);
                        warn!(error = %e, "queued export failed");
                        None
                    }
                };
                if let Some(reply) = ticket.reply {
                    let _ = reply.send(outcome);
                }
            }
        });

        (
            Self {
                sender: tx,
                requested,
                dropped,
                completed,
                failed,
            },
            handle,
        )
    }

    /// Queue an export. Returns `false` if the request was dropped.
    pub fn request(&self) -> bool {
        self.enqueue(ExportTicket { reply: None })
    }

    /// Queue an export and wait for its outcome.
    ///
    /// Resolves to `None` if the request was dropped or the export failed.
    pub async fn request_and_wait(&self) -> Option<ExportOutcome> {
        let (reply, rx) = tokio::sync::oneshot::channel();
        if !self.enqueue(ExportTicket { reply: Some(reply) }) {
            return None;
        }
        rx.await.ok().flatten()
    }

    fn enqueue(&self, ticket: ExportTicket) -> bool {
        self.requested.fetch_add(1, Ordering::Relaxed);
        match self.sender.try_send(ticket) {
            Ok(()) => true,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("export queue full, dropping export request");
                false
            }
        }
    }
}
