use std::sync::Arc;
use std::time::Instant;

use playback_event_log::command_share::{CommandShare, CommandShareConfig};
use playback_event_log::event::{PlaybackEvent, PlaybackState};
use playback_event_log::init::{init_tracing_with_config, DiagnosticsConfig};
use playback_event_log::queue::ExportQueue;
use playback_event_log::{LoggerConfig, PlaybackEventLogger, PlaybackListener};
use tokio::time::{sleep, Duration};

/// Floods the logger with events while export requests arrive faster than
/// they can be served. Exported files are handed to `SHARE_PROGRAM`
/// (default `ls -l`).
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing_with_config(DiagnosticsConfig {
        filter: "playback_event_log=info".to_string(),
        ..DiagnosticsConfig::default()
    })?;

    let program = std::env::var("SHARE_PROGRAM").unwrap_or_else(|_| "ls".to_string());
    let mut share_config = CommandShareConfig::new(program);
    share_config.args = vec!["-l".to_string()];

    let config = LoggerConfig {
        logs_root: std::env::temp_dir(),
        file_timestamp_pattern: "%Y%m%d_%H%M%S%.6f".to_string(),
        capacity: Some(10_000),
        ..LoggerConfig::default()
    };
    let logger = Arc::new(PlaybackEventLogger::new(config, Arc::new(CommandShare::new(share_config))));
    let (queue, _worker) = ExportQueue::new(Arc::clone(&logger), 4);

    let n: u64 = 50_000;
    let start = Instant::now();
    for i in 0..n {
        let state = if i % 2 == 0 { PlaybackState::Buffering } else { PlaybackState::Ready };
        logger.on_event(&PlaybackEvent::StateChanged(state));
        if i % 5_000 == 0 {
            queue.request();
        }
    }
    let elapsed = start.elapsed();
    println!(
        "recorded {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );

    // Give the worker time to drain the queue.
    sleep(Duration::from_secs(2)).await;
    println!(
        "export requests: {} queued, {} dropped, {} completed",
        queue.requested.load(std::sync::atomic::Ordering::Relaxed),
        queue.dropped.load(std::sync::atomic::Ordering::Relaxed),
        queue.completed.load(std::sync::atomic::Ordering::Relaxed),
    );
    Ok(())
}
