use std::sync::Arc;

use playback_event_log::channel_share::ChannelShare;
use playback_event_log::event::*;
use playback_event_log::init::init_tracing;
use playback_event_log::{LoggerConfig, PlaybackEventLogger, PlaybackListener};

/// Feeds a scripted playback session through the logger, then exports the
/// log and prints the share request the host would receive.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let (share, mut requests) = ChannelShare::new();
    let config = LoggerConfig {
        logs_root: std::env::temp_dir(),
        ..LoggerConfig::from_env()?
    };
    let logger = PlaybackEventLogger::new(config, Arc::new(share));

    let item = MediaItem::new("bbb_30fps")
        .with_uri("https://dash.akamaized.net/akamai/bbb_30fps/bbb_30fps.mpd", Some("application/dash+xml".into()));

    let script = vec![
        PlaybackEvent::MediaItemTransition {
            media_item: Some(item.clone()),
            reason: TransitionReason::PlaylistChanged,
        },
        PlaybackEvent::IsLoadingChanged(true),
        PlaybackEvent::StateChanged(PlaybackState::Buffering),
        PlaybackEvent::TracksChanged(Tracks {
            groups: vec![TrackGroup {
                track_type: TrackType::Video,
                is_supported: true,
                is_selected: true,
                formats: vec![TrackFormat {
                    id: Some("1".into()),
                    bitrate: Some(1_254_000),
                    codecs: Some("avc1.64001f".into()),
                    width: Some(1024),
                    height: Some(576),
                    frame_rate: Some(30.0),
                    sample_rate: None,
                }],
            }],
        }),
        PlaybackEvent::VideoSizeChanged(VideoSize {
            width: 1024,
            height: 576,
            pixel_width_height_ratio: 1.0,
        }),
        PlaybackEvent::RenderedFirstFrame,
        PlaybackEvent::StateChanged(PlaybackState::Ready),
        PlaybackEvent::IsPlayingChanged(true),
        PlaybackEvent::Events {
            kinds: vec![EventKind::PlaybackStateChanged],
            snapshot: PlayerSnapshot {
                content_duration_ms: Some(634_566),
                volume: 1.0,
                current_media_item: Some(item.clone()),
            },
        },
        PlaybackEvent::PositionDiscontinuity {
            old: PositionInfo {
                media_item: Some(item.clone()),
                position_ms: 42_000,
            },
            new: PositionInfo {
                media_item: Some(item),
                position_ms: 12_000,
            },
            reason: DiscontinuityReason::Seek,
        },
        PlaybackEvent::Error(PlaybackError {
            error_code_name: "ERROR_CODE_IO_BAD_HTTP_STATUS".into(),
            cause: Some(ErrorCause::Http(HttpTransportError::InvalidResponseCode {
                response_code: 404,
                message: Some("Response code: 404".into()),
            })),
        }),
    ];

    for event in &script {
        logger.on_event(event);
    }

    let outcome = logger.export_and_share().await?;
    println!("exported {} records to {}", outcome.records, outcome.path.display());
    if let Some(request) = requests.recv().await {
        println!("share request: {} ({}) - {}", request.path.display(), request.mime_type, request.title);
    }
    Ok(())
}
