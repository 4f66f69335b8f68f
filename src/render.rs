//! Turning playback notifications into log lines.
//!
//! Each event kind maps to one [`Renderer`] in a [`Renderers`] table. Kinds
//! without an entry are no-ops: nothing is recorded and nothing is written
//! to the diagnostic stream.

use std::collections::HashMap;

use crate::event::{
    AudioAttributes, ErrorCause, EventKind, HttpTransportError, MediaItem, PlaybackError,
    PlaybackEvent, PlayerSnapshot, PositionInfo, TrackFormat, Tracks, VideoSize,
};

const NULL: &str = "null";

/// Output of a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Goes to the diagnostic stream and into the buffer.
    Record { message: String, category: String },
    /// Goes to the diagnostic stream only.
    DiagnosticOnly { message: String },
}

impl Rendered {
    fn record(message: String, category: impl Into<String>) -> Option<Self> {
        Some(Rendered::Record {
            message,
            category: category.into(),
        })
    }

    pub fn message(&self) -> &str {
        match self {
            Rendered::Record { message, .. } | Rendered::DiagnosticOnly { message } => message,
        }
    }
}

/// Renders one event. Returning `None` drops the event.
pub type Renderer = fn(&PlaybackEvent) -> Option<Rendered>;

/// Explicit mapping from event kind to renderer.
#[derive(Clone)]
pub struct Renderers {
    table: HashMap<EventKind, Renderer>,
}

impl Renderers {
    /// A table with no entries; every event is a no-op.
    pub fn empty() -> Self {
        Self { table: HashMap::new() }
    }

    /// Install or replace the renderer for `kind`.
    pub fn with(mut self, kind: EventKind, renderer: Renderer) -> Self {
        self.table.insert(kind, renderer);
        self
    }

    /// Remove the renderer for `kind`, turning it into a no-op.
    pub fn without(mut self, kind: EventKind) -> Self {
        self.table.remove(&kind);
        self
    }

    pub fn handles(&self, kind: EventKind) -> bool {
        self.table.contains_key(&kind)
    }

    pub fn render(&self, event: &PlaybackEvent) -> Option<Rendered> {
        let renderer = self.table.get(&event.kind())?;
        renderer(event)
    }
}

impl Default for Renderers {
    /// Every kind the logger acts on. Device-info changes are left out.
    fn default() -> Self {
        Self::empty()
            .with(EventKind::PlaybackStateChanged, render_state_changed)
            .with(EventKind::PlayerError, render_error)
            .with(EventKind::PositionDiscontinuity, render_position_discontinuity)
            .with(EventKind::IsPlayingChanged, render_is_playing_changed)
            .with(EventKind::TracksChanged, render_tracks_changed)
            .with(EventKind::IsLoadingChanged, render_is_loading_changed)
            .with(EventKind::AudioAttributesChanged, render_audio_attributes_changed)
            .with(EventKind::VolumeChanged, render_volume_changed)
            .with(EventKind::DeviceVolumeChanged, render_device_volume_changed)
            .with(EventKind::VideoSizeChanged, render_video_size_changed)
            .with(EventKind::SurfaceSizeChanged, render_surface_size_changed)
            .with(EventKind::MediaItemTransition, render_media_item_transition)
            .with(EventKind::RepeatModeChanged, render_repeat_mode_changed)
            .with(EventKind::RenderedFirstFrame, render_first_frame)
            .with(EventKind::Events, render_events)
    }
}

fn or_null<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NULL.to_string())
}

fn media_id(item: Option<&MediaItem>) -> &str {
    item.map(|i| i.media_id.as_str()).unwrap_or(NULL)
}

pub fn render_state_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::StateChanged(state) = event else {
        return None;
    };
    Rendered::record(format!("changed state to {state}"), "onPlaybackStateChanged")
}

pub fn render_error(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::Error(error) = event else {
        return None;
    };
    Rendered::record(
        describe_error(error),
        format!("onPlayerError - {}", error.error_code_name),
    )
}

/// Message for a player error, classified by its cause.
pub fn describe_error(error: &PlaybackError) -> String {
    match &error.cause {
        Some(ErrorCause::Http(http)) => match http {
            HttpTransportError::InvalidContentType { content_type } => {
                format!("invalid content type => [{}]", or_null(content_type.as_deref()))
            }
            HttpTransportError::InvalidResponseCode {
                response_code,
                message,
            } => format!(
                "invalid response code => [{response_code}] - {}",
                or_null(message.as_deref())
            ),
            HttpTransportError::CleartextNotPermitted { message } => {
                format!("cleartext not permitted - {}", or_null(message.as_deref()))
            }
            HttpTransportError::Other { message } => format!(
                "unrecognized http transport error - {}",
                or_null(message.as_deref())
            ),
        },
        Some(ErrorCause::Other { message }) => format!("Cause => {}", or_null(message.as_deref())),
        None => format!("Cause => {NULL}"),
    }
}

pub fn render_position_discontinuity(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::PositionDiscontinuity { old, new, reason } = event else {
        return None;
    };
    Rendered::record(
        describe_discontinuity(old, new),
        format!("onPositionDiscontinuity - reason => [{reason}]"),
    )
}

/// Backward jumps read as a rewind; anything else, including no movement,
/// reads as an advance.
pub fn describe_discontinuity(old: &PositionInfo, new: &PositionInfo) -> String {
    let verb = if old.position_ms > new.position_ms {
        "Rewinding"
    } else {
        "Advancing"
    };
    format!(
        "{verb} video - Id[{}] - from {} to {} ({}ms)",
        media_id(old.media_item.as_ref()),
        old.position_ms,
        new.position_ms,
        new.position_ms.abs_diff(old.position_ms)
    )
}

pub fn render_is_playing_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::IsPlayingChanged(is_playing) = event else {
        return None;
    };
    Some(Rendered::DiagnosticOnly {
        message: format!("Is video playing => {is_playing}"),
    })
}

pub fn render_tracks_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::TracksChanged(tracks) = event else {
        return None;
    };
    Rendered::record(describe_tracks(tracks), "onTracksChanged")
}

pub fn describe_tracks(tracks: &Tracks) -> String {
    let mut out = format!("Tracks group size => [{}]", tracks.groups.len());
    for (index, group) in tracks.groups.iter().enumerate() {
        out.push_str(&format!(
            "\nTrack : [{index}]\nTrackType => [{}] - Supported [{}] - Length => [{}] - Is Selected - {}\nFormat :",
            group.track_type,
            if group.is_supported { "Yes" } else { "No" },
            group.formats.len(),
            group.is_selected
        ));
        for format in &group.formats {
            out.push('\n');
            out.push_str(&describe_format(format));
        }
    }
    out
}

fn describe_format(format: &TrackFormat) -> String {
    format!(
        "{{ Id - [{}] | Bitrate - [{}] | Codecs - [{}] | Dimensions - [height: {} - width: {}] | FrameRate - [{}] | SampleRate - [{}] }}",
        or_null(format.id.as_deref()),
        or_null(format.bitrate),
        or_null(format.codecs.as_deref()),
        or_null(format.height),
        or_null(format.width),
        or_null(format.frame_rate),
        or_null(format.sample_rate),
    )
}

pub fn render_is_loading_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::IsLoadingChanged(is_loading) = event else {
        return None;
    };
    Rendered::record(format!("Loading - {is_loading}"), "onIsLoadingChanged")
}

pub fn render_audio_attributes_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::AudioAttributesChanged(AudioAttributes {
        content_type,
        spatialization_behavior,
    }) = event
    else {
        return None;
    };
    Rendered::record(
        format!("{content_type} - {spatialization_behavior}"),
        "onAudioAttributesChanged",
    )
}

pub fn render_volume_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::VolumeChanged(volume) = event else {
        return None;
    };
    Rendered::record(format!("Volume changed [{volume}]"), "onVolumeChanged")
}

pub fn render_device_volume_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::DeviceVolumeChanged { volume, muted } = event else {
        return None;
    };
    Rendered::record(
        format!("Device Volume changed [{volume}] - muted [{muted}]"),
        "onDeviceVolumeChanged",
    )
}

pub fn render_video_size_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::VideoSizeChanged(VideoSize {
        width,
        height,
        pixel_width_height_ratio,
    }) = event
    else {
        return None;
    };
    let pixels = if *pixel_width_height_ratio == 1.0 {
        "Square pixels"
    } else {
        "Anamorphic content"
    };
    Rendered::record(
        format!("Video size changed height: [{height}] - width [{width}] - pixelWidthHeightRatio - {pixels}"),
        "onVideoSizeChanged",
    )
}

pub fn render_surface_size_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::SurfaceSizeChanged { width, height } = event else {
        return None;
    };
    Rendered::record(
        format!("Surface size changed - height:[{height}] - width:[{width}]"),
        "onSurfaceSizeChanged",
    )
}

pub fn render_media_item_transition(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::MediaItemTransition { media_item, reason } = event else {
        return None;
    };
    Rendered::record(
        format!("{reason} - Id[{}]", media_id(media_item.as_ref())),
        "onMediaItemTransition",
    )
}

pub fn render_repeat_mode_changed(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::RepeatModeChanged(mode) = event else {
        return None;
    };
    Rendered::record(format!("Repeat mode changed - {mode}"), "onRepeatModeChanged")
}

pub fn render_first_frame(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::RenderedFirstFrame = event else {
        return None;
    };
    Rendered::record("Rendered first frame".to_string(), "onRenderedFirstFrame")
}

pub fn render_events(event: &PlaybackEvent) -> Option<Rendered> {
    let PlaybackEvent::Events { kinds, snapshot } = event else {
        return None;
    };
    Rendered::record(describe_events(kinds, snapshot), "onEvents")
}

/// Names every kind in the batch. A batch of exactly one kind other than a
/// loading change also carries the player snapshot.
pub fn describe_events(kinds: &[EventKind], snapshot: &PlayerSnapshot) -> String {
    let mut out = String::from("Events - ");
    for kind in kinds {
        out.push_str(&format!(" {{ {kind} }} "));
    }

    if let [single] = kinds {
        if *single != EventKind::IsLoadingChanged {
            out.push_str(&format!(
                "Content duration : [{}] - Player Volume : [{}] - ",
                or_null(snapshot.content_duration_ms),
                snapshot.volume
            ));
            if let Some(item) = &snapshot.current_media_item {
                out.push_str(&format!("MediaItem Id : [{}] - ", item.media_id));
                if let Some(config) = &item.local_configuration {
                    out.push_str(&format!(
                        "MediaItem URI : [{}] - MimeType : [{}] - ",
                        config.uri,
                        or_null(config.mime_type.as_deref())
                    ));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::*;

    fn message(rendered: Option<Rendered>) -> String {
        rendered.expect("rendered").message().to_string()
    }

    #[test]
    fn invalid_response_code_mentions_code() {
        let error = PlaybackError {
            error_code_name: "ERROR_CODE_IO_BAD_HTTP_STATUS".into(),
            cause: Some(ErrorCause::Http(HttpTransportError::InvalidResponseCode {
                response_code: 404,
                message: Some("Response code: 404".into()),
            })),
        };
        let rendered = Renderers::default().render(&PlaybackEvent::Error(error)).unwrap();
        match rendered {
            Rendered::Record { message, category } => {
                assert!(message.contains("[404]"));
                assert_eq!(category, "onPlayerError - ERROR_CODE_IO_BAD_HTTP_STATUS");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn http_sub_kinds_render_their_fields() {
        let content_type = describe_error(&PlaybackError {
            error_code_name: "X".into(),
            cause: Some(ErrorCause::Http(HttpTransportError::InvalidContentType {
                content_type: Some("text/html".into()),
            })),
        });
        assert!(content_type.contains("[text/html]"));

        let cleartext = describe_error(&PlaybackError {
            error_code_name: "X".into(),
            cause: Some(ErrorCause::Http(HttpTransportError::CleartextNotPermitted {
                message: Some("http://x not allowed".into()),
            })),
        });
        assert!(cleartext.starts_with("cleartext not permitted"));
        assert!(cleartext.contains("http://x not allowed"));

        let other = describe_error(&PlaybackError {
            error_code_name: "X".into(),
            cause: Some(ErrorCause::Http(HttpTransportError::Other { message: None })),
        });
        assert_eq!(other, "unrecognized http transport error - null");
    }

    #[test]
    fn non_http_cause_renders_message_or_null() {
        let boom = describe_error(&PlaybackError {
            error_code_name: "ERROR_CODE_UNSPECIFIED".into(),
            cause: Some(ErrorCause::Other {
                message: Some("boom".into()),
            }),
        });
        assert!(boom.contains("boom"));

        let missing = describe_error(&PlaybackError {
            error_code_name: "ERROR_CODE_UNSPECIFIED".into(),
            cause: None,
        });
        assert_eq!(missing, "Cause => null");
    }

    #[test]
    fn discontinuity_direction() {
        let at = |ms| PositionInfo {
            media_item: Some(MediaItem::new("bbb")),
            position_ms: ms,
        };
        let rewind = describe_discontinuity(&at(5000), &at(1000));
        assert!(rewind.starts_with("Rewinding"));
        assert!(rewind.contains("Id[bbb]"));
        assert!(rewind.contains("(4000ms)"));

        let advance = describe_discontinuity(&at(1000), &at(5000));
        assert!(advance.starts_with("Advancing"));

        let unset = PositionInfo {
            media_item: None,
            position_ms: i64::MIN + 1,
        };
        let from_unset = describe_discontinuity(&unset, &at(5000));
        assert!(from_unset.starts_with("Advancing"));
        assert!(from_unset.contains(&format!("({}ms)", 5000i64.abs_diff(i64::MIN + 1))));
        let to_min = describe_discontinuity(
            &at(i64::MAX),
            &PositionInfo {
                media_item: None,
                position_ms: i64::MIN,
            },
        );
        assert!(to_min.contains(&format!("({}ms)", u64::MAX)));

        let no_item = describe_discontinuity(&PositionInfo::default(), &PositionInfo::default());
        assert!(no_item.contains("Id[null]"));
    }

    #[test]
    fn tracks_list_groups_and_formats() {
        let tracks = Tracks {
            groups: vec![TrackGroup {
                track_type: TrackType::Video,
                is_supported: true,
                is_selected: false,
                formats: vec![TrackFormat {
                    id: Some("v1".into()),
                    bitrate: Some(800_000),
                    codecs: Some("avc1.4d401f".into()),
                    width: Some(640),
                    height: Some(360),
                    frame_rate: None,
                    sample_rate: None,
                }],
            }],
        };
        let text = describe_tracks(&tracks);
        assert!(text.starts_with("Tracks group size => [1]"));
        assert!(text.contains("TrackType => [VIDEO] - Supported [Yes] - Length => [1]"));
        assert!(text.contains("Bitrate - [800000]"));
        assert!(text.contains("FrameRate - [null]"));

        assert_eq!(describe_tracks(&Tracks::default()), "Tracks group size => [0]");
    }

    #[test]
    fn batch_with_single_kind_includes_snapshot() {
        let snapshot = PlayerSnapshot {
            content_duration_ms: Some(634_000),
            volume: 1.0,
            current_media_item: Some(
                MediaItem::new("sintel").with_uri("https://example.com/a.mpd", Some("application/dash+xml".into())),
            ),
        };
        let single = describe_events(&[EventKind::TracksChanged], &snapshot);
        assert!(single.contains("{ EVENT_TRACKS_CHANGED }"));
        assert!(single.contains("Content duration : [634000]"));
        assert!(single.contains("MediaItem URI : [https://example.com/a.mpd]"));

        let loading = describe_events(&[EventKind::IsLoadingChanged], &snapshot);
        assert!(!loading.contains("Content duration"));

        let pair = describe_events(&[EventKind::TimelineChanged, EventKind::VolumeChanged], &snapshot);
        assert!(pair.contains("EVENT_VOLUME_CHANGED"));
        assert!(!pair.contains("Content duration"));
    }

    #[test]
    fn device_info_and_is_playing_do_not_record() {
        let renderers = Renderers::default();
        let info = PlaybackEvent::DeviceInfoChanged(DeviceInfo {
            playback_type: PlaybackType::Local,
            min_volume: 0,
            max_volume: 15,
        });
        assert!(renderers.render(&info).is_none());

        let playing = renderers.render(&PlaybackEvent::IsPlayingChanged(true));
        assert_eq!(
            playing,
            Some(Rendered::DiagnosticOnly {
                message: "Is video playing => true".into()
            })
        );
    }

    #[test]
    fn table_can_be_customized() {
        fn shout(_: &PlaybackEvent) -> Option<Rendered> {
            Some(Rendered::Record {
                message: "FIRST FRAME".into(),
                category: "custom".into(),
            })
        }
        let renderers = Renderers::default()
            .without(EventKind::VolumeChanged)
            .with(EventKind::RenderedFirstFrame, shout);

        assert!(!renderers.handles(EventKind::VolumeChanged));
        assert!(renderers.render(&PlaybackEvent::VolumeChanged(0.5)).is_none());
        assert_eq!(message(renderers.render(&PlaybackEvent::RenderedFirstFrame)), "FIRST FRAME");
    }

    #[test]
    fn simple_renderings() {
        let r = Renderers::default();
        assert_eq!(
            message(r.render(&PlaybackEvent::StateChanged(PlaybackState::Buffering))),
            "changed state to STATE_BUFFERING"
        );
        assert_eq!(
            message(r.render(&PlaybackEvent::VideoSizeChanged(VideoSize {
                width: 640,
                height: 360,
                pixel_width_height_ratio: 1.0,
            }))),
            "Video size changed height: [360] - width [640] - pixelWidthHeightRatio - Square pixels"
        );
        assert_eq!(
            message(r.render(&PlaybackEvent::AudioAttributesChanged(AudioAttributes {
                content_type: AudioContentType::Movie,
                spatialization_behavior: SpatializationBehavior::Auto,
            }))),
            "AUDIO_CONTENT_TYPE_MOVIE - SPATIALIZATION_BEHAVIOR_AUTO"
        );
        assert_eq!(
            message(r.render(&PlaybackEvent::MediaItemTransition {
                media_item: None,
                reason: TransitionReason::Seek,
            })),
            "MEDIA_ITEM_TRANSITION_REASON_SEEK - Id[null]"
        );
    }
}
