//! Playback notifications as delivered by the external player engine.
//!
//! Integer codes coming from an engine convert through `From<i32>`; codes
//! this crate does not know land in an `Unknown` variant and are rendered
//! as placeholder text rather than rejected.

use std::fmt;

/// Engine playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Buffering,
    Ready,
    Ended,
    Unknown(i32),
}

impl From<i32> for PlaybackState {
    fn from(code: i32) -> Self {
        match code {
            1 => PlaybackState::Idle,
            2 => PlaybackState::Buffering,
            3 => PlaybackState::Ready,
            4 => PlaybackState::Ended,
            other => PlaybackState::Unknown(other),
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => f.write_str("STATE_IDLE"),
            PlaybackState::Buffering => f.write_str("STATE_BUFFERING"),
            PlaybackState::Ready => f.write_str("STATE_READY"),
            PlaybackState::Ended => f.write_str("STATE_ENDED"),
            PlaybackState::Unknown(code) => write!(f, "UNKNOWN_STATE({code})"),
        }
    }
}

/// Why the active media item changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    Repeat,
    Auto,
    Seek,
    PlaylistChanged,
    Unknown(i32),
}

impl From<i32> for TransitionReason {
    fn from(code: i32) -> Self {
        match code {
            0 => TransitionReason::Repeat,
            1 => TransitionReason::Auto,
            2 => TransitionReason::Seek,
            3 => TransitionReason::PlaylistChanged,
            other => TransitionReason::Unknown(other),
        }
    }
}

impl fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionReason::Repeat => f.write_str("MEDIA_ITEM_TRANSITION_REASON_REPEAT"),
            TransitionReason::Auto => f.write_str("MEDIA_ITEM_TRANSITION_REASON_AUTO"),
            TransitionReason::Seek => f.write_str("MEDIA_ITEM_TRANSITION_REASON_SEEK"),
            TransitionReason::PlaylistChanged => {
                f.write_str("MEDIA_ITEM_TRANSITION_REASON_PLAYLIST_CHANGED")
            }
            TransitionReason::Unknown(code) => write!(f, "UNKNOWN_TRANSITION_REASON({code})"),
        }
    }
}

/// Why the playback position jumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscontinuityReason {
    AutoTransition,
    Seek,
    SeekAdjustment,
    Skip,
    Remove,
    Internal,
    Unknown(i32),
}

impl From<i32> for DiscontinuityReason {
    fn from(code: i32) -> Self {
        match code {
            0 => DiscontinuityReason::AutoTransition,
            1 => DiscontinuityReason::Seek,
            2 => DiscontinuityReason::SeekAdjustment,
            3 => DiscontinuityReason::Skip,
            4 => DiscontinuityReason::Remove,
            5 => DiscontinuityReason::Internal,
            other => DiscontinuityReason::Unknown(other),
        }
    }
}

impl fmt::Display for DiscontinuityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscontinuityReason::AutoTransition => f.write_str("AUTO_TRANSITION"),
            DiscontinuityReason::Seek => f.write_str("SEEK"),
            DiscontinuityReason::SeekAdjustment => f.write_str("SEEK_ADJUSTMENT"),
            DiscontinuityReason::Skip => f.write_str("SKIP"),
            DiscontinuityReason::Remove => f.write_str("REMOVE"),
            DiscontinuityReason::Internal => f.write_str("INTERNAL"),
            DiscontinuityReason::Unknown(code) => write!(f, "UNKNOWN({code})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatMode {
    Off,
    One,
    All,
    Unknown(i32),
}

impl From<i32> for RepeatMode {
    fn from(code: i32) -> Self {
        match code {
            0 => RepeatMode::Off,
            1 => RepeatMode::One,
            2 => RepeatMode::All,
            other => RepeatMode::Unknown(other),
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatMode::Off => f.write_str("REPEAT_MODE_OFF"),
            RepeatMode::One => f.write_str("REPEAT_MODE_ONE"),
            RepeatMode::All => f.write_str("REPEAT_MODE_ALL"),
            RepeatMode::Unknown(code) => write!(f, "REPEAT_MODE_UNKNOWN({code})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioContentType {
    Speech,
    Music,
    Movie,
    Sonification,
    Unknown(i32),
}

impl From<i32> for AudioContentType {
    fn from(code: i32) -> Self {
        match code {
            1 => AudioContentType::Speech,
            2 => AudioContentType::Music,
            3 => AudioContentType::Movie,
            4 => AudioContentType::Sonification,
            other => AudioContentType::Unknown(other),
        }
    }
}

impl fmt::Display for AudioContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioContentType::Speech => f.write_str("AUDIO_CONTENT_TYPE_SPEECH"),
            AudioContentType::Music => f.write_str("AUDIO_CONTENT_TYPE_MUSIC"),
            AudioContentType::Movie => f.write_str("AUDIO_CONTENT_TYPE_MOVIE"),
            AudioContentType::Sonification => f.write_str("AUDIO_CONTENT_TYPE_SONIFICATION"),
            AudioContentType::Unknown(_) => f.write_str("AUDIO_CONTENT_TYPE_UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatializationBehavior {
    Auto,
    Never,
    Unknown(i32),
}

impl From<i32> for SpatializationBehavior {
    fn from(code: i32) -> Self {
        match code {
            0 => SpatializationBehavior::Auto,
            1 => SpatializationBehavior::Never,
            other => SpatializationBehavior::Unknown(other),
        }
    }
}

impl fmt::Display for SpatializationBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatializationBehavior::Auto => f.write_str("SPATIALIZATION_BEHAVIOR_AUTO"),
            SpatializationBehavior::Never => f.write_str("SPATIALIZATION_BEHAVIOR_NEVER"),
            SpatializationBehavior::Unknown(_) => f.write_str("SPATIALIZATION_BEHAVIOR_UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioAttributes {
    pub content_type: AudioContentType,
    pub spatialization_behavior: SpatializationBehavior,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalConfiguration {
    pub uri: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaItem {
    pub media_id: String,
    pub local_configuration: Option<LocalConfiguration>,
}

impl MediaItem {
    pub fn new(media_id: impl Into<String>) -> Self {
        Self {
            media_id: media_id.into(),
            local_configuration: None,
        }
    }

    pub fn with_uri(mut self, uri: impl Into<String>, mime_type: Option<String>) -> Self {
        self.local_configuration = Some(LocalConfiguration {
            uri: uri.into(),
            mime_type,
        });
        self
    }
}

/// One side of a position discontinuity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionInfo {
    pub media_item: Option<MediaItem>,
    pub position_ms: i64,
}

/// Per-track format attributes. Every attribute is optional because
/// engines leave most of them unset for some track types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackFormat {
    pub id: Option<String>,
    pub bitrate: Option<i32>,
    pub codecs: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub frame_rate: Option<f32>,
    pub sample_rate: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackType {
    Unknown,
    Default,
    Audio,
    Video,
    Text,
    Image,
    Metadata,
    Other(i32),
}

impl From<i32> for TrackType {
    fn from(code: i32) -> Self {
        match code {
            -1 => TrackType::Unknown,
            0 => TrackType::Default,
            1 => TrackType::Audio,
            2 => TrackType::Video,
            3 => TrackType::Text,
            4 => TrackType::Image,
            5 => TrackType::Metadata,
            other => TrackType::Other(other),
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackType::Unknown => f.write_str("UNKNOWN"),
            TrackType::Default => f.write_str("DEFAULT"),
            TrackType::Audio => f.write_str("AUDIO"),
            TrackType::Video => f.write_str("VIDEO"),
            TrackType::Text => f.write_str("TEXT"),
            TrackType::Image => f.write_str("IMAGE"),
            TrackType::Metadata => f.write_str("METADATA"),
            TrackType::Other(code) => write!(f, "{code}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackGroup {
    pub track_type: TrackType,
    pub is_supported: bool,
    pub is_selected: bool,
    pub formats: Vec<TrackFormat>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tracks {
    pub groups: Vec<TrackGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoSize {
    pub width: i32,
    pub height: i32,
    pub pixel_width_height_ratio: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackType {
    Local,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceInfo {
    pub playback_type: PlaybackType,
    pub min_volume: i32,
    pub max_volume: i32,
}

/// The HTTP-transport family of error causes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpTransportError {
    InvalidContentType { content_type: Option<String> },
    InvalidResponseCode { response_code: i32, message: Option<String> },
    CleartextNotPermitted { message: Option<String> },
    Other { message: Option<String> },
}

/// The underlying cause attached to a player error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCause {
    Http(HttpTransportError),
    Other { message: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackError {
    /// Engine error code name, e.g. `ERROR_CODE_IO_BAD_HTTP_STATUS`.
    pub error_code_name: String,
    pub cause: Option<ErrorCause>,
}

/// Player state captured alongside a batch of changed event kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerSnapshot {
    pub content_duration_ms: Option<i64>,
    pub volume: f32,
    pub current_media_item: Option<MediaItem>,
}

/// Event kinds the engine can report in a batch notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TimelineChanged,
    MediaItemTransition,
    TracksChanged,
    IsLoadingChanged,
    PlaybackStateChanged,
    PlayWhenReadyChanged,
    PlaybackSuppressionReasonChanged,
    IsPlayingChanged,
    RepeatModeChanged,
    ShuffleModeEnabledChanged,
    PlayerError,
    PositionDiscontinuity,
    PlaybackParametersChanged,
    AvailableCommandsChanged,
    MediaMetadataChanged,
    PlaylistMetadataChanged,
    SeekBackIncrementChanged,
    SeekForwardIncrementChanged,
    MaxSeekToPreviousPositionChanged,
    TrackSelectionParametersChanged,
    AudioAttributesChanged,
    AudioSessionId,
    VolumeChanged,
    SkipSilenceEnabledChanged,
    SurfaceSizeChanged,
    VideoSizeChanged,
    RenderedFirstFrame,
    Cues,
    Metadata,
    DeviceInfoChanged,
    DeviceVolumeChanged,
    /// Batch marker for [`PlaybackEvent::Events`]; never reported by engines.
    Events,
    Unknown(i32),
}

impl From<i32> for EventKind {
    fn from(code: i32) -> Self {
        use EventKind::*;
        match code {
            0 => TimelineChanged,
            1 => MediaItemTransition,
            2 => TracksChanged,
            3 => IsLoadingChanged,
            4 => PlaybackStateChanged,
            5 => PlayWhenReadyChanged,
            6 => PlaybackSuppressionReasonChanged,
            7 => IsPlayingChanged,
            8 => RepeatModeChanged,
            9 => ShuffleModeEnabledChanged,
            10 => PlayerError,
            11 => PositionDiscontinuity,
            12 => PlaybackParametersChanged,
            13 => AvailableCommandsChanged,
            14 => MediaMetadataChanged,
            15 => PlaylistMetadataChanged,
            16 => SeekBackIncrementChanged,
            17 => SeekForwardIncrementChanged,
            18 => MaxSeekToPreviousPositionChanged,
            19 => TrackSelectionParametersChanged,
            20 => AudioAttributesChanged,
            21 => AudioSessionId,
            22 => VolumeChanged,
            23 => SkipSilenceEnabledChanged,
            24 => SurfaceSizeChanged,
            25 => VideoSizeChanged,
            26 => RenderedFirstFrame,
            27 => Cues,
            28 => Metadata,
            29 => DeviceInfoChanged,
            30 => DeviceVolumeChanged,
            other => Unknown(other),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EventKind::*;
        let name = match self {
            TimelineChanged => "EVENT_TIMELINE_CHANGED",
            MediaItemTransition => "EVENT_MEDIA_ITEM_TRANSITION",
            TracksChanged => "EVENT_TRACKS_CHANGED",
            IsLoadingChanged => "EVENT_IS_LOADING_CHANGED",
            PlaybackStateChanged => "EVENT_PLAYBACK_STATE_CHANGED",
            PlayWhenReadyChanged => "EVENT_PLAY_WHEN_READY_CHANGED",
            PlaybackSuppressionReasonChanged => "EVENT_PLAYBACK_SUPPRESSION_REASON_CHANGED",
            IsPlayingChanged => "EVENT_IS_PLAYING_CHANGED",
            RepeatModeChanged => "EVENT_REPEAT_MODE_CHANGED",
            ShuffleModeEnabledChanged => "EVENT_SHUFFLE_MODE_ENABLED_CHANGED",
            PlayerError => "EVENT_PLAYER_ERROR",
            PositionDiscontinuity => "EVENT_POSITION_DISCONTINUITY",
            PlaybackParametersChanged => "EVENT_PLAYBACK_PARAMETERS_CHANGED",
            AvailableCommandsChanged => "EVENT_AVAILABLE_COMMANDS_CHANGED",
            MediaMetadataChanged => "EVENT_MEDIA_METADATA_CHANGED",
            PlaylistMetadataChanged => "EVENT_PLAYLIST_METADATA_CHANGED",
            SeekBackIncrementChanged => "EVENT_SEEK_BACK_INCREMENT_CHANGED",
            SeekForwardIncrementChanged => "EVENT_SEEK_FORWARD_INCREMENT_CHANGED",
            MaxSeekToPreviousPositionChanged => "EVENT_MAX_SEEK_TO_PREVIOUS_POSITION_CHANGED",
            TrackSelectionParametersChanged => "EVENT_TRACK_SELECTION_PARAMETERS_CHANGED",
            AudioAttributesChanged => "EVENT_AUDIO_ATTRIBUTES_CHANGED",
            AudioSessionId => "EVENT_AUDIO_SESSION_ID",
            VolumeChanged => "EVENT_VOLUME_CHANGED",
            SkipSilenceEnabledChanged => "EVENT_SKIP_SILENCE_ENABLED_CHANGED",
            SurfaceSizeChanged => "EVENT_SURFACE_SIZE_CHANGED",
            VideoSizeChanged => "EVENT_VIDEO_SIZE_CHANGED",
            RenderedFirstFrame => "EVENT_RENDERED_FIRST_FRAME",
            Cues => "EVENT_CUES",
            Metadata => "EVENT_METADATA",
            DeviceInfoChanged => "EVENT_DEVICE_INFO_CHANGED",
            DeviceVolumeChanged => "EVENT_DEVICE_VOLUME_CHANGED",
            Events => "EVENTS",
            Unknown(code) => return write!(f, "EVENT UNKNOWN - [{code}]"),
        };
        f.write_str(name)
    }
}

/// A single notification from the playback engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    StateChanged(PlaybackState),
    Error(PlaybackError),
    PositionDiscontinuity {
        old: PositionInfo,
        new: PositionInfo,
        reason: DiscontinuityReason,
    },
    IsPlayingChanged(bool),
    TracksChanged(Tracks),
    IsLoadingChanged(bool),
    AudioAttributesChanged(AudioAttributes),
    VolumeChanged(f32),
    DeviceInfoChanged(DeviceInfo),
    DeviceVolumeChanged { volume: i32, muted: bool },
    VideoSizeChanged(VideoSize),
    SurfaceSizeChanged { width: i32, height: i32 },
    MediaItemTransition {
        media_item: Option<MediaItem>,
        reason: TransitionReason,
    },
    RepeatModeChanged(RepeatMode),
    RenderedFirstFrame,
    /// Kinds that changed together, plus the player state at that moment.
    Events {
        kinds: Vec<EventKind>,
        snapshot: PlayerSnapshot,
    },
}

impl PlaybackEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            PlaybackEvent::StateChanged(_) => EventKind::PlaybackStateChanged,
            PlaybackEvent::Error(_) => EventKind::PlayerError,
            PlaybackEvent::PositionDiscontinuity { .. } => EventKind::PositionDiscontinuity,
            PlaybackEvent::IsPlayingChanged(_) => EventKind::IsPlayingChanged,
            PlaybackEvent::TracksChanged(_) => EventKind::TracksChanged,
            PlaybackEvent::IsLoadingChanged(_) => EventKind::IsLoadingChanged,
            PlaybackEvent::AudioAttributesChanged(_) => EventKind::AudioAttributesChanged,
            PlaybackEvent::VolumeChanged(_) => EventKind::VolumeChanged,
            PlaybackEvent::DeviceInfoChanged(_) => EventKind::DeviceInfoChanged,
            PlaybackEvent::DeviceVolumeChanged { .. } => EventKind::DeviceVolumeChanged,
            PlaybackEvent::VideoSizeChanged(_) => EventKind::VideoSizeChanged,
            PlaybackEvent::SurfaceSizeChanged { .. } => EventKind::SurfaceSizeChanged,
            PlaybackEvent::MediaItemTransition { .. } => EventKind::MediaItemTransition,
            PlaybackEvent::RepeatModeChanged(_) => EventKind::RepeatModeChanged,
            PlaybackEvent::RenderedFirstFrame => EventKind::RenderedFirstFrame,
            PlaybackEvent::Events { .. } => EventKind::Events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_are_kept() {
        assert_eq!(PlaybackState::from(3), PlaybackState::Ready);
        assert_eq!(PlaybackState::from(42), PlaybackState::Unknown(42));
        assert_eq!(PlaybackState::from(42).to_string(), "UNKNOWN_STATE(42)");
        assert_eq!(EventKind::from(99).to_string(), "EVENT UNKNOWN - [99]");
    }

    #[test]
    fn event_kind_names() {
        assert_eq!(EventKind::from(3).to_string(), "EVENT_IS_LOADING_CHANGED");
        assert_eq!(EventKind::from(30), EventKind::DeviceVolumeChanged);
        assert_eq!(
            PlaybackEvent::RenderedFirstFrame.kind(),
            EventKind::RenderedFirstFrame
        );
    }
}
