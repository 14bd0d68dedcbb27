use crate::types::{
    MediaState, PowerState, RepeatMode, ShuffleMode, SourceId, TrackMetadata, TransportState,
    VolumeLevel,
};
use serde_json::Value;
use std::time::{Duration, SystemTime};

/// Normalized device state from one poll cycle
///
/// Each field is decoded independently from the raw responses; a missing or
/// mistyped field yields its default and never affects the others.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub power: Option<PowerState>,
    pub transport: Option<TransportState>,
    pub pre_amp_mode: bool,
    pub source_id: Option<SourceId>,
    /// Always `false` outside pre-amp mode
    pub muted: bool,
    /// Always `None` outside pre-amp mode
    pub volume: Option<VolumeLevel>,
    pub shuffle: ShuffleMode,
    pub repeat: RepeatMode,
    /// `None` when the play state carried no `metadata` object
    pub track: Option<TrackMetadata>,
    pub captured_at: SystemTime,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            power: None,
            transport: None,
            pre_amp_mode: false,
            source_id: None,
            muted: false,
            volume: None,
            shuffle: ShuffleMode::Off,
            repeat: RepeatMode::Off,
            track: None,
            captured_at: SystemTime::UNIX_EPOCH,
        }
    }
}

impl PlaybackSnapshot {
    /// Decode the `data` objects of `system/power`, `zone/state` and `zone/play_state`
    pub fn from_json(power: &Value, zone: &Value, play: &Value) -> Self {
        let power_state = power
            .get("power")
            .and_then(|v| v.as_str())
            .map(PowerState::from_raw);

        let pre_amp_mode = zone
            .get("pre_amp_mode")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let source_id = zone
            .get("source")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let (muted, volume) = if pre_amp_mode {
            let muted = zone.get("mute").and_then(|v| v.as_bool()).unwrap_or(false);
            let volume = zone
                .get("volume_percent")
                .and_then(|v| v.as_f64())
                .map(|percent| (percent / 100.0).clamp(0.0, 1.0));
            (muted, volume)
        } else {
            (false, None)
        };

        let transport = play
            .get("state")
            .and_then(|v| v.as_str())
            .map(TransportState::from_raw);

        let shuffle = play
            .get("mode_shuffle")
            .and_then(|v| v.as_str())
            .map(ShuffleMode::from_raw)
            .unwrap_or_default();

        let repeat = play
            .get("mode_repeat")
            .and_then(|v| v.as_str())
            .map(RepeatMode::from_raw)
            .unwrap_or_default();

        let track = play
            .get("metadata")
            .filter(|v| v.is_object())
            .map(|metadata| parse_track(metadata, play));

        Self {
            power: power_state,
            transport,
            pre_amp_mode,
            source_id,
            muted,
            volume,
            shuffle,
            repeat,
            track,
            captured_at: SystemTime::now(),
        }
    }

    /// Normalized state, `None` when the power state is unrecognized
    pub fn state(&self) -> Option<MediaState> {
        MediaState::from_parts(self.power.as_ref(), self.transport.as_ref())
    }
}

fn parse_track(metadata: &Value, play: &Value) -> TrackMetadata {
    let text = |key: &str| {
        metadata
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    let duration = metadata.get("duration").and_then(seconds);
    // Position is meaningless without a duration (live streams report none)
    let position = duration.and(play.get("position").and_then(seconds));

    TrackMetadata {
        title: text("title"),
        artist: text("artist"),
        album: text("album"),
        duration,
        position,
        art_url: text("art_url"),
    }
}

fn seconds(value: &Value) -> Option<Duration> {
    value
        .as_f64()
        .filter(|s| s.is_finite() && *s >= 0.0)
        .map(Duration::from_secs_f64)
}
