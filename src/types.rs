use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Device-internal source identifier, e.g. `"USB_AUDIO"` or a preset number
pub type SourceId = String;

/// Volume as a fraction, 0.0..=1.0
pub type VolumeLevel = f64;

/// Raw power state reported by `system/power`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerState {
    /// Fully powered
    On,
    /// Network standby
    Network,
    /// Any other value the device reports
    Other(String),
}

impl PowerState {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "ON" => PowerState::On,
            "NETWORK" => PowerState::Network,
            other => PowerState::Other(other.to_string()),
        }
    }
}

/// Raw transport state reported by `zone/play_state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    Play,
    Pause,
    Stop,
    Other(String),
}

impl TransportState {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "play" => TransportState::Play,
            "pause" => TransportState::Pause,
            "stop" => TransportState::Stop,
            other => TransportState::Other(other.to_string()),
        }
    }
}

/// Normalized player state shown by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaState {
    Off,
    On,
    Idle,
    Playing,
    Paused,
}

impl MediaState {
    /// Combine power and transport state.
    ///
    /// Returns `None` when the power state is neither `ON` nor `NETWORK`.
    pub fn from_parts(power: Option<&PowerState>, transport: Option<&TransportState>) -> Option<Self> {
        match power? {
            PowerState::Network => Some(MediaState::Off),
            PowerState::On => Some(match transport {
                Some(TransportState::Play) => MediaState::Playing,
                Some(TransportState::Pause) => MediaState::Paused,
                Some(TransportState::Stop) => MediaState::Idle,
                _ => MediaState::On,
            }),
            PowerState::Other(_) => None,
        }
    }
}

/// Shuffle mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuffleMode {
    #[default]
    Off,
    All,
}

impl ShuffleMode {
    pub fn from_raw(raw: &str) -> Self {
        if raw == "off" {
            ShuffleMode::Off
        } else {
            ShuffleMode::All
        }
    }

    pub fn is_on(self) -> bool {
        self != ShuffleMode::Off
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    One,
    All,
}

impl RepeatMode {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "one" | "toggle" => RepeatMode::One,
            "all" => RepeatMode::All,
            _ => RepeatMode::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::Off => "off",
            RepeatMode::One => "one",
            RepeatMode::All => "all",
        }
    }
}

/// Metadata of the track currently loaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub position: Option<Duration>,
    pub art_url: Option<String>,
}

/// Host-visible capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Pause,
    Play,
    Stop,
    PreviousTrack,
    NextTrack,
    SelectSource,
    TurnOff,
    TurnOn,
    VolumeMute,
    VolumeStep,
    VolumeSet,
    ShuffleSet,
    RepeatSet,
    Seek,
}

/// Features advertised in every mode
const BASE_FEATURES: [Feature; 12] = [
    Feature::Pause,
    Feature::Play,
    Feature::Stop,
    Feature::PreviousTrack,
    Feature::NextTrack,
    Feature::SelectSource,
    Feature::TurnOff,
    Feature::TurnOn,
    Feature::VolumeStep,
    Feature::ShuffleSet,
    Feature::RepeatSet,
    Feature::Seek,
];

/// Set of advertised features
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSet(BTreeSet<Feature>);

impl FeatureSet {
    /// Features for the given pre-amp mode. Absolute volume and mute are only
    /// controllable while the player is acting as a pre-amp.
    pub fn for_mode(pre_amp_mode: bool) -> Self {
        let mut set: BTreeSet<Feature> = BASE_FEATURES.into_iter().collect();
        if pre_amp_mode {
            set.insert(Feature::VolumeMute);
            set.insert(Feature::VolumeSet);
        }
        Self(set)
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(power: &str, transport: Option<&str>) -> Option<MediaState> {
        let power = PowerState::from_raw(power);
        let transport = transport.map(TransportState::from_raw);
        MediaState::from_parts(Some(&power), transport.as_ref())
    }

    #[test]
    fn state_mapping_table() {
        assert_eq!(state("NETWORK", None), Some(MediaState::Off));
        assert_eq!(state("NETWORK", Some("play")), Some(MediaState::Off));
        assert_eq!(state("ON", Some("play")), Some(MediaState::Playing));
        assert_eq!(state("ON", Some("pause")), Some(MediaState::Paused));
        assert_eq!(state("ON", Some("stop")), Some(MediaState::Idle));
        assert_eq!(state("ON", Some("buffering")), Some(MediaState::On));
        assert_eq!(state("ON", None), Some(MediaState::On));
        assert_eq!(state("STANDBY", Some("play")), None);
        assert_eq!(MediaState::from_parts(None, None), None);
    }

    #[test]
    fn shuffle_is_on_for_anything_but_off() {
        assert!(!ShuffleMode::from_raw("off").is_on());
        assert!(ShuffleMode::from_raw("all").is_on());
        assert!(ShuffleMode::from_raw("toggle").is_on());
    }

    #[test]
    fn repeat_parses_device_values() {
        assert_eq!(RepeatMode::from_raw("off"), RepeatMode::Off);
        assert_eq!(RepeatMode::from_raw("all"), RepeatMode::All);
        assert_eq!(RepeatMode::from_raw("one"), RepeatMode::One);
        assert_eq!(RepeatMode::from_raw("garbage"), RepeatMode::Off);
        assert_eq!(RepeatMode::All.as_str(), "all");
    }

    #[test]
    fn pre_amp_mode_adds_volume_set_and_mute() {
        let plain = FeatureSet::for_mode(false);
        let preamp = FeatureSet::for_mode(true);

        assert!(!plain.contains(Feature::VolumeSet));
        assert!(!plain.contains(Feature::VolumeMute));
        assert!(plain.contains(Feature::VolumeStep));
        assert!(plain.contains(Feature::Seek));

        assert!(preamp.contains(Feature::VolumeSet));
        assert!(preamp.contains(Feature::VolumeMute));
        assert_eq!(preamp.len(), plain.len() + 2);
        assert!(plain.iter().all(|f| preamp.contains(f)));
    }
}
