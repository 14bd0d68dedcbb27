use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

/// Characters escaped in query values. Unreserved characters and `+` stay
/// literal; the device reads `volume_step_change=+1` as written.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'+');

/// Device inputs addressed through `zone/state?source=`. Every other source
/// identifier is a preset number and goes through `zone/recall_preset`.
pub const ZONE_INPUTS: [&str; 9] = [
    "AIRPLAY",
    "CAST",
    "IR",
    "MEDIA_PLAYER",
    "SPDIF_COAX",
    "SPDIF_TOSLINK",
    "SPOTIFY",
    "USB_AUDIO",
    "ROON",
];

/// Check whether a source identifier is one of the device's built-in inputs
pub fn is_zone_input(source_id: &str) -> bool {
    ZONE_INPUTS.contains(&source_id)
}

/// SMOIP endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Power,
    ZoneState,
    PlayState,
    PlayControl,
    RecallPreset,
    Sources,
    Presets,
}

impl Endpoint {
    /// Absolute request path on the device
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Power => "/smoip/system/power",
            Endpoint::ZoneState => "/smoip/zone/state",
            Endpoint::PlayState => "/smoip/zone/play_state",
            Endpoint::PlayControl => "/smoip/zone/play_control",
            Endpoint::RecallPreset => "/smoip/zone/recall_preset",
            Endpoint::Sources => "/smoip/system/sources",
            Endpoint::Presets => "/smoip/presets/list",
        }
    }
}

/// A single GET request against the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub endpoint: Endpoint,
    pub query: Vec<(&'static str, String)>,
}

impl Request {
    /// Create a request for the given endpoint with no query
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
        }
    }

    /// Append a query parameter
    pub fn with_param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Path and query as sent on the wire, with values percent-encoded
    pub fn path_and_query(&self) -> String {
        let mut out = self.endpoint.path().to_string();
        for (i, (key, value)) in self.query.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(key);
            out.push('=');
            out.extend(utf8_percent_encode(value, QUERY_VALUE));
        }
        out
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_and_query())
    }
}

/// Power state written to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    On,
    Network,
}

/// Transport actions accepted by `zone/play_control?action=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportAction {
    Toggle,
    Pause,
    Stop,
}

/// Every write the device understands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetPower(PowerCommand),
    Transport(TransportAction),
    /// Skip forward (`1`) or back (`-1`)
    SkipTrack(i8),
    /// Absolute seek position in whole seconds
    Seek(u64),
    /// Volume in percent, 0..=100
    SetVolumePercent(u8),
    /// Volume step, `+1` or `-1`
    VolumeStep(i8),
    SetMute(bool),
    SetShuffle(bool),
    SetRepeat(crate::types::RepeatMode),
    SelectInput(String),
    RecallPreset(String),
}

impl Command {
    /// Route a catalog source identifier to input selection or preset recall
    pub fn select_source(source_id: impl Into<String>) -> Self {
        let source_id = source_id.into();
        if is_zone_input(&source_id) {
            Command::SelectInput(source_id)
        } else {
            Command::RecallPreset(source_id)
        }
    }

    /// Encode the command as a request
    pub fn to_request(&self) -> Request {
        use crate::types::RepeatMode;

        match self {
            Command::SetPower(power) => Request::new(Endpoint::Power).with_param(
                "power",
                match power {
                    PowerCommand::On => "ON",
                    PowerCommand::Network => "NETWORK",
                },
            ),
            Command::Transport(action) => Request::new(Endpoint::PlayControl).with_param(
                "action",
                match action {
                    TransportAction::Toggle => "toggle",
                    TransportAction::Pause => "pause",
                    TransportAction::Stop => "stop",
                },
            ),
            Command::SkipTrack(direction) => Request::new(Endpoint::PlayControl)
                .with_param("skip_track", direction.signum().to_string()),
            Command::Seek(seconds) => {
                Request::new(Endpoint::PlayControl).with_param("position", seconds.to_string())
            }
            Command::SetVolumePercent(percent) => Request::new(Endpoint::ZoneState)
                .with_param("volume_percent", (*percent).min(100).to_string()),
            Command::VolumeStep(step) => Request::new(Endpoint::ZoneState).with_param(
                "volume_step_change",
                if *step >= 0 { "+1" } else { "-1" },
            ),
            Command::SetMute(mute) => {
                Request::new(Endpoint::ZoneState).with_param("mute", mute.to_string())
            }
            Command::SetShuffle(shuffle) => Request::new(Endpoint::PlayControl)
                .with_param("mode_shuffle", if *shuffle { "all" } else { "off" }),
            // The device has no direct "one" value; it toggles into single-track repeat.
            Command::SetRepeat(mode) => Request::new(Endpoint::PlayControl).with_param(
                "mode_repeat",
                match mode {
                    RepeatMode::Off => "off",
                    RepeatMode::One => "toggle",
                    RepeatMode::All => "all",
                },
            ),
            Command::SelectInput(id) => {
                Request::new(Endpoint::ZoneState).with_param("source", id.clone())
            }
            Command::RecallPreset(id) => {
                Request::new(Endpoint::RecallPreset).with_param("preset", id.clone())
            }
        }
    }
}
