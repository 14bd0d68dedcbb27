use crate::catalog::{CatalogState, SourceCatalog};
use crate::config::DeviceConfig;
use crate::connection::Connection;
use crate::error::{CxnError, Result};
use crate::protocol::{Command, Endpoint, PowerCommand, TransportAction};
use crate::snapshot::PlaybackSnapshot;
use crate::types::{FeatureSet, MediaState, RepeatMode, VolumeLevel};
use std::time::{Duration, SystemTime};

/// Device class reported to the host
pub const DEVICE_CLASS: &str = "receiver";

/// A Cambridge Audio CXN player
///
/// `CxnDevice` owns the latest [`PlaybackSnapshot`] and the source catalog.
/// The host calls [`refresh`](CxnDevice::refresh) on its own schedule and
/// reads the accessors in between; commands are fire-and-forget GETs whose
/// effect shows up on the next refresh.
#[derive(Debug)]
pub struct CxnDevice {
    config: DeviceConfig,
    connection: Connection,
    snapshot: PlaybackSnapshot,
    catalog: CatalogState,
}

impl CxnDevice {
    /// Create a device from its configuration. No request is made until the
    /// first refresh or command.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        config.validate()?;
        let connection = Connection::new(config.host.trim());
        Ok(Self::from_parts(config, connection))
    }

    /// Create a device that shares an existing HTTP client
    pub fn with_client(config: DeviceConfig, client: reqwest::Client) -> Result<Self> {
        config.validate()?;
        let connection = Connection::with_client(config.host.trim(), client);
        Ok(Self::from_parts(config, connection))
    }

    fn from_parts(config: DeviceConfig, connection: Connection) -> Self {
        tracing::info!("Set up {} at {}", config.name, connection.host());
        Self {
            config,
            connection,
            snapshot: PlaybackSnapshot::default(),
            catalog: CatalogState::Uninitialized,
        }
    }

    /// Get the display name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Get the player's host
    pub fn host(&self) -> &str {
        self.connection.host()
    }

    /// Get the device class
    pub fn device_class(&self) -> &'static str {
        DEVICE_CLASS
    }

    // ========== Polling ==========

    /// Poll the player and replace the snapshot.
    ///
    /// Reads power, zone state and play state in that order, then fetches the
    /// source catalog if it has not been built yet. Nothing is committed until
    /// every request has succeeded: a transport error anywhere in the cycle
    /// leaves the previous snapshot and catalog in place.
    pub async fn refresh(&mut self) -> Result<()> {
        let power = self.connection.read(Endpoint::Power).await?;
        let zone = self.connection.read(Endpoint::ZoneState).await?;
        let play = self.connection.read(Endpoint::PlayState).await?;

        let catalog = if self.catalog.is_ready() {
            None
        } else {
            Some(self.fetch_catalog().await?)
        };

        self.snapshot = PlaybackSnapshot::from_json(&power, &zone, &play);
        tracing::debug!(
            "Power {:?}, transport {:?}, source {:?}",
            self.snapshot.power,
            self.snapshot.transport,
            self.snapshot.source_id
        );

        if let Some(catalog) = catalog {
            self.set_catalog(catalog);
        }

        Ok(())
    }

    /// Fetch inputs and presets and rebuild the source catalog
    pub async fn refresh_catalog(&mut self) -> Result<()> {
        let catalog = self.fetch_catalog().await?;
        self.set_catalog(catalog);
        Ok(())
    }

    async fn fetch_catalog(&self) -> Result<SourceCatalog> {
        tracing::debug!("Setting up sources");
        let sources = self.connection.read(Endpoint::Sources).await?;
        let presets = self.connection.read(Endpoint::Presets).await?;

        Ok(SourceCatalog::from_json(&sources, &presets))
    }

    fn set_catalog(&mut self, catalog: SourceCatalog) {
        tracing::info!("Source catalog ready with {} entries", catalog.len());
        self.catalog = CatalogState::Ready(catalog);
    }

    // ========== State ==========

    /// Get the latest snapshot
    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.snapshot
    }

    /// Get the source catalog, if it has been fetched
    pub fn catalog(&self) -> Option<&SourceCatalog> {
        self.catalog.catalog()
    }

    /// Get the normalized state, `None` when the power state is unknown
    pub fn state(&self) -> Option<MediaState> {
        self.snapshot.state()
    }

    /// Get the volume fraction; only reported in pre-amp mode
    pub fn volume_level(&self) -> Option<VolumeLevel> {
        self.snapshot.volume
    }

    /// Get the mute state; always `false` outside pre-amp mode
    pub fn is_volume_muted(&self) -> bool {
        self.snapshot.muted
    }

    /// Get the raw source identifier
    pub fn source_id(&self) -> Option<&str> {
        self.snapshot.source_id.as_deref()
    }

    /// Get the display name of the current source.
    ///
    /// `None` before the catalog is ready or when the device reports a source
    /// the catalog does not contain.
    pub fn source(&self) -> Option<&str> {
        let id = self.source_id()?;
        self.catalog()?.name_of(id)
    }

    /// Get all known source names, sorted
    pub fn source_list(&self) -> Vec<String> {
        self.catalog().map(SourceCatalog::names).unwrap_or_default()
    }

    /// Get whether shuffle is on
    pub fn shuffle(&self) -> bool {
        self.snapshot.shuffle.is_on()
    }

    /// Get the repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.snapshot.repeat
    }

    /// Get the track title
    pub fn media_title(&self) -> Option<&str> {
        self.snapshot.track.as_ref()?.title.as_deref()
    }

    /// Get the track artist
    pub fn media_artist(&self) -> Option<&str> {
        self.snapshot.track.as_ref()?.artist.as_deref()
    }

    /// Get the album name
    pub fn media_album_name(&self) -> Option<&str> {
        self.snapshot.track.as_ref()?.album.as_deref()
    }

    /// Get the track duration
    pub fn media_duration(&self) -> Option<Duration> {
        self.snapshot.track.as_ref()?.duration
    }

    /// Get the playback position, only reported alongside a duration
    pub fn media_position(&self) -> Option<Duration> {
        self.snapshot.track.as_ref()?.position
    }

    /// Get the time the reported position was captured
    pub fn media_position_updated_at(&self) -> Option<SystemTime> {
        self.snapshot.track.as_ref().map(|_| self.snapshot.captured_at)
    }

    /// Get the artwork URL as served by the player
    pub fn media_image_url(&self) -> Option<&str> {
        self.snapshot.track.as_ref()?.art_url.as_deref()
    }

    /// Get the features the host may offer in the current mode
    pub fn supported_features(&self) -> FeatureSet {
        FeatureSet::for_mode(self.snapshot.pre_amp_mode)
    }

    // ========== Power ==========

    /// Power the player fully on
    pub async fn turn_on(&self) -> Result<()> {
        self.connection.send(&Command::SetPower(PowerCommand::On)).await
    }

    /// Put the player into network standby
    pub async fn turn_off(&self) -> Result<()> {
        self.connection.send(&Command::SetPower(PowerCommand::Network)).await
    }

    // ========== Transport ==========

    /// Resume playback. The device only has a toggle, so this does nothing
    /// unless the last refresh saw the player paused.
    pub async fn play(&self) -> Result<()> {
        if self.state() == Some(MediaState::Paused) {
            self.play_pause().await?;
        }
        Ok(())
    }

    /// Toggle between play and pause
    pub async fn play_pause(&self) -> Result<()> {
        self.connection.send(&Command::Transport(TransportAction::Toggle)).await
    }

    /// Pause playback
    pub async fn pause(&self) -> Result<()> {
        self.connection.send(&Command::Transport(TransportAction::Pause)).await
    }

    /// Stop playback
    pub async fn stop(&self) -> Result<()> {
        self.connection.send(&Command::Transport(TransportAction::Stop)).await
    }

    /// Skip to the next track
    pub async fn next_track(&self) -> Result<()> {
        self.connection.send(&Command::SkipTrack(1)).await
    }

    /// Skip back to the previous track
    pub async fn previous_track(&self) -> Result<()> {
        self.connection.send(&Command::SkipTrack(-1)).await
    }

    /// Seek to an absolute position (whole seconds)
    pub async fn seek(&self, position: Duration) -> Result<()> {
        self.connection.send(&Command::Seek(position.as_secs())).await
    }

    /// Turn shuffle on or off
    pub async fn set_shuffle(&self, shuffle: bool) -> Result<()> {
        self.connection.send(&Command::SetShuffle(shuffle)).await
    }

    /// Set the repeat mode
    pub async fn set_repeat(&self, repeat: RepeatMode) -> Result<()> {
        self.connection.send(&Command::SetRepeat(repeat)).await
    }

    // ========== Volume ==========

    /// Set the volume from a fraction; values outside 0.0..=1.0 are clamped
    pub async fn set_volume_level(&self, volume: VolumeLevel) -> Result<()> {
        self.connection
            .send(&Command::SetVolumePercent(volume_percent(volume)))
            .await
    }

    /// Step the volume up by one
    pub async fn volume_up(&self) -> Result<()> {
        self.connection.send(&Command::VolumeStep(1)).await
    }

    /// Step the volume down by one
    pub async fn volume_down(&self) -> Result<()> {
        self.connection.send(&Command::VolumeStep(-1)).await
    }

    /// Set the mute state
    pub async fn mute_volume(&self, mute: bool) -> Result<()> {
        self.connection.send(&Command::SetMute(mute)).await
    }

    // ========== Source ==========

    /// Select a source by display name.
    ///
    /// Built-in inputs are selected on the zone; anything else in the catalog
    /// is a preset and is recalled.
    pub async fn select_source(&self, name: &str) -> Result<()> {
        let catalog = self.catalog().ok_or(CxnError::CatalogNotReady)?;
        let id = catalog
            .id_of(name)
            .ok_or_else(|| CxnError::SourceNotFound(name.to_string()))?;

        self.connection.send(&Command::select_source(id)).await
    }
}

/// Convert a volume fraction to the device's integer percent
pub(crate) fn volume_percent(volume: VolumeLevel) -> u8 {
    if volume.is_nan() {
        return 0;
    }
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_percent_rounds_and_clamps() {
        assert_eq!(volume_percent(0.42), 42);
        assert_eq!(volume_percent(0.294), 29);
        assert_eq!(volume_percent(1.7), 100);
        assert_eq!(volume_percent(-0.2), 0);
        assert_eq!(volume_percent(f64::NAN), 0);
    }

    #[test]
    fn volume_round_trip_stays_within_one_percent() {
        for step in 0..=1000 {
            let fraction = step as f64 / 1000.0;
            let percent = volume_percent(fraction);
            let read_back = percent as f64 / 100.0;
            assert!((read_back - fraction).abs() < 0.01);
        }
    }

    #[test]
    fn new_rejects_empty_host() {
        assert!(matches!(
            CxnDevice::new(DeviceConfig::new("")),
            Err(CxnError::InvalidConfig(_))
        ));
    }

    #[test]
    fn accessors_before_first_refresh() {
        let device = CxnDevice::new(DeviceConfig::new("10.0.0.2")).unwrap();

        assert_eq!(device.name(), "Cambridge Audio CXN");
        assert_eq!(device.device_class(), "receiver");
        assert_eq!(device.state(), None);
        assert_eq!(device.source(), None);
        assert!(device.source_list().is_empty());
        assert_eq!(device.volume_level(), None);
        assert!(!device.is_volume_muted());
        assert!(!device.shuffle());
        assert_eq!(device.repeat(), RepeatMode::Off);
        assert_eq!(device.media_title(), None);
        assert_eq!(device.media_position_updated_at(), None);
        assert!(!device.supported_features().contains(crate::types::Feature::VolumeSet));
    }
}
