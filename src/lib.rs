//! Rust library for polling and controlling Cambridge Audio CXN network players
//!
//! The CXN exposes its state and controls over SMOIP, a JSON-over-HTTP API on
//! the local network. This library provides:
//!
//! - Polling of power, zone and play state into a normalized snapshot
//! - Playback state, volume, mute, shuffle/repeat and track metadata accessors
//! - Transport, power, volume and seek commands
//! - Source selection by display name across built-in inputs and presets
//! - Capability flags that follow the player's pre-amp mode
//!
//! # Quick Start
//!
//! ```no_run
//! use cambridge_cxn::{CxnDevice, DeviceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut device = CxnDevice::new(DeviceConfig::new("192.168.1.50"))?;
//!
//!     // Poll once; the first poll also fetches the source catalog
//!     device.refresh().await?;
//!
//!     println!("State: {:?}", device.state());
//!     println!("Source: {:?}", device.source());
//!     println!("Now playing: {:?} by {:?}", device.media_title(), device.media_artist());
//!
//!     if let Some(volume) = device.volume_level() {
//!         device.set_volume_level((volume + 0.05).min(1.0)).await?;
//!     }
//!     device.select_source("Spotify").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **Device**: `CxnDevice`, the polled adapter the host drives
//! - **Snapshot**: decoding of raw SMOIP JSON into `PlaybackSnapshot`
//! - **Catalog**: bidirectional source id / display name map
//! - **Connection**: HTTP GET transport
//! - **Protocol**: SMOIP endpoints and command encoding
//! - **Types**: Domain types and data structures

mod catalog;
mod config;
mod connection;
mod device;
mod error;
mod protocol;
mod snapshot;
mod types;

// Public exports
pub use catalog::{CatalogState, SourceCatalog};
pub use config::{DeviceConfig, DEFAULT_NAME};
pub use connection::Connection;
pub use device::{CxnDevice, DEVICE_CLASS};
pub use error::{CxnError, Result};
pub use protocol::{
    is_zone_input, Command, Endpoint, PowerCommand, Request, TransportAction, ZONE_INPUTS,
};
pub use snapshot::PlaybackSnapshot;
pub use types::{
    Feature, FeatureSet, MediaState, PowerState, RepeatMode, ShuffleMode, SourceId,
    TrackMetadata, TransportState, VolumeLevel,
};
