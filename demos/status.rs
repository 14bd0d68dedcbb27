//! Print a one-shot status report for a CXN player.
//!
//! ```text
//! cargo run --example status -- 192.168.1.50
//! ```

use cambridge_cxn::{CxnDevice, DeviceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let host = match std::env::args().nth(1) {
        Some(host) => host,
        None => {
            eprintln!("usage: status <host>");
            std::process::exit(2);
        }
    };

    let mut device = CxnDevice::new(DeviceConfig::new(host))?;
    device.refresh().await?;

    println!("{} ({})", device.name(), device.host());
    println!("  state:    {:?}", device.state());
    println!(
        "  source:   {} [{}]",
        device.source().unwrap_or("-"),
        device.source_id().unwrap_or("-")
    );
    match device.volume_level() {
        Some(volume) => println!(
            "  volume:   {:.0}%{}",
            volume * 100.0,
            if device.is_volume_muted() { " (muted)" } else { "" }
        ),
        None => println!("  volume:   fixed output"),
    }
    println!(
        "  shuffle:  {}   repeat: {}",
        if device.shuffle() { "on" } else { "off" },
        device.repeat().as_str()
    );

    if let Some(title) = device.media_title() {
        println!("  title:    {}", title);
        println!("  artist:   {}", device.media_artist().unwrap_or("-"));
        println!("  album:    {}", device.media_album_name().unwrap_or("-"));
        if let (Some(position), Some(duration)) = (device.media_position(), device.media_duration()) {
            println!("  progress: {}s / {}s", position.as_secs(), duration.as_secs());
        }
        if let Some(art) = device.media_image_url() {
            println!("  artwork:  {}", art);
        }
    }

    println!("  sources:");
    for name in device.source_list() {
        println!("    - {}", name);
    }

    let features: Vec<String> = device
        .supported_features()
        .iter()
        .map(|f| format!("{:?}", f))
        .collect();
    println!("  features: {}", features.join(", "));

    Ok(())
}
