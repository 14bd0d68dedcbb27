use crate::error::{CxnError, Result};
use serde::{Deserialize, Serialize};

/// Display name used when the host does not configure one
pub const DEFAULT_NAME: &str = "Cambridge Audio CXN";

/// Per-device configuration supplied by the host
///
/// Deserializes from the host's configuration, e.g.
///
/// ```
/// use cambridge_cxn::DeviceConfig;
///
/// let config: DeviceConfig = serde_json::from_str(r#"{ "host": "192.168.1.50" }"#).unwrap();
/// assert_eq!(config.name, "Cambridge Audio CXN");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Host name or IP address of the player
    pub host: String,

    /// Display name
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl DeviceConfig {
    /// Create a configuration for the given host with the default name
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: default_name(),
        }
    }

    /// Override the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(CxnError::InvalidConfig("host must not be empty".to_string()));
        }
        if host.contains('/') {
            return Err(CxnError::InvalidConfig(format!(
                "host must be a bare host name or IP address, got {:?}",
                self.host
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_defaults_when_missing() {
        let config: DeviceConfig = serde_json::from_str(r#"{"host":"10.0.0.2"}"#).unwrap();
        assert_eq!(config.host, "10.0.0.2");
        assert_eq!(config.name, DEFAULT_NAME);
    }

    #[test]
    fn host_is_required() {
        let result: serde_json::Result<DeviceConfig> = serde_json::from_str(r#"{"name":"Den"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_empty_and_url_hosts() {
        assert!(DeviceConfig::new("  ").validate().is_err());
        assert!(DeviceConfig::new("http://10.0.0.2").validate().is_err());
        assert!(DeviceConfig::new("10.0.0.2:8080").validate().is_ok());
        assert!(DeviceConfig::new("cxn.local").with_name("Lounge").validate().is_ok());
    }
}
