use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level exporter configuration.
///
/// ```yaml
/// port: "9879"
/// instances:
///   - name: living-room
///     address: 192.168.0.1
/// ```
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub instances: Vec<Device>,
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// One pollable modem.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Device {
    #[serde(default)]
    pub name: String,
    pub address: String,
}

impl Device {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9879
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("HUB4_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        Self::finish(config)
    }

    /// Parse a YAML document directly, without file or environment sources.
    pub fn parse(yaml: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .context("Failed to build configuration")?;

        Self::finish(config)
    }

    fn finish(config: config::Config) -> Result<Self> {
        let mut parsed: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        // Unnamed instances are labelled by their address.
        for device in &mut parsed.instances {
            if device.name.is_empty() {
                device.name = device.address.clone();
            }
        }

        Ok(parsed)
    }
}
