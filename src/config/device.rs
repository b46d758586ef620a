// file: src/config/device.rs
// version: 1.0.0
// guid: 88984889-f44d-4000-bdfc-ed502fe07f0b

//! Persisted device configuration

use super::{AppPaths, PRIVATE_KEY_FILE, PUBLIC_KEY_FILE};
use crate::error::WelcomeError;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

/// Device configuration written once registration is verified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Server address as typed by the operator, scheme included
    pub host: String,
    pub port: u16,
    /// Private key file, relative to the config directory
    #[serde(rename = "private_key")]
    pub private_key_path: String,
    /// Public key file, relative to the config directory
    #[serde(rename = "public_key")]
    pub public_key_path: String,
    /// Passphrase protecting the private key
    #[serde(rename = "password")]
    pub passphrase: String,
}

impl DeviceConfig {
    /// Build the document for `host`/`port` with the fixed key file names.
    ///
    /// The port was validated as a digit string before registration, so a
    /// parse failure here is an invariant violation.
    pub fn new(host: &str, port: &str, passphrase: &str) -> Result<Self> {
        let port = port.parse::<u16>().map_err(|e| {
            WelcomeError::config(format!("Port {:?} is not a valid port number: {}", port, e))
        })?;

        Ok(Self {
            host: host.to_string(),
            port,
            private_key_path: PRIVATE_KEY_FILE.to_string(),
            public_key_path: PUBLIC_KEY_FILE.to_string(),
            passphrase: passphrase.to_string(),
        })
    }
}

/// Writes and reads the device configuration document
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    paths: AppPaths,
}

impl ConfigWriter {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Serialize the device configuration to the config store
    pub fn write(&self, host: &str, port: &str, passphrase: &str) -> Result<DeviceConfig> {
        let config = DeviceConfig::new(host, port, passphrase)?;
        self.write_config(&config)?;
        Ok(config)
    }

    pub fn write_config(&self, config: &DeviceConfig) -> Result<()> {
        self.paths.ensure()?;
        let path = self.paths.device_config();
        let yaml = serde_yaml::to_string(config)?;
        fs::write(&path, yaml)?;
        info!("Device configuration written to {}", path.display());
        Ok(())
    }

    /// Read the device configuration back
    pub fn load(&self) -> Result<DeviceConfig> {
        let path = self.paths.device_config();
        let content = fs::read_to_string(&path).map_err(|e| {
            WelcomeError::config(format!(
                "Failed to read device config {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }
}
