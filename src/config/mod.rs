// file: src/config/mod.rs
// version: 2.1.0
// guid: 982d0f64-38d8-4c82-9702-513637b14a53

//! Configuration module for the AMD-R welcome flow
//!
//! Covers where the device files live ([`AppPaths`]), the optional
//! `welcome.toml` settings and the persisted device configuration.

pub mod device;
pub mod loader;

pub use device::{ConfigWriter, DeviceConfig};
pub use loader::SettingsLoader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the private key inside the config directory
pub const PRIVATE_KEY_FILE: &str = "private.pem";

/// File name of the public key inside the config directory
pub const PUBLIC_KEY_FILE: &str = "public.pem";

/// File name of the persisted device configuration
pub const DEVICE_CONFIG_FILE: &str = "config.yaml";

/// File name of the optional settings file
pub const SETTINGS_FILE: &str = "welcome.toml";

/// Default config directory, relative to the deployment root
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Locations of everything the flow reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn private_key(&self) -> PathBuf {
        self.config_dir.join(PRIVATE_KEY_FILE)
    }

    pub fn public_key(&self) -> PathBuf {
        self.config_dir.join(PUBLIC_KEY_FILE)
    }

    pub fn device_config(&self) -> PathBuf {
        self.config_dir.join(DEVICE_CONFIG_FILE)
    }

    pub fn settings(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Create the config directory if it doesn't exist
    pub fn ensure(&self) -> crate::Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        Ok(())
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_DIR)
    }
}

/// How the verification endpoint expects the device name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    /// `GET ...?name=<device>`
    #[default]
    Get,
    /// `POST` with `{"name": "<device>"}`
    Post,
}

/// Device key type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    #[default]
    Rsa,
    Ed25519,
}

/// Settings file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WelcomeSettings {
    /// Registration workflow tuning
    pub registration: RegistrationSettings,
    /// Pre-filled operator input
    pub defaults: InputDefaults,
}

/// Registration workflow tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationSettings {
    /// Connection failures tolerated before giving up
    pub max_retries: u32,
    /// Delay before retrying after a connection failure (ms)
    pub retry_delay_ms: u64,
    /// Delay between verification polls (ms)
    pub poll_interval_ms: u64,
    /// Delay between entering the registration page and key generation (ms)
    pub start_delay_ms: u64,
    /// Per-request HTTP timeout (seconds)
    pub request_timeout_secs: u64,
    /// Verification request shape for this deployment
    pub verification_method: VerificationMethod,
    /// Device key type
    pub key_algorithm: KeyAlgorithm,
    /// RSA modulus size in bits
    pub key_size: usize,
    /// RSA public exponent
    pub public_exponent: u64,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_delay_ms: 1000,
            poll_interval_ms: 1000,
            start_delay_ms: 500,
            request_timeout_secs: 10,
            verification_method: VerificationMethod::Get,
            key_algorithm: KeyAlgorithm::Rsa,
            key_size: 4096,
            public_exponent: 65537,
        }
    }
}

impl RegistrationSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the registration settings
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_retries == 0 {
            return Err(crate::error::WelcomeError::validation(
                "max_retries must be at least 1",
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(crate::error::WelcomeError::validation(
                "request_timeout_secs must be at least 1",
            ));
        }

        if self.key_algorithm == KeyAlgorithm::Rsa {
            if self.key_size < 2048 {
                return Err(crate::error::WelcomeError::validation(
                    "key_size must be at least 2048",
                ));
            }
            if self.public_exponent < 3 || self.public_exponent % 2 == 0 {
                return Err(crate::error::WelcomeError::validation(
                    "public_exponent must be an odd number of at least 3",
                ));
            }
        }

        Ok(())
    }
}

/// Values the input pages start with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InputDefaults {
    pub device_name: Option<String>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
}
