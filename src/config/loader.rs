// file: src/config/loader.rs
// version: 2.1.0
// guid: f2e81590-c85e-467d-82d6-f4c656641e99

//! Settings file loading and environment variable substitution

use super::WelcomeSettings;
use crate::error::WelcomeError;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Settings loader with environment variable substitution
pub struct SettingsLoader {
    env_vars: HashMap<String, String>,
}

impl SettingsLoader {
    /// Create a new settings loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load settings from a TOML file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<WelcomeSettings> {
        let content = fs::read_to_string(&path).map_err(|e| {
            WelcomeError::config(format!(
                "Failed to read settings file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        self.parse(&content)
    }

    /// Load settings, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(&self, path: P) -> Result<WelcomeSettings> {
        if !path.as_ref().exists() {
            debug!(
                "No settings file at {}, using defaults",
                path.as_ref().display()
            );
            return Ok(WelcomeSettings::default());
        }

        info!("Loading settings from {}", path.as_ref().display());
        self.load(path)
    }

    /// Parse settings from TOML text
    pub fn parse(&self, content: &str) -> Result<WelcomeSettings> {
        let expanded = self.expand_env_vars(content)?;
        let settings: WelcomeSettings = toml::from_str(&expanded)?;

        settings.registration.validate()?;

        Ok(settings)
    }

    /// Expand `${VAR}` references in settings content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| WelcomeError::config(format!("Invalid regex pattern: {}", e)))?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(WelcomeError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
