use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    client::WeatherClient,
    options::{Output, Source, Units},
};

/// Settings persisted between CLI runs.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// source = "open_weather"
/// units = "si"
/// latitude = 40.0
/// longitude = -105.0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub source: Option<Source>,
    pub units: Option<Units>,
    pub output: Option<Output>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("io", "weathermachine", "weathermachine")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Build a client from the stored key and defaults.
    pub fn client(&self) -> Result<WeatherClient> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `weathermachine configure` or pass --api-key."
            )
        })?;

        let mut client = WeatherClient::new(api_key);
        self.apply(&mut client);
        Ok(client)
    }

    /// Copy stored defaults onto an existing client.
    pub fn apply(&self, client: &mut WeatherClient) {
        if let Some(source) = self.source {
            client.source(source);
        }
        if let Some(units) = self.units {
            client.units(units);
        }
        if let Some(output) = self.output {
            client.output(output);
        }
        if let Some((lat, lon)) = self.location() {
            client.set_location(lat, lon);
        }
    }
}
