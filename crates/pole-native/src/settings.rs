//! `settings.json` beside the executable, in the same shape users edit by hand.

use pole_core::constants::SETTINGS_FILENAME;
use pole_core::{ConfigError, ConfigStore, MarkerConfig};
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn beside_executable() -> anyhow::Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe
            .parent()
            .ok_or_else(|| anyhow::anyhow!("executable path {} has no parent", exe.display()))?;
        Ok(Self::new(dir.join(SETTINGS_FILENAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, config: &MarkerConfig) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ConfigStore for JsonSettingsStore {
    /// Missing file: write and use defaults. Present file: parse, clamp, and
    /// write the normalised result back so new fields show up for the user.
    fn load(&mut self) -> Result<MarkerConfig, ConfigError> {
        if !self.path.exists() {
            log::info!(
                "No settings file found at {}, using defaults",
                self.path.display()
            );
            let config = MarkerConfig::default();
            self.write(&config)?;
            return Ok(config);
        }
        let text = fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        let mut config: MarkerConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Malformed {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        config.validate();
        log::info!("Using settings from {}", self.path.display());
        log::debug!("{:?}", config);
        self.write(&config)?;
        Ok(config)
    }

    fn save(&mut self, config: &MarkerConfig) -> Result<(), ConfigError> {
        self.write(config)
    }
}
