//! Game configuration. Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Persistent player-facing settings. Loaded from `config.ron` in the
/// current directory. Per-system tuning (jump forces, charge times, ring
/// sizes) lives in the `*Config` structs next to each system instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Mouse sensitivity multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Toggle crouch (true) vs. hold to crouch (false).
    #[serde(default = "default_true")]
    pub toggle_crouch: bool,
    /// Fixed physics step rate in Hz.
    #[serde(default = "default_fixed_rate_hz")]
    pub fixed_rate_hz: f32,
}

fn default_sensitivity() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_fixed_rate_hz() -> f32 {
    60.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            toggle_crouch: default_true(),
            fixed_rate_hz: default_fixed_rate_hz(),
        }
    }
}

/// Why a config file could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid,
    /// returns default config (with a warning for the invalid case).
    pub fn load() -> Self {
        let path = config_path();
        match Self::load_from(&path) {
            Ok(c) => c,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&data)?)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("config.ron")
}
