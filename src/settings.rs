//! Startup configuration
//!
//! Read from `spacehole.json` in the working directory. A missing or broken
//! file falls back to defaults so the game always starts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::PrologueLocation;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed world seed; `None` picks one from the clock
    pub master_seed: Option<u64>,
    /// Ship layout document
    pub ship_layout: String,

    // === Opening ===
    /// Start aboard the shuttle instead of stranded
    pub skip_prologue: bool,
    /// Force a prologue location
    pub prologue_location: Option<PrologueLocation>,

    // === Simulation ===
    /// Wrapped lines kept in the message log
    pub message_log_capacity: usize,
    /// Ticks the headless binary runs before exiting
    pub headless_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_seed: None,
            ship_layout: "assets/ships/shuttle.json".to_string(),
            skip_prologue: false,
            prologue_location: None,
            message_log_capacity: 100,
            headless_ticks: 3600,
        }
    }
}

impl Settings {
    /// Settings file name, relative to the working directory
    pub const FILE_NAME: &'static str = "spacehole.json";

    /// Load from the working directory, falling back to defaults
    pub fn load() -> Self {
        let path = Path::new(Self::FILE_NAME);
        if !path.exists() {
            log::info!("No {} found, using default settings", Self::FILE_NAME);
            return Self::default();
        }
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// The configured seed, or one derived from the clock
    pub fn resolve_seed(&self) -> u64 {
        self.master_seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64)
        })
    }
}
