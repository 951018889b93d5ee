//! Configuration loading and management

mod io;
mod settings;

pub use settings::Settings;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    /// Commands file, falling back to `~/.procrun/commands.toml`
    pub fn commands_path(&self) -> PathBuf {
        self.settings
            .commands_file
            .clone()
            .unwrap_or_else(|| Self::global_config_dir().join("commands.toml"))
    }

    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.settings.start_timeout_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.settings.tick_interval_ms)
    }
}
