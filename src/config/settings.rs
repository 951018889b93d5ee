//! Settings configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// General settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Remove a tab as soon as its process finishes
    #[serde(default)]
    pub auto_close_finished: bool,

    /// Close the panel window once the last tab is gone
    #[serde(default)]
    pub close_on_last: bool,

    /// How long to wait for the OS to start a program before giving up
    #[serde(default = "default_start_timeout_ms")]
    pub start_timeout_ms: u64,

    /// Wait after killing everything on window close
    #[serde(default = "default_close_grace_ms")]
    pub close_grace_ms: u64,

    /// GUI repaint interval while processes run
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Per-process output buffer cap in bytes, 0 = unbounded
    #[serde(default = "default_output_limit_bytes")]
    pub output_limit_bytes: usize,

    /// Top-level table of the commands file this panel reads and writes
    #[serde(default = "default_panel_name")]
    pub panel_name: String,

    /// Commands file (defaults to `~/.procrun/commands.toml`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands_file: Option<PathBuf>,
}

fn default_start_timeout_ms() -> u64 {
    5000
}

fn default_close_grace_ms() -> u64 {
    500
}

fn default_tick_interval_ms() -> u64 {
    100
}

fn default_output_limit_bytes() -> usize {
    1024 * 1024
}

fn default_panel_name() -> String {
    "procrun".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_close_finished: false,
            close_on_last: false,
            start_timeout_ms: default_start_timeout_ms(),
            close_grace_ms: default_close_grace_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            output_limit_bytes: default_output_limit_bytes(),
            panel_name: default_panel_name(),
            commands_file: None,
        }
    }
}
