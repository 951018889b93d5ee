use std::time::Duration;

use crate::config::Settings;

/// Close policy and buffer limits applied by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorOptions {
    /// Remove a tab as soon as its process finishes
    pub auto_close_finished: bool,
    /// Ask the host to close the panel once the last tab is removed
    pub close_on_last: bool,
    /// Wait after killing everything on window close, before forced teardown
    pub close_grace: Duration,
    /// Per-process output cap in bytes (`None` = unbounded)
    pub output_limit: Option<usize>,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            auto_close_finished: false,
            close_on_last: false,
            close_grace: Duration::from_millis(500),
            output_limit: None,
        }
    }
}

impl From<&Settings> for CoordinatorOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            auto_close_finished: settings.auto_close_finished,
            close_on_last: settings.close_on_last,
            close_grace: Duration::from_millis(settings.close_grace_ms),
            output_limit: (settings.output_limit_bytes > 0).then_some(settings.output_limit_bytes),
        }
    }
}
