use serde::{Deserialize, Serialize};

/// Lifecycle of a single process handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Handle exists, nothing was launched yet
    NotStarted,
    /// Launch requested, waiting for the OS to report the process started
    Starting,
    /// Process is alive
    Running,
    /// Process exited on its own with an exit code
    Finished,
    /// Process failed to start or ended without an exit code (signal, crash)
    Errored,
}

impl ProcessState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessState::Finished | ProcessState::Errored)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ProcessState::Starting | ProcessState::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::NotStarted => "not started",
            ProcessState::Starting => "starting",
            ProcessState::Running => "running",
            ProcessState::Finished => "finished",
            ProcessState::Errored => "errored",
        }
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fault reported by the OS while a process was starting or running.
///
/// These are recorded in the handle's error history for display; none of
/// them stops the process on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessErrorKind {
    FailedToStart,
    Crashed,
    Timedout,
    WriteError,
    ReadError,
    Unknown,
}

impl std::fmt::Display for ProcessErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ProcessErrorKind::FailedToStart => "failed to start",
            ProcessErrorKind::Crashed => "crashed",
            ProcessErrorKind::Timedout => "timed out",
            ProcessErrorKind::WriteError => "write error",
            ProcessErrorKind::ReadError => "read error",
            ProcessErrorKind::Unknown => "unknown error",
        };
        f.write_str(text)
    }
}
