//! Events reported by running processes

use super::{OutputChannel, ProcessErrorKind, ProcessId};

/// Something that happened to one process.
///
/// Produced on launcher threads, consumed on the thread that owns the
/// coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEvent {
    pub id: ProcessId,
    pub kind: ProcessEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEventKind {
    /// Text read from stdout or stderr
    Output { channel: OutputChannel, text: String },
    /// OS-level fault while the process runs (never terminal by itself)
    Error { kind: ProcessErrorKind, detail: String },
    /// Process is gone; `exit_code` is `None` when it was ended by a signal
    Finished { exit_code: Option<i32> },
}

impl ProcessEvent {
    pub fn output(id: ProcessId, channel: OutputChannel, text: impl Into<String>) -> Self {
        Self {
            id,
            kind: ProcessEventKind::Output {
                channel,
                text: text.into(),
            },
        }
    }

    pub fn stdout(id: ProcessId, text: impl Into<String>) -> Self {
        Self::output(id, OutputChannel::Stdout, text)
    }

    pub fn stderr(id: ProcessId, text: impl Into<String>) -> Self {
        Self::output(id, OutputChannel::Stderr, text)
    }

    pub fn error(id: ProcessId, kind: ProcessErrorKind, detail: impl Into<String>) -> Self {
        Self {
            id,
            kind: ProcessEventKind::Error {
                kind,
                detail: detail.into(),
            },
        }
    }

    pub fn finished(id: ProcessId, exit_code: Option<i32>) -> Self {
        Self {
            id,
            kind: ProcessEventKind::Finished { exit_code },
        }
    }
}
