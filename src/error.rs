//! Error types for process launching and catalogue handling

use std::path::PathBuf;

use crate::domain::ProcessId;

/// The executable could not be started.
///
/// A spawn failure never produces a tab or a registry entry.
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("No program given")]
    EmptyProgram,

    #[error("Program not found: {program}")]
    NotFound { program: String },

    #[error("Permission denied starting {program}")]
    PermissionDenied { program: String },

    #[error("Working directory does not exist: {}", path.display())]
    MissingWorkingDirectory { path: PathBuf },

    #[error("{program} did not start within {timeout_ms}ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("Failed to start {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl SpawnError {
    /// Classify an I/O error returned by the OS spawn call.
    pub fn from_io(program: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => SpawnError::NotFound {
                program: program.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => SpawnError::PermissionDenied {
                program: program.to_string(),
            },
            _ => SpawnError::Io {
                program: program.to_string(),
                source,
            },
        }
    }
}

/// Errors raised by the registry, handles and the command catalogue
#[derive(Debug, thiserror::Error)]
pub enum ProcRunError {
    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error("Process #{0} is already registered")]
    DuplicateId(ProcessId),

    #[error("Input of process #{0} was already closed")]
    InputClosed(ProcessId),

    #[error("No catalogue entry at {0}")]
    NoSuchEntry(String),

    #[error("Catalogue entry at {0} is not a group")]
    NotAGroup(String),

    #[error("Catalogue entry at {0} is not a command")]
    NotACommand(String),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize command catalogue: {0}")]
    Serialize(#[from] toml::ser::Error),
}
