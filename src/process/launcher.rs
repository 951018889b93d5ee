//! Platform capability for starting and controlling child processes

use std::sync::mpsc::Sender;

use crate::domain::{ProcessDefinition, ProcessEvent, ProcessId};
use crate::error::{ProcRunError, SpawnError};

/// Control surface of one started OS process.
///
/// Dropping a control must end the process if it is still running.
pub trait ProcessControl: Send {
    /// OS process id, if the platform exposes one
    fn pid(&self) -> Option<u32>;

    /// Write every line (newline-terminated) to stdin, then close stdin.
    ///
    /// One-shot: later calls fail with [`ProcRunError::InputClosed`].
    fn write_input(&mut self, lines: &[String]) -> Result<(), ProcRunError>;

    /// Ask the process to stop (SIGTERM where available)
    fn terminate(&mut self) -> Result<(), ProcRunError>;

    /// Stop the process immediately
    fn kill(&mut self) -> Result<(), ProcRunError>;
}

/// Starts processes and reports their activity as [`ProcessEvent`]s.
///
/// Implementations report failure to start synchronously (after a bounded
/// wait); everything afterwards arrives through `events`, ending with
/// exactly one `Finished` event per started process.
pub trait ProcessLauncher {
    fn spawn(
        &self,
        id: ProcessId,
        definition: &ProcessDefinition,
        events: Sender<ProcessEvent>,
    ) -> Result<Box<dyn ProcessControl>, SpawnError>;
}
