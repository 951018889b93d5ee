//! One launched process and everything it produced

use chrono::{DateTime, TimeDelta, Utc};
use std::sync::mpsc::Sender;
use tracing::{debug, warn};

use super::launcher::{ProcessControl, ProcessLauncher};
use crate::domain::{
    OutputChannel, OutputLog, ProcessDefinition, ProcessErrorKind, ProcessEvent,
    ProcessEventKind, ProcessId, ProcessState,
};
use crate::error::{ProcRunError, SpawnError};

/// A process invocation: its definition, lifecycle and accumulated output.
///
/// Owned by the registry. Dropping a handle drops its control, which ends
/// the OS process if it is still alive.
pub struct ProcessHandle {
    id: ProcessId,
    definition: ProcessDefinition,
    state: ProcessState,
    state_history: Vec<ProcessState>,
    error_history: Vec<ProcessErrorKind>,
    output: OutputLog,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    exit_code: Option<i32>,
    /// Remove the tab as soon as the process ends, regardless of panel policy
    close_on_exit: bool,
    control: Option<Box<dyn ProcessControl>>,
}

impl std::fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("id", &self.id)
            .field("program", &self.definition.program)
            .field("state", &self.state)
            .field("exit_code", &self.exit_code)
            .field("close_on_exit", &self.close_on_exit)
            .finish()
    }
}

impl ProcessHandle {
    pub fn new(id: ProcessId, definition: ProcessDefinition) -> Self {
        Self {
            id,
            definition,
            state: ProcessState::NotStarted,
            state_history: vec![ProcessState::NotStarted],
            error_history: Vec::new(),
            output: OutputLog::new(),
            started_at: None,
            finished_at: None,
            exit_code: None,
            close_on_exit: false,
            control: None,
        }
    }

    /// Bound the output buffer to `limit` bytes.
    pub fn with_output_limit(mut self, limit: usize) -> Self {
        self.output = OutputLog::with_limit(limit);
        self
    }

    /// Create a handle and start its process.
    pub fn spawn(
        id: ProcessId,
        definition: ProcessDefinition,
        launcher: &dyn ProcessLauncher,
        events: Sender<ProcessEvent>,
    ) -> Result<Self, SpawnError> {
        Self::new(id, definition).start(launcher, events)
    }

    /// Start a handle that has not been started yet.
    pub fn start(
        mut self,
        launcher: &dyn ProcessLauncher,
        events: Sender<ProcessEvent>,
    ) -> Result<Self, SpawnError> {
        self.transition(ProcessState::Starting);
        match launcher.spawn(self.id, &self.definition, events) {
            Ok(control) => {
                self.control = Some(control);
                self.started_at = Some(Utc::now());
                self.transition(ProcessState::Running);
                Ok(self)
            }
            Err(e) => {
                warn!("Process #{} failed to start: {}", self.id, e);
                self.error_history.push(ProcessErrorKind::FailedToStart);
                self.transition(ProcessState::Errored);
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: ProcessState) {
        debug!("Process #{}: {} -> {}", self.id, self.state, next);
        self.state = next;
        self.state_history.push(next);
    }

    /// Write the given lines to stdin and close it.
    pub fn feed_input(&mut self, lines: &[String]) -> Result<(), ProcRunError> {
        match self.control.as_mut() {
            Some(control) if self.state.is_active() => control.write_input(lines),
            _ => Err(ProcRunError::InputClosed(self.id)),
        }
    }

    /// Request a graceful stop. Returns `false` (and does nothing) unless running.
    pub fn terminate(&mut self) -> bool {
        if self.state != ProcessState::Running {
            return false;
        }
        self.close_on_exit = true;
        if let Some(control) = self.control.as_mut() {
            if let Err(e) = control.terminate() {
                warn!("Failed to terminate process #{}: {}", self.id, e);
            }
        }
        true
    }

    /// Force an immediate stop. Returns `false` (and does nothing) unless running.
    pub fn kill(&mut self) -> bool {
        if self.state != ProcessState::Running {
            return false;
        }
        self.close_on_exit = true;
        if let Some(control) = self.control.as_mut() {
            if let Err(e) = control.kill() {
                warn!("Failed to kill process #{}: {}", self.id, e);
            }
        }
        true
    }

    /// Apply an event from the launcher. Returns `true` when the handle just
    /// reached a terminal state.
    pub fn apply(&mut self, kind: ProcessEventKind) -> bool {
        match kind {
            ProcessEventKind::Output { channel, text } => {
                self.output.push(channel, text);
                false
            }
            ProcessEventKind::Error { kind, detail } => {
                warn!("Process #{} reported {}: {}", self.id, kind, detail);
                self.error_history.push(kind);
                self.output
                    .push(OutputChannel::Stderr, format!("[{}] {}\n", kind, detail));
                false
            }
            ProcessEventKind::Finished { exit_code } => {
                if self.state.is_terminal() {
                    return false;
                }
                self.finished_at = Some(Utc::now());
                self.exit_code = exit_code;
                match exit_code {
                    Some(code) => {
                        self.output.push(
                            OutputChannel::System,
                            format!("Process exited with code {}\n", code),
                        );
                        self.transition(ProcessState::Finished);
                    }
                    None => {
                        self.error_history.push(ProcessErrorKind::Crashed);
                        self.output
                            .push(OutputChannel::System, "Process was terminated\n");
                        self.transition(ProcessState::Errored);
                    }
                }
                true
            }
        }
    }

    /// Kill the OS process if it is still active, ignoring panel policy.
    ///
    /// Used for forced teardown right before the handle is dropped.
    pub fn shutdown(&mut self) {
        if !self.state.is_active() {
            return;
        }
        if let Some(control) = self.control.as_mut() {
            if let Err(e) = control.kill() {
                warn!("Failed to kill process #{} during shutdown: {}", self.id, e);
            }
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn definition(&self) -> &ProcessDefinition {
        &self.definition
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_active()
    }

    pub fn state_history(&self) -> &[ProcessState] {
        &self.state_history
    }

    pub fn error_history(&self) -> &[ProcessErrorKind] {
        &self.error_history
    }

    pub fn output(&self) -> &OutputLog {
        &self.output
    }

    /// All output so far as escaped HTML, stderr highlighted.
    pub fn all_output(&self) -> String {
        self.output.to_html()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn close_on_exit(&self) -> bool {
        self.close_on_exit
    }

    pub fn pid(&self) -> Option<u32> {
        self.control.as_ref().and_then(|c| c.pid())
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Wall-clock run time; only defined once the process has ended.
    pub fn duration(&self) -> Option<TimeDelta> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Run time so far (or total, once ended).
    pub fn elapsed(&self) -> Option<TimeDelta> {
        self.started_at
            .map(|start| self.finished_at.unwrap_or_else(Utc::now) - start)
    }
}
