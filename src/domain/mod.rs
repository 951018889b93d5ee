mod definition;
mod event;
mod output;
mod state;

pub use definition::ProcessDefinition;
pub use event::{ProcessEvent, ProcessEventKind};
pub use output::{escape_html, OutputChannel, OutputLog, OutputSegment};
pub use state::{ProcessErrorKind, ProcessState};

/// Unique identifier of a launched process within one registry
pub type ProcessId = u64;
