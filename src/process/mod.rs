//! Process launching, per-process state and the ordered registry.
//!
//! - [`ProcessLauncher`] / [`ProcessControl`] abstract the OS: start a
//!   program, feed its stdin once, terminate or kill it.
//! - [`TokioLauncher`] is the production launcher.
//! - [`ProcessHandle`] tracks one invocation (states, output, errors).
//! - [`ProcessRegistry`] keeps handles and their tabs in display order.

mod handle;
mod launcher;
mod registry;
mod tokio_launcher;

pub use handle::ProcessHandle;
pub use launcher::{ProcessControl, ProcessLauncher};
pub use registry::{ProcessRegistry, Tab};
pub use tokio_launcher::TokioLauncher;
