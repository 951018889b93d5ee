//! Yes/cancel prompts the coordinator and the panel ask before destructive actions

/// What the user is asked to confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmRequest<'a> {
    /// Force-kill a process that is still running
    KillRunning { label: &'a str },
    /// Delete a saved command or group from the catalogue
    DeleteEntry { name: &'a str },
}

impl ConfirmRequest<'_> {
    pub fn title(&self) -> &'static str {
        match self {
            ConfirmRequest::KillRunning { .. } => "Kill process?",
            ConfirmRequest::DeleteEntry { .. } => "Delete entry?",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConfirmRequest::KillRunning { label } => format!(
                "{} is still running. Kill it and close the tab?",
                label
            ),
            ConfirmRequest::DeleteEntry { name } => {
                format!("Remove \"{}\" from the saved commands?", name)
            }
        }
    }
}

/// Blocking yes/cancel prompt. `true` means the user agreed.
pub trait Confirm {
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ConfirmRequest<'_>) -> bool,
{
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool {
        self(request)
    }
}

/// Agrees to everything (headless use).
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _request: &ConfirmRequest<'_>) -> bool {
        true
    }
}
