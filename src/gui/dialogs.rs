//! Native dialogs: confirmation prompts and file pickers

use std::path::{Path, PathBuf};

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use tracing::debug;

use crate::coordinator::{Confirm, ConfirmRequest};

/// Blocking yes/no message box
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdConfirm;

impl Confirm for RfdConfirm {
    fn confirm(&mut self, request: &ConfirmRequest<'_>) -> bool {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(request.title())
            .set_description(request.message())
            .set_buttons(MessageButtons::YesNo)
            .show();
        debug!("Confirmation '{}' answered {:?}", request.title(), result);
        matches!(result, MessageDialogResult::Yes)
    }
}

fn start_dir(current: &str) -> Option<PathBuf> {
    let current = Path::new(current.trim());
    if current.is_dir() {
        return Some(current.to_path_buf());
    }
    current
        .parent()
        .filter(|parent| parent.is_dir())
        .map(Path::to_path_buf)
}

/// Pick an executable, starting next to `current` when it points somewhere real.
pub fn pick_program(current: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Select program");
    if let Some(dir) = start_dir(current) {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}

pub fn pick_working_directory(current: &str) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Select working directory");
    if let Some(dir) = start_dir(current) {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_folder()
}
