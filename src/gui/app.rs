//! Main GUI application state
//!
//! Holds the coordinator, the saved commands and the form. Rendering lives in
//! the sibling modules; everything here is plain state manipulation.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::coordinator::{ConfirmRequest, TabCoordinator};
use crate::form::CommandForm;
use crate::store::{CommandNode, CommandStore, NodePath};

const NEW_GROUP_NAME: &str = "New group";

pub struct ProcRunApp {
    pub(crate) coordinator: TabCoordinator,
    pub(crate) store: CommandStore,
    pub(crate) form: CommandForm,
    pub(crate) commands_path: PathBuf,
    pub(crate) panel: String,
    pub(crate) tick_interval: Duration,
    /// Highlighted node in the commands tree
    pub(crate) selected_node: Option<NodePath>,
    /// Node being renamed inline and the edit buffer
    pub(crate) renaming: Option<(NodePath, String)>,
    /// Name the form is saved under
    pub(crate) entry_name: String,
    /// Text typed into the "Add new argument" row
    pub(crate) new_argument: String,
    /// Text typed into the "Add new input" row
    pub(crate) new_input: String,
    /// Last status message and whether it is an error
    pub(crate) status: Option<(String, bool)>,
    /// Keep the output view scrolled to the bottom
    pub(crate) follow_output: bool,
}

impl ProcRunApp {
    pub fn new(
        coordinator: TabCoordinator,
        store: CommandStore,
        commands_path: PathBuf,
        panel: impl Into<String>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            coordinator,
            store,
            form: CommandForm::new(),
            commands_path,
            panel: panel.into(),
            tick_interval,
            selected_node: None,
            renaming: None,
            entry_name: String::new(),
            new_argument: String::new(),
            new_input: String::new(),
            status: None,
            follow_output: true,
        }
    }

    pub fn coordinator(&self) -> &TabCoordinator {
        &self.coordinator
    }

    pub fn store(&self) -> &CommandStore {
        &self.store
    }

    pub fn form(&self) -> &CommandForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CommandForm {
        &mut self.form
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status = Some((message.into(), is_error));
    }

    /// Launch whatever the form currently describes.
    pub fn run_form(&mut self) {
        let definition = self.form.extract();
        if definition.program.trim().is_empty() {
            self.set_status("Enter a program to run", true);
            return;
        }
        match self.coordinator.launch(definition) {
            Ok(id) => self.set_status(format!("Started process #{}", id), false),
            Err(e) => {
                warn!("Launch failed: {}", e);
                self.set_status(format!("Failed to start: {}", e), true);
            }
        }
    }

    /// Launch a saved command without touching the form.
    pub fn run_saved(&mut self, path: &NodePath) {
        let Some(definition) = self.store.get(path).and_then(|n| n.definition()).cloned() else {
            return;
        };
        match self.coordinator.launch(definition) {
            Ok(id) => self.set_status(format!("Started process #{}", id), false),
            Err(e) => {
                warn!("Launch of saved command {} failed: {}", path, e);
                self.set_status(format!("Failed to start: {}", e), true);
            }
        }
    }

    /// Put a saved command into the form for editing.
    pub fn load_into_form(&mut self, path: &NodePath) {
        let Some(CommandNode::Command { name, definition }) = self.store.get(path) else {
            return;
        };
        self.entry_name = name.clone();
        self.form.set_cached(definition.clone(), true);
        self.coordinator.set_edited_entry(Some(path.clone()));
        self.selected_node = Some(path.clone());
    }

    /// Reset the form to a new, unsaved command.
    pub fn new_form(&mut self) {
        self.form.clear();
        self.entry_name.clear();
        self.new_argument.clear();
        self.new_input.clear();
        self.coordinator.set_edited_entry(None);
    }

    /// Save the form: update the edited entry, or add a new one next to the selection.
    pub fn save_form(&mut self) {
        let definition = self.form.extract();
        if definition.program.trim().is_empty() {
            self.set_status("Nothing to save: program is empty", true);
            return;
        }
        let name = match self.entry_name.trim() {
            "" => definition.display_name(),
            name => name.to_string(),
        };

        let edited = self
            .coordinator
            .edited_entry()
            .filter(|path| self.store.get(path).is_some_and(|n| !n.is_group()))
            .cloned();

        let result = match edited {
            Some(path) => self
                .store
                .update_definition(&path, definition)
                .and_then(|_| self.store.rename(&path, name.clone()))
                .map(|_| path),
            None => {
                let parent = self.store.insertion_parent(self.selected_node.as_ref());
                self.store.add_command(parent.as_ref(), name.clone(), definition)
            }
        };

        match result {
            Ok(path) => {
                self.entry_name = name.clone();
                self.coordinator.set_edited_entry(Some(path.clone()));
                self.selected_node = Some(path);
                self.form.save_to_cache();
                if self.persist() {
                    self.set_status(format!("Saved '{}'", name), false);
                }
            }
            Err(e) => self.set_status(format!("Failed to save: {}", e), true),
        }
    }

    /// Add an empty group next to the selection.
    pub fn add_group(&mut self) {
        let parent = self.store.insertion_parent(self.selected_node.as_ref());
        match self.store.add_group(parent.as_ref(), NEW_GROUP_NAME) {
            Ok(path) => {
                self.renaming = Some((path.clone(), NEW_GROUP_NAME.to_string()));
                self.selected_node = Some(path);
                self.persist();
            }
            Err(e) => self.set_status(format!("Failed to add group: {}", e), true),
        }
    }

    /// Move the node at `path` into a new group created in its place.
    pub fn group_around(&mut self, path: &NodePath) {
        match self.store.wrap_in_group(path, NEW_GROUP_NAME) {
            Ok(group) => {
                let edited = self.coordinator.edited_entry().map(|p| p.after_wrap(path));
                self.coordinator.set_edited_entry(edited);
                self.renaming = Some((group.clone(), NEW_GROUP_NAME.to_string()));
                self.selected_node = Some(group);
                self.persist();
            }
            Err(e) => self.set_status(format!("Failed to group: {}", e), true),
        }
    }

    /// Delete a node after confirmation.
    pub fn delete_node(&mut self, path: &NodePath) {
        let Some(name) = self.store.get(path).map(|n| n.name().to_string()) else {
            return;
        };
        if !self
            .coordinator
            .confirm(&ConfirmRequest::DeleteEntry { name: &name })
        {
            return;
        }

        match self.store.remove(path) {
            Ok(_) => {
                let edited = self
                    .coordinator
                    .edited_entry()
                    .and_then(|p| p.after_removal(path));
                self.coordinator.set_edited_entry(edited);
                self.selected_node = self.selected_node.as_ref().and_then(|p| p.after_removal(path));
                self.renaming = None;
                info!("Deleted saved entry '{}'", name);
                if self.persist() {
                    self.set_status(format!("Deleted '{}'", name), false);
                }
            }
            Err(e) => self.set_status(format!("Failed to delete: {}", e), true),
        }
    }

    /// Apply the inline rename buffer.
    pub fn finish_rename(&mut self) {
        let Some((path, name)) = self.renaming.take() else {
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        match self.store.rename(&path, name) {
            Ok(()) => {
                if self.coordinator.edited_entry() == Some(&path) {
                    self.entry_name = name.to_string();
                }
                self.persist();
            }
            Err(e) => self.set_status(format!("Failed to rename: {}", e), true),
        }
    }

    /// Write the catalogue to disk. Returns `false` (and sets the status) on failure.
    pub(crate) fn persist(&mut self) -> bool {
        match self.store.save(&self.commands_path, &self.panel) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save commands: {}", e);
                self.set_status(format!("Failed to save commands: {}", e), true);
                false
            }
        }
    }
}
