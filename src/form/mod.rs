//! Model behind the "new command" form
//!
//! The GUI renders these fields; everything else (CLI, tests) talks to the
//! form through [`CommandForm::load`] and [`CommandForm::extract`].

mod editable_list;

pub use editable_list::{
    ARGUMENTS_SENTINEL, EditableList, INPUTS_SENTINEL, ListRow, RowEdit,
};

use crate::domain::ProcessDefinition;

#[derive(Debug, Clone)]
pub struct CommandForm {
    program: String,
    working_directory: String,
    arguments: EditableList,
    inputs: EditableList,
    /// Last definition stored with `save_to_cache`/`set_cached`
    cached: Option<ProcessDefinition>,
}

impl Default for CommandForm {
    fn default() -> Self {
        Self {
            program: String::new(),
            working_directory: String::new(),
            arguments: EditableList::arguments(),
            inputs: EditableList::inputs(),
            cached: None,
        }
    }
}

impl CommandForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate every field from `definition`.
    pub fn load(&mut self, definition: &ProcessDefinition) {
        self.program = definition.program.clone();
        self.working_directory = definition.working_directory.clone();
        self.arguments.load(&definition.arguments);
        self.inputs.load(&definition.stdin_lines);
    }

    /// Build a definition from the current field values.
    pub fn extract(&self) -> ProcessDefinition {
        ProcessDefinition {
            program: self.program.clone(),
            arguments: self.arguments.values(),
            working_directory: self.working_directory.clone(),
            stdin_lines: self.inputs.values(),
        }
    }

    pub fn clear(&mut self) {
        self.program.clear();
        self.working_directory.clear();
        self.arguments.clear();
        self.inputs.clear();
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn set_program(&mut self, program: impl Into<String>) {
        self.program = program.into();
    }

    pub fn program_mut(&mut self) -> &mut String {
        &mut self.program
    }

    pub fn working_directory(&self) -> &str {
        &self.working_directory
    }

    pub fn set_working_directory(&mut self, dir: impl Into<String>) {
        self.working_directory = dir.into();
    }

    pub fn working_directory_mut(&mut self) -> &mut String {
        &mut self.working_directory
    }

    pub fn arguments(&self) -> Vec<String> {
        self.arguments.values()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.values()
    }

    pub fn argument_list(&self) -> &EditableList {
        &self.arguments
    }

    pub fn argument_list_mut(&mut self) -> &mut EditableList {
        &mut self.arguments
    }

    pub fn input_list(&self) -> &EditableList {
        &self.inputs
    }

    pub fn input_list_mut(&mut self) -> &mut EditableList {
        &mut self.inputs
    }

    pub fn cached(&self) -> Option<&ProcessDefinition> {
        self.cached.as_ref()
    }

    /// Store `definition` as the cached one, optionally loading it into the fields.
    pub fn set_cached(&mut self, definition: ProcessDefinition, reload: bool) {
        if reload {
            self.load(&definition);
        }
        self.cached = Some(definition);
    }

    pub fn save_to_cache(&mut self) {
        self.cached = Some(self.extract());
    }

    /// Restore the fields from the cache. Returns `false` when nothing is cached.
    pub fn reload_from_cache(&mut self) -> bool {
        match self.cached.clone() {
            Some(definition) => {
                self.load(&definition);
                true
            }
            None => false,
        }
    }

    /// Whether the fields differ from the cached definition
    pub fn is_dirty(&self) -> bool {
        self.cached
            .as_ref()
            .is_none_or(|cached| *cached != self.extract())
    }
}
