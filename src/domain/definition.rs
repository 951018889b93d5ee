use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to start one external program.
///
/// This is a plain value: forms, saved commands and running handles each
/// hold their own copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefinition {
    /// Path (or bare name resolved through `PATH`) of the executable
    #[serde(default)]
    pub program: String,

    /// Arguments passed to the program, in order
    #[serde(default)]
    pub arguments: Vec<String>,

    /// Directory the program starts in (empty means "inherit")
    #[serde(default)]
    pub working_directory: String,

    /// Lines written to the program's stdin right after start, then stdin is closed
    #[serde(default)]
    pub stdin_lines: Vec<String>,
}

impl ProcessDefinition {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = dir.into();
        self
    }

    pub fn with_stdin_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stdin_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Base name of the program, used as the tab label.
    pub fn display_name(&self) -> String {
        let trimmed = self.program.trim();
        Path::new(trimmed)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| trimmed.to_string())
    }

    /// Single-line rendering for logs and listings.
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.arguments.len() + 1);
        parts.push(quote_if_needed(&self.program));
        parts.extend(self.arguments.iter().map(|arg| quote_if_needed(arg)));
        parts.join(" ")
    }

    pub fn has_working_directory(&self) -> bool {
        !self.working_directory.trim().is_empty()
    }
}

fn quote_if_needed(s: &str) -> String {
    if s.is_empty() || s.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        format!("\"{}\"", s.replace('"', "\\\""))
    } else {
        s.to_string()
    }
}
