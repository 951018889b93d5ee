//! CLI command implementations

pub mod commands;
pub mod init;
pub mod run;
