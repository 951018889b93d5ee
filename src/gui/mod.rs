//! GUI for procrun
//!
//! One window: saved commands and the command form on the left, process
//! tabs with their output on the right, status bar at the bottom.

pub mod app;
mod app_eframe;
mod commands_tree;
pub mod dialogs;
mod form;
pub mod runner;
mod status_bar;
mod tabs;
pub mod theme;

pub use app::ProcRunApp;
pub use dialogs::RfdConfirm;
pub use runner::run_gui;
