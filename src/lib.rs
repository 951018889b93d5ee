//! procrun - launch and watch external programs from a tabbed panel
//!
//! Every launched program gets its own tab showing its merged stdout/stderr.
//! Tabs and running processes are kept in step by a single
//! [`coordinator::TabCoordinator`], which also applies the close policy
//! (auto-close finished tabs, confirm before killing, close the panel when
//! the last tab goes away).
//!
//! ## Layers
//!
//! - [`domain`]: process definitions, states, output logs and events
//! - [`process`]: launching children and tracking them in a registry
//! - [`coordinator`]: tab bookkeeping on the UI thread
//! - [`form`] and [`store`]: the "new command" form and the saved commands tree
//! - [`gui`]: the egui front end

pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod form;
pub mod gui;
pub mod process;
pub mod store;

pub use domain::*;
pub use error::{ProcRunError, SpawnError};
