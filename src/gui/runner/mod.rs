//! GUI runner - launches the procrun panel

mod fonts;

use anyhow::{Context, Result};
use eframe::egui;
use std::path::Path;
use tracing::{info, warn};

use super::app::ProcRunApp;
use super::dialogs::RfdConfirm;
use crate::config::Config;
use crate::coordinator::{CoordinatorOptions, TabCoordinator};
use crate::process::TokioLauncher;
use crate::store::CommandStore;

use fonts::configure_fonts;

/// Run the panel until its window closes
pub fn run_gui(config_path: &Path) -> Result<()> {
    let config = Config::load_or_init(config_path).unwrap_or_else(|e| {
        warn!(
            "Failed to load config ({}): {}. Falling back to defaults.",
            config_path.display(),
            e
        );
        Config::default()
    });

    let commands_path = config.commands_path();
    let panel = config.settings.panel_name.clone();
    let store = CommandStore::load(&commands_path, &panel).unwrap_or_else(|e| {
        warn!("Failed to load saved commands: {}. Starting empty.", e);
        CommandStore::new()
    });
    info!(
        "Loaded {} saved commands from {}",
        store.command_count(),
        commands_path.display()
    );

    let launcher =
        TokioLauncher::new(config.start_timeout()).context("Failed to start process runtime")?;
    let coordinator = TabCoordinator::new(
        Box::new(launcher),
        Box::new(RfdConfirm),
        CoordinatorOptions::from(&config.settings),
    );
    let app = ProcRunApp::new(
        coordinator,
        store,
        commands_path,
        panel,
        config.tick_interval(),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("procrun")
            .with_inner_size([1100.0, 650.0])
            .with_min_inner_size([700.0, 400.0])
            .with_decorations(true)
            .with_resizable(true),
        centered: true,
        ..Default::default()
    };

    eframe::run_native(
        "procrun",
        options,
        Box::new(|cc| {
            configure_fonts(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run GUI: {}", e))?;

    Ok(())
}
