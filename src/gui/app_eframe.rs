//! eframe::App implementation for ProcRunApp
//!
//! Contains the main update loop that runs every frame.

use super::app::ProcRunApp;
use super::theme::{self, BG_SECONDARY};
use eframe::egui;
use std::time::Duration;
use tracing::info;

/// Repaint interval while nothing is running
const IDLE_REPAINT: Duration = Duration::from_millis(500);

impl eframe::App for ProcRunApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply whatever the launcher threads reported since the last frame
        self.coordinator.pump_events();
        self.coordinator.tick();

        if ctx.input(|i| i.viewport().close_requested()) {
            if self.coordinator.on_window_close() {
                info!("Closing panel");
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            }
        }
        if self.coordinator.take_close_panel_request() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        theme::apply_theme(ctx);

        // Bottom status bar - rendered before the side and central panels
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::NONE.fill(BG_SECONDARY).inner_margin(4.0))
            .show(ctx, |ui| self.render_status_bar(ui));

        egui::SidePanel::left("commands_panel")
            .resizable(true)
            .default_width(320.0)
            .min_width(240.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("commands_panel_scroll")
                    .show(ui, |ui| {
                        self.render_commands_tree(ui);
                        ui.separator();
                        self.render_form(ui);
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| self.render_tabs(ui));

        let repaint = if self.coordinator.registry().running_count() > 0 {
            self.tick_interval
        } else {
            IDLE_REPAINT
        };
        ctx.request_repaint_after(repaint);
    }
}
