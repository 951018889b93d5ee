//! Status bar component for the GUI
//!
//! Process counts, the close-policy toggles and the last status message.

use eframe::egui::{self, RichText};

use super::app::ProcRunApp;
use super::theme::{ACCENT_CYAN, ACCENT_RED, STATUS_DONE, TEXT_MUTED};

impl ProcRunApp {
    pub(crate) fn render_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let running = self.coordinator.registry().running_count();
            let tabs = self.coordinator.tab_count();
            ui.label(
                RichText::new(format!("{} running / {} tabs", running, tabs))
                    .small()
                    .monospace()
                    .color(if running > 0 { ACCENT_CYAN } else { TEXT_MUTED }),
            );

            ui.add_space(16.0);

            let mut auto_close = self.coordinator.options().auto_close_finished;
            if ui
                .checkbox(&mut auto_close, RichText::new("Auto-close finished").small())
                .changed()
            {
                self.coordinator.set_auto_close_finished(auto_close);
            }

            let mut close_on_last = self.coordinator.options().close_on_last;
            if ui
                .checkbox(&mut close_on_last, RichText::new("Close with last tab").small())
                .changed()
            {
                self.coordinator.set_close_on_last(close_on_last);
            }

            if let Some((message, is_error)) = &self.status {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let color = if *is_error { ACCENT_RED } else { STATUS_DONE };
                    ui.label(RichText::new(message).small().color(color));
                });
            }
        });
    }
}
