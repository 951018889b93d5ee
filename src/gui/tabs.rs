//! Process tabs: tab strip, per-process controls and the output view

use eframe::egui::{self, RichText, TextFormat, text::LayoutJob};

use super::app::ProcRunApp;
use super::theme::{self, BG_SECONDARY, BG_SELECTED, TEXT_DIM, TEXT_MUTED, TEXT_PRIMARY};
use crate::domain::OutputLog;

enum TabAction {
    Select(usize),
    Close(usize),
    Terminate(usize),
    Kill(usize),
}

/// Lay out the output log with one color per channel.
fn output_layout(log: &OutputLog) -> LayoutJob {
    let mut job = LayoutJob::default();
    for segment in log.segments() {
        let text = segment.text.replace('\r', "");
        job.append(
            &text,
            0.0,
            TextFormat {
                font_id: egui::FontId::monospace(12.0),
                color: theme::channel_color(segment.channel),
                ..Default::default()
            },
        );
    }
    job
}

impl ProcRunApp {
    pub(crate) fn render_tabs(&mut self, ui: &mut egui::Ui) {
        if self.coordinator.tab_count() == 0 {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No processes. Run a command from the form on the left.")
                        .color(TEXT_MUTED),
                );
            });
            return;
        }

        let mut actions = Vec::new();
        let current = self.coordinator.current_index();

        egui::ScrollArea::horizontal()
            .id_salt("tab_strip")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for (index, (tab, handle)) in self
                        .coordinator
                        .tabs()
                        .zip(self.coordinator.registry().handles())
                        .enumerate()
                    {
                        let selected = current == Some(index);
                        let fill = if selected { BG_SELECTED } else { BG_SECONDARY };
                        egui::Frame::NONE
                            .fill(fill)
                            .corner_radius(4.0)
                            .inner_margin(egui::Margin::symmetric(6, 3))
                            .show(ui, |ui| {
                                ui.horizontal(|ui| {
                                    if tab.running {
                                        ui.add(egui::Spinner::new().size(12.0));
                                    } else {
                                        ui.label(
                                            RichText::new("●")
                                                .color(theme::state_color(handle.state())),
                                        );
                                    }
                                    let label = RichText::new(&tab.label).color(if selected {
                                        TEXT_PRIMARY
                                    } else {
                                        TEXT_DIM
                                    });
                                    if ui
                                        .add(egui::Label::new(label).sense(egui::Sense::click()))
                                        .on_hover_text(handle.definition().command_line())
                                        .clicked()
                                    {
                                        actions.push(TabAction::Select(index));
                                    }
                                    if ui.small_button("✕").on_hover_text("Close tab").clicked() {
                                        actions.push(TabAction::Close(index));
                                    }
                                });
                            });
                    }
                });
            });

        ui.separator();

        if let (Some(index), Some(handle)) = (current, self.coordinator.current_handle()) {
            let running = handle.is_running();
            let mut details = format!("{}  [{}]", handle.definition().command_line(), handle.state());
            if let Some(pid) = handle.pid() {
                details.push_str(&format!("  pid {}", pid));
            }
            if let Some(elapsed) = handle.elapsed() {
                details.push_str(&format!(
                    "  {:.1}s",
                    elapsed.num_milliseconds() as f64 / 1000.0
                ));
            }
            if let Some(code) = handle.exit_code() {
                details.push_str(&format!("  exit {}", code));
            }

            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(details)
                        .monospace()
                        .small()
                        .color(theme::state_color(handle.state())),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add_enabled(running, egui::Button::new("Kill")).clicked() {
                        actions.push(TabAction::Kill(index));
                    }
                    if ui
                        .add_enabled(running, egui::Button::new("Terminate"))
                        .clicked()
                    {
                        actions.push(TabAction::Terminate(index));
                    }
                    if ui.button("Copy").on_hover_text("Copy all output").clicked() {
                        ui.ctx().copy_text(handle.all_output());
                    }
                    ui.checkbox(&mut self.follow_output, "Follow");
                });
            });
        }

        egui::Frame::NONE
            .fill(BG_SECONDARY)
            .inner_margin(6.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("process_output")
                    .auto_shrink([false, false])
                    .stick_to_bottom(self.follow_output)
                    .show(ui, |ui| {
                        let job = output_layout(self.coordinator.display().log());
                        ui.add(egui::Label::new(job).selectable(true));
                    });
            });

        for action in actions {
            match action {
                TabAction::Select(index) => {
                    self.coordinator.set_current(index);
                }
                TabAction::Close(index) => {
                    if !self.coordinator.request_close(index) {
                        self.set_status("Tab kept open", false);
                    }
                }
                TabAction::Terminate(index) => {
                    self.coordinator.terminate_at(index);
                }
                TabAction::Kill(index) => {
                    self.coordinator.kill_at(index);
                }
            }
        }
    }
}
