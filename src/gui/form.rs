//! Command form: program, working directory, arguments and stdin lines

use eframe::egui::{self, RichText};

use super::app::ProcRunApp;
use super::dialogs;
use super::theme::{ACCENT_CYAN, TEXT_DIM, TEXT_MUTED};
use crate::form::{EditableList, ListRow};

/// Edit requested on one of the editable lists during this frame
enum RowChange {
    Edit(usize, String),
    Remove(usize),
}

/// Draw the rows of `list`. `pending` backs the sentinel row.
fn render_list(
    ui: &mut egui::Ui,
    id: &str,
    list: &EditableList,
    pending: &mut String,
) -> Vec<RowChange> {
    let mut changes = Vec::new();

    for (index, row) in list.rows().iter().enumerate() {
        ui.push_id((id, index), |ui| {
            ui.horizontal(|ui| match row {
                ListRow::Real(value) => {
                    let mut text = value.clone();
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut text)
                            .desired_width(ui.available_width() - 28.0),
                    );
                    if response.changed() {
                        changes.push(RowChange::Edit(index, text));
                    }
                    if ui.small_button("✕").on_hover_text("Remove").clicked() {
                        changes.push(RowChange::Remove(index));
                    }
                }
                ListRow::Sentinel => {
                    let response = ui.add(
                        egui::TextEdit::singleline(pending)
                            .hint_text(RichText::new(list.sentinel_label()).italics().color(TEXT_MUTED))
                            .desired_width(ui.available_width() - 28.0),
                    );
                    let submitted = response.lost_focus() && !pending.is_empty();
                    if submitted {
                        changes.push(RowChange::Edit(index, std::mem::take(pending)));
                    }
                }
            });
        });
    }

    changes
}

fn apply_changes(list: &mut EditableList, changes: Vec<RowChange>) {
    let mut removals = Vec::new();
    for change in changes {
        match change {
            RowChange::Edit(index, text) => {
                list.edit_row(index, text);
            }
            RowChange::Remove(index) => removals.push(index),
        }
    }
    // Last-first so earlier indices stay valid
    removals.sort_unstable_by(|a, b| b.cmp(a));
    for index in removals {
        list.remove_row(index);
    }
}

impl ProcRunApp {
    pub(crate) fn render_form(&mut self, ui: &mut egui::Ui) {
        let heading = match self.coordinator.edited_entry() {
            Some(_) => format!("EDIT: {}", self.entry_name),
            None => "NEW COMMAND".to_string(),
        };
        ui.label(RichText::new(heading).monospace().color(TEXT_MUTED));
        ui.add_space(4.0);

        egui::Grid::new("command_form_grid")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Name").color(TEXT_DIM));
                ui.add(
                    egui::TextEdit::singleline(&mut self.entry_name)
                        .hint_text("defaults to the program name"),
                );
                ui.end_row();

                ui.label(RichText::new("Program").color(TEXT_DIM));
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(self.form.program_mut())
                            .desired_width(ui.available_width() - 70.0),
                    );
                    if ui.button("Browse…").clicked() {
                        if let Some(path) = dialogs::pick_program(self.form.program()) {
                            self.form.set_program(path.display().to_string());
                        }
                    }
                });
                ui.end_row();

                ui.label(RichText::new("Directory").color(TEXT_DIM));
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(self.form.working_directory_mut())
                            .hint_text("inherit")
                            .desired_width(ui.available_width() - 70.0),
                    );
                    if ui.button("Browse…").clicked() {
                        if let Some(path) =
                            dialogs::pick_working_directory(self.form.working_directory())
                        {
                            self.form.set_working_directory(path.display().to_string());
                        }
                    }
                });
                ui.end_row();
            });

        ui.add_space(6.0);
        ui.label(RichText::new("Arguments").color(TEXT_DIM));
        let changes = render_list(ui, "arguments", self.form.argument_list(), &mut self.new_argument);
        apply_changes(self.form.argument_list_mut(), changes);

        ui.add_space(6.0);
        ui.label(RichText::new("Input lines").color(TEXT_DIM));
        let changes = render_list(ui, "inputs", self.form.input_list(), &mut self.new_input);
        apply_changes(self.form.input_list_mut(), changes);

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .button(RichText::new("▶ Run").color(ACCENT_CYAN).strong())
                .clicked()
            {
                self.run_form();
            }
            if ui.button("Save").clicked() {
                self.save_form();
            }
            if ui.button("New").on_hover_text("Clear the form").clicked() {
                self.new_form();
            }
            let can_revert = self.form.cached().is_some() && self.form.is_dirty();
            if ui
                .add_enabled(can_revert, egui::Button::new("Revert"))
                .clicked()
            {
                self.form.reload_from_cache();
            }
        });
    }
}
