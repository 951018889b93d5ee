//! Saved commands tree in the side panel

use eframe::egui::{self, RichText};

use super::app::ProcRunApp;
use super::theme::{ACCENT_CYAN, TEXT_DIM, TEXT_MUTED, TEXT_PRIMARY};
use crate::store::{CommandNode, NodePath};

/// Requested from the context menus, applied once the tree is drawn
enum TreeAction {
    Select(NodePath),
    Run(NodePath),
    Load(NodePath),
    Rename(NodePath),
    GroupAround(NodePath),
    Delete(NodePath),
    AddGroup,
    CommitRename,
}

struct TreeView<'a> {
    selected: Option<&'a NodePath>,
    edited: Option<&'a NodePath>,
    renaming: &'a mut Option<(NodePath, String)>,
    actions: Vec<TreeAction>,
}

impl TreeView<'_> {
    fn render_nodes(&mut self, ui: &mut egui::Ui, nodes: &[CommandNode], prefix: Option<&NodePath>) {
        for (index, node) in nodes.iter().enumerate() {
            let path = match prefix {
                Some(prefix) => prefix.child(index),
                None => NodePath::root_child(index),
            };

            if self.render_rename(ui, &path) {
                if let CommandNode::Group { children, .. } = node {
                    ui.indent(("renaming_group", path.to_string()), |ui| {
                        self.render_nodes(ui, children, Some(&path));
                    });
                }
                continue;
            }

            match node {
                CommandNode::Group { name, children } => {
                    let response = egui::CollapsingHeader::new(
                        RichText::new(name).color(TEXT_DIM).strong(),
                    )
                    .id_salt(("group", path.to_string()))
                    .default_open(true)
                    .show(ui, |ui| self.render_nodes(ui, children, Some(&path)));

                    let header = response.header_response;
                    if header.clicked() {
                        self.actions.push(TreeAction::Select(path.clone()));
                    }
                    header.context_menu(|ui| {
                        if ui.button("Rename").clicked() {
                            self.actions.push(TreeAction::Rename(path.clone()));
                            ui.close();
                        }
                        if ui.button("New group around").clicked() {
                            self.actions.push(TreeAction::GroupAround(path.clone()));
                            ui.close();
                        }
                        ui.separator();
                        if ui.button("Delete").clicked() {
                            self.actions.push(TreeAction::Delete(path.clone()));
                            ui.close();
                        }
                    });
                }
                CommandNode::Command { name, definition } => {
                    let is_edited = self.edited == Some(&path);
                    let color = if is_edited { ACCENT_CYAN } else { TEXT_PRIMARY };
                    let response = ui
                        .selectable_label(
                            self.selected == Some(&path),
                            RichText::new(name).color(color),
                        )
                        .on_hover_text(definition.command_line());

                    if response.double_clicked() {
                        self.actions.push(TreeAction::Load(path.clone()));
                    } else if response.clicked() {
                        self.actions.push(TreeAction::Select(path.clone()));
                    }
                    response.context_menu(|ui| {
                        if ui.button("Run").clicked() {
                            self.actions.push(TreeAction::Run(path.clone()));
                            ui.close();
                        }
                        if ui.button("Load into form").clicked() {
                            self.actions.push(TreeAction::Load(path.clone()));
                            ui.close();
                        }
                        ui.separator();
                        if ui.button("Rename").clicked() {
                            self.actions.push(TreeAction::Rename(path.clone()));
                            ui.close();
                        }
                        if ui.button("New group around").clicked() {
                            self.actions.push(TreeAction::GroupAround(path.clone()));
                            ui.close();
                        }
                        if ui.button("Delete").clicked() {
                            self.actions.push(TreeAction::Delete(path.clone()));
                            ui.close();
                        }
                    });
                }
            }
        }
    }

    /// Inline name editor. Returns `true` when `path` is being renamed.
    fn render_rename(&mut self, ui: &mut egui::Ui, path: &NodePath) -> bool {
        let Some((renamed, buffer)) = self.renaming.as_mut() else {
            return false;
        };
        if *renamed != *path {
            return false;
        }

        let response = ui.text_edit_singleline(buffer);
        if response.lost_focus() {
            self.actions.push(TreeAction::CommitRename);
        } else if !response.has_focus() {
            response.request_focus();
        }
        true
    }
}

impl ProcRunApp {
    pub(crate) fn render_commands_tree(&mut self, ui: &mut egui::Ui) {
        let mut view = TreeView {
            selected: self.selected_node.as_ref(),
            edited: self.coordinator.edited_entry(),
            renaming: &mut self.renaming,
            actions: Vec::new(),
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new("SAVED COMMANDS").monospace().color(TEXT_MUTED));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("+ Group").clicked() {
                    view.actions.push(TreeAction::AddGroup);
                }
            });
        });
        ui.add_space(4.0);

        if self.store.is_empty() {
            ui.label(
                RichText::new("No saved commands yet. Fill in the form and press Save.")
                    .small()
                    .color(TEXT_MUTED),
            );
        }
        view.render_nodes(ui, self.store.nodes(), None);

        let actions = view.actions;
        for action in actions {
            match action {
                TreeAction::Select(path) => self.selected_node = Some(path),
                TreeAction::Run(path) => self.run_saved(&path),
                TreeAction::Load(path) => self.load_into_form(&path),
                TreeAction::Rename(path) => {
                    let name = self
                        .store
                        .get(&path)
                        .map(|n| n.name().to_string())
                        .unwrap_or_default();
                    self.renaming = Some((path, name));
                }
                TreeAction::GroupAround(path) => self.group_around(&path),
                TreeAction::Delete(path) => self.delete_node(&path),
                TreeAction::AddGroup => self.add_group(),
                TreeAction::CommitRename => self.finish_rename(),
            }
        }
    }
}
