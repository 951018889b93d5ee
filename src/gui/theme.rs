//! GUI Theme
//!
//! Color constants and style setup for the procrun panel.

use eframe::egui::{self, Color32, Stroke};

use crate::domain::{OutputChannel, ProcessState};

// ═══════════════════════════════════════════════════════════════════════════
// BACKGROUNDS
// ═══════════════════════════════════════════════════════════════════════════

/// Background: Deep charcoal with subtle blue tint
pub const BG_PRIMARY: Color32 = Color32::from_rgb(18, 20, 24);
/// Secondary background for panels and the output view
pub const BG_SECONDARY: Color32 = Color32::from_rgb(24, 28, 34);
pub const BG_HIGHLIGHT: Color32 = Color32::from_rgb(32, 40, 52);
pub const BG_SELECTED: Color32 = Color32::from_rgb(40, 50, 65);

// ═══════════════════════════════════════════════════════════════════════════
// TEXT COLORS
// ═══════════════════════════════════════════════════════════════════════════

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(255, 176, 0);
pub const TEXT_DIM: Color32 = Color32::from_rgb(180, 130, 50);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(100, 85, 60);

// ═══════════════════════════════════════════════════════════════════════════
// STATUS COLORS
// ═══════════════════════════════════════════════════════════════════════════

pub const STATUS_PENDING: Color32 = Color32::from_rgb(150, 150, 150);
pub const STATUS_RUNNING: Color32 = Color32::from_rgb(255, 200, 50);
pub const STATUS_DONE: Color32 = Color32::from_rgb(80, 255, 120);
pub const STATUS_FAILED: Color32 = Color32::from_rgb(255, 80, 80);

pub const ACCENT_CYAN: Color32 = Color32::from_rgb(0, 255, 200);
pub const ACCENT_RED: Color32 = Color32::from_rgb(255, 80, 80);

/// Plain output text
pub const OUTPUT_STDOUT: Color32 = Color32::from_rgb(220, 220, 210);

pub fn state_color(state: ProcessState) -> Color32 {
    match state {
        ProcessState::NotStarted => STATUS_PENDING,
        ProcessState::Starting | ProcessState::Running => STATUS_RUNNING,
        ProcessState::Finished => STATUS_DONE,
        ProcessState::Errored => STATUS_FAILED,
    }
}

pub fn channel_color(channel: OutputChannel) -> Color32 {
    match channel {
        OutputChannel::Stdout => OUTPUT_STDOUT,
        OutputChannel::Stderr => ACCENT_RED,
        OutputChannel::System => TEXT_DIM,
    }
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_PRIMARY;
    style.visuals.extreme_bg_color = BG_SECONDARY;
    style.visuals.widgets.noninteractive.bg_fill = BG_SECONDARY;
    style.visuals.widgets.inactive.bg_fill = BG_SECONDARY;
    style.visuals.widgets.hovered.bg_fill = BG_HIGHLIGHT;
    style.visuals.widgets.active.bg_fill = BG_HIGHLIGHT;
    style.visuals.selection.bg_fill = BG_SELECTED;
    style.visuals.selection.stroke = Stroke::new(1.0, TEXT_PRIMARY);
    ctx.set_style(style);
}
