// LogSieve - ui/panels/warnings.rs
//
// Startup warnings window (config values that fell back to defaults).
// Closing it discards the warnings.

use crate::app::state::AppState;
use crate::ui::theme;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if state.warnings.is_empty() {
        return;
    }

    let mut open = true;
    egui::Window::new("Configuration Warnings")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .min_width(420.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            for warning in &state.warnings {
                ui.colored_label(theme::WARNING_TEXT, warning);
            }
        });

    if !open {
        state.warnings.clear();
    }
}
