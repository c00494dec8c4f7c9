// LogSieve - ui/panels/about.rs
//
// About dialog: shown from the Help menu.
// Rendered as a centred, non-resizable, non-collapsible window.

use crate::app::state::AppState;
use crate::util::constants;

/// Render the About dialog (if `state.show_about` is true).
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_about {
        return;
    }

    let mut open = true;
    egui::Window::new(format!("About {}", constants::APP_NAME))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(360.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(constants::APP_NAME).size(28.0).strong());
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!("v{}", constants::APP_VERSION))
                        .size(14.0)
                        .weak(),
                );
            });

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(8.0);

            ui.vertical_centered(|ui| {
                ui.label("Splits a log file into one view per filter");
                ui.label("in a single streaming pass.");
            });

            ui.add_space(10.0);
            egui::Grid::new("about_details")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    let settings = state.session.settings();
                    ui.label("Filters:");
                    ui.label(state.filter_source.as_str());
                    ui.end_row();

                    ui.label("Lines per tab:");
                    ui.label(format!("{} ({:?})", settings.capacity, settings.mode));
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.separator();
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("Built with Rust & egui").small().weak());
            });
            ui.add_space(8.0);
        });

    if !open {
        state.show_about = false;
    }
}
