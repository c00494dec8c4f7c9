// LogSieve - ui/panels/regions.rs
//
// Tab strip (one tab per display region) and the virtual-scrolling line view
// of the selected region.
//
// Uses `ScrollArea::show_rows` so only visible lines are laid out.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the tab strip. Keeps `selected_region` in range.
pub fn render_tabs(ui: &mut egui::Ui, state: &mut AppState) {
    let count = state.session.regions().len();
    if state.selected_region >= count {
        state.selected_region = 0;
    }

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = theme::TAB_SPACING;
        for (index, region) in state.session.regions().iter().enumerate() {
            let mut label = egui::RichText::new(&region.name);
            if region.is_original() {
                label = label.color(theme::ORIGINAL_TAB_TEXT);
            }
            let response = ui.selectable_label(state.selected_region == index, label);
            ui.label(
                egui::RichText::new(region.line_count().to_string())
                    .small()
                    .color(theme::TAB_COUNT_TEXT),
            );
            if response.clicked() {
                state.selected_region = index;
            }
        }
    });
}

/// Render the selected region's lines (central area).
pub fn render_lines(ui: &mut egui::Ui, state: &AppState) {
    let Some(region) = state.session.regions().get(state.selected_region) else {
        ui.centered_and_justified(|ui| {
            ui.label("No filters are defined.");
        });
        return;
    };

    if region.lines.is_empty() {
        ui.centered_and_justified(|ui| {
            if state.has_content() {
                ui.label("No lines matched this filter.");
            } else {
                ui.label("No file loaded.\nOpen one via File \u{2192} Open File\u{2026}");
            }
        });
        return;
    }

    egui::ScrollArea::both()
        .id_salt(("region_lines", state.selected_region))
        .auto_shrink([false; 2])
        .show_rows(ui, theme::ROW_HEIGHT, region.line_count(), |ui, row_range| {
            for line in region.lines.get(row_range).unwrap_or_default() {
                ui.add(egui::Label::new(egui::RichText::new(line).monospace()).extend());
            }
        });
}
