// LogSieve - gui.rs
//
// Top-level eframe::App implementation.
// Wires together the menu bar, region tabs, line view and status bar.
// Loading runs on the UI thread; the window is unresponsive for the
// duration of one streaming pass.

use crate::app::state::AppState;
use crate::ui;

/// The LogSieve application.
pub struct LogSieveApp {
    pub state: AppState,
}

impl LogSieveApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for LogSieveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // pending_open: file named on the command line together with --gui.
        if let Some(path) = self.state.pending_open.take() {
            self.state.open_file(&path);
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open File\u{2026}").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Log files", &["log", "txt"])
                            .add_filter("All files", &["*"])
                            .pick_file()
                        {
                            self.state.open_file(&path);
                        }
                        ui.close_menu();
                    }
                    let has_content = self.state.has_content();
                    ui.add_enabled_ui(has_content, |ui| {
                        if ui.button("Save Displayed\u{2026}").clicked() {
                            if let Some(dir) = rfd::FileDialog::new()
                                .set_title("Choose an output folder (its contents will be replaced)")
                                .pick_folder()
                            {
                                self.state.save_displayed(&dir);
                            }
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.state.show_about = true;
                        ui.close_menu();
                    }
                });
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.state.status_is_error {
                    ui.colored_label(ui::theme::STATUS_ERROR_TEXT, &self.state.status_message);
                } else {
                    ui.label(&self.state.status_message);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(stats) = self.state.session.last_stats() {
                        ui.label(format!(
                            "{} lines read, {} routed",
                            stats.lines_read, stats.lines_routed
                        ));
                    }
                    if self.state.debug_mode {
                        ui.label(egui::RichText::new("DEBUG").small().weak());
                    }
                });
            });
        });

        // Tab strip
        egui::TopBottomPanel::top("region_tabs").show(ctx, |ui| {
            ui::panels::regions::render_tabs(ui, &mut self.state);
        });

        // Central panel (selected region)
        egui::CentralPanel::default().show(ctx, |ui| {
            ui::panels::regions::render_lines(ui, &self.state);
        });

        ui::panels::warnings::render(ctx, &mut self.state);
        ui::panels::about::render(ctx, &mut self.state);
    }
}
