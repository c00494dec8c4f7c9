// LogSieve - app/state.rs
//
// Application state for the GUI. Holds the display session, the selected
// tab and the status line. Owned by the eframe::App implementation.
//
// Every file operation reports failure through `status_message`; nothing
// here panics on I/O errors.

use crate::app::display::DisplaySession;
use crate::core::retention::RetentionMode;
use std::path::{Path, PathBuf};

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Regions and their retention buffers.
    pub session: DisplaySession,

    /// Human-readable origin of the active filter set.
    pub filter_source: String,

    /// Index into `session.regions()` of the visible tab.
    pub selected_region: usize,

    /// File requested from the command line, loaded on the first frame.
    pub pending_open: Option<PathBuf>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Whether the last file operation failed (status bar colour).
    pub status_is_error: bool,

    /// Non-fatal warnings (config problems) shown once at startup.
    pub warnings: Vec<String>,

    /// Whether to show the About window.
    pub show_about: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    pub fn new(session: DisplaySession, filter_source: String, debug_mode: bool) -> Self {
        Self {
            session,
            filter_source,
            selected_region: 0,
            pending_open: None,
            status_message: "Ready. Open a log file to begin.".to_string(),
            status_is_error: false,
            warnings: Vec::new(),
            show_about: false,
            debug_mode,
        }
    }

    /// Load `path` into every region.
    pub fn open_file(&mut self, path: &Path) {
        match self.session.load(path) {
            Ok(stats) => {
                let settings = self.session.settings();
                self.set_status(format!(
                    "Loaded '{}': {} lines, showing {} {} per tab.",
                    path.display(),
                    stats.lines_read,
                    match settings.mode {
                        RetentionMode::KeepFirst => "first",
                        RetentionMode::KeepLast => "last",
                    },
                    settings.capacity
                ));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Open failed");
                self.set_error(format!("Open failed: {e}"));
            }
        }
    }

    /// Write the displayed regions into `dir` (cleared first).
    pub fn save_displayed(&mut self, dir: &Path) {
        match self.session.save(dir) {
            Ok(written) => {
                self.set_status(format!(
                    "Saved {} file(s) to '{}'.",
                    written.len(),
                    dir.display()
                ));
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Save failed");
                self.set_error(format!("Save failed: {e}"));
            }
        }
    }

    /// Whether anything has been loaded yet.
    pub fn has_content(&self) -> bool {
        self.session.source().is_some()
    }

    fn set_status(&mut self, message: String) {
        self.status_message = message;
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: String) {
        self.status_message = message;
        self.status_is_error = true;
    }
}
