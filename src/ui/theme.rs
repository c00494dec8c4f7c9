// LogSieve - ui/theme.rs
//
// Colours and layout constants. No dependencies on app state or business
// logic.

use egui::Color32;

/// Status bar text after a failed file operation.
pub const STATUS_ERROR_TEXT: Color32 = Color32::from_rgb(248, 113, 113); // Red 400

/// Line-count badge on region tabs.
pub const TAB_COUNT_TEXT: Color32 = Color32::from_rgb(156, 163, 175); // Gray 400

/// Tab label for the pass-through region.
pub const ORIGINAL_TAB_TEXT: Color32 = Color32::from_rgb(96, 165, 250); // Blue 400

/// Warning text in the startup warnings window.
pub const WARNING_TEXT: Color32 = Color32::from_rgb(253, 186, 116); // Orange 300

/// Layout constants.
pub const ROW_HEIGHT: f32 = 18.0;
pub const TAB_SPACING: f32 = 4.0;
