//! GUI-specific constants for layout, status colors and intervals

/// Panel window dimensions
pub const WINDOW_WIDTH: f32 = 320.0;
pub const WINDOW_HEIGHT: f32 = 500.0;
pub const WINDOW_MIN_WIDTH: f32 = 250.0;
pub const WINDOW_MIN_HEIGHT: f32 = 300.0;

pub const APP_TITLE: &str = "Copyloto";

/// Layout spacing
pub const SECTION_SPACING: f32 = 15.0;
pub const ITEM_SPACING: f32 = 8.0;
pub const ROW_SPACING: f32 = 4.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);
pub const STATUS_WARN: egui::Color32 = egui::Color32::from_rgb(200, 200, 0);

/// Row accents
pub const CURRENT_ROW_ACCENT: egui::Color32 = egui::Color32::from_rgb(70, 130, 230);
pub const ACTIVE_CELL_FILL: egui::Color32 = egui::Color32::from_rgb(70, 130, 230);
pub const PAST_ROW_ALPHA: f32 = 0.45;

/// How often the UI drains the hotkey channel while idle
pub const HOTKEY_POLL_INTERVAL_MS: u64 = 50;

/// Copy flash shown in the header after a successful copy
pub const COPY_FLASH_MS: u64 = 600;

/// Truncation for the copy indicator
pub const PREVIEW_MAX_CHARS: usize = 40;
