//! Hex color strings used by color rules

use eframe::egui;

/// Parse a hex color - supports #RGB, #RRGGBB and #AARRGGBB formats
pub fn parse_hex_color(hex: &str) -> Option<egui::Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    match hex.len() {
        3 => {
            // Short form, each digit doubled
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(egui::Color32::from_rgb(digit(0)?, digit(1)?, digit(2)?))
        }
        6 => Some(egui::Color32::from_rgb(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
        8 => Some(egui::Color32::from_rgba_unmultiplied(
            byte(2..4)?,
            byte(4..6)?,
            byte(6..8)?,
            byte(0..2)?,
        )),
        _ => None,
    }
}

/// Format a color as #RRGGBB; rule colors are always opaque
pub fn format_hex_color(color: egui::Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Text color readable on top of `background`
pub fn contrast_text(background: egui::Color32) -> egui::Color32 {
    let luma = 0.299 * background.r() as f32 + 0.587 * background.g() as f32 + 0.114 * background.b() as f32;
    if luma > 160.0 {
        egui::Color32::BLACK
    } else {
        egui::Color32::WHITE
    }
}
