//! Scrollable list of records with their copy cells

use eframe::egui;

use crate::dispatch::Action;
use crate::gui::color::{contrast_text, parse_hex_color};
use crate::gui::constants::*;
use crate::view::{RowStatus, RowView};

/// Remembers which row was last scrolled into view
#[derive(Debug, Default)]
pub struct RecordListState {
    scrolled_to: Option<usize>,
}

/// Renders the rows and returns the actions triggered by clicks
pub fn ui(ui: &mut egui::Ui, rows: &[RowView], font_size: f32, state: &mut RecordListState) -> Vec<Action> {
    let mut actions = Vec::new();
    let text_color = ui.visuals().text_color();
    let badge_fill = ui.visuals().widgets.inactive.bg_fill;

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        for row in rows {
            let is_current = row.status == RowStatus::Current;
            let row_text = match row.status {
                RowStatus::Past => text_color.gamma_multiply(PAST_ROW_ALPHA),
                _ => text_color,
            };

            let stroke = if is_current {
                egui::Stroke::new(2.0, CURRENT_ROW_ACCENT)
            } else {
                egui::Stroke::NONE
            };

            let frame = egui::Frame::new()
                .inner_margin(egui::Margin::same(6))
                .corner_radius(4)
                .stroke(stroke);

            let inner = frame.show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal_top(|ui| {
                    let badge_color = row.highlight.as_deref().and_then(parse_hex_color);
                    let badge_text = egui::RichText::new(&row.label)
                        .size(font_size - 2.0)
                        .color(badge_color.map_or(row_text, contrast_text));
                    egui::Frame::new()
                        .fill(badge_color.unwrap_or(badge_fill))
                        .inner_margin(egui::Margin::symmetric(4, 2))
                        .corner_radius(3)
                        .show(ui, |ui| {
                            if ui.add(egui::Label::new(badge_text).sense(egui::Sense::click())).clicked() {
                                actions.push(Action::SelectRecord(row.index));
                            }
                        });

                    ui.vertical(|ui| {
                        let principal = egui::RichText::new(&row.principal)
                            .size(font_size)
                            .strong()
                            .color(row_text);
                        if ui.add(egui::Label::new(principal).sense(egui::Sense::click())).clicked() {
                            actions.push(Action::SelectRecord(row.index));
                        }
                        if !row.secondary.is_empty() {
                            ui.label(
                                egui::RichText::new(row.secondary.join(" \u{00B7} "))
                                    .size(font_size - 3.0)
                                    .color(row_text.gamma_multiply(0.8)),
                            );
                        }

                        for cell in &row.copy_cells {
                            let text = egui::RichText::new(&cell.value).size(font_size - 1.0);
                            let button = if cell.active {
                                egui::Button::new(text.color(egui::Color32::WHITE)).fill(ACTIVE_CELL_FILL)
                            } else {
                                egui::Button::new(text)
                            }
                            .min_size(egui::vec2(ui.available_width(), 0.0));
                            if ui.add(button).on_hover_text(&cell.field).clicked() {
                                if !is_current {
                                    actions.push(Action::SelectRecord(row.index));
                                }
                                actions.push(Action::SelectField(cell.field_index));
                            }
                        }
                    });
                });
            });

            if is_current && state.scrolled_to != Some(row.index) {
                inner.response.scroll_to_me(Some(egui::Align::Center));
                state.scrolled_to = Some(row.index);
            }

            ui.add_space(ROW_SPACING);
        }
    });

    actions
}
