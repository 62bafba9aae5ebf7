//! Color rule list editor

use eframe::egui;

use crate::color_rules::{ColorRule, RuleOperator};
use crate::constants::rules::DEFAULT_COLOR;
use crate::gui::color::{format_hex_color, parse_hex_color};
use crate::gui::constants::*;

/// Renders the rule list and returns true if any rule changed
pub fn ui(ui: &mut egui::Ui, rules: &mut Vec<ColorRule>, fields: &[String]) -> bool {
    let mut changed = false;
    let mut remove: Option<usize> = None;

    for (idx, rule) in rules.iter_mut().enumerate() {
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt(("color_rule_field", idx))
                .selected_text(&rule.field)
                .width(80.0)
                .show_ui(ui, |ui| {
                    for field in fields {
                        if ui.selectable_value(&mut rule.field, field.clone(), field).changed() {
                            changed = true;
                        }
                    }
                });

            egui::ComboBox::from_id_salt(("color_rule_operator", idx))
                .selected_text(rule.operator.label())
                .width(44.0)
                .show_ui(ui, |ui| {
                    for op in RuleOperator::ALL {
                        if ui.selectable_value(&mut rule.operator, op, op.label()).changed() {
                            changed = true;
                        }
                    }
                });

            let value_edit = egui::TextEdit::singleline(&mut rule.value)
                .hint_text("value")
                .desired_width(70.0);
            if ui.add(value_edit).changed() {
                changed = true;
            }

            // Unparseable colors fall back to the default swatch
            let mut color = parse_hex_color(&rule.color)
                .or_else(|| parse_hex_color(DEFAULT_COLOR))
                .unwrap_or(egui::Color32::RED);
            if ui.color_edit_button_srgba(&mut color).changed() {
                rule.color = format_hex_color(color);
                changed = true;
            }

            if ui.small_button("\u{00D7}").clicked() {
                remove = Some(idx);
            }
        });
        ui.add_space(ROW_SPACING);
    }

    if let Some(idx) = remove {
        rules.remove(idx);
        changed = true;
    }

    if ui.button("\u{2795} Add Rule").clicked() {
        let field = fields.first().cloned().unwrap_or_default();
        rules.push(ColorRule::new(&field, RuleOperator::Equals, "", DEFAULT_COLOR));
        changed = true;
    }

    changed
}

/// Rules worth saving: incomplete ones would never match
pub fn complete_rules(rules: &[ColorRule]) -> Vec<ColorRule> {
    rules.iter().filter(|rule| rule.is_complete()).cloned().collect()
}
