//! Settings panel: display preferences, field table and color rules

use eframe::egui;

use super::color_rule_editor::{self, complete_rules};
use super::field_table::{self, FieldAssignments};
use crate::color_rules::ColorRule;
use crate::config::{ConfigPatch, DisplayPreferences, SessionConfig};
use crate::constants::validation::*;
use crate::gui::constants::*;

#[derive(Debug, Default)]
pub struct SettingsOutcome {
    /// Preferences were edited and should be persisted
    pub prefs_changed: bool,
    /// The user saved the session settings
    pub apply: Option<ConfigPatch>,
}

/// Draft of the session settings, edited until the user saves
#[derive(Debug, Default)]
pub struct SettingsPanel {
    open: bool,
    available_fields: Vec<String>,
    fields: FieldAssignments,
    rules: Vec<ColorRule>,
    auto_advance: bool,
}

impl SettingsPanel {
    /// Open with a fresh draft of `config`; `available_fields` are the first
    /// record's field names
    pub fn open(&mut self, config: &SessionConfig, available_fields: Vec<String>) {
        self.fields = FieldAssignments::from_config(&available_fields, config);
        self.rules = config.color_rules().to_vec();
        self.auto_advance = config.auto_advance;
        self.available_fields = available_fields;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Patch built from the current draft
    pub fn patch(&self) -> ConfigPatch {
        ConfigPatch {
            display_fields: Some(self.fields.display_fields()),
            copy_fields: Some(self.fields.copy_fields()),
            auto_advance: Some(self.auto_advance),
            color_rules: Some(complete_rules(&self.rules)),
            ..Default::default()
        }
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, prefs: &mut DisplayPreferences) -> SettingsOutcome {
        let mut outcome = SettingsOutcome::default();

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            ui.group(|ui| {
                ui.label(egui::RichText::new("Display").strong());
                ui.add_space(ITEM_SPACING);

                if ui.checkbox(&mut prefs.dark_mode, "Dark mode").changed() {
                    outcome.prefs_changed = true;
                }
                if ui
                    .checkbox(&mut prefs.quick_advance, "Quick advance (Ctrl+Space)")
                    .changed()
                {
                    outcome.prefs_changed = true;
                }

                ui.horizontal(|ui| {
                    ui.label("Opacity:");
                    if ui
                        .add(
                            egui::Slider::new(&mut prefs.opacity_percent, MIN_OPACITY_PERCENT..=MAX_OPACITY_PERCENT)
                                .suffix("%"),
                        )
                        .changed()
                    {
                        outcome.prefs_changed = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Font size:");
                    if ui.small_button("A-").clicked() {
                        prefs.decrease_font();
                        outcome.prefs_changed = true;
                    }
                    ui.label(prefs.font_size.to_string());
                    if ui.small_button("A+").clicked() {
                        prefs.increase_font();
                        outcome.prefs_changed = true;
                    }
                });
            });

            ui.add_space(SECTION_SPACING);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Fields").strong());
                ui.add_space(ITEM_SPACING);
                if self.available_fields.is_empty() {
                    ui.weak("Load data to configure fields");
                } else {
                    field_table::ui(ui, "settings_fields", &mut self.fields);
                }
                ui.add_space(ITEM_SPACING);
                ui.checkbox(&mut self.auto_advance, "Auto advance");
            });

            ui.add_space(SECTION_SPACING);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Color Rules").strong());
                ui.label(egui::RichText::new("First matching rule colors the row badge.").small().weak());
                ui.add_space(ITEM_SPACING);
                color_rule_editor::ui(ui, &mut self.rules, &self.available_fields);
            });

            ui.add_space(SECTION_SPACING);

            ui.horizontal(|ui| {
                if ui.button("\u{1F4BE} Save").clicked() {
                    outcome.apply = Some(self.patch());
                    self.open = false;
                }
                if ui.button("Close").clicked() {
                    self.open = false;
                }
            });
        });

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_rules::RuleOperator;
    use crate::config::ArrayPath;
    use crate::constants::rules::DEFAULT_COLOR;

    fn names(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_open_drafts_current_config() {
        let mut config = SessionConfig::new(ArrayPath::default(), names(&["b"]), names(&["a", "b"]));
        config.auto_advance = true;
        let mut panel = SettingsPanel::default();
        panel.open(&config, names(&["a", "b", "c"]));
        assert!(panel.is_open());

        let patch = panel.patch();
        assert_eq!(patch.display_fields, Some(names(&["b"])));
        assert_eq!(patch.copy_fields, Some(names(&["a", "b"])));
        assert_eq!(patch.auto_advance, Some(true));
        assert!(patch.array_path.is_none());
    }

    #[test]
    fn test_patch_drops_incomplete_rules() {
        let config = SessionConfig::new(ArrayPath::default(), Vec::new(), names(&["a"]));
        let mut panel = SettingsPanel::default();
        panel.open(&config, names(&["a"]));
        panel.rules.push(ColorRule::new("a", RuleOperator::Equals, "", DEFAULT_COLOR));
        panel.rules.push(ColorRule::new("a", RuleOperator::Equals, "x", DEFAULT_COLOR));
        assert_eq!(panel.patch().color_rules.map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_reopen_discards_unsaved_draft() {
        let config = SessionConfig::new(ArrayPath::default(), Vec::new(), names(&["a"]));
        let mut panel = SettingsPanel::default();
        panel.open(&config, names(&["a", "b"]));
        panel.fields.set_copy("b", true);
        panel.close();
        panel.open(&config, names(&["a", "b"]));
        assert_eq!(panel.patch().copy_fields, Some(names(&["a"])));
    }
}
