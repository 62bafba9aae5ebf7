//! Array picker shown when a document carries no embedded configuration

use eframe::egui;
use serde_json::Value;

use super::field_table::{self, FieldAssignments};
use crate::gui::constants::*;
use crate::resolver::{ArrayCandidate, UserSelection};

pub enum PickerOutcome {
    Pending,
    Apply(UserSelection),
    Cancel,
}

/// Holds the parsed document until the user commits to one of its arrays
pub struct ArrayPicker {
    document: Value,
    candidates: Vec<ArrayCandidate>,
    selected: usize,
    fields: FieldAssignments,
}

impl ArrayPicker {
    /// `candidates` is never empty: the resolver reports `NoArrayFound` instead
    pub fn new(document: Value, candidates: Vec<ArrayCandidate>) -> Self {
        let fields = candidates
            .first()
            .map(|c| FieldAssignments::for_new_array(&c.fields))
            .unwrap_or_default();
        Self {
            document,
            candidates,
            selected: 0,
            fields,
        }
    }

    /// Give up the retained document and candidates
    pub fn into_parts(self) -> (Value, Vec<ArrayCandidate>) {
        (self.document, self.candidates)
    }

    fn select(&mut self, index: usize) {
        if let Some(candidate) = self.candidates.get(index) {
            self.selected = index;
            self.fields = FieldAssignments::for_new_array(&candidate.fields);
        }
    }

    fn selection(&self) -> Option<UserSelection> {
        let candidate = self.candidates.get(self.selected)?;
        Some(UserSelection {
            array_path: candidate.key.clone(),
            display_fields: self.fields.display_fields(),
            copy_fields: self.fields.copy_fields(),
        })
    }

    pub fn ui(&mut self, ctx: &egui::Context) -> PickerOutcome {
        let mut outcome = PickerOutcome::Pending;

        egui::Window::new("Choose Data")
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Array:");
                    let label = |c: &ArrayCandidate| format!("{} ({})", c.key.label(), c.count);
                    let mut selected = self.selected;
                    let current = self.candidates.get(selected).map(label).unwrap_or_default();
                    egui::ComboBox::from_id_salt("array_picker_select")
                        .selected_text(current)
                        .show_ui(ui, |ui| {
                            for (idx, candidate) in self.candidates.iter().enumerate() {
                                ui.selectable_value(&mut selected, idx, label(candidate));
                            }
                        });
                    if selected != self.selected {
                        self.select(selected);
                    }
                });

                ui.add_space(ITEM_SPACING);
                egui::ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                    field_table::ui(ui, "array_picker_fields", &mut self.fields);
                });
                ui.add_space(ITEM_SPACING);

                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        if let Some(selection) = self.selection() {
                            outcome = PickerOutcome::Apply(selection);
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = PickerOutcome::Cancel;
                    }
                });
            });

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrayPath;
    use crate::resolver::{resolve, Resolution};
    use serde_json::json;

    fn picker(document: Value) -> ArrayPicker {
        match resolve(&document).unwrap() {
            Resolution::NeedsSelection { candidates } => ArrayPicker::new(document, candidates),
            other => panic!("expected selection, got {other:?}"),
        }
    }

    #[test]
    fn test_default_selection_is_first_array() {
        let picker = picker(json!({"people": [{"name": "a", "age": 1}], "pets": [{"kind": "cat"}]}));
        let selection = picker.selection().unwrap();
        assert_eq!(selection.array_path, ArrayPath::Key("people".to_string()));
        assert_eq!(selection.display_fields, vec!["name", "age"]);
        assert_eq!(selection.copy_fields, vec!["name"]);
    }

    #[test]
    fn test_switching_array_resets_fields() {
        let mut picker = picker(json!({"people": [{"name": "a"}], "pets": [{"kind": "cat"}]}));
        picker.select(1);
        let selection = picker.selection().unwrap();
        assert_eq!(selection.array_path, ArrayPath::Key("pets".to_string()));
        assert_eq!(selection.copy_fields, vec!["kind"]);

        picker.select(9);
        assert_eq!(picker.selected, 1);
    }

    #[test]
    fn test_into_parts_returns_document() {
        let document = json!([{"id": 1}]);
        let picker = picker(document.clone());
        let (returned, candidates) = picker.into_parts();
        assert_eq!(returned, document);
        assert_eq!(candidates[0].key, ArrayPath::Root);
    }
}
