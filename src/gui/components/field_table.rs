//! Show/copy order table shared by the array picker and the settings panel

use eframe::egui;

use crate::config::SessionConfig;
use crate::gui::constants::*;

/// One field's row in the table. Order 0 means "not in the sequence".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub name: String,
    pub show: bool,
    pub show_order: usize,
    pub copy: bool,
    pub copy_order: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Show,
    Copy,
}

impl Column {
    fn order(self, row: &FieldAssignment) -> usize {
        match self {
            Column::Show => row.show_order,
            Column::Copy => row.copy_order,
        }
    }

    fn slot(self, row: &mut FieldAssignment) -> (&mut bool, &mut usize) {
        match self {
            Column::Show => (&mut row.show, &mut row.show_order),
            Column::Copy => (&mut row.copy, &mut row.copy_order),
        }
    }
}

/// Ordered display and copy selections for a set of field names.
///
/// Checking a field appends it after the current highest order; unchecking
/// moves every later field up by one so orders stay contiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldAssignments {
    rows: Vec<FieldAssignment>,
}

impl FieldAssignments {
    /// Defaults for a freshly picked array: everything shown in document
    /// order, only the first field copied
    pub fn for_new_array(fields: &[String]) -> Self {
        let rows = fields
            .iter()
            .enumerate()
            .map(|(idx, name)| FieldAssignment {
                name: name.clone(),
                show: true,
                show_order: idx + 1,
                copy: idx == 0,
                copy_order: if idx == 0 { 1 } else { 0 },
            })
            .collect();
        Self { rows }
    }

    /// Current configuration mapped onto `fields`.
    ///
    /// An empty display list marks every field shown with no order, which
    /// saves back as an empty list and keeps the first-three fallback.
    pub fn from_config(fields: &[String], config: &SessionConfig) -> Self {
        let display = &config.display_fields;
        let copy = config.copy_fields();
        let rows = fields
            .iter()
            .map(|name| {
                let show_pos = display.iter().position(|f| f == name);
                let copy_pos = copy.iter().position(|f| f == name);
                FieldAssignment {
                    name: name.clone(),
                    show: display.is_empty() || show_pos.is_some(),
                    show_order: show_pos.map_or(0, |p| p + 1),
                    copy: copy_pos.is_some(),
                    copy_order: copy_pos.map_or(0, |p| p + 1),
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[FieldAssignment] {
        &self.rows
    }

    pub fn set_show(&mut self, field: &str, checked: bool) {
        self.toggle(field, Column::Show, checked);
    }

    pub fn set_copy(&mut self, field: &str, checked: bool) {
        self.toggle(field, Column::Copy, checked);
    }

    fn toggle(&mut self, field: &str, column: Column, checked: bool) {
        let Some(idx) = self.rows.iter().position(|r| r.name == field) else {
            return;
        };

        if checked {
            let max_order = self.rows.iter().map(|row| column.order(row)).max().unwrap_or(0);
            let (flag, order) = column.slot(&mut self.rows[idx]);
            *flag = true;
            *order = max_order + 1;
        } else {
            let (flag, order) = column.slot(&mut self.rows[idx]);
            let removed = *order;
            *flag = false;
            *order = 0;
            // Rows shown through the fallback carry no order to close up
            if removed == 0 {
                return;
            }
            for row in &mut self.rows {
                let (_, order) = column.slot(row);
                if *order > removed {
                    *order -= 1;
                }
            }
        }
    }

    fn ordered(&self, column: Column) -> Vec<String> {
        let mut picked: Vec<(usize, &str)> = self
            .rows
            .iter()
            .filter_map(|row| match column {
                Column::Show if row.show && row.show_order > 0 => Some((row.show_order, row.name.as_str())),
                Column::Copy if row.copy && row.copy_order > 0 => Some((row.copy_order, row.name.as_str())),
                _ => None,
            })
            .collect();
        picked.sort_by_key(|(order, _)| *order);
        picked.into_iter().map(|(_, name)| name.to_string()).collect()
    }

    pub fn display_fields(&self) -> Vec<String> {
        self.ordered(Column::Show)
    }

    pub fn copy_fields(&self) -> Vec<String> {
        self.ordered(Column::Copy)
    }
}

/// Renders the table; returns true if any checkbox changed
pub fn ui(ui: &mut egui::Ui, id_salt: &str, assignments: &mut FieldAssignments) -> bool {
    let mut toggled: Option<(String, Column, bool)> = None;

    egui::Grid::new(id_salt)
        .num_columns(5)
        .striped(true)
        .spacing([ITEM_SPACING, ROW_SPACING])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Field").strong());
            ui.label(egui::RichText::new("Show").strong());
            ui.label("#");
            ui.label(egui::RichText::new("Copy").strong());
            ui.label("#");
            ui.end_row();

            for row in assignments.rows() {
                ui.label(&row.name);

                let mut show = row.show;
                if ui.checkbox(&mut show, "").changed() {
                    toggled = Some((row.name.clone(), Column::Show, show));
                }
                ui.weak(order_text(row.show_order));

                let mut copy = row.copy;
                if ui.checkbox(&mut copy, "").changed() {
                    toggled = Some((row.name.clone(), Column::Copy, copy));
                }
                ui.weak(order_text(row.copy_order));
                ui.end_row();
            }
        });

    match toggled {
        Some((field, Column::Show, checked)) => {
            assignments.set_show(&field, checked);
            true
        }
        Some((field, Column::Copy, checked)) => {
            assignments.set_copy(&field, checked);
            true
        }
        None => false,
    }
}

fn order_text(order: usize) -> String {
    if order == 0 {
        "-".to_string()
    } else {
        order.to_string()
    }
}
