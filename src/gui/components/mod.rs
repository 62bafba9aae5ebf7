pub mod array_picker;
pub mod color_rule_editor;
pub mod field_table;
pub mod load_dialog;
pub mod record_list;
pub mod settings_panel;
