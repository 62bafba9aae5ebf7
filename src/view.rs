//! Flattens a [`Snapshot`] into per-row display data for the record list

use crate::color_rules::classify;
use crate::constants::document::FALLBACK_DISPLAY_FIELDS;
use crate::record::Record;
use crate::sequence::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Past,
    Current,
    Future,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCell {
    pub field: String,
    pub value: String,
    pub field_index: usize,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub index: usize,
    /// 1-based badge text
    pub label: String,
    pub status: RowStatus,
    pub principal: String,
    pub secondary: Vec<String>,
    pub copy_cells: Vec<CopyCell>,
    pub highlight: Option<String>,
}

/// Display fields for a record, falling back to its first few field names
fn fields_to_show(display_fields: &[String], record: &Record) -> Vec<String> {
    if display_fields.is_empty() {
        record
            .field_names()
            .into_iter()
            .take(FALLBACK_DISPLAY_FIELDS)
            .collect()
    } else {
        display_fields.to_vec()
    }
}

pub fn row_views(snapshot: &Snapshot<'_>) -> Vec<RowView> {
    let config = snapshot.config;
    let copy_fields = config.copy_fields();
    let rules = config.color_rules();

    snapshot
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let status = match index.cmp(&snapshot.record_index) {
                std::cmp::Ordering::Less => RowStatus::Past,
                std::cmp::Ordering::Equal => RowStatus::Current,
                std::cmp::Ordering::Greater => RowStatus::Future,
            };

            let shown = fields_to_show(&config.display_fields, record);
            let principal = shown
                .first()
                .map(|field| record.get(field).text_or_empty())
                .unwrap_or_default();
            let secondary = shown
                .iter()
                .skip(1)
                .filter_map(|field| record.get(field).text())
                .collect();

            let copy_cells = copy_fields
                .iter()
                .enumerate()
                .map(|(field_index, field)| CopyCell {
                    field: field.clone(),
                    value: record.get(field).text_or_empty(),
                    field_index,
                    active: status == RowStatus::Current && field_index == snapshot.field_index,
                })
                .collect();

            RowView {
                index,
                label: format!("#{}", index + 1),
                status,
                principal,
                secondary,
                copy_cells,
                highlight: classify(record, rules).map(str::to_string),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_rules::{ColorRule, RuleOperator};
    use crate::config::{ArrayPath, ConfigPatch, SessionConfig};
    use crate::sequence::SequenceController;
    use serde_json::json;

    fn controller(values: Vec<serde_json::Value>, display: &[&str], copy: &[&str]) -> SequenceController {
        let config = SessionConfig::new(
            ArrayPath::default(),
            display.iter().map(|f| f.to_string()).collect(),
            copy.iter().map(|f| f.to_string()).collect(),
        );
        SequenceController::new(values.into_iter().map(Record::new).collect(), config)
    }

    #[test]
    fn test_row_status_and_labels() {
        let mut controller = controller(vec![json!({"a": 1}), json!({"a": 2}), json!({"a": 3})], &[], &["a"]);
        controller.step_record_forward();
        let rows = row_views(&controller.snapshot());
        let statuses: Vec<_> = rows.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![RowStatus::Past, RowStatus::Current, RowStatus::Future]);
        assert_eq!(rows[2].label, "#3");
    }

    #[test]
    fn test_display_fields_fall_back_to_first_three() {
        let controller = controller(vec![json!({"w": "1", "x": "2", "y": "3", "z": "4"})], &[], &[]);
        let rows = row_views(&controller.snapshot());
        assert_eq!(rows[0].principal, "1");
        assert_eq!(rows[0].secondary, vec!["2", "3"]);
    }

    #[test]
    fn test_secondary_skips_null_and_absent() {
        let controller = controller(
            vec![json!({"name": "Ann", "nick": null, "age": 30})],
            &["name", "nick", "missing", "age"],
            &[],
        );
        let rows = row_views(&controller.snapshot());
        assert_eq!(rows[0].principal, "Ann");
        assert_eq!(rows[0].secondary, vec!["30"]);
    }

    #[test]
    fn test_copy_cells_mark_active_field_on_current_row_only() {
        let mut controller = controller(
            vec![json!({"a": "a0", "b": "b0"}), json!({"a": "a1", "b": null})],
            &[],
            &["a", "b"],
        );
        controller.step_field_forward();
        let rows = row_views(&controller.snapshot());
        let active: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.copy_cells.iter().map(|c| c.active).collect())
            .collect();
        assert_eq!(active, vec![vec![false, true], vec![false, false]]);
        assert_eq!(rows[1].copy_cells[1].value, "");
    }

    #[test]
    fn test_highlight_follows_color_rules() {
        let mut controller = controller(vec![json!({"s": "late"}), json!({"s": "ok"})], &[], &[]);
        controller.update_configuration(ConfigPatch {
            color_rules: Some(vec![ColorRule::new("s", RuleOperator::Equals, "late", "#ff0000")]),
            ..Default::default()
        });
        let rows = row_views(&controller.snapshot());
        assert_eq!(rows[0].highlight.as_deref(), Some("#ff0000"));
        assert_eq!(rows[1].highlight, None);
    }

    #[test]
    fn test_empty_snapshot_has_no_rows() {
        let controller = controller(Vec::new(), &[], &["a"]);
        assert!(row_views(&controller.snapshot()).is_empty());
    }
}
