//! Copy-sequence state machine
//!
//! Owns the loaded records, their configuration and the current position
//! (record index, field index within the copy sequence). Every operation runs
//! to completion synchronously and hands back a [`Snapshot`] for rendering.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clipboard::ClipboardSink;
use crate::config::{ConfigPatch, SessionConfig};
use crate::error::{LoadError, Result};
use crate::record::Record;

/// Position in the record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SequenceState {
    pub record_index: usize,
    pub field_index: usize,
}

impl SequenceState {
    pub fn new(record_index: usize, field_index: usize) -> Self {
        Self {
            record_index,
            field_index,
        }
    }
}

/// Render state handed to the presentation layer after every operation
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub record_index: usize,
    pub field_index: usize,
    pub total: usize,
    pub records: &'a [Record],
    pub config: &'a SessionConfig,
}

/// What a copy request did to the clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(String),
    /// No records, no copy fields, or the value is null/absent
    NothingToCopy,
    /// The clipboard refused the write; already logged
    Failed,
}

/// Value shown in the copy indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewValue {
    pub field: String,
    pub value: String,
}

/// What is copied now and what the next advance will copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPreview {
    pub current: PreviewValue,
    /// 1-based position in the copy sequence
    pub position: usize,
    pub count: usize,
    pub next: Option<PreviewValue>,
}

#[derive(Debug, Default)]
pub struct SequenceController {
    records: Vec<Record>,
    config: SessionConfig,
    state: SequenceState,
}

impl SequenceController {
    pub fn new(records: Vec<Record>, config: SessionConfig) -> Self {
        Self {
            records,
            config,
            state: SequenceState::default(),
        }
    }

    /// Replace records and configuration together and restart at (0, 0)
    pub fn load(&mut self, records: Vec<Record>, config: SessionConfig) -> Snapshot<'_> {
        info!(records = records.len(), copy_fields = ?config.copy_fields(), "Loaded record set");
        self.records = records;
        self.config = config;
        self.state = SequenceState::default();
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            record_index: self.state.record_index,
            field_index: self.state.field_index,
            total: self.records.len(),
            records: &self.records,
            config: &self.config,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn current_record(&self) -> Option<&Record> {
        self.records.get(self.state.record_index)
    }

    fn copy_fields(&self) -> &[String] {
        self.config.copy_fields()
    }

    fn has_next_record(&self) -> bool {
        self.state.record_index + 1 < self.records.len()
    }

    /// Field currently selected, falling back to the first copy field when
    /// the index points past the sequence
    fn current_field(&self) -> Option<&str> {
        let fields = self.copy_fields();
        fields
            .get(self.state.field_index)
            .or_else(|| fields.first())
            .map(String::as_str)
    }

    pub fn step_record_forward(&mut self) -> Snapshot<'_> {
        if self.has_next_record() {
            self.state = SequenceState::new(self.state.record_index + 1, 0);
            debug!(record = self.state.record_index, "Stepped to next record");
        }
        self.snapshot()
    }

    pub fn step_record_backward(&mut self) -> Snapshot<'_> {
        if self.state.record_index > 0 && !self.records.is_empty() {
            self.state = SequenceState::new(self.state.record_index - 1, 0);
            debug!(record = self.state.record_index, "Stepped to previous record");
        }
        self.snapshot()
    }

    /// Next copy field, rolling over to the first field of the next record
    pub fn step_field_forward(&mut self) -> Snapshot<'_> {
        let field_count = self.copy_fields().len();
        if self.records.is_empty() {
            return self.snapshot();
        }
        if self.state.field_index + 1 < field_count {
            self.state.field_index += 1;
            debug!(field = self.state.field_index, "Stepped to next field");
        } else if self.has_next_record() {
            self.state = SequenceState::new(self.state.record_index + 1, 0);
            debug!(record = self.state.record_index, "Stepped past last field to next record");
        }
        self.snapshot()
    }

    /// Previous copy field, rolling back to the last field of the previous
    /// record
    pub fn step_field_backward(&mut self) -> Snapshot<'_> {
        let field_count = self.copy_fields().len();
        if self.records.is_empty() {
            return self.snapshot();
        }
        if self.state.field_index > 0 {
            self.state.field_index -= 1;
            debug!(field = self.state.field_index, "Stepped to previous field");
        } else if self.state.record_index > 0 {
            let last_field = field_count.saturating_sub(1);
            self.state = SequenceState::new(self.state.record_index - 1, last_field);
            debug!(record = self.state.record_index, field = last_field, "Stepped back to previous record");
        }
        self.snapshot()
    }

    /// The primary advance action.
    ///
    /// With a single copy field this moves to the next record. With several
    /// it walks the fields and, after the last one, wraps to field 0 of the
    /// next record. On the last record the field index still wraps.
    pub fn advance_copy_sequence(&mut self) -> Snapshot<'_> {
        let field_count = self.copy_fields().len();
        if self.records.is_empty() {
            return self.snapshot();
        }

        if field_count <= 1 {
            if self.has_next_record() {
                self.state = SequenceState::new(self.state.record_index + 1, 0);
            }
        } else {
            self.state.field_index += 1;
            if self.state.field_index >= field_count {
                self.state.field_index = 0;
                if self.has_next_record() {
                    self.state.record_index += 1;
                }
            }
        }
        debug!(record = self.state.record_index, field = self.state.field_index, "Advanced copy sequence");
        self.snapshot()
    }

    /// Write the current value to the clipboard. Null or absent values and
    /// an empty copy sequence leave the clipboard untouched.
    pub fn copy_current_value(&self, clipboard: &mut dyn ClipboardSink) -> (CopyOutcome, Snapshot<'_>) {
        let outcome = match (self.current_record(), self.current_field()) {
            (Some(record), Some(field)) => match record.get(field).text() {
                Some(text) => match clipboard.set_text(&text) {
                    Ok(()) => {
                        debug!(field = %field, record = self.state.record_index, "Copied value");
                        CopyOutcome::Copied(text)
                    }
                    Err(e) => {
                        warn!(error = ?e, field = %field, "Clipboard write failed");
                        CopyOutcome::Failed
                    }
                },
                None => {
                    debug!(field = %field, record = self.state.record_index, "Value is null or absent, skipping copy");
                    CopyOutcome::NothingToCopy
                }
            },
            _ => CopyOutcome::NothingToCopy,
        };
        (outcome, self.snapshot())
    }

    /// Jump to a record and copy its first field
    pub fn set_record_index(
        &mut self,
        index: usize,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<(CopyOutcome, Snapshot<'_>)> {
        if index >= self.records.len() {
            return Err(LoadError::IndexOutOfRange {
                index,
                total: self.records.len(),
            });
        }
        self.state = SequenceState::new(index, 0);
        debug!(record = index, "Selected record");
        Ok(self.copy_current_value(clipboard))
    }

    /// Jump to a field of the current record's copy sequence and copy it
    pub fn set_field_index(
        &mut self,
        index: usize,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<(CopyOutcome, Snapshot<'_>)> {
        let field_count = self.copy_fields().len();
        if index >= field_count || self.records.is_empty() {
            return Err(LoadError::IndexOutOfRange {
                index,
                total: field_count,
            });
        }
        self.state.field_index = index;
        debug!(field = index, "Selected copy field");
        Ok(self.copy_current_value(clipboard))
    }

    pub fn reset_field_sequence(&mut self) -> Snapshot<'_> {
        self.state.field_index = 0;
        self.snapshot()
    }

    /// Shallow configuration update; replacing the copy sequence restarts it
    pub fn update_configuration(&mut self, patch: ConfigPatch) -> Snapshot<'_> {
        if self.config.apply(patch) {
            self.state.field_index = 0;
        }
        info!(copy_fields = ?self.config.copy_fields(), display_fields = ?self.config.display_fields, "Configuration updated");
        self.snapshot()
    }

    /// Current and upcoming values for the copy indicator
    pub fn copy_preview(&self) -> Option<CopyPreview> {
        let fields = self.copy_fields();
        let record = self.current_record()?;
        let field = self.current_field()?;

        let next_field_index = self.state.field_index + 1;
        let next = if next_field_index < fields.len() {
            let next_field = &fields[next_field_index];
            record.get(next_field).text().map(|value| PreviewValue {
                field: next_field.clone(),
                value,
            })
        } else if let Some(next_record) = self.records.get(self.state.record_index + 1) {
            next_record.get(&fields[0]).text().map(|value| PreviewValue {
                field: fields[0].clone(),
                value,
            })
        } else {
            None
        };

        Some(CopyPreview {
            current: PreviewValue {
                field: field.to_string(),
                value: record.get(field).text_or_empty(),
            },
            position: self.state.field_index + 1,
            count: fields.len(),
            next,
        })
    }
}
