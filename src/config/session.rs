//! Per-load configuration: which array to step through and which fields to
//! show, copy and highlight.
//!
//! Lives only as long as the loaded document; nothing here is written to disk.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color_rules::{ColorRule, RuleOperator};
use crate::constants::document::{DEFAULT_ARRAY_PATH, ROOT_SENTINEL};
use crate::constants::rules::DEFAULT_COLOR;

/// Location of the record array inside a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArrayPath {
    /// The document itself is the array
    Root,
    Key(String),
}

impl ArrayPath {
    pub fn label(&self) -> &str {
        match self {
            ArrayPath::Root => "(root)",
            ArrayPath::Key(key) => key,
        }
    }
}

impl Default for ArrayPath {
    fn default() -> Self {
        ArrayPath::Key(DEFAULT_ARRAY_PATH.to_string())
    }
}

impl From<String> for ArrayPath {
    fn from(raw: String) -> Self {
        if raw == ROOT_SENTINEL {
            ArrayPath::Root
        } else {
            ArrayPath::Key(raw)
        }
    }
}

impl From<ArrayPath> for String {
    fn from(path: ArrayPath) -> Self {
        match path {
            ArrayPath::Root => ROOT_SENTINEL.to_string(),
            ArrayPath::Key(key) => key,
        }
    }
}

/// Resolved configuration for one loaded record set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub array_path: ArrayPath,

    /// Fields shown per row; empty means the record's first three fields
    #[serde(default)]
    pub display_fields: Vec<String>,

    /// Ordered copy sequence; `None` falls back to `copy_field`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_fields: Option<Vec<String>>,

    /// Legacy single copy field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy_field: Option<String>,

    #[serde(default)]
    pub auto_advance: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_rules: Option<Vec<ColorRule>>,

    // Legacy single-rule keys, folded into `color_rules` by `normalize`
    #[serde(default, skip_serializing)]
    color_field: Option<String>,
    #[serde(default, skip_serializing)]
    color_operator: Option<RuleOperator>,
    #[serde(default, skip_serializing)]
    color_value: Option<String>,
    #[serde(default, skip_serializing)]
    color_hex: Option<String>,
}

impl SessionConfig {
    pub fn new(array_path: ArrayPath, display_fields: Vec<String>, copy_fields: Vec<String>) -> Self {
        Self {
            array_path,
            display_fields,
            copy_field: copy_fields.first().cloned(),
            copy_fields: Some(copy_fields),
            color_rules: Some(Vec::new()),
            ..Default::default()
        }
    }

    /// Bring legacy single-field and single-rule settings into the
    /// multi-field form
    pub fn normalize(mut self) -> Self {
        if self.copy_fields.is_none() {
            if let Some(field) = &self.copy_field {
                debug!(field = %field, "Expanding legacy copy_field into copy_fields");
                self.copy_fields = Some(vec![field.clone()]);
            }
        }

        if self.color_rules.is_none() {
            if let Some(field) = self.color_field.take() {
                debug!(field = %field, "Expanding legacy color rule into color_rules");
                self.color_rules = Some(vec![ColorRule {
                    field,
                    operator: self.color_operator.take().unwrap_or_default(),
                    value: self.color_value.take().unwrap_or_default(),
                    color: self
                        .color_hex
                        .take()
                        .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                }]);
            }
        }
        self.color_field = None;
        self.color_operator = None;
        self.color_value = None;
        self.color_hex = None;
        self
    }

    /// The copy sequence in effect: `copy_fields` if set, otherwise the
    /// legacy `copy_field`, otherwise nothing
    pub fn copy_fields(&self) -> &[String] {
        match (&self.copy_fields, &self.copy_field) {
            (Some(fields), _) => fields,
            (None, Some(field)) => std::slice::from_ref(field),
            (None, None) => &[],
        }
    }

    pub fn color_rules(&self) -> &[ColorRule] {
        self.color_rules.as_deref().unwrap_or(&[])
    }

    /// Apply a patch; every key present in the patch replaces the current
    /// value wholesale. Returns true when the copy sequence was replaced.
    pub fn apply(&mut self, patch: ConfigPatch) -> bool {
        let ConfigPatch {
            array_path,
            display_fields,
            copy_fields,
            copy_field,
            auto_advance,
            color_rules,
        } = patch;

        if let Some(array_path) = array_path {
            self.array_path = array_path;
        }
        if let Some(display_fields) = display_fields {
            self.display_fields = display_fields;
        }
        if let Some(copy_field) = copy_field {
            self.copy_field = Some(copy_field);
        }
        if let Some(auto_advance) = auto_advance {
            self.auto_advance = auto_advance;
        }
        if let Some(color_rules) = color_rules {
            self.color_rules = Some(color_rules);
        }

        let copy_fields_replaced = copy_fields.is_some();
        if let Some(copy_fields) = copy_fields {
            self.copy_fields = Some(copy_fields);
        }
        copy_fields_replaced
    }
}

/// Shallow configuration update. `None` leaves a key untouched; `Some`
/// replaces it entirely (lists are never merged element-wise).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigPatch {
    /// Only the stored path changes; records are not reloaded
    #[serde(default)]
    pub array_path: Option<ArrayPath>,
    #[serde(default)]
    pub display_fields: Option<Vec<String>>,
    /// Replacing the copy sequence restarts it at the first field
    #[serde(default)]
    pub copy_fields: Option<Vec<String>>,
    #[serde(default)]
    pub copy_field: Option<String>,
    #[serde(default)]
    pub auto_advance: Option<bool>,
    #[serde(default)]
    pub color_rules: Option<Vec<ColorRule>>,
}
