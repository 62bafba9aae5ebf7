//! Turns an arbitrary JSON document into a record set plus configuration.
//!
//! Documents carrying an embedded configuration resolve directly. Anything
//! else is scanned for arrays of objects which the user then picks from.

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::{ArrayPath, SessionConfig};
use crate::constants::document::{CONFIG_KEY, CONFIG_KEY_ALT};
use crate::error::{LoadError, Result};
use crate::record::{records_from, Record};

/// An array the user may choose to step through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayCandidate {
    pub key: ArrayPath,
    pub count: usize,
    /// Field names of the first element, in document order
    pub fields: Vec<String>,
}

/// The user's answer to the array picker
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSelection {
    pub array_path: ArrayPath,
    pub display_fields: Vec<String>,
    pub copy_fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Ready to hand to the sequence controller
    Ready {
        config: SessionConfig,
        records: Vec<Record>,
    },
    /// No embedded configuration; the caller must keep the document and ask
    /// the user to pick one of these arrays
    NeedsSelection { candidates: Vec<ArrayCandidate> },
}

impl Resolution {
    pub fn needs_user_input(&self) -> bool {
        matches!(self, Resolution::NeedsSelection { .. })
    }
}

/// Parse raw JSON text (file contents, pasted text or clipboard)
pub fn parse_document(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Err(LoadError::EmptyInput);
    }
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a JSON file
pub fn load_path(path: &Path) -> Result<Value> {
    info!(path = %path.display(), "Loading JSON file");
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

pub fn resolve(document: &Value) -> Result<Resolution> {
    if let Some(embedded) = embedded_config(document) {
        let config: SessionConfig = serde_json::from_value(embedded.clone())
            .map_err(|e| LoadError::InvalidConfig(e.to_string()))?;
        let config = config.normalize();
        let records = records_from(lookup_array(document, &config.array_path));
        info!(
            array_path = %config.array_path.label(),
            records = records.len(),
            copy_fields = ?config.copy_fields(),
            "Resolved document with embedded configuration"
        );
        return Ok(Resolution::Ready { config, records });
    }

    let candidates = find_candidates(document);
    if candidates.is_empty() {
        warn!("Document has no embedded configuration and no usable array");
        return Err(LoadError::NoArrayFound);
    }
    debug!(count = candidates.len(), "Document needs array selection");
    Ok(Resolution::NeedsSelection { candidates })
}

/// Build the configuration for an array chosen by the user
pub fn apply_user_selection(
    document: &Value,
    candidates: &[ArrayCandidate],
    selection: UserSelection,
) -> Result<Resolution> {
    if !candidates.iter().any(|c| c.key == selection.array_path) {
        return Err(LoadError::NoArrayFound);
    }

    let config = SessionConfig::new(
        selection.array_path,
        selection.display_fields,
        selection.copy_fields,
    );
    let records = records_from(lookup_array(document, &config.array_path));
    info!(
        array_path = %config.array_path.label(),
        records = records.len(),
        copy_fields = ?config.copy_fields(),
        "Applied user array selection"
    );
    Ok(Resolution::Ready { config, records })
}

fn embedded_config(document: &Value) -> Option<&Value> {
    let object = document.as_object()?;
    object
        .get(CONFIG_KEY)
        .filter(|v| v.is_object())
        .or_else(|| object.get(CONFIG_KEY_ALT).filter(|v| v.is_object()))
}

fn lookup_array<'a>(document: &'a Value, path: &ArrayPath) -> Option<&'a Value> {
    match path {
        ArrayPath::Root => document.is_array().then_some(document),
        ArrayPath::Key(key) => document.as_object().and_then(|map| map.get(key)),
    }
}

fn candidate_for(key: ArrayPath, value: &Value) -> Option<ArrayCandidate> {
    let items = value.as_array()?;
    let first = items.first()?.as_object()?;
    Some(ArrayCandidate {
        key,
        count: items.len(),
        fields: first.keys().cloned().collect(),
    })
}

fn find_candidates(document: &Value) -> Vec<ArrayCandidate> {
    let mut candidates = Vec::new();

    if let Some(map) = document.as_object() {
        for (key, value) in map {
            if key == CONFIG_KEY || key == CONFIG_KEY_ALT {
                continue;
            }
            if let Some(candidate) = candidate_for(ArrayPath::Key(key.clone()), value) {
                candidates.push(candidate);
            }
        }
    }

    if let Some(candidate) = candidate_for(ArrayPath::Root, document) {
        candidates.push(candidate);
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ready(resolution: Resolution) -> (SessionConfig, Vec<Record>) {
        match resolution {
            Resolution::Ready { config, records } => (config, records),
            other => panic!("expected ready resolution, got {other:?}"),
        }
    }

    fn candidates(resolution: Resolution) -> Vec<ArrayCandidate> {
        match resolution {
            Resolution::NeedsSelection { candidates } => candidates,
            other => panic!("expected selection, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(parse_document(""), Err(LoadError::EmptyInput)));
        assert!(matches!(parse_document("  \n\t"), Err(LoadError::EmptyInput)));
    }

    #[test]
    fn test_parse_malformed_json() {
        match parse_document("{\"a\": ") {
            Err(LoadError::Parse(message)) => assert!(!message.is_empty()),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_embedded_config_with_legacy_copy_field() {
        let doc = json!({"items": [{"a": 1}], "@copyloto": {"copy_field": "a"}});
        let resolution = resolve(&doc).unwrap();
        assert!(!resolution.needs_user_input());
        let (config, records) = ready(resolution);
        assert_eq!(records.len(), 1);
        assert_eq!(config.copy_fields(), ["a"]);
    }

    #[test]
    fn test_alternate_config_key_and_array_path() {
        let doc = json!({
            "rows": [{"id": 1}, {"id": 2}],
            "copyloto_config": {"array_path": "rows", "copy_fields": ["id"]}
        });
        let (config, records) = ready(resolve(&doc).unwrap());
        assert_eq!(config.array_path, ArrayPath::Key("rows".to_string()));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_primary_config_key_wins() {
        let doc = json!({
            "items": [{"a": 1}],
            "@copyloto": {"copy_fields": ["a"]},
            "copyloto_config": {"copy_fields": ["b"]}
        });
        let (config, _) = ready(resolve(&doc).unwrap());
        assert_eq!(config.copy_fields(), ["a"]);
    }

    #[test]
    fn test_embedded_config_missing_array_yields_empty_records() {
        let doc = json!({"@copyloto": {"array_path": "nowhere"}, "items": [{"a": 1}]});
        let (_, records) = ready(resolve(&doc).unwrap());
        assert!(records.is_empty());

        let doc = json!({"@copyloto": {}, "items": "not an array"});
        let (_, records) = ready(resolve(&doc).unwrap());
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_embedded_config() {
        let doc = json!({"@copyloto": {"copy_fields": "a"}, "items": []});
        assert!(matches!(resolve(&doc), Err(LoadError::InvalidConfig(_))));
    }

    #[test]
    fn test_candidates_without_config() {
        let doc = json!({"foo": [{"x": 1}, {"x": 2}]});
        let resolution = resolve(&doc).unwrap();
        assert!(resolution.needs_user_input());
        assert_eq!(
            candidates(resolution),
            vec![ArrayCandidate {
                key: ArrayPath::Key("foo".to_string()),
                count: 2,
                fields: vec!["x".to_string()],
            }]
        );
    }

    #[test]
    fn test_candidates_skip_empty_and_scalar_arrays() {
        let doc = json!({
            "empty": [],
            "numbers": [1, 2, 3],
            "name": "value",
            "people": [{"name": "a", "age": 3}]
        });
        let found = candidates(resolve(&doc).unwrap());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, ArrayPath::Key("people".to_string()));
        assert_eq!(found[0].fields, vec!["name", "age"]);
    }

    #[test]
    fn test_root_array_candidate() {
        let doc = json!([{"id": 1}, {"id": 2}, {"id": 3}]);
        let found = candidates(resolve(&doc).unwrap());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, ArrayPath::Root);
        assert_eq!(found[0].count, 3);
    }

    #[test]
    fn test_no_usable_array() {
        assert!(matches!(resolve(&json!({"a": 1})), Err(LoadError::NoArrayFound)));
        assert!(matches!(resolve(&json!([])), Err(LoadError::NoArrayFound)));
    }

    #[test]
    fn test_apply_user_selection() {
        let doc = json!({"foo": [{"x": 1, "y": 2}, {"x": 3, "y": 4}], "bar": [{"z": 0}]});
        let found = candidates(resolve(&doc).unwrap());
        let selection = UserSelection {
            array_path: ArrayPath::Key("foo".to_string()),
            display_fields: vec!["y".to_string()],
            copy_fields: vec!["y".to_string(), "x".to_string()],
        };
        let (config, records) = ready(apply_user_selection(&doc, &found, selection).unwrap());
        assert_eq!(records.len(), 2);
        assert_eq!(config.display_fields, vec!["y"]);
        assert_eq!(config.copy_fields(), ["y", "x"]);
        assert_eq!(config.copy_field.as_deref(), Some("y"));
        assert!(!config.auto_advance);
        assert!(config.color_rules().is_empty());
    }

    #[test]
    fn test_apply_user_selection_root() {
        let doc = json!([{"id": 7}]);
        let found = candidates(resolve(&doc).unwrap());
        let selection = UserSelection {
            array_path: ArrayPath::Root,
            display_fields: vec![],
            copy_fields: vec!["id".to_string()],
        };
        let (config, records) = ready(apply_user_selection(&doc, &found, selection).unwrap());
        assert_eq!(config.array_path, ArrayPath::Root);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_apply_user_selection_without_copy_fields() {
        let doc = json!({"foo": [{"x": 1, "y": 2}]});
        let found = candidates(resolve(&doc).unwrap());
        let selection = UserSelection {
            array_path: ArrayPath::Key("foo".to_string()),
            display_fields: vec!["x".to_string()],
            copy_fields: vec![],
        };
        let (config, _) = ready(apply_user_selection(&doc, &found, selection).unwrap());
        assert_eq!(config.copy_field, None);
        assert!(config.copy_fields().is_empty());
    }

    #[test]
    fn test_apply_user_selection_unknown_key() {
        let doc = json!({"foo": [{"x": 1}]});
        let found = candidates(resolve(&doc).unwrap());
        let selection = UserSelection {
            array_path: ArrayPath::Key("bar".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            apply_user_selection(&doc, &found, selection),
            Err(LoadError::NoArrayFound)
        ));
    }

    #[test]
    fn test_load_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"items": [{"a": 1}], "@copyloto": {"copy_field": "a"}}"#).unwrap();
        let doc = load_path(&path).unwrap();
        assert!(!resolve(&doc).unwrap().needs_user_input());

        assert!(matches!(
            load_path(&dir.path().join("missing.json")),
            Err(LoadError::Io(_))
        ));
    }
}
