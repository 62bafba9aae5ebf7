//! Row highlighting rules
//!
//! Rules are evaluated in order and the first match decides the color of a
//! record's index badge.

use serde::{Deserialize, Serialize};

use crate::constants::rules::DEFAULT_COLOR;
use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RuleOperator {
    #[default]
    #[serde(rename = "==", alias = "equals")]
    Equals,
    #[serde(rename = "!=", alias = "notEquals", alias = "not_equals")]
    NotEquals,
    #[serde(rename = "contains")]
    Contains,
}

impl RuleOperator {
    pub const ALL: [RuleOperator; 3] = [
        RuleOperator::Equals,
        RuleOperator::NotEquals,
        RuleOperator::Contains,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RuleOperator::Equals => "=",
            RuleOperator::NotEquals => "\u{2260}",
            RuleOperator::Contains => "has",
        }
    }

    /// Compare a record's text against the rule's value.
    ///
    /// `Equals` accepts an exact or a case-insensitive match; `NotEquals`
    /// requires both comparisons to disagree.
    fn matches(&self, actual: &str, expected: &str) -> bool {
        let actual_lower = actual.to_lowercase();
        let expected_lower = expected.to_lowercase();
        match self {
            RuleOperator::Equals => actual == expected || actual_lower == expected_lower,
            RuleOperator::NotEquals => actual != expected && actual_lower != expected_lower,
            RuleOperator::Contains => actual_lower.contains(&expected_lower),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRule {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub operator: RuleOperator,
    #[serde(default, deserialize_with = "deserialize_rule_value")]
    pub value: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Accept scalar rule values written as numbers or booleans
fn deserialize_rule_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
        Bool(bool),
        Null(()),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Number(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Null(()) => String::new(),
    })
}

impl ColorRule {
    pub fn new(field: &str, operator: RuleOperator, value: &str, color: &str) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value: value.to_string(),
            color: color.to_string(),
        }
    }

    /// Rules missing a field or a value never match and are dropped on save
    pub fn is_complete(&self) -> bool {
        !self.field.is_empty() && !self.value.is_empty()
    }

    fn matches(&self, record: &Record) -> bool {
        let actual = record.get(&self.field).text_or_empty();
        self.operator.matches(&actual, &self.value)
    }
}

/// Color of the first rule matching `record`, if any
pub fn classify<'r>(record: &Record, rules: &'r [ColorRule]) -> Option<&'r str> {
    rules
        .iter()
        .filter(|rule| rule.is_complete())
        .find(|rule| rule.matches(record))
        .map(|rule| rule.color.as_str())
}
