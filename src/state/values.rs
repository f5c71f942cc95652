//! Answer values keyed by question

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored answer: a single string, or a list for multi-choice fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Empty string and empty list both count as "no answer"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// All answers of one questionnaire session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Text answer of a field, if it holds one
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    /// Selected options of a multi-choice field (empty when unanswered)
    pub fn list(&self, key: &str) -> &[String] {
        self.get(key).and_then(FieldValue::as_list).unwrap_or(&[])
    }

    /// True when the field is missing or holds an empty value
    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).map_or(true, FieldValue::is_empty)
    }

    /// Check or uncheck an option of a multi-choice field.
    ///
    /// Checking appends, unchecking filters, so the stored order is the order
    /// in which options were picked rather than the schema order.
    pub fn toggle_option(&mut self, key: &str, option: &str) {
        let mut selected = self.list(key).to_vec();
        if selected.iter().any(|v| v == option) {
            selected.retain(|v| v != option);
        } else {
            selected.push(option.to_string());
        }
        self.set(key, FieldValue::List(selected));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
