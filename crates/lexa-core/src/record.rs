use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// FieldName
// ---------------------------------------------------------------------------

/// One of the six text fields measured on every record.
///
/// The set is closed. `Ord` follows declaration order so that reports keyed
/// by field render in a stable, readable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Overall description from `description.first_section.description`.
    Description,
    Brushstroke,
    Color,
    Composition,
    LightAndShadow,
    LineQuality,
}

impl FieldName {
    /// All six fields, description first.
    pub const ALL: [FieldName; 6] = [
        FieldName::Description,
        FieldName::Brushstroke,
        FieldName::Color,
        FieldName::Composition,
        FieldName::LightAndShadow,
        FieldName::LineQuality,
    ];

    /// The five visual attributes stored under
    /// `description.second_section.visual_attributes`.
    pub const ATTRIBUTES: [FieldName; 5] = [
        FieldName::Brushstroke,
        FieldName::Color,
        FieldName::Composition,
        FieldName::LightAndShadow,
        FieldName::LineQuality,
    ];

    /// Key used for this field in the corpus JSON and in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Description => "description",
            FieldName::Brushstroke => "brushstroke",
            FieldName::Color => "color",
            FieldName::Composition => "composition",
            FieldName::LightAndShadow => "light_and_shadow",
            FieldName::LineQuality => "line_quality",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One corpus entry describing a single generated artwork.
///
/// The record keeps the raw JSON value: the metrics engine only reads a
/// handful of fixed paths and must tolerate any other shape around them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Annotation request identifier, when present and a string.
    pub fn request_id(&self) -> Option<&str> {
        self.0.get("request_id").and_then(Value::as_str)
    }

    /// Follow `path` through nested objects.
    ///
    /// On failure returns the index of the first segment that could not be
    /// resolved, either because the key is absent or because the value
    /// holding it is not an object.
    pub fn lookup(&self, path: &[&str]) -> Result<&Value, usize> {
        let mut current = &self.0;
        for (depth, key) in path.iter().enumerate() {
            current = current
                .as_object()
                .and_then(|map| map.get(*key))
                .ok_or(depth)?;
        }
        Ok(current)
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_names_serialize_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&FieldName::LightAndShadow).unwrap(),
            "\"light_and_shadow\""
        );
        assert_eq!(
            serde_json::to_string(&FieldName::Description).unwrap(),
            "\"description\""
        );
    }

    #[test]
    fn attributes_exclude_description() {
        assert!(!FieldName::ATTRIBUTES.contains(&FieldName::Description));
        assert_eq!(FieldName::ALL.len(), FieldName::ATTRIBUTES.len() + 1);
    }

    #[test]
    fn lookup_follows_nested_objects() {
        let record = Record::new(json!({
            "description": { "first_section": { "description": "calm sea" } }
        }));
        let value = record
            .lookup(&["description", "first_section", "description"])
            .unwrap();
        assert_eq!(value, &json!("calm sea"));
    }

    #[test]
    fn lookup_reports_first_missing_segment() {
        let record = Record::new(json!({ "description": { "second_section": {} } }));
        assert_eq!(
            record.lookup(&["description", "first_section", "description"]),
            Err(1)
        );
    }

    #[test]
    fn lookup_through_non_object_fails_at_that_segment() {
        let record = Record::new(json!({ "description": "flat string" }));
        assert_eq!(record.lookup(&["description", "first_section"]), Err(1));
    }

    #[test]
    fn metadata_accessors() {
        let record = Record::new(json!({
            "request_id": "req-7",
            "image_path": "img/7.png"
        }));
        assert_eq!(record.request_id(), Some("req-7"));
        assert_eq!(Record::new(json!({})).request_id(), None);
    }
}
