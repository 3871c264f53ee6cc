//! Schema-aware field extraction.
//!
//! The policy is deliberately asymmetric:
//!
//! - `description` is required at `description.first_section.description`.
//!   If any segment is absent the whole record is skipped.
//! - The visual attributes live under
//!   `description.second_section.visual_attributes`. That mapping is
//!   required too (record skipped when absent), but an individual attribute
//!   key missing inside it defaults to the empty text.
//!
//! Extraction completes before anything is measured, so a skipped record
//! never contributes to any field.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use lexa_core::{FieldName, Record};

/// Location of the overall description text.
pub const DESCRIPTION_PATH: [&str; 3] = ["description", "first_section", "description"];

/// Location of the visual attribute mapping.
pub const ATTRIBUTES_PATH: [&str; 3] = ["description", "second_section", "visual_attributes"];

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Why a record was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// A required key is absent. `path` is the dotted path up to and
    /// including the first missing key.
    Absent { path: String },
    /// A required key is present but holds the wrong JSON type.
    WrongType { path: String, expected: String },
}

impl SkipReason {
    pub fn path(&self) -> &str {
        match self {
            SkipReason::Absent { path } | SkipReason::WrongType { path, .. } => path,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Absent { path } => write!(f, "missing field `{}`", path),
            SkipReason::WrongType { path, expected } => {
                write!(f, "field `{}` is not {}", path, expected)
            }
        }
    }
}

/// The six texts of one record, in [`FieldName::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTexts<'a> {
    texts: [(FieldName, &'a str); 6],
}

impl<'a> FieldTexts<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &'a str)> + '_ {
        self.texts.iter().copied()
    }

    pub fn get(&self, field: FieldName) -> &'a str {
        self.texts
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, text)| *text)
            .unwrap_or_default()
    }
}

/// Outcome of extracting one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<'a> {
    Fields(FieldTexts<'a>),
    Skip(SkipReason),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Extract the six field texts from `record`, or the reason to skip it.
pub fn extract_fields(record: &Record) -> Extraction<'_> {
    let description = match required(record, &DESCRIPTION_PATH) {
        Ok(value) => match value.as_str() {
            Some(text) => text,
            None => return Extraction::Skip(wrong_type(&DESCRIPTION_PATH, "a string")),
        },
        Err(reason) => return Extraction::Skip(reason),
    };

    let attributes = match required(record, &ATTRIBUTES_PATH) {
        Ok(value) => match value.as_object() {
            Some(map) => map,
            None => return Extraction::Skip(wrong_type(&ATTRIBUTES_PATH, "an object")),
        },
        Err(reason) => return Extraction::Skip(reason),
    };

    Extraction::Fields(FieldTexts {
        texts: [
            (FieldName::Description, description),
            (FieldName::Brushstroke, attribute_text(attributes, FieldName::Brushstroke)),
            (FieldName::Color, attribute_text(attributes, FieldName::Color)),
            (FieldName::Composition, attribute_text(attributes, FieldName::Composition)),
            (FieldName::LightAndShadow, attribute_text(attributes, FieldName::LightAndShadow)),
            (FieldName::LineQuality, attribute_text(attributes, FieldName::LineQuality)),
        ],
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn required<'r>(record: &'r Record, path: &[&str]) -> Result<&'r Value, SkipReason> {
    record.lookup(path).map_err(|depth| SkipReason::Absent {
        path: path[..=depth].join("."),
    })
}

/// Attribute text, or the empty string when absent or not a string.
fn attribute_text(attributes: &Map<String, Value>, field: FieldName) -> &str {
    attributes
        .get(field.as_str())
        .and_then(Value::as_str)
        .unwrap_or("")
}

fn wrong_type(path: &[&str], expected: &str) -> SkipReason {
    SkipReason::WrongType {
        path: path.join("."),
        expected: expected.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
