//! Corpus loading.
//!
//! A corpus file holds either a JSON array of records or a single bare
//! record object; the latter is treated as a one-element corpus. The whole
//! file is read into memory once and never mutated afterwards.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{LexaError, Result};
use crate::hash::corpus_digest;
use crate::record::Record;

/// Read-only, ordered collection of records for one pipeline run.
#[derive(Debug, Clone)]
pub struct Corpus {
    source: Option<PathBuf>,
    digest: String,
    records: Vec<Record>,
}

impl Corpus {
    /// Read and parse the corpus file at `path`.
    ///
    /// A missing file maps to [`LexaError::CorpusNotFound`] so callers can
    /// report it distinctly from other I/O failures.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LexaError::CorpusNotFound {
                path: path.to_path_buf(),
            },
            _ => LexaError::Io(e),
        })?;

        let mut corpus = Self::from_slice(&raw, &path.display().to_string())?;
        corpus.source = Some(path.to_path_buf());
        debug!(
            path = %path.display(),
            records = corpus.len(),
            bytes = raw.len(),
            "corpus loaded"
        );
        Ok(corpus)
    }

    /// Parse a corpus held in memory.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_slice(json.as_bytes(), "<inline corpus>")
    }

    /// Build a corpus from already-parsed records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let digest = serde_json::to_vec(&records)
            .map(|bytes| corpus_digest(&bytes))
            .unwrap_or_default();
        Self {
            source: None,
            digest,
            records,
        }
    }

    fn from_slice(raw: &[u8], origin: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(raw).map_err(|source| LexaError::MalformedJson {
                origin: origin.to_string(),
                source,
            })?;

        let records = match value {
            Value::Array(items) => items.into_iter().map(Record::new).collect(),
            object @ Value::Object(_) => vec![Record::new(object)],
            other => {
                return Err(LexaError::InvalidCorpus(format!(
                    "{} must hold a JSON object or array, found {}",
                    origin,
                    json_kind(&other)
                )))
            }
        };

        Ok(Self {
            source: None,
            digest: corpus_digest(raw),
            records,
        })
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// SHA-256 hex digest of the bytes this corpus was parsed from.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
