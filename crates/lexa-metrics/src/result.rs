//! Report types — the structured output of a metrics run.
//!
//! Every type here serializes to JSON; the CLI and the FFI layer hand these
//! out unchanged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexa_core::{FieldName, LexaError};

use crate::calculator::MetricKind;
use crate::entropy::EntropyProfile;
use crate::extract::SkipReason;
use crate::mtld::MtldScore;
use crate::ttr::TypeTokenCounts;

// ---------------------------------------------------------------------------
// FieldSummary / FieldReport
// ---------------------------------------------------------------------------

/// Mean of one field's accumulator together with how many records fed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary<T> {
    /// Arithmetic mean over `samples` values; the zero value when
    /// `samples == 0`.
    pub mean: T,
    pub samples: usize,
}

/// Per-field statistics for one metric.
///
/// A report produced by a completed scan holds all six fields. Only the
/// failure path of a run (corpus unreadable) produces an empty report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldReport<T> {
    fields: BTreeMap<FieldName, FieldSummary<T>>,
}

impl<T: Copy> FieldReport<T> {
    pub fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, field: FieldName, summary: FieldSummary<T>) {
        self.fields.insert(field, summary);
    }

    pub fn get(&self, field: FieldName) -> Option<&FieldSummary<T>> {
        self.fields.get(&field)
    }

    /// Mean for `field`, or `None` if the report does not contain it.
    pub fn mean(&self, field: FieldName) -> Option<T> {
        self.fields.get(&field).map(|s| s.mean)
    }

    /// Number of values that contributed to `field`'s mean.
    pub fn samples(&self, field: FieldName) -> usize {
        self.fields.get(&field).map_or(0, |s| s.samples)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &FieldSummary<T>)> + '_ {
        self.fields.iter().map(|(field, summary)| (*field, summary))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SkippedRecord
// ---------------------------------------------------------------------------

/// A record that contributed to no accumulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Zero-based position in the corpus.
    pub index: usize,
    pub request_id: Option<String>,
    pub reason: SkipReason,
}

// ---------------------------------------------------------------------------
// CorpusFailure
// ---------------------------------------------------------------------------

/// Category of a corpus-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    NotFound,
    Io,
    MalformedJson,
    InvalidCorpus,
}

/// A corpus that could not be read, reported instead of propagated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl CorpusFailure {
    /// Classify a corpus loading error. Returns `None` for errors that are
    /// not about the corpus itself (configuration problems).
    pub fn from_error(err: &LexaError) -> Option<Self> {
        let kind = match err {
            LexaError::CorpusNotFound { .. } => FailureKind::NotFound,
            LexaError::Io(_) => FailureKind::Io,
            LexaError::MalformedJson { .. } => FailureKind::MalformedJson,
            LexaError::InvalidCorpus(_) => FailureKind::InvalidCorpus,
            LexaError::InvalidConfig(_) => return None,
        };
        Some(Self {
            kind,
            message: err.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// CorpusReport
// ---------------------------------------------------------------------------

/// The top-level output of a single metrics run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusReport {
    /// Unique identifier for this run (UUIDv4).
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Path the corpus was read from, if it came from a file.
    pub source: Option<String>,
    /// SHA-256 of the corpus bytes; `None` when the corpus was unreadable.
    pub corpus_digest: Option<String>,
    /// Metrics that were requested, in canonical order.
    pub metrics: Vec<MetricKind>,
    pub mtld_threshold: f64,
    pub records_total: usize,
    pub records_measured: usize,
    pub skipped: Vec<SkippedRecord>,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttr: Option<FieldReport<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<FieldReport<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtld: Option<FieldReport<MtldScore>>,
    /// Set when the corpus could not be read; all metric reports are then
    /// empty.
    pub error: Option<CorpusFailure>,
}

impl CorpusReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

// ---------------------------------------------------------------------------
// TextMeasurement
// ---------------------------------------------------------------------------

/// Every metric for one free text, with the word sequence it was computed
/// from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMeasurement {
    pub words: Vec<String>,
    pub ttr: TypeTokenCounts,
    pub entropy: EntropyProfile,
    pub mtld: MtldScore,
    pub mtld_threshold: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
