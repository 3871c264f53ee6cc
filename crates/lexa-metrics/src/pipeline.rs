//! Single-metric pipelines.
//!
//! Each function reads a corpus file, runs one calculator over every record
//! and returns the per-field means. They share the extractor and the
//! record-skip policy of [`MetricsEngine`]; use the engine directly to run
//! several metrics in one pass.

use std::path::Path;

use lexa_core::Result;

use crate::calculator::MetricKind;
use crate::mtld::{Mtld, MtldScore};
use crate::result::{CorpusFailure, FieldReport};
use crate::worker::MetricsEngine;

/// Per-field means for one metric, or an empty report plus the failure
/// when the corpus could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome<T> {
    pub report: FieldReport<T>,
    pub error: Option<CorpusFailure>,
}

impl<T> PipelineOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Mean Type-Token Ratio per field.
pub fn ttr(path: impl AsRef<Path>) -> PipelineOutcome<f64> {
    let report = MetricsEngine::for_metric(MetricKind::Ttr, Mtld::default()).run_path(path);
    PipelineOutcome {
        report: report.ttr.unwrap_or_else(FieldReport::empty),
        error: report.error,
    }
}

/// Mean Shannon entropy (bits) per field.
pub fn entropy(path: impl AsRef<Path>) -> PipelineOutcome<f64> {
    let report = MetricsEngine::for_metric(MetricKind::Entropy, Mtld::default()).run_path(path);
    PipelineOutcome {
        report: report.entropy.unwrap_or_else(FieldReport::empty),
        error: report.error,
    }
}

/// Mean forward, reverse and average MTLD per field.
///
/// Fails only when `threshold` is outside (0, 1).
pub fn mtld(path: impl AsRef<Path>, threshold: f64) -> Result<PipelineOutcome<MtldScore>> {
    let engine = MetricsEngine::for_metric(MetricKind::Mtld, Mtld::new(threshold)?);
    let report = engine.run_path(path);
    Ok(PipelineOutcome {
        report: report.mtld.unwrap_or_else(FieldReport::empty),
        error: report.error,
    })
}
