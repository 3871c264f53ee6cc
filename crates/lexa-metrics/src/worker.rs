//! Metrics engine: the pipeline driver.
//!
//! [`MetricsEngine`] is the primary entry point. For each record it runs the
//! extractor, tokenizes each of the six texts once, applies every requested
//! calculator and appends the values to per-field accumulators. After the
//! scan each accumulator is reduced to its mean and a [`CorpusReport`] is
//! assembled.
//!
//! Records are independent, so with `parallel` enabled they are measured on
//! the rayon pool into per-record partial accumulators; these are merged in
//! record order, giving the same report as a sequential scan.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use lexa_core::{Corpus, LexaError, Record, Result};

use crate::accumulate::Accumulators;
use crate::calculator::{Calculator, MetricKind};
use crate::entropy::{entropy_profile, ShannonEntropy};
use crate::extract::{extract_fields, Extraction, FieldTexts};
use crate::mtld::{validate_threshold, Mtld, DEFAULT_THRESHOLD};
use crate::result::{
    CorpusFailure, CorpusReport, FailureKind, FieldReport, SkippedRecord, TextMeasurement,
};
use crate::tokenize::tokenize;
use crate::ttr::{type_token_counts, TypeTokenRatio};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Runtime configuration for the metrics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// TTR threshold at which an MTLD factor closes. Must lie in (0, 1).
    /// Default: 0.72.
    pub mtld_threshold: f64,
    /// Metrics to compute. Default: all three.
    pub metrics: Vec<MetricKind>,
    /// Measure records on the rayon pool. Default: true.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mtld_threshold: DEFAULT_THRESHOLD,
            metrics: MetricKind::ALL.to_vec(),
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Config that runs only `metric`, other settings at their defaults.
    pub fn only(metric: MetricKind) -> Self {
        Self {
            metrics: vec![metric],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.mtld_threshold)?;
        if self.metrics.is_empty() {
            return Err(LexaError::InvalidConfig(
                "at least one metric must be selected".to_string(),
            ));
        }
        Ok(())
    }

    /// Requested metrics, deduplicated, in canonical order.
    fn selected_metrics(&self) -> Vec<MetricKind> {
        let mut metrics = self.metrics.clone();
        metrics.sort();
        metrics.dedup();
        metrics
    }
}

// ---------------------------------------------------------------------------
// MetricsEngine
// ---------------------------------------------------------------------------

/// Outcome of processing one record.
enum RecordOutcome {
    Measured(Accumulators),
    Skipped(SkippedRecord),
}

/// Deterministic corpus metrics engine.
///
/// Call [`MetricsEngine::run`] with a loaded [`Corpus`], or
/// [`MetricsEngine::run_path`] to read the corpus from disk with
/// corpus-level failures folded into the report.
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    config: EngineConfig,
    metrics: Vec<MetricKind>,
    ttr: TypeTokenRatio,
    entropy: ShannonEntropy,
    mtld: Mtld,
}

impl MetricsEngine {
    /// Create a new engine, rejecting invalid configuration up front.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mtld = Mtld::new(config.mtld_threshold)?;
        let metrics = config.selected_metrics();
        debug!(
            metrics = ?metrics,
            mtld_threshold = config.mtld_threshold,
            parallel = config.parallel,
            "metrics engine configured"
        );
        Ok(Self {
            config,
            metrics,
            ttr: TypeTokenRatio,
            entropy: ShannonEntropy,
            mtld,
        })
    }

    /// Engine running a single metric with an already-validated MTLD
    /// calculator.
    pub fn for_metric(metric: MetricKind, mtld: Mtld) -> Self {
        Self {
            config: EngineConfig {
                mtld_threshold: mtld.threshold(),
                ..EngineConfig::only(metric)
            },
            metrics: vec![metric],
            ttr: TypeTokenRatio,
            entropy: ShannonEntropy,
            mtld,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &[MetricKind] {
        &self.metrics
    }

    /// Read the corpus at `path` and measure it.
    ///
    /// A missing file, malformed JSON or a top-level value that is neither
    /// object nor array does not propagate: the returned report has empty
    /// metric reports and `error` set.
    pub fn run_path(&self, path: impl AsRef<Path>) -> CorpusReport {
        let path = path.as_ref();
        let start = Instant::now();
        match Corpus::from_path(path) {
            Ok(corpus) => self.run_since(&corpus, start),
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to read corpus");
                let failure = CorpusFailure::from_error(&err).unwrap_or_else(|| CorpusFailure {
                    kind: FailureKind::Io,
                    message: err.to_string(),
                });
                self.failed_report(path, failure, start.elapsed().as_millis() as u64)
            }
        }
    }

    /// Measure every record of `corpus` and reduce to per-field means.
    pub fn run(&self, corpus: &Corpus) -> CorpusReport {
        self.run_since(corpus, Instant::now())
    }

    /// `elapsed_ms` is measured from `start`, which covers loading when
    /// called from [`Self::run_path`].
    fn run_since(&self, corpus: &Corpus, start: Instant) -> CorpusReport {
        let (accumulators, skipped) = self.accumulate(corpus);
        let records_measured = corpus.len() - skipped.len();

        let report = CorpusReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source: corpus.source().map(|p| p.display().to_string()),
            corpus_digest: Some(corpus.digest().to_string()),
            metrics: self.metrics.clone(),
            mtld_threshold: self.mtld.threshold(),
            records_total: corpus.len(),
            records_measured,
            skipped,
            elapsed_ms: 0,
            ttr: accumulators.ttr.as_ref().map(|s| s.reduce(MetricKind::Ttr)),
            entropy: accumulators
                .entropy
                .as_ref()
                .map(|s| s.reduce(MetricKind::Entropy)),
            mtld: accumulators.mtld.as_ref().map(|s| s.reduce(MetricKind::Mtld)),
            error: None,
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            records = report.records_total,
            measured = report.records_measured,
            skipped = report.skipped.len(),
            elapsed_ms,
            "corpus measured"
        );
        CorpusReport { elapsed_ms, ..report }
    }

    /// Scan the corpus into per-field accumulators.
    ///
    /// Returns the accumulators together with the records that were
    /// skipped, in corpus order. A warning is logged for each skip.
    pub fn accumulate(&self, corpus: &Corpus) -> (Accumulators, Vec<SkippedRecord>) {
        // Indexed collect keeps record order on the parallel path.
        let outcomes: Vec<RecordOutcome> = if self.config.parallel {
            corpus
                .records()
                .par_iter()
                .enumerate()
                .map(|(index, record)| self.measure_record(index, record))
                .collect()
        } else {
            corpus
                .iter()
                .enumerate()
                .map(|(index, record)| self.measure_record(index, record))
                .collect()
        };

        let mut accumulators = Accumulators::for_metrics(&self.metrics);
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                RecordOutcome::Measured(partial) => accumulators.append(partial),
                RecordOutcome::Skipped(record) => {
                    warn!(
                        record = record.index,
                        request_id = record.request_id.as_deref().unwrap_or("-"),
                        missing = record.reason.path(),
                        "skipping record: {}",
                        record.reason
                    );
                    skipped.push(record);
                }
            }
        }
        (accumulators, skipped)
    }

    /// All three metrics for a single free text, with raw counts.
    pub fn measure_text(&self, text: &str) -> TextMeasurement {
        let words = tokenize(text);
        TextMeasurement {
            words: words.clone(),
            ttr: type_token_counts(&words),
            entropy: entropy_profile(&words),
            mtld: self.mtld.measure(&words),
            mtld_threshold: self.mtld.threshold(),
        }
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn measure_record(&self, index: usize, record: &Record) -> RecordOutcome {
        match extract_fields(record) {
            Extraction::Fields(texts) => RecordOutcome::Measured(self.measure_fields(&texts)),
            Extraction::Skip(reason) => RecordOutcome::Skipped(SkippedRecord {
                index,
                request_id: record.request_id().map(str::to_string),
                reason,
            }),
        }
    }

    fn measure_fields(&self, texts: &FieldTexts<'_>) -> Accumulators {
        let mut acc = Accumulators::for_metrics(&self.metrics);
        for (field, text) in texts.iter() {
            let words = tokenize(text);
            if let Some(series) = acc.ttr.as_mut() {
                series.push(field, self.ttr.measure(&words));
            }
            if let Some(series) = acc.entropy.as_mut() {
                series.push(field, self.entropy.measure(&words));
            }
            if let Some(series) = acc.mtld.as_mut() {
                series.push(field, self.mtld.measure(&words));
            }
        }
        acc
    }

    fn failed_report(&self, path: &Path, failure: CorpusFailure, elapsed_ms: u64) -> CorpusReport {
        let wants = |kind: MetricKind| self.metrics.contains(&kind);
        CorpusReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            source: Some(path.display().to_string()),
            corpus_digest: None,
            metrics: self.metrics.clone(),
            mtld_threshold: self.mtld.threshold(),
            records_total: 0,
            records_measured: 0,
            skipped: Vec::new(),
            elapsed_ms,
            ttr: wants(MetricKind::Ttr).then(FieldReport::empty),
            entropy: wants(MetricKind::Entropy).then(FieldReport::empty),
            mtld: wants(MetricKind::Mtld).then(FieldReport::empty),
            error: Some(failure),
        }
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            metrics: MetricKind::ALL.to_vec(),
            ttr: TypeTokenRatio,
            entropy: ShannonEntropy,
            mtld: Mtld::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use lexa_core::FieldName;
    use serde_json::{json, Value};
    use std::io::Write;
    use std::time::Duration;

    fn record(description: &str, attrs: Value) -> Value {
        json!({
            "request_id": format!("req-{}", description.len()),
            "image_path": "images/x.png",
            "description": {
                "first_section": { "description": description },
                "second_section": { "visual_attributes": attrs }
            }
        })
    }

    fn full_attrs() -> Value {
        json!({
            "brushstroke": "broad flat strokes with broad flat edges",
            "color": "warm reds and cool blues",
            "composition": "central figure on a diagonal ground",
            "light_and_shadow": "strong light from the left and deep shadow on the right",
            "line_quality": "crisp line and crisp contour"
        })
    }

    fn corpus(records: Vec<Value>) -> Corpus {
        Corpus::from_records(records.into_iter().map(Record::new).collect())
    }

    fn sequential(metrics: &[MetricKind]) -> MetricsEngine {
        MetricsEngine::new(EngineConfig {
            metrics: metrics.to_vec(),
            parallel: false,
            ..EngineConfig::default()
        })
        .unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn skipped_record_contributes_to_no_field() {
        let corpus = corpus(vec![
            record("red red blue", full_attrs()),
            json!({
                "request_id": "broken",
                "description": { "second_section": { "visual_attributes": full_attrs() } }
            }),
        ]);
        let engine = sequential(&[MetricKind::Ttr]);

        let (acc, skipped) = engine.accumulate(&corpus);
        let ttr = acc.ttr.unwrap();
        assert_eq!(ttr.values(FieldName::Description).len(), 1);
        assert!(approx(ttr.values(FieldName::Description)[0], 2.0 / 3.0));
        for field in FieldName::ATTRIBUTES {
            assert_eq!(ttr.values(field).len(), 1);
        }
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].index, 1);
        assert_eq!(skipped[0].request_id.as_deref(), Some("broken"));
        assert_eq!(skipped[0].reason.path(), "description.first_section");

        let report = engine.run(&corpus);
        let ttr = report.ttr.unwrap();
        assert!(approx(ttr.mean(FieldName::Description).unwrap(), 2.0 / 3.0));
        assert_eq!(ttr.samples(FieldName::Description), 1);
        assert_eq!(report.records_total, 2);
        assert_eq!(report.records_measured, 1);
    }

    #[test]
    fn missing_attribute_contributes_zero() {
        let mut attrs = full_attrs();
        attrs.as_object_mut().unwrap().remove("color");
        let corpus = corpus(vec![record(
            "a large red circle floats over a pale red field",
            attrs,
        )]);
        let report = sequential(&MetricKind::ALL).run(&corpus);

        let ttr = report.ttr.unwrap();
        let entropy = report.entropy.unwrap();
        let mtld = report.mtld.unwrap();

        assert_eq!(ttr.samples(FieldName::Color), 1);
        assert_eq!(ttr.mean(FieldName::Color), Some(0.0));
        assert_eq!(entropy.mean(FieldName::Color), Some(0.0));
        assert_eq!(mtld.mean(FieldName::Color).unwrap().average, 0.0);

        assert!(ttr.mean(FieldName::Description).unwrap() > 0.0);
        for field in FieldName::ATTRIBUTES {
            if field != FieldName::Color {
                assert!(ttr.mean(field).unwrap() > 0.0, "{} should be non-zero", field);
                assert!(entropy.mean(field).unwrap() > 0.0, "{} should be non-zero", field);
            }
        }
    }

    #[test]
    fn all_skipped_reports_zero_for_every_field() {
        let corpus = corpus(vec![json!({ "request_id": "a" }), json!({})]);
        let report = sequential(&[MetricKind::Entropy]).run(&corpus);
        let entropy = report.entropy.as_ref().unwrap();
        assert_eq!(entropy.len(), 6);
        for field in FieldName::ALL {
            assert_eq!(entropy.mean(field), Some(0.0));
            assert_eq!(entropy.samples(field), 0);
        }
        assert_eq!(report.skipped.len(), 2);
        assert!(report.is_ok());
    }

    #[test]
    fn only_requested_metrics_are_reported() {
        let corpus = corpus(vec![record("ink wash", full_attrs())]);
        let report = sequential(&[MetricKind::Mtld]).run(&corpus);
        assert!(report.ttr.is_none());
        assert!(report.entropy.is_none());
        assert_eq!(report.mtld.unwrap().len(), 6);
        assert_eq!(report.metrics, vec![MetricKind::Mtld]);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let records: Vec<Value> = (0..40)
            .map(|i| {
                if i % 7 == 3 {
                    json!({ "request_id": format!("skip-{}", i) })
                } else {
                    record(
                        &format!("stroke {} colour stroke texture colour light {}", "a".repeat(i % 5 + 1), i),
                        full_attrs(),
                    )
                }
            })
            .collect();
        let corpus = corpus(records);

        let seq = sequential(&MetricKind::ALL);
        let par = MetricsEngine::new(EngineConfig::default()).unwrap();

        let (seq_acc, seq_skipped) = seq.accumulate(&corpus);
        let (par_acc, par_skipped) = par.accumulate(&corpus);
        assert_eq!(seq_acc, par_acc);
        assert_eq!(seq_skipped, par_skipped);
    }

    #[test]
    fn nonexistent_file_yields_failure_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = MetricsEngine::default().run_path(dir.path().join("nope.json"));
        let failure = report.error.clone().expect("failure reported");
        assert_eq!(failure.kind, FailureKind::NotFound);
        assert!(report.ttr.unwrap().is_empty());
        assert!(report.mtld.unwrap().is_empty());
        assert_eq!(report.records_total, 0);
        assert!(report.corpus_digest.is_none());
    }

    #[test]
    fn elapsed_time_counts_from_caller_start() {
        let corpus = corpus(vec![record("ink wash", full_attrs())]);
        let start = Instant::now()
            .checked_sub(Duration::from_millis(50))
            .unwrap();
        let report = sequential(&[MetricKind::Ttr]).run_since(&corpus, start);
        assert!(report.elapsed_ms >= 50, "elapsed_ms = {}", report.elapsed_ms);
    }

    #[test]
    fn malformed_file_yields_failure_report() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let report = MetricsEngine::default().run_path(file.path());
        assert_eq!(report.error.unwrap().kind, FailureKind::MalformedJson);
    }

    #[test]
    fn file_corpus_end_to_end() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = json!([
            record("red red blue", full_attrs()),
            { "request_id": "no-first-section", "description": {} }
        ]);
        file.write_all(body.to_string().as_bytes()).unwrap();

        let engine = MetricsEngine::new(EngineConfig::only(MetricKind::Ttr)).unwrap();
        let report = engine.run_path(file.path());
        assert!(report.is_ok());
        assert_eq!(report.source.as_deref(), Some(file.path().display().to_string().as_str()));
        let ttr = report.ttr.unwrap();
        assert!(approx(ttr.mean(FieldName::Description).unwrap(), 2.0 / 3.0));
        assert_eq!(report.skipped.len(), 1);
    }

    #[test]
    fn bare_object_corpus_is_measured() {
        let corpus = Corpus::from_json_str(&record("calm blue sea", full_attrs()).to_string()).unwrap();
        let report = sequential(&[MetricKind::Ttr]).run(&corpus);
        assert_eq!(report.records_measured, 1);
        assert_eq!(report.ttr.unwrap().mean(FieldName::Description), Some(1.0));
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let config = EngineConfig {
            mtld_threshold: 1.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            MetricsEngine::new(config),
            Err(LexaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_metric_selection_is_rejected() {
        let config = EngineConfig {
            metrics: vec![],
            ..EngineConfig::default()
        };
        assert!(MetricsEngine::new(config).is_err());
    }

    #[test]
    fn duplicate_metrics_are_collapsed() {
        let engine = MetricsEngine::new(EngineConfig {
            metrics: vec![MetricKind::Mtld, MetricKind::Ttr, MetricKind::Mtld],
            ..EngineConfig::default()
        })
        .unwrap();
        assert_eq!(engine.metrics(), &[MetricKind::Ttr, MetricKind::Mtld]);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"metrics":["ttr"]}"#).unwrap();
        assert_eq!(config.metrics, vec![MetricKind::Ttr]);
        assert!(approx(config.mtld_threshold, 0.72));
        assert!(config.parallel);
    }

    #[test]
    fn measure_text_reports_counts() {
        let m = MetricsEngine::default().measure_text("Red red BLUE!");
        assert_eq!(m.words, vec!["red", "red", "blue"]);
        assert_eq!(m.ttr.types, 2);
        assert_eq!(m.ttr.tokens, 3);
        assert_eq!(m.entropy.distinct, 2);
        assert!(approx(m.mtld_threshold, 0.72));
    }
}
