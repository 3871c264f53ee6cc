//! Per-field accumulators.
//!
//! Each requested metric owns one [`FieldSeries`]: an append-only list of
//! values per field. Partial series built independently (one per record,
//! or one per worker) merge by concatenation, so the final means do not
//! depend on how the scan was split.

use std::collections::BTreeMap;

use tracing::warn;

use lexa_core::FieldName;

use crate::calculator::{mean, Aggregate, MetricKind};
use crate::mtld::MtldScore;
use crate::result::{FieldReport, FieldSummary};

// ---------------------------------------------------------------------------
// FieldSeries
// ---------------------------------------------------------------------------

/// Ordered metric values for each of the six fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSeries<T> {
    series: BTreeMap<FieldName, Vec<T>>,
}

impl<T: Aggregate> FieldSeries<T> {
    pub fn new() -> Self {
        Self {
            series: FieldName::ALL.iter().map(|f| (*f, Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, field: FieldName, value: T) {
        self.series.entry(field).or_default().push(value);
    }

    /// Move every value of `other` onto the end of this series.
    pub fn append(&mut self, other: FieldSeries<T>) {
        for (field, mut values) in other.series {
            self.series.entry(field).or_default().append(&mut values);
        }
    }

    pub fn values(&self, field: FieldName) -> &[T] {
        self.series.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reduce every field to its mean.
    ///
    /// A field with no values is reported as the zero value with
    /// `samples = 0`, and a warning is logged; the report always carries
    /// all six fields.
    pub fn reduce(&self, metric: MetricKind) -> FieldReport<T> {
        let mut report = FieldReport::empty();
        for field in FieldName::ALL {
            let values = self.values(field);
            let summary = match mean(values) {
                Some(m) => FieldSummary {
                    mean: m,
                    samples: values.len(),
                },
                None => {
                    warn!(
                        metric = %metric,
                        field = %field,
                        "field has no valid data; mean set to 0.0"
                    );
                    FieldSummary {
                        mean: T::default(),
                        samples: 0,
                    }
                }
            };
            report.insert(field, summary);
        }
        report
    }
}

impl<T: Aggregate> Default for FieldSeries<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Accumulators
// ---------------------------------------------------------------------------

/// One series per requested metric; `None` for metrics not being run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Accumulators {
    pub ttr: Option<FieldSeries<f64>>,
    pub entropy: Option<FieldSeries<f64>>,
    pub mtld: Option<FieldSeries<MtldScore>>,
}

impl Accumulators {
    /// Empty accumulators for exactly the metrics in `metrics`.
    pub fn for_metrics(metrics: &[MetricKind]) -> Self {
        let wants = |kind: MetricKind| metrics.contains(&kind);
        Self {
            ttr: wants(MetricKind::Ttr).then(FieldSeries::new),
            entropy: wants(MetricKind::Entropy).then(FieldSeries::new),
            mtld: wants(MetricKind::Mtld).then(FieldSeries::new),
        }
    }

    /// Concatenate `other` onto `self`, metric by metric.
    pub fn append(&mut self, other: Accumulators) {
        merge_series(&mut self.ttr, other.ttr);
        merge_series(&mut self.entropy, other.entropy);
        merge_series(&mut self.mtld, other.mtld);
    }
}

fn merge_series<T: Aggregate>(into: &mut Option<FieldSeries<T>>, from: Option<FieldSeries<T>>) {
    if let Some(source) = from {
        match into {
            Some(target) => target.append(source),
            None => *into = Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
