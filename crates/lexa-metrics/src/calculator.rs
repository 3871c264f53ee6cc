//! The per-text reduction contract shared by every metric.
//!
//! A [`Calculator`] turns one word sequence into one value. Calculators are
//! pure and stateless between calls, so the engine may run them on any
//! thread and in any record order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MetricKind
// ---------------------------------------------------------------------------

/// Identifies one of the three calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Type-Token Ratio.
    Ttr,
    /// Shannon entropy of the word distribution, in bits.
    Entropy,
    /// Measure of Textual Lexical Diversity.
    Mtld,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Ttr, MetricKind::Entropy, MetricKind::Mtld];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Ttr => "ttr",
            MetricKind::Entropy => "entropy",
            MetricKind::Mtld => "mtld",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ttr" => Ok(MetricKind::Ttr),
            "entropy" => Ok(MetricKind::Entropy),
            "mtld" => Ok(MetricKind::Mtld),
            other => Err(format!(
                "unknown metric '{}' (expected ttr, entropy or mtld)",
                other
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// A metric value that can be averaged across records.
///
/// `Default` is the value reported for a field with no samples.
pub trait Aggregate: Copy + Default + Send + Sync {
    /// Component-wise sum.
    fn plus(self, other: Self) -> Self;
    /// Component-wise division by a positive count.
    fn divided_by(self, count: f64) -> Self;
}

impl Aggregate for f64 {
    fn plus(self, other: Self) -> Self {
        self + other
    }

    fn divided_by(self, count: f64) -> Self {
        self / count
    }
}

/// Arithmetic mean of `values`, or `None` when there are none.
pub fn mean<T: Aggregate>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let total = values
        .iter()
        .copied()
        .fold(T::default(), |acc, value| acc.plus(value));
    Some(total.divided_by(values.len() as f64))
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

/// A pure reduction of a word sequence to a metric value.
pub trait Calculator: Send + Sync {
    type Output: Aggregate;

    fn kind(&self) -> MetricKind;

    /// Reduce `words` to a value. Never fails: empty input has a defined
    /// result for every calculator.
    fn measure(&self, words: &[String]) -> Self::Output;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean::<f64>(&[]), None);
    }

    #[test]
    fn mean_of_scalars() {
        let m = mean(&[1.0, 2.0, 6.0]).unwrap();
        assert!((m - 3.0).abs() < 1e-12);
    }

    #[test]
    fn metric_kind_parses_case_insensitively() {
        assert_eq!("MTLD".parse::<MetricKind>(), Ok(MetricKind::Mtld));
        assert_eq!("ttr".parse::<MetricKind>(), Ok(MetricKind::Ttr));
        assert!("jaccard".parse::<MetricKind>().is_err());
    }

    #[test]
    fn metric_kind_serializes_to_snake_case() {
        assert_eq!(serde_json::to_string(&MetricKind::Entropy).unwrap(), "\"entropy\"");
    }
}
