//! Report renderers.
//!
//! `text` is meant for a terminal; `json` emits the full report
//! pretty-printed for scripting.

use std::fmt::Write;

use anyhow::Result;
use serde::Serialize;

use lexa_metrics::{CorpusReport, FieldReport, MtldScore, TextMeasurement};

/// Render any report as pretty-printed JSON.
pub fn json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a corpus report for humans.
pub fn text(report: &CorpusReport) -> String {
    let mut out = String::new();
    let source = report.source.as_deref().unwrap_or("<in-memory corpus>");

    if let Some(failure) = &report.error {
        let _ = writeln!(out, "Error: {}", failure.message);
        let _ = write!(out, "No metrics computed for {}", source);
        return out;
    }

    let _ = writeln!(
        out,
        "Corpus: {} ({} records, {} measured, {} skipped)",
        source,
        report.records_total,
        report.records_measured,
        report.skipped.len()
    );

    if let Some(ttr) = &report.ttr {
        let _ = writeln!(out, "\nMean TTR per field:");
        write_scalars(&mut out, ttr, "");
    }
    if let Some(entropy) = &report.entropy {
        let _ = writeln!(out, "\nMean Shannon entropy per field:");
        write_scalars(&mut out, entropy, " bits");
    }
    if let Some(mtld) = &report.mtld {
        let _ = writeln!(out, "\nMean MTLD per field (threshold {}):", report.mtld_threshold);
        write_mtld(&mut out, mtld);
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped records:");
        for skipped in &report.skipped {
            let _ = writeln!(
                out,
                "  #{} ({}): {}",
                skipped.index,
                skipped.request_id.as_deref().unwrap_or("no request id"),
                skipped.reason
            );
        }
    }

    out.trim_end().to_string()
}

/// Render a single-text measurement for humans.
pub fn text_measurement(m: &TextMeasurement) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Words: {}", m.words.len());
    let _ = writeln!(
        out,
        "TTR: {:.4} (types {}, tokens {})",
        m.ttr.ratio, m.ttr.types, m.ttr.tokens
    );
    let _ = writeln!(
        out,
        "Shannon entropy: {:.4} bits (distinct {}, tokens {})",
        m.entropy.bits, m.entropy.distinct, m.entropy.tokens
    );
    let _ = write!(
        out,
        "MTLD (threshold {}): forward {:.2}, reverse {:.2}, average {:.2}",
        m.mtld_threshold, m.mtld.forward, m.mtld.reverse, m.mtld.average
    );
    out
}

fn write_scalars(out: &mut String, report: &FieldReport<f64>, unit: &str) {
    for (field, summary) in report.iter() {
        let _ = writeln!(
            out,
            "  {:<17} {:.4}{}  (n={})",
            field.as_str(),
            summary.mean,
            unit,
            summary.samples
        );
    }
}

fn write_mtld(out: &mut String, report: &FieldReport<MtldScore>) {
    for (field, summary) in report.iter() {
        let score = summary.mean;
        let _ = writeln!(out, "  {}:  (n={})", field, summary.samples);
        let _ = writeln!(out, "    forward: {:.2}", score.forward);
        let _ = writeln!(out, "    reverse: {:.2}", score.reverse);
        let _ = writeln!(out, "    average: {:.2}", score.average);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexa_core::Corpus;
    use lexa_metrics::{EngineConfig, MetricsEngine};

    fn sample_report() -> CorpusReport {
        let corpus = Corpus::from_json_str(
            r#"[
                {"request_id":"a","description":{"first_section":{"description":"red red blue"},
                 "second_section":{"visual_attributes":{"color":"warm red"}}}},
                {"request_id":"b","description":{}}
            ]"#,
        )
        .unwrap();
        let engine = MetricsEngine::new(EngineConfig {
            parallel: false,
            ..EngineConfig::default()
        })
        .unwrap();
        engine.run(&corpus)
    }

    #[test]
    fn text_lists_every_metric_and_field() {
        let out = text(&sample_report());
        assert!(out.contains("2 records, 1 measured, 1 skipped"));
        assert!(out.contains("Mean TTR per field:"));
        assert!(out.contains("description       0.6667"));
        assert!(out.contains(" bits"));
        assert!(out.contains("light_and_shadow"));
        assert!(out.contains("forward:"));
        assert!(out.contains("#1 (b): missing field `description.first_section`"));
    }

    #[test]
    fn json_is_parseable() {
        let rendered = json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["records_total"], 2);
    }

    #[test]
    fn failure_report_renders_error() {
        let dir = tempfile::tempdir().unwrap();
        let report = MetricsEngine::default().run_path(dir.path().join("gone.json"));
        let out = text(&report);
        assert!(out.starts_with("Error: corpus file not found"));
    }

    #[test]
    fn single_word_entropy_renders_unsigned_zero() {
        let m = MetricsEngine::default().measure_text("ink");
        let out = text_measurement(&m);
        assert!(out.contains("Shannon entropy: 0.0000 bits"), "{}", out);
        assert!(json(&m).unwrap().contains(r#""bits": 0.0"#));
    }

    #[test]
    fn text_measurement_formats_counts() {
        let m = MetricsEngine::default().measure_text("red red blue");
        let out = text_measurement(&m);
        assert!(out.contains("TTR: 0.6667 (types 2, tokens 3)"));
        assert!(out.contains("MTLD (threshold 0.72)"));
    }
}
