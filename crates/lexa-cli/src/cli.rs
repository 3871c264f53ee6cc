//! CLI command definitions and handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use lexa_metrics::{EngineConfig, MetricKind, MetricsEngine};

use crate::config::load_engine_config;
use crate::render;

/// lexa - lexical diversity metrics for art-annotation corpora
#[derive(Parser, Debug)]
#[command(name = "lexa")]
#[command(
    version,
    about = "Measure TTR, Shannon entropy and MTLD over art-annotation corpora",
    after_help = "\
Examples:
  lexa analyze annotations.json                  All metrics, text output
  lexa analyze annotations.json -m mtld --threshold 0.7
  lexa analyze annotations.json -f json -o report.json
  lexa text \"Loose, layered strokes of ochre\"   Measure a single text"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG overrides it
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// TOML file with engine settings (mtld_threshold, metrics, parallel)
    #[arg(long, global = true, env = "LEXA_CONFIG")]
    pub config: Option<PathBuf>,

    /// MTLD threshold, strictly between 0 and 1 (default: 0.72)
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Output format: text or json
    #[arg(long, short = 'f', global = true, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure every record of a corpus file and report per-field means
    Analyze {
        /// Corpus file: a JSON array of records or a single record object
        path: PathBuf,

        /// Metric to compute (ttr, entropy, mtld); repeat for several.
        /// Default: all three
        #[arg(long = "metric", short = 'm')]
        metrics: Vec<MetricKind>,

        /// Measure records on a single thread
        #[arg(long)]
        sequential: bool,

        /// Write the report to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with an error when the corpus cannot be read
        #[arg(long)]
        fail_on_error: bool,
    },

    /// Measure a single text with every metric
    Text {
        /// The text to measure
        text: String,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = load_engine_config(cli.config.as_deref())?;
    if let Some(threshold) = cli.threshold {
        config.mtld_threshold = threshold;
    }

    match cli.command {
        Commands::Analyze {
            path,
            metrics,
            sequential,
            output,
            fail_on_error,
        } => {
            if !metrics.is_empty() {
                config.metrics = metrics;
            }
            if sequential {
                config.parallel = false;
            }
            analyze(&path, config, &cli.format, output.as_deref(), fail_on_error)
        }
        Commands::Text { text } => measure_text(&text, config, &cli.format),
    }
}

fn analyze(
    path: &Path,
    config: EngineConfig,
    format: &str,
    output: Option<&Path>,
    fail_on_error: bool,
) -> Result<()> {
    debug!(?config, path = %path.display(), "resolved configuration");
    let engine = MetricsEngine::new(config)?;
    let report = engine.run_path(path);

    let rendered = match format {
        "json" => render::json(&report)?,
        _ => render::text(&report),
    };
    emit(&rendered, output)?;

    if fail_on_error {
        if let Some(failure) = &report.error {
            bail!("corpus could not be read: {}", failure.message);
        }
    }
    Ok(())
}

fn measure_text(text: &str, config: EngineConfig, format: &str) -> Result<()> {
    let engine = MetricsEngine::new(config)?;
    let measurement = engine.measure_text(text);
    let rendered = match format {
        "json" => render::json(&measurement)?,
        _ => render::text_measurement(&measurement),
    };
    emit(&rendered, None)
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write report to {}", path.display())),
        None => {
            println!("{}", rendered);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_metrics() {
        let cli = Cli::try_parse_from([
            "lexa", "analyze", "corpus.json", "-m", "ttr", "--metric", "mtld",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze { metrics, .. } => {
                assert_eq!(metrics, vec![MetricKind::Ttr, MetricKind::Mtld])
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_metric() {
        assert!(Cli::try_parse_from(["lexa", "analyze", "c.json", "-m", "bleu"]).is_err());
    }

    #[test]
    fn global_threshold_after_subcommand() {
        let cli = Cli::try_parse_from(["lexa", "text", "ink wash", "--threshold", "0.6"]).unwrap();
        assert_eq!(cli.threshold, Some(0.6));
        assert_eq!(cli.format, "text");
    }

    #[test]
    fn analyze_writes_report_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.json");
        fs::write(
            &corpus,
            r#"{"description":{"first_section":{"description":"red red blue"},
                "second_section":{"visual_attributes":{}}}}"#,
        )
        .unwrap();
        let out = dir.path().join("report.json");

        let config = EngineConfig {
            metrics: vec![MetricKind::Ttr],
            parallel: false,
            ..EngineConfig::default()
        };
        analyze(&corpus, config, "json", Some(&out), true).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(report["records_measured"], 1);
    }

    #[test]
    fn fail_on_error_surfaces_missing_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.txt");
        let result = analyze(
            &dir.path().join("absent.json"),
            EngineConfig::default(),
            "text",
            Some(&out),
            true,
        );
        assert!(result.is_err());
        // The failure report is still written.
        assert!(fs::read_to_string(&out).unwrap().contains("absent.json"));
    }

    #[test]
    fn invalid_threshold_is_an_error() {
        let config = EngineConfig {
            mtld_threshold: 1.0,
            ..EngineConfig::default()
        };
        assert!(measure_text("ink", config, "text").is_err());
    }
}
