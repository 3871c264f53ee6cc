//! Engine settings from a TOML file.
//!
//! ```toml
//! # lexa.toml
//! mtld_threshold = 0.72
//! metrics = ["ttr", "entropy", "mtld"]
//! parallel = true
//! ```
//!
//! Every key is optional; missing keys take the engine defaults. Command
//! line flags are applied on top of the loaded values.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use lexa_metrics::EngineConfig;

/// Load `path` if given, otherwise return the default configuration.
pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = parse_engine_config(&raw)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

fn parse_engine_config(raw: &str) -> Result<EngineConfig> {
    Ok(toml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexa_metrics::MetricKind;

    #[test]
    fn no_path_gives_defaults() {
        assert_eq!(load_engine_config(None).unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_engine_config("mtld_threshold = 0.65\n").unwrap();
        assert!((config.mtld_threshold - 0.65).abs() < 1e-12);
        assert_eq!(config.metrics, MetricKind::ALL.to_vec());
        assert!(config.parallel);
    }

    #[test]
    fn metrics_and_parallel_are_read() {
        let config = parse_engine_config("metrics = [\"entropy\"]\nparallel = false\n").unwrap();
        assert_eq!(config.metrics, vec![MetricKind::Entropy]);
        assert!(!config.parallel);
    }

    #[test]
    fn unknown_metric_is_rejected() {
        assert!(parse_engine_config("metrics = [\"bleu\"]\n").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_engine_config(Some(&dir.path().join("lexa.toml"))).is_err());
    }
}
