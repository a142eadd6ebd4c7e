//! CLI settings file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizrank CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizrankConfig {
    /// Max concurrent analyses in batch runs.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for batch reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Percentage-point change that `compare` reports as a shift.
    #[serde(default = "default_shift_threshold")]
    pub shift_threshold: f64,
}

fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizrank-results")
}
fn default_shift_threshold() -> f64 {
    1.0
}

impl Default for QuizrankConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
            shift_threshold: default_shift_threshold(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizrank.toml` in the current directory
/// 2. `~/.config/quizrank/config.toml`
///
/// `QUIZRANK_PARALLELISM` overrides the parallelism setting.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizrankConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizrank.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            toml::from_str::<QuizrankConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizrankConfig::default(),
    };

    if let Ok(value) = std::env::var("QUIZRANK_PARALLELISM") {
        config.parallelism = value
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZRANK_PARALLELISM: '{value}'"))?;
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrank"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = QuizrankConfig::default();
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.shift_threshold, 1.0);
    }

    #[test]
    fn parse_partial_config() {
        let config: QuizrankConfig = toml::from_str("shift_threshold = 2.5").unwrap();
        assert_eq!(config.shift_threshold, 2.5);
        assert_eq!(config.parallelism, 4);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let result = load_config_from(Some(Path::new("/nonexistent/quizrank.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "output_dir = \"out\"\nshift_threshold = 0.5\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.shift_threshold, 0.5);
    }
}
