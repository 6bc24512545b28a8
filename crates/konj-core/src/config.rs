//! Run configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_FILE;
use crate::score::ScoreStrategy;

/// Top-level konj configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KonjConfig {
    /// Where the score cache lives.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// Score accumulator used for this cache.
    #[serde(default)]
    pub scoring: ScoreStrategy,
    /// Questions per session when `--number` is not given (negative = all).
    #[serde(default = "default_number")]
    pub default_number: i64,
    /// Replay missed items after this many presentations.
    #[serde(default = "default_retry_interval")]
    pub retry_interval: usize,
    /// Weight of a correct first attempt.
    #[serde(default = "default_fresh_points")]
    pub fresh_points: u32,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}
fn default_number() -> i64 {
    20
}
fn default_retry_interval() -> usize {
    10
}
fn default_fresh_points() -> u32 {
    3
}

impl Default for KonjConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            scoring: ScoreStrategy::default(),
            default_number: default_number(),
            retry_interval: default_retry_interval(),
            fresh_points: default_fresh_points(),
        }
    }
}

impl KonjConfig {
    /// Reject values the scheduler cannot work with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.retry_interval >= 1, "retry_interval must be at least 1");
        Ok(())
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `konj.toml` in the current directory
/// 2. `~/.config/konj/config.toml`
///
/// Environment variable override: `KONJ_CACHE`.
pub fn load_config_from(path: Option<&Path>) -> Result<KonjConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("konj.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let parsed = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            parsed
        }
        None => KonjConfig::default(),
    };

    if let Ok(cache) = std::env::var("KONJ_CACHE") {
        if !cache.is_empty() {
            config.cache_path = PathBuf::from(cache);
        }
    }

    config.validate()?;
    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<KonjConfig> {
    let config: KonjConfig = toml::from_str(content)?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("konj"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = KonjConfig::default();
        assert_eq!(config.cache_path, PathBuf::from("konj.cache"));
        assert_eq!(config.scoring, ScoreStrategy::Counter);
        assert_eq!(config.default_number, 20);
        assert_eq!(config.retry_interval, 10);
        assert_eq!(config.fresh_points, 3);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config_str(
            r#"
scoring = "tally"
default_number = -1
"#,
        )
        .unwrap();
        assert_eq!(config.scoring, ScoreStrategy::Tally);
        assert_eq!(config.default_number, -1);
        assert_eq!(config.retry_interval, 10);
        assert_eq!(config.cache_path, PathBuf::from("konj.cache"));
    }

    #[test]
    fn parse_rejects_unknown_strategy() {
        assert!(parse_config_str(r#"scoring = "elo""#).is_err());
    }

    #[test]
    fn zero_retry_interval_is_invalid() {
        let config = KonjConfig {
            retry_interval: 0,
            ..KonjConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/nonexistent/konj.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("konj.toml");
        std::fs::write(&path, "cache_path = \"scores.json\"\nfresh_points = 5\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.fresh_points, 5);
        if std::env::var("KONJ_CACHE").is_err() {
            assert_eq!(config.cache_path, PathBuf::from("scores.json"));
        }
    }
}
