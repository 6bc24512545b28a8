//! Persistent per-item score cache.
//!
//! Maps `group -> prompt template -> score`. The cache is loaded once at
//! startup, mutated as answers come in, and written back as pretty JSON at
//! the end of a run.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Item;
use crate::score::Score;

/// Default cache file, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "konj.cache";

/// Nested score map with implicit entry creation on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreCache<S> {
    groups: BTreeMap<String, BTreeMap<String, S>>,
}

impl<S> Default for ScoreCache<S> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<S: Score> ScoreCache<S> {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the cache from `path`. A missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("no cache at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read cache from {}", path.display()))?;
        let cache: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse cache {}", path.display()))?;
        tracing::info!(
            "loaded {} scores for {} groups from {}",
            cache.len(),
            cache.groups.len(),
            path.display()
        );
        Ok(cache)
    }

    /// Write the whole cache to `path`, replacing its previous content.
    ///
    /// The file is written next to its destination first and then renamed
    /// into place, so an interrupted save never leaves a truncated cache.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create cache directory {}", dir.display()))?;

        let mut json = serde_json::to_string_pretty(self).context("failed to serialize cache")?;
        json.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .with_context(|| format!("failed to write cache to {}", path.display()))?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to write cache to {}", path.display()))?;

        tracing::info!("saved {} scores to {}", self.len(), path.display());
        Ok(())
    }

    /// Score for `(group, key)`, or the zero score if it was never recorded.
    pub fn get(&self, group: &str, key: &str) -> S {
        self.groups
            .get(group)
            .and_then(|prompts| prompts.get(key))
            .cloned()
            .unwrap_or_default()
    }

    /// Ordering value of an item's current score.
    pub fn score_of(&self, item: &Item) -> i64 {
        self.groups
            .get(&item.group)
            .and_then(|prompts| prompts.get(&item.prompt))
            .map(S::value)
            .unwrap_or_else(|| S::default().value())
    }

    /// Mutable access to a score, inserting the zero score if absent.
    pub fn get_or_insert_default(&mut self, group: &str, key: &str) -> &mut S {
        self.groups
            .entry(group.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
    }

    /// Record one answer for `(group, key)`.
    pub fn record(&mut self, group: &str, key: &str, correct: bool, weight: u32) {
        self.get_or_insert_default(group, key).record(correct, weight);
    }

    /// Number of recorded `(group, key)` scores.
    pub fn len(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
