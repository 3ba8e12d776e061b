//! User-taught training examples.
//!
//! Stored as a JSON list next to the model. Labels must belong to the closed
//! intent set; duplicates (same normalised text and label) are skipped.

use anyhow::{bail, Context, Result};
use nlsh_shared::vectorizer::normalize;
use nlsh_shared::{Intent, NlshConfig, TrainingExample};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TrainingStore {
    path: PathBuf,
}

impl TrainingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &NlshConfig) -> Self {
        Self::new(config.paths.training_data_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Taught examples; empty when the file does not exist yet
    pub fn load(&self) -> Result<Vec<TrainingExample>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let examples: Vec<TrainingExample> = serde_json::from_str(&json)
            .with_context(|| format!("Invalid training data in {}", self.path.display()))?;
        Ok(examples)
    }

    fn save(&self, examples: &[TrainingExample]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(examples)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Record a phrase for an intent label. Returns false for a duplicate.
    pub fn add(&self, text: &str, label: &str) -> Result<bool> {
        let intent: Intent = label.parse()?;
        let text = text.trim();
        if normalize(text).is_empty() {
            bail!("Example text is empty");
        }

        let mut examples = self.load()?;
        let key = normalize(text);
        if examples
            .iter()
            .any(|e| e.label == intent && normalize(&e.text) == key)
        {
            return Ok(false);
        }

        examples.push(TrainingExample::new(text, intent));
        self.save(&examples)?;
        info!(intent = %intent, text, total = examples.len(), "Learned example");
        Ok(true)
    }
}
