//! Model artifact on disk.
//!
//! The model is a JSON `ModelSnapshot`. A missing file means "train from the
//! corpus and save"; a file that fails to parse or validate is fatal.

use crate::training_store::TrainingStore;
use anyhow::{Context, Result};
use nlsh_shared::model::cross_validate;
use nlsh_shared::training::{builtin_examples, merge};
use nlsh_shared::{ModelSnapshot, NlshConfig, NlshError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ModelFile {
    path: PathBuf,
}

impl ModelFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &NlshConfig) -> Self {
        Self::new(config.paths.model_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<ModelSnapshot> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read model {}", self.path.display()))?;
        let snapshot = ModelSnapshot::from_json(&json).with_context(|| {
            format!(
                "Model {} is unusable; run `nlshctl retrain` to rebuild it",
                self.path.display()
            )
        })?;
        info!(path = %self.path.display(), version = snapshot.version, "Loaded model");
        Ok(snapshot)
    }

    /// Write through a temporary file so a crash never leaves half a model.
    pub fn save(&self, snapshot: &ModelSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = snapshot.to_json()?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        info!(path = %self.path.display(), "Saved model");
        Ok(())
    }

    /// Load the saved model, or train and save one when none exists yet.
    /// Returns whether training happened.
    pub fn load_or_train(
        &self,
        config: &NlshConfig,
        store: &TrainingStore,
    ) -> Result<(ModelSnapshot, bool)> {
        if self.exists() {
            return Ok((self.load()?, false));
        }
        warn!(path = %self.path.display(), "No model found, training from the corpus");
        let snapshot = train(config, store, false)?;
        self.save(&snapshot)?;
        Ok((snapshot, true))
    }
}

/// Train on the built-in corpus plus taught examples, optionally with
/// cross-validated accuracy.
pub fn train(config: &NlshConfig, store: &TrainingStore, with_cv: bool) -> Result<ModelSnapshot> {
    let taught = store.load()?;
    let examples = merge(builtin_examples(), &taught);
    let snapshot = ModelSnapshot::train(&examples, config).context("Training failed")?;
    if !with_cv {
        return Ok(snapshot);
    }
    match cross_validate(&examples, config.training.cv_folds, config) {
        Ok(cv) => Ok(snapshot.with_cross_validation(&cv)),
        Err(e @ NlshError::InvalidTrainingData(_)) => {
            warn!(error = %e, "Skipping cross-validation");
            Ok(snapshot)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_model_is_an_error_with_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, "{\"format_version\": 1}").unwrap();

        let err = ModelFile::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("nlshctl retrain"));
        assert!(matches!(
            err.downcast_ref::<NlshError>(),
            Some(NlshError::CorruptModel(_))
        ));
    }

    #[test]
    fn test_missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = ModelFile::new(dir.path().join("absent.json"));
        assert!(!file.exists());
        assert!(file.load().is_err());
    }
}
