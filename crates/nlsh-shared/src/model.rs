//! Fitted model snapshots.
//!
//! A `ModelSnapshot` bundles the vectorizer and classifier that were fitted
//! together. Snapshots are never mutated: retraining builds a new one and
//! `ModelStore::swap` replaces the current snapshot in one step. Requests
//! clone the `Arc` once and keep using that snapshot even if a swap happens
//! mid-request.

use crate::classifier::{Classification, LinearSvm};
use crate::config::{ClassifierConfig, NlshConfig};
use crate::error::{NlshError, Result};
use crate::intent::Intent;
use crate::training::{intent_counts, validate_examples, TrainingExample};
use crate::vectorizer::TfidfVectorizer;
use crate::version::MODEL_FORMAT_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Figures reported after a (re)train
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub num_samples: usize,
    pub num_intents: usize,
    pub vocabulary_size: usize,
    /// Mean cross-validated accuracy, when cross-validation ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_std: Option<f32>,
    pub trained_at: DateTime<Utc>,
}

/// Immutable fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub format_version: u32,
    /// Bumped on every swap into a `ModelStore`
    pub version: u64,
    pub vectorizer: TfidfVectorizer,
    pub classifier: LinearSvm,
    pub metrics: TrainingMetrics,
}

impl ModelSnapshot {
    /// Fit vectorizer and classifier on a corpus.
    pub fn train(examples: &[TrainingExample], config: &NlshConfig) -> Result<Self> {
        validate_examples(examples)?;

        let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let labels: Vec<Intent> = examples.iter().map(|e| e.label).collect();

        let mut vectorizer = TfidfVectorizer::new(config.vectorizer.clone());
        vectorizer.fit(&texts)?;

        let vectors = texts
            .iter()
            .map(|t| vectorizer.vectorize(t))
            .collect::<Result<Vec<_>>>()?;

        let classifier = LinearSvm::train(&vectors, &labels, vectorizer.dim(), &config.training)?;

        let metrics = TrainingMetrics {
            num_samples: examples.len(),
            num_intents: classifier.labels().len(),
            vocabulary_size: vectorizer.dim(),
            accuracy: None,
            accuracy_std: None,
            trained_at: Utc::now(),
        };

        info!(
            samples = metrics.num_samples,
            intents = metrics.num_intents,
            vocabulary = metrics.vocabulary_size,
            "Trained intent model"
        );

        Ok(Self {
            format_version: MODEL_FORMAT_VERSION,
            version: 1,
            vectorizer,
            classifier,
            metrics,
        })
    }

    /// Attach cross-validation results
    pub fn with_cross_validation(mut self, cv: &CrossValidation) -> Self {
        self.metrics.accuracy = Some(cv.mean_accuracy);
        self.metrics.accuracy_std = Some(cv.std_accuracy);
        self
    }

    /// Vectorize and classify one utterance.
    pub fn classify(&self, text: &str, policy: &ClassifierConfig) -> Result<Classification> {
        let vector = self.vectorizer.vectorize(text)?;
        Ok(self.classifier.classify(&vector, policy))
    }

    pub fn intents(&self) -> &[Intent] {
        self.classifier.labels()
    }

    pub fn class_counts(&self) -> BTreeMap<Intent, usize> {
        self.classifier.class_counts()
    }

    /// Reject artifacts whose parts do not fit together
    pub fn validate(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(NlshError::CorruptModel(format!(
                "format version {} (expected {})",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if !self.vectorizer.is_fitted() {
            return Err(NlshError::CorruptModel("vectorizer has no vocabulary".into()));
        }
        self.vectorizer.check_consistency()?;
        self.classifier.check_consistency()?;
        if self.vectorizer.dim() != self.classifier.dim() {
            return Err(NlshError::CorruptModel(format!(
                "vectorizer dimension {} does not match classifier dimension {}",
                self.vectorizer.dim(),
                self.classifier.dim()
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate a serialised snapshot. Any failure is `CorruptModel`.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ModelSnapshot =
            serde_json::from_str(json).map_err(|e| NlshError::CorruptModel(e.to_string()))?;
        snapshot.validate()?;
        debug!(version = snapshot.version, "Parsed model snapshot");
        Ok(snapshot)
    }
}

/// Cross-validated accuracy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidation {
    pub folds: usize,
    pub fold_accuracies: Vec<f32>,
    pub mean_accuracy: f32,
    pub std_accuracy: f32,
}

/// Stratified k-fold accuracy of the full training pipeline.
///
/// Examples of each label are dealt round-robin across folds in corpus order,
/// so the result is deterministic. Prediction ignores the confidence
/// threshold (best label wins).
pub fn cross_validate(
    examples: &[TrainingExample],
    folds: usize,
    config: &NlshConfig,
) -> Result<CrossValidation> {
    validate_examples(examples)?;
    if folds < 2 {
        return Err(NlshError::InvalidTrainingData(format!(
            "cross-validation needs at least 2 folds, got {}",
            folds
        )));
    }

    let mut seen: BTreeMap<Intent, usize> = BTreeMap::new();
    let fold_of: Vec<usize> = examples
        .iter()
        .map(|e| {
            let n = seen.entry(e.label).or_insert(0);
            let fold = *n % folds;
            *n += 1;
            fold
        })
        .collect();

    let policy = ClassifierConfig {
        min_confidence: 0.0,
        ..config.classifier.clone()
    };

    let mut accuracies = Vec::with_capacity(folds);
    for fold in 0..folds {
        let (test, train): (Vec<_>, Vec<_>) = examples
            .iter()
            .zip(&fold_of)
            .partition(|(_, f)| **f == fold);
        let train: Vec<TrainingExample> = train.into_iter().map(|(e, _)| e.clone()).collect();
        if test.is_empty() || intent_counts(&train).len() < 2 {
            continue;
        }

        let snapshot = ModelSnapshot::train(&train, config)?;
        let mut correct = 0usize;
        for (ex, _) in &test {
            if snapshot.classify(&ex.text, &policy)?.intent == ex.label {
                correct += 1;
            }
        }
        let accuracy = correct as f32 / test.len() as f32;
        debug!(fold, accuracy, "cross-validation fold");
        accuracies.push(accuracy);
    }

    if accuracies.is_empty() {
        return Err(NlshError::InvalidTrainingData(
            "not enough examples for cross-validation".into(),
        ));
    }

    let n = accuracies.len() as f32;
    let mean = accuracies.iter().sum::<f32>() / n;
    let variance = accuracies.iter().map(|a| (a - mean).powi(2)).sum::<f32>() / n;

    Ok(CrossValidation {
        folds: accuracies.len(),
        fold_accuracies: accuracies,
        mean_accuracy: mean,
        std_accuracy: variance.sqrt(),
    })
}

/// Holder of the current snapshot.
#[derive(Debug, Default)]
pub struct ModelStore {
    current: RwLock<Option<Arc<ModelSnapshot>>>,
}

impl ModelStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: ModelSnapshot) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(snapshot))),
        }
    }

    /// The snapshot to use for one request
    pub fn current(&self) -> Result<Arc<ModelSnapshot>> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        guard.as_ref().cloned().ok_or(NlshError::UnfittedModel)
    }

    pub fn is_loaded(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Install a new snapshot, numbering it after the one it replaces.
    pub fn swap(&self, mut snapshot: ModelSnapshot) -> Arc<ModelSnapshot> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let previous = guard.as_ref().map(|s| s.version).unwrap_or(0);
        snapshot.version = previous + 1;
        let snapshot = Arc::new(snapshot);
        *guard = Some(Arc::clone(&snapshot));
        info!(version = snapshot.version, "Swapped in model snapshot");
        snapshot
    }
}
