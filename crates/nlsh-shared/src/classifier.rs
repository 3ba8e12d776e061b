//! One-vs-rest linear SVM intent classifier.
//!
//! Each class gets an L2-regularised, hinge-loss binary SVM trained with dual
//! coordinate descent (the liblinear solver, bias appended as a constant
//! feature). Scores are turned into a confidence with a softmax over scaled
//! margins; that number only feeds threshold decisions and is not a
//! calibrated probability.

use crate::config::{ClassifierConfig, TrainingConfig};
use crate::error::{NlshError, Result};
use crate::intent::Intent;
use crate::vectorizer::FeatureVector;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Result of classifying one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    /// In [0, 1]
    pub confidence: f32,
    /// Runner-up labels with their confidence, best first
    pub alternatives: Vec<(Intent, f32)>,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
            alternatives: Vec::new(),
        }
    }
}

/// Fitted one-vs-rest model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvm {
    /// Sorted, unique, never `Unknown`
    labels: Vec<Intent>,
    /// One dense weight row per label
    weights: Vec<Vec<f32>>,
    biases: Vec<f32>,
    /// Training examples per label, for tie-breaking
    class_counts: Vec<usize>,
    dim: usize,
}

impl LinearSvm {
    /// Assemble a model from raw parts (checked).
    pub fn from_parts(
        labels: Vec<Intent>,
        weights: Vec<Vec<f32>>,
        biases: Vec<f32>,
        class_counts: Vec<usize>,
        dim: usize,
    ) -> Result<Self> {
        let model = Self {
            labels,
            weights,
            biases,
            class_counts,
            dim,
        };
        model.check_consistency()?;
        Ok(model)
    }

    pub fn labels(&self) -> &[Intent] {
        &self.labels
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Training examples seen per label
    pub fn class_counts(&self) -> BTreeMap<Intent, usize> {
        self.labels
            .iter()
            .copied()
            .zip(self.class_counts.iter().copied())
            .collect()
    }

    /// Raw `w_k . x + b_k` per label
    pub fn margins(&self, vector: &FeatureVector) -> Vec<f32> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(w, b)| vector.dot(w) + b)
            .collect()
    }

    /// Pick a label for a feature vector under the given decision policy.
    pub fn classify(&self, vector: &FeatureVector, policy: &ClassifierConfig) -> Classification {
        if vector.is_zero() || self.labels.is_empty() {
            return Classification::unknown();
        }

        let margins = self.margins(vector);
        let top = margins.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        // Near-ties go to the better-attested label, then the smaller name
        let chosen = (0..self.labels.len())
            .filter(|&k| margins[k] >= top - policy.tie_epsilon)
            .min_by(|&a, &b| {
                self.class_counts[b]
                    .cmp(&self.class_counts[a])
                    .then_with(|| self.labels[a].as_str().cmp(self.labels[b].as_str()))
            })
            .unwrap_or(0);

        let probs = softmax(&margins, policy.margin_scale);
        let confidence = probs[chosen];

        let mut ranked: Vec<usize> = (0..self.labels.len()).collect();
        ranked.sort_by(|&a, &b| {
            probs[b]
                .total_cmp(&probs[a])
                .then_with(|| self.labels[a].as_str().cmp(self.labels[b].as_str()))
        });

        let low = confidence < policy.min_confidence;
        let alternatives: Vec<(Intent, f32)> = ranked
            .into_iter()
            .filter(|&k| low || k != chosen)
            .take(policy.top_k)
            .map(|k| (self.labels[k], probs[k]))
            .collect();

        let intent = if low {
            Intent::Unknown
        } else {
            self.labels[chosen]
        };

        debug!(
            intent = %intent,
            best = %self.labels[chosen],
            confidence,
            margin = margins[chosen],
            "classified"
        );

        Classification {
            intent,
            confidence,
            alternatives,
        }
    }

    /// Fit one binary SVM per distinct label.
    pub fn train(
        vectors: &[FeatureVector],
        targets: &[Intent],
        dim: usize,
        config: &TrainingConfig,
    ) -> Result<Self> {
        if vectors.len() != targets.len() {
            return Err(NlshError::InvalidTrainingData(format!(
                "{} vectors for {} labels",
                vectors.len(),
                targets.len()
            )));
        }
        if targets.iter().any(|t| t.is_unknown()) {
            return Err(NlshError::InvalidTrainingData(
                "'unknown' is not a trainable label".into(),
            ));
        }

        let mut counts: BTreeMap<Intent, usize> = BTreeMap::new();
        for t in targets {
            *counts.entry(*t).or_insert(0) += 1;
        }
        if counts.len() < 2 {
            return Err(NlshError::InvalidTrainingData(format!(
                "need at least two intents, got {}",
                counts.len()
            )));
        }

        let n = targets.len() as f32;
        let k = counts.len() as f32;
        let sample_c: Vec<f32> = targets
            .iter()
            .map(|t| {
                if config.balanced {
                    config.c * n / (k * counts[t] as f32)
                } else {
                    config.c
                }
            })
            .collect();

        // Diagonal of Q: x.x plus the constant bias feature
        let q_diag: Vec<f32> = vectors
            .iter()
            .map(|v| v.entries.iter().map(|(_, x)| x * x).sum::<f32>() + 1.0)
            .collect();

        let labels: Vec<Intent> = counts.keys().copied().collect();
        let class_counts: Vec<usize> = counts.values().copied().collect();
        let mut weights = Vec::with_capacity(labels.len());
        let mut biases = Vec::with_capacity(labels.len());

        for (class_index, label) in labels.iter().enumerate() {
            let y: Vec<f32> = targets
                .iter()
                .map(|t| if t == label { 1.0 } else { -1.0 })
                .collect();
            let seed = config.seed.wrapping_add(class_index as u64);
            let (w, b, iterations) = solve_binary(vectors, &y, &sample_c, &q_diag, dim, config, seed);
            debug!(label = %label, iterations, "trained binary svm");
            weights.push(w);
            biases.push(b);
        }

        Self::from_parts(labels, weights, biases, class_counts, dim)
    }

    /// Structural check for a deserialised classifier
    pub fn check_consistency(&self) -> Result<()> {
        let k = self.labels.len();
        if k == 0 {
            return Err(NlshError::CorruptModel("classifier has no labels".into()));
        }
        if self.weights.len() != k || self.biases.len() != k || self.class_counts.len() != k {
            return Err(NlshError::CorruptModel(format!(
                "classifier has {} labels but {} weight rows, {} biases, {} counts",
                k,
                self.weights.len(),
                self.biases.len(),
                self.class_counts.len()
            )));
        }
        if self.labels.windows(2).any(|w| w[0] >= w[1]) {
            return Err(NlshError::CorruptModel("classifier labels not sorted and unique".into()));
        }
        if self.labels.contains(&Intent::Unknown) {
            return Err(NlshError::CorruptModel("'unknown' stored as a class".into()));
        }
        if let Some(row) = self.weights.iter().position(|w| w.len() != self.dim) {
            return Err(NlshError::CorruptModel(format!(
                "weight row for '{}' has {} columns, expected {}",
                self.labels[row],
                self.weights[row].len(),
                self.dim
            )));
        }
        let finite = self
            .weights
            .iter()
            .flatten()
            .chain(self.biases.iter())
            .all(|x| x.is_finite());
        if !finite {
            return Err(NlshError::CorruptModel("non-finite classifier weight".into()));
        }
        Ok(())
    }
}

/// Dual coordinate descent for one L1-loss (hinge) SVM.
///
/// Returns (weights, bias, passes).
fn solve_binary(
    vectors: &[FeatureVector],
    y: &[f32],
    upper: &[f32],
    q_diag: &[f32],
    dim: usize,
    config: &TrainingConfig,
    seed: u64,
) -> (Vec<f32>, f32, usize) {
    let mut w = vec![0.0f32; dim];
    let mut b = 0.0f32;
    let mut alpha = vec![0.0f32; vectors.len()];
    let mut order: Vec<usize> = (0..vectors.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut passes = 0;
    while passes < config.max_iter {
        passes += 1;
        order.shuffle(&mut rng);

        let mut pg_max = f32::NEG_INFINITY;
        let mut pg_min = f32::INFINITY;

        for &i in &order {
            let x = &vectors[i];
            let g = y[i] * (x.dot(&w) + b) - 1.0;

            let pg = if alpha[i] <= 0.0 {
                g.min(0.0)
            } else if alpha[i] >= upper[i] {
                g.max(0.0)
            } else {
                g
            };
            pg_max = pg_max.max(pg);
            pg_min = pg_min.min(pg);

            if pg.abs() > 1e-12 {
                let old = alpha[i];
                alpha[i] = (old - g / q_diag[i]).clamp(0.0, upper[i]);
                let delta = (alpha[i] - old) * y[i];
                if delta != 0.0 {
                    for &(j, xj) in &x.entries {
                        if let Some(wj) = w.get_mut(j) {
                            *wj += delta * xj;
                        }
                    }
                    b += delta;
                }
            }
        }

        if pg_max - pg_min <= config.tolerance {
            break;
        }
    }

    (w, b, passes)
}

/// Softmax of `scale * margins`, shifted for numerical stability
fn softmax(margins: &[f32], scale: f32) -> Vec<f32> {
    let max = margins.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = margins.iter().map(|m| ((m - max) * scale).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(usize, f32)], dim: usize) -> FeatureVector {
        FeatureVector {
            dim,
            entries: entries.to_vec(),
        }
    }

    /// Two features, two labels: feature 0 means ListFiles, 1 means Ping
    fn toy_model(counts: [usize; 2]) -> LinearSvm {
        LinearSvm::from_parts(
            vec![Intent::ListFiles, Intent::Ping],
            vec![vec![2.0, -2.0], vec![-2.0, 2.0]],
            vec![0.0, 0.0],
            counts.to_vec(),
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_zero_vector_is_unknown_with_zero_confidence() {
        let model = toy_model([5, 5]);
        let c = model.classify(&vector(&[], 2), &ClassifierConfig::default());
        assert_eq!(c.intent, Intent::Unknown);
        assert_eq!(c.confidence, 0.0);
    }

    #[test]
    fn test_clear_winner() {
        let model = toy_model([5, 5]);
        let c = model.classify(&vector(&[(0, 1.0)], 2), &ClassifierConfig::default());
        assert_eq!(c.intent, Intent::ListFiles);
        assert!(c.confidence > 0.9);
        assert_eq!(c.alternatives.len(), 1);
        assert_eq!(c.alternatives[0].0, Intent::Ping);
    }

    #[test]
    fn test_threshold_yields_unknown() {
        let model = toy_model([5, 5]);
        let policy = ClassifierConfig {
            min_confidence: 0.99,
            ..ClassifierConfig::default()
        };
        let c = model.classify(&vector(&[(0, 0.6), (1, 0.5)], 2), &policy);
        assert_eq!(c.intent, Intent::Unknown);
        assert!(c.confidence < 0.99);
        assert_eq!(c.alternatives[0].0, Intent::ListFiles);
    }

    #[test]
    fn test_tie_prefers_more_examples() {
        let model = toy_model([3, 9]);
        let tied = vector(&[(0, 0.7071), (1, 0.7071)], 2);
        let c = model.classify(&tied, &ClassifierConfig::default());
        assert_eq!(c.intent, Intent::Ping);
    }

    #[test]
    fn test_tie_with_equal_counts_prefers_lexicographic_label() {
        let model = toy_model([4, 4]);
        let tied = vector(&[(0, 0.7071), (1, 0.7071)], 2);
        let c = model.classify(&tied, &ClassifierConfig::default());
        assert_eq!(c.intent, Intent::ListFiles);
        assert!((c.confidence - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_train_separates_toy_classes() {
        let vectors = vec![
            vector(&[(0, 1.0)], 3),
            vector(&[(0, 0.8), (2, 0.6)], 3),
            vector(&[(1, 1.0)], 3),
            vector(&[(1, 0.8), (2, 0.6)], 3),
        ];
        let targets = vec![Intent::ListFiles, Intent::ListFiles, Intent::Ping, Intent::Ping];
        let model = LinearSvm::train(&vectors, &targets, 3, &TrainingConfig::default()).unwrap();

        let policy = ClassifierConfig::default();
        assert_eq!(model.classify(&vector(&[(0, 1.0)], 3), &policy).intent, Intent::ListFiles);
        assert_eq!(model.classify(&vector(&[(1, 1.0)], 3), &policy).intent, Intent::Ping);
        assert_eq!(model.class_counts()[&Intent::Ping], 2);
    }

    #[test]
    fn test_training_is_deterministic() {
        let vectors = vec![
            vector(&[(0, 1.0)], 2),
            vector(&[(1, 1.0)], 2),
            vector(&[(0, 0.6), (1, 0.8)], 2),
        ];
        let targets = vec![Intent::ListFiles, Intent::Ping, Intent::Ping];
        let a = LinearSvm::train(&vectors, &targets, 2, &TrainingConfig::default()).unwrap();
        let b = LinearSvm::train(&vectors, &targets, 2, &TrainingConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_class_rejected() {
        let vectors = vec![vector(&[(0, 1.0)], 1)];
        let err = LinearSvm::train(&vectors, &[Intent::Ping], 1, &TrainingConfig::default());
        assert!(matches!(err, Err(NlshError::InvalidTrainingData(_))));
    }

    #[test]
    fn test_dimension_mismatch_is_corrupt() {
        let err = LinearSvm::from_parts(
            vec![Intent::ListFiles, Intent::Ping],
            vec![vec![1.0, 0.0], vec![1.0]],
            vec![0.0, 0.0],
            vec![1, 1],
            2,
        );
        assert!(matches!(err, Err(NlshError::CorruptModel(_))));
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let p = softmax(&[1.0, -0.5, 0.2], 5.0);
        assert!((p.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!(p[0] > p[2] && p[2] > p[1]);
    }
}
