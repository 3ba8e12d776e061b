//! TF-IDF feature extraction over word n-grams.
//!
//! Fit and inference share one normalisation and tokenisation path
//! (`terms`), so a phrase always maps to the same features it was trained on.

use crate::config::VectorizerConfig;
use crate::error::{NlshError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

/// Word tokens of two or more characters
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

/// Lowercase and trim an utterance
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Word tokens of a normalised utterance
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    TOKEN_RE
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// All word n-grams of length 1..=ngram_max, joined by single spaces
pub fn terms(text: &str, ngram_max: usize) -> Vec<String> {
    let tokens = tokenize(text);
    let mut out = Vec::with_capacity(tokens.len() * ngram_max.max(1));
    for n in 1..=ngram_max.max(1) {
        if n > tokens.len() {
            break;
        }
        for window in tokens.windows(n) {
            out.push(window.join(" "));
        }
    }
    out
}

/// Sparse, L2-normalised feature vector. Entries are sorted by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub dim: usize,
    pub entries: Vec<(usize, f32)>,
}

impl FeatureVector {
    /// True when no term of the utterance is in the vocabulary
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense weight vector
    pub fn dot(&self, weights: &[f32]) -> f32 {
        self.entries
            .iter()
            .filter_map(|(i, v)| weights.get(*i).map(|w| w * v))
            .sum()
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f32>().sqrt()
    }
}

/// Fitted (or empty) TF-IDF vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    /// term -> column index
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: BTreeMap::new(),
            idf: Vec::new(),
        }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    /// Feature dimension
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    /// Learn the vocabulary and document frequencies from a corpus.
    ///
    /// The vocabulary keeps the `max_features` most frequent terms across the
    /// corpus (ties broken lexicographically); column indices follow the
    /// lexicographic order of the kept terms.
    pub fn fit<S: AsRef<str>>(&mut self, docs: &[S]) -> Result<()> {
        if docs.is_empty() {
            return Err(NlshError::InvalidTrainingData(
                "cannot fit vectorizer on an empty corpus".into(),
            ));
        }

        let mut corpus_freq: HashMap<String, u64> = HashMap::new();
        let mut doc_freq: HashMap<String, u64> = HashMap::new();

        for doc in docs {
            let doc_terms = terms(doc.as_ref(), self.config.ngram_max);
            let mut seen = HashSet::new();
            for term in doc_terms {
                *corpus_freq.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        if corpus_freq.is_empty() {
            return Err(NlshError::InvalidTrainingData(
                "corpus contains no tokens of two or more characters".into(),
            ));
        }

        let mut ranked: Vec<(String, u64)> = corpus_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.config.max_features);

        let mut kept: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        kept.sort();

        let n = docs.len() as f32;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(kept.len());
        for (index, term) in kept.into_iter().enumerate() {
            let df = doc_freq.get(&term).copied().unwrap_or(0) as f32;
            idf.push(((1.0 + n) / (1.0 + df)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        self.vocabulary = vocabulary;
        self.idf = idf;
        Ok(())
    }

    /// Map an utterance to its feature vector.
    pub fn vectorize(&self, text: &str) -> Result<FeatureVector> {
        if !self.is_fitted() {
            return Err(NlshError::UnfittedModel);
        }

        let mut counts: HashMap<usize, u32> = HashMap::new();
        for term in terms(text, self.config.ngram_max) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, f32)> = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f32).ln()
                } else {
                    count as f32
                };
                (index, tf * self.idf[index])
            })
            .collect();
        entries.sort_by_key(|(index, _)| *index);

        let norm = entries.iter().map(|(_, v)| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, v) in entries.iter_mut() {
                *v /= norm;
            }
        }

        Ok(FeatureVector {
            dim: self.dim(),
            entries,
        })
    }

    /// Structural check for a deserialised vectorizer
    pub fn check_consistency(&self) -> Result<()> {
        if self.idf.len() != self.vocabulary.len() {
            return Err(NlshError::CorruptModel(format!(
                "vectorizer has {} idf weights for {} terms",
                self.idf.len(),
                self.vocabulary.len()
            )));
        }
        let mut seen = vec![false; self.idf.len()];
        for (term, &index) in &self.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(NlshError::CorruptModel(format!(
                        "vocabulary term '{}' has invalid column {}",
                        term, index
                    )))
                }
            }
        }
        if self.idf.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(NlshError::CorruptModel("non-positive idf weight".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted(docs: &[&str]) -> TfidfVectorizer {
        let mut v = TfidfVectorizer::new(VectorizerConfig::default());
        v.fit(docs).unwrap();
        v
    }

    #[test]
    fn test_tokenize_drops_single_chars_and_lowercases() {
        assert_eq!(tokenize("  Make A Folder  "), vec!["make", "folder"]);
    }

    #[test]
    fn test_terms_include_ngrams() {
        let t = terms("create new folder", 3);
        assert!(t.contains(&"create".to_string()));
        assert!(t.contains(&"create new".to_string()));
        assert!(t.contains(&"create new folder".to_string()));
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn test_unfitted_vectorize_fails() {
        let v = TfidfVectorizer::new(VectorizerConfig::default());
        assert!(matches!(v.vectorize("list files"), Err(NlshError::UnfittedModel)));
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let mut v = TfidfVectorizer::new(VectorizerConfig::default());
        let empty: [&str; 0] = [];
        assert!(v.fit(&empty).is_err());
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let v = fitted(&["list files", "show all files here", "create a folder"]);
        let fv = v.vectorize("show files").unwrap();
        assert!((fv.norm() - 1.0).abs() < 1e-5);
        assert_eq!(fv.dim, v.dim());
    }

    #[test]
    fn test_out_of_vocabulary_is_zero_vector() {
        let v = fitted(&["list files", "create a folder"]);
        let fv = v.vectorize("xyzzy plugh").unwrap();
        assert!(fv.is_zero());
    }

    #[test]
    fn test_vectorize_is_deterministic() {
        let v = fitted(&["list files", "show all files here", "create a folder"]);
        assert_eq!(v.vectorize("list all files").unwrap(), v.vectorize("list all files").unwrap());
        assert_eq!(v.vectorize("LIST all files ").unwrap(), v.vectorize("list all files").unwrap());
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        // "files" appears in every doc, "folder" in one
        let v = fitted(&["list files", "delete files", "folder files"]);
        let fv = v.vectorize("folder files").unwrap();
        let folder = v.vocabulary["folder"];
        let files = v.vocabulary["files"];
        let weight = |i: usize| fv.entries.iter().find(|(j, _)| *j == i).unwrap().1;
        assert!(weight(folder) > weight(files));
    }

    #[test]
    fn test_max_features_keeps_most_frequent_then_lexicographic() {
        let mut v = TfidfVectorizer::new(VectorizerConfig {
            ngram_max: 1,
            max_features: 2,
            sublinear_tf: true,
        });
        v.fit(&["zeta beta", "zeta alpha"]).unwrap();
        let kept: Vec<&str> = v.vocabulary.keys().map(|s| s.as_str()).collect();
        assert_eq!(kept, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_consistency_check_flags_bad_idf() {
        let mut v = fitted(&["list files"]);
        v.idf.pop();
        assert!(matches!(v.check_consistency(), Err(NlshError::CorruptModel(_))));
    }
}
