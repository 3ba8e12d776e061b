//! Configuration for the translation pipeline.
//!
//! Config file: ~/.config/nlsh/config.toml or /etc/nlsh/config.toml.
//! Every field has a default, so an empty or partial file is valid.

use crate::error::{NlshError, Result};
use crate::intent::TargetOs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Classifier decision policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Confidence below this yields the `unknown` intent
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Labels whose margin is within this distance of the top margin tie
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f32,

    /// Margins are multiplied by this before the softmax
    #[serde(default = "default_margin_scale")]
    pub margin_scale: f32,

    /// Number of alternatives reported with a classification
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_min_confidence() -> f32 {
    0.35
}

fn default_tie_epsilon() -> f32 {
    0.05
}

fn default_margin_scale() -> f32 {
    // Hinge margins sit roughly in [-1.5, 1.5]
    5.0
}

fn default_top_k() -> usize {
    3
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            tie_epsilon: default_tie_epsilon(),
            margin_scale: default_margin_scale(),
            top_k: default_top_k(),
        }
    }
}

/// Feature extraction settings (fixed at fit time, stored in the model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Largest word n-gram
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,

    /// Vocabulary cap
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Use 1 + ln(tf) instead of raw term counts
    #[serde(default = "default_sublinear_tf")]
    pub sublinear_tf: bool,
}

fn default_ngram_max() -> usize {
    3
}

fn default_max_features() -> usize {
    5_000
}

fn default_sublinear_tf() -> bool {
    true
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_max: default_ngram_max(),
            max_features: default_max_features(),
            sublinear_tf: default_sublinear_tf(),
        }
    }
}

/// SVM training settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Inverse regularisation strength
    #[serde(default = "default_c")]
    pub c: f32,

    /// Dual coordinate descent passes per class
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// Stop once the projected gradient spread falls below this
    #[serde(default = "default_tolerance")]
    pub tolerance: f32,

    /// Weight classes inversely to their frequency
    #[serde(default = "default_balanced")]
    pub balanced: bool,

    /// Folds for cross-validation on retrain
    #[serde(default = "default_cv_folds")]
    pub cv_folds: usize,

    /// Seed for example shuffling
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_c() -> f32 {
    1.0
}

fn default_max_iter() -> usize {
    1_000
}

fn default_tolerance() -> f32 {
    0.1
}

fn default_balanced() -> bool {
    true
}

fn default_cv_folds() -> usize {
    5
}

fn default_seed() -> u64 {
    42
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            c: default_c(),
            max_iter: default_max_iter(),
            tolerance: default_tolerance(),
            balanced: default_balanced(),
            cv_folds: default_cv_folds(),
            seed: default_seed(),
        }
    }
}

/// File locations. Unset paths resolve under the XDG data directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_data: Option<PathBuf>,

    /// Optional TOML file with template overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,
}

impl PathsConfig {
    pub fn model_path(&self) -> PathBuf {
        self.model
            .clone()
            .unwrap_or_else(|| data_dir().join("model.json"))
    }

    pub fn training_data_path(&self) -> PathBuf {
        self.training_data
            .clone()
            .unwrap_or_else(|| data_dir().join("training.json"))
    }
}

/// Shell selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Overrides host detection when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_os: Option<TargetOs>,
}

impl ShellConfig {
    pub fn target_os(&self) -> TargetOs {
        self.default_os.unwrap_or_else(TargetOs::host)
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NlshConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub vectorizer: VectorizerConfig,

    #[serde(default)]
    pub training: TrainingConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub shell: ShellConfig,
}

/// ~/.local/share/nlsh (or platform equivalent)
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nlsh")
}

impl NlshConfig {
    /// User config path: ~/.config/nlsh/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("nlsh").join("config.toml"))
    }

    /// System config path: /etc/nlsh/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/nlsh/config.toml")
    }

    /// Load configuration.
    ///
    /// Priority:
    /// 1. Explicit path (must exist)
    /// 2. User config (~/.config/nlsh/config.toml)
    /// 3. System config (/etc/nlsh/config.toml)
    /// 4. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)
            .map_err(|e| NlshError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: NlshConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| NlshError::Config(e.to_string()))
    }

    /// Reject values that would make the pipeline misbehave silently.
    /// Comparisons are written so that NaN fails them.
    pub fn validate(&self) -> Result<()> {
        let c = &self.classifier;
        if !(0.0..=1.0).contains(&c.min_confidence) {
            return Err(NlshError::Config(format!(
                "classifier.min_confidence must be in [0, 1], got {}",
                c.min_confidence
            )));
        }
        if !(c.tie_epsilon >= 0.0 && c.tie_epsilon.is_finite()) {
            return Err(NlshError::Config(format!(
                "classifier.tie_epsilon must be a finite number >= 0, got {}",
                c.tie_epsilon
            )));
        }
        if !(c.margin_scale > 0.0 && c.margin_scale.is_finite()) {
            return Err(NlshError::Config(format!(
                "classifier.margin_scale must be a finite number > 0, got {}",
                c.margin_scale
            )));
        }

        let v = &self.vectorizer;
        if v.ngram_max == 0 {
            return Err(NlshError::Config("vectorizer.ngram_max must be >= 1".into()));
        }
        if v.max_features == 0 {
            return Err(NlshError::Config("vectorizer.max_features must be >= 1".into()));
        }

        let t = &self.training;
        if !(t.c > 0.0 && t.c.is_finite()) {
            return Err(NlshError::Config(format!("training.c must be a finite number > 0, got {}", t.c)));
        }
        if !(t.tolerance > 0.0 && t.tolerance.is_finite()) {
            return Err(NlshError::Config(format!(
                "training.tolerance must be a finite number > 0, got {}",
                t.tolerance
            )));
        }
        if t.max_iter == 0 {
            return Err(NlshError::Config("training.max_iter must be >= 1".into()));
        }
        if t.cv_folds < 2 {
            return Err(NlshError::Config("training.cv_folds must be >= 2".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = NlshConfig::from_toml_str("").unwrap();
        assert_eq!(config, NlshConfig::default());
        assert_eq!(config.classifier.min_confidence, 0.35);
        assert_eq!(config.vectorizer.ngram_max, 3);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = NlshConfig::from_toml_str(
            r#"
            [classifier]
            min_confidence = 0.6

            [shell]
            default_os = "windows"
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.min_confidence, 0.6);
        assert_eq!(config.classifier.top_k, 3);
        assert_eq!(config.shell.target_os(), TargetOs::Windows);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let err = NlshConfig::from_toml_str("[classifier]\nmin_confidence = 1.5\n").unwrap_err();
        assert!(matches!(err, NlshError::Config(_)));
    }

    #[test]
    fn test_nan_and_infinite_values_rejected() {
        for contents in [
            "[classifier]\ntie_epsilon = nan\n",
            "[classifier]\nmargin_scale = nan\n",
            "[classifier]\nmargin_scale = inf\n",
            "[classifier]\nmin_confidence = nan\n",
            "[training]\nc = nan\n",
            "[training]\ntolerance = -inf\n",
        ] {
            let err = NlshConfig::from_toml_str(contents).unwrap_err();
            assert!(matches!(err, NlshError::Config(_)), "{}", contents);
        }
    }

    #[test]
    fn test_single_fold_rejected() {
        assert!(NlshConfig::from_toml_str("[training]\ncv_folds = 1\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[paths]\nmodel = \"/tmp/nlsh-model.json\"\n").unwrap();

        let config = NlshConfig::load(Some(&path)).unwrap();
        assert_eq!(config.paths.model_path(), PathBuf::from("/tmp/nlsh-model.json"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = NlshConfig::load(Some(Path::new("/nonexistent/nlsh.toml"))).unwrap_err();
        assert!(matches!(err, NlshError::Io(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = NlshConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(NlshConfig::from_toml_str(&text).unwrap(), config);
    }
}
