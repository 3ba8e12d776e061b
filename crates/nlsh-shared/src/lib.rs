//! Shared core for nlsh: natural language to shell command translation.
//!
//! Pipeline: vectorizer → classifier ‖ entity extractor → context resolver
//! → template engine (values quoted per shell) → safety gate.

pub mod classifier;
pub mod config;
pub mod context;
pub mod entities;
pub mod error;
pub mod explain;
pub mod intent;
pub mod model;
pub mod quoting;
pub mod safety;
pub mod template_data;
pub mod templates;
pub mod training;
pub mod translator;
pub mod vectorizer;
pub mod version;

pub use classifier::Classification;
pub use config::NlshConfig;
pub use context::{ResolvedEntity, SessionContext};
pub use entities::{Entity, EntityKind};
pub use error::{NlshError, Result};
pub use intent::{Intent, TargetOs};
pub use model::{ModelSnapshot, ModelStore};
pub use safety::{RiskLevel, SafetyVerdict};
pub use templates::{GenerateError, TemplateTable};
pub use training::TrainingExample;
pub use translator::{ClarificationReason, Outcome, Translation, Translator};
pub use version::{VersionInfo, BUILD_DATE, GIT_SHA, MODEL_FORMAT_VERSION, VERSION};

/// Environment variable overriding the translation history log path
pub const LOG_FILE_ENV: &str = "NLSH_LOG_FILE";
