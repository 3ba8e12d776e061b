//! Logging for nlshctl
//!
//! `init_tracing` sets up diagnostics on stderr. `HistoryEntry` appends one
//! JSON line per translation to an XDG state file; failures to write it are
//! ignored so the generated command on stdout is never disturbed. Query and
//! command are redacted before they are written.

use crate::redact::redact_translation;
use nlsh_shared::{Outcome, Translation, LOG_FILE_ENV};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// History entry for each translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// ISO 8601 timestamp
    pub ts: String,

    /// Request ID (UUID)
    pub req_id: String,

    /// Query with quoted literals masked
    pub query: String,

    /// posix or windows
    pub os: String,

    /// Outcome status (command, clarification, ...)
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Intent of each step
    #[serde(default)]
    pub intents: Vec<String>,

    pub model_version: u64,

    /// Duration in milliseconds
    pub duration_ms: u64,

    /// Exit code
    pub exit_code: i32,
}

impl HistoryEntry {
    pub fn from_translation(translation: &Translation, duration_ms: u64, exit_code: i32) -> Self {
        let (query, command) = redact_translation(translation);
        Self {
            ts: Self::now(),
            req_id: Self::generate_req_id(),
            query,
            os: translation.os.to_string(),
            status: status_name(&translation.outcome).to_string(),
            command,
            intents: translation
                .steps
                .iter()
                .map(|s| s.intent.as_str().to_string())
                .collect(),
            model_version: translation.model_version,
            duration_ms,
            exit_code,
        }
    }

    /// Discover log file path with fallback chain
    ///
    /// Priority:
    /// 1. $NLSH_LOG_FILE (explicit override)
    /// 2. $XDG_STATE_HOME/nlsh/history.jsonl
    /// 3. ~/.local/state/nlsh/history.jsonl
    pub fn discover_log_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(LOG_FILE_ENV) {
            return Some(PathBuf::from(path));
        }

        if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
            return Some(PathBuf::from(xdg_state).join("nlsh/history.jsonl"));
        }

        dirs::home_dir().map(|home| home.join(".local/state/nlsh/history.jsonl"))
    }

    /// Append to the discovered log file; silently skipped when that fails
    pub fn write(&self) {
        let Some(path) = Self::discover_log_path() else {
            return;
        };
        if let Err(e) = self.write_to(&path) {
            tracing::debug!(path = %path.display(), error = %e, "history log not written");
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", json)?;
        Ok(())
    }

    /// Generate request ID
    pub fn generate_req_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Get current timestamp in ISO 8601 format
    pub fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

pub fn status_name(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Command { .. } => "command",
        Outcome::NeedsConfirmation { .. } => "needs_confirmation",
        Outcome::Clarification { .. } => "clarification",
        Outcome::Unsupported { .. } => "unsupported",
        Outcome::Blocked { .. } => "blocked",
    }
}
