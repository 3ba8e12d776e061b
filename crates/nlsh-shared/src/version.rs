//! Build and format version information.

use serde::{Deserialize, Serialize};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git commit hash (set by build.rs)
pub const GIT_SHA: &str = env!("NLSH_GIT_SHA");

/// UTC build date (set by build.rs)
pub const BUILD_DATE: &str = env!("NLSH_BUILD_DATE");

/// Version of the serialized model artifact layout.
/// Bump whenever `ModelSnapshot` changes shape.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_sha: String,
    pub build_date: String,
    pub model_format: u32,
}

impl VersionInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION.to_string(),
            git_sha: GIT_SHA.to_string(),
            build_date: BUILD_DATE.to_string(),
            model_format: MODEL_FORMAT_VERSION,
        }
    }
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, built {})", self.version, self.git_sha, self.build_date)
    }
}
