//! Safety gate for generated commands.
//!
//! Critical patterns are blocked outright. High and medium risk patterns
//! need explicit confirmation before the caller may run the command.
//! Matching is case-insensitive and runs on the final, filled command.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum SafetyVerdict {
    Safe,
    RequiresConfirmation { level: RiskLevel, reason: String },
    Blocked { reason: String },
}

impl SafetyVerdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyVerdict::Safe)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, SafetyVerdict::Blocked { .. })
    }
}

/// Root-like targets: `/`, `/*`, `~`, `$HOME` and top-level system dirs
const ROOT_LIKE: &str = r#"["']?(?:/\*?|~/?|\$home/?|/(?:bin|boot|dev|etc|home|lib|lib64|opt|proc|root|sbin|srv|sys|usr|var)/?\*?)["']?(?:\s|;|&|\||$)"#;

/// (level, pattern, reason)
static DENYLIST: LazyLock<Vec<(RiskLevel, Regex, &'static str)>> = LazyLock::new(|| {
    let rule = |level, pattern: &str, reason| (level, Regex::new(pattern).unwrap(), reason);
    vec![
        // Critical
        rule(
            RiskLevel::Critical,
            &format!(r"(?i)\brm\s+(?:-\S+\s+)*-[a-z]*r[a-z]*\s+(?:-\S+\s+)*{ROOT_LIKE}"),
            "recursive delete of a root-level path",
        ),
        rule(
            RiskLevel::Critical,
            r#"(?i)\bremove-item\b[^;|&]*-recurse[^;|&]*\s["']?(?:[a-z]:\\?\*?|/)["']?(?:\s|$)"#,
            "recursive delete of a drive root",
        ),
        rule(
            RiskLevel::Critical,
            r#"(?i)\b(?:rd|rmdir|del)\s+(?:/\w\s+)*["']?[a-z]:\\?\*?["']?(?:\s|$)"#,
            "delete of a drive root",
        ),
        rule(RiskLevel::Critical, r"(?i)\bmkfs(?:\.\w+)?\b", "filesystem formatting"),
        rule(RiskLevel::Critical, r"(?i)\bformat(?:-volume)?\s+[a-z]:", "drive formatting"),
        rule(RiskLevel::Critical, r"(?i)\bdd\s+(?:\S+\s+)*if=", "raw disk copy with dd"),
        rule(
            RiskLevel::Critical,
            r":\(\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:",
            "fork bomb",
        ),
        rule(
            RiskLevel::Critical,
            r"(?i)>\s*/dev/(?:sd[a-z]|hd[a-z]|nvme\d|mmcblk\d|disk\d)",
            "write to a raw block device",
        ),
        rule(
            RiskLevel::Critical,
            r#"(?i)\bchmod\s+(?:-\S+\s+)*-[a-z]*r[a-z]*\s+0?777\s+["']?/["']?(?:\s|$)"#,
            "world-writable root filesystem",
        ),
        // High
        rule(RiskLevel::High, r"(?i)\brm\s+(?:-\S+\s+)*-[a-z]*r", "recursive delete"),
        rule(RiskLevel::High, r"(?i)\brmdir\s+/s\b", "recursive delete"),
        rule(RiskLevel::High, r"(?i)\bdel\s+(?:/\w\s+)*/s\b", "recursive delete"),
        rule(RiskLevel::High, r"(?i)\bremove-item\b[^;|&]*-recurse", "recursive delete"),
        rule(RiskLevel::High, r"(?i)\bsudo\s+rm\b", "delete as root"),
        rule(
            RiskLevel::High,
            r"(?i)\bch(?:mod|own)\s+(?:-\S+\s+)*-[a-z]*r",
            "recursive permission or ownership change",
        ),
        rule(
            RiskLevel::High,
            r"(?i)\b(?:shutdown|reboot|poweroff|halt)\b",
            "shuts down or restarts the machine",
        ),
        rule(RiskLevel::High, r"(?i)\binit\s+[06]\b", "shuts down or restarts the machine"),
        rule(
            RiskLevel::High,
            r"(?i)\b(?:stop|restart)-computer\b",
            "shuts down or restarts the machine",
        ),
        rule(RiskLevel::High, r"(?i)\bkill\s+-9\b", "force-kills a process"),
        rule(
            RiskLevel::High,
            r"(?i)\b(?:pkill|killall|taskkill|stop-process)\b",
            "terminates processes",
        ),
        rule(RiskLevel::High, r"(?i)\btruncate\b", "truncates files"),
        rule(
            RiskLevel::High,
            r"(?i)\b(?:curl|wget|invoke-webrequest|iwr)\b[^;]*\|\s*(?:sudo\s+)?(?:ba|z|da)?sh\b",
            "pipes a download into a shell",
        ),
        // Medium
        rule(RiskLevel::Medium, r"(?i)\bsudo\b", "runs with root privileges"),
        rule(RiskLevel::Medium, r"(?i)\b(?:rm|del)\s", "deletes files"),
        rule(RiskLevel::Medium, r"(?i)\bremove-item\b", "deletes files"),
        rule(RiskLevel::Medium, r"(?i)\b(?:mv|move|move-item)\s", "moves or overwrites files"),
        rule(RiskLevel::Medium, r"(?i)\bch(?:mod|own)\b", "changes permissions or ownership"),
        rule(RiskLevel::Medium, r"(?i)\bicacls\b[^;]*/setowner", "changes ownership"),
        rule(RiskLevel::Medium, r"(?i)\bpip3?\s+install\b", "installs Python packages"),
        rule(RiskLevel::Medium, r"(?i)\bnpm\s+install\s+-g\b", "installs global npm packages"),
        rule(RiskLevel::Medium, r"(?i)\b(?:apt|apt-get|dnf|yum|pacman|winget)\s+(?:install|upgrade)\b", "changes installed software"),
    ]
});

/// A matched denylist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFinding {
    pub level: RiskLevel,
    pub reason: String,
}

/// Every denylist entry the command matches, highest level first.
pub fn assess(command: &str) -> Vec<RiskFinding> {
    let mut findings: Vec<RiskFinding> = DENYLIST
        .iter()
        .filter(|(_, re, _)| re.is_match(command))
        .map(|(level, _, reason)| RiskFinding {
            level: *level,
            reason: (*reason).to_string(),
        })
        .collect();
    findings.sort_by(|a, b| b.level.cmp(&a.level));
    findings.dedup();
    findings
}

/// Highest risk level of a command (`Low` when nothing matches)
pub fn risk_level(command: &str) -> RiskLevel {
    assess(command)
        .first()
        .map(|f| f.level)
        .unwrap_or(RiskLevel::Low)
}

/// Verdict for a command string.
pub fn check(command: &str) -> SafetyVerdict {
    let findings = assess(command);
    let verdict = match findings.first() {
        None => SafetyVerdict::Safe,
        Some(top) if top.level == RiskLevel::Critical => SafetyVerdict::Blocked {
            reason: top.reason.clone(),
        },
        Some(top) => SafetyVerdict::RequiresConfirmation {
            level: top.level,
            reason: top.reason.clone(),
        },
    };
    debug!(command, ?verdict, "safety check");
    verdict
}

/// Verdict for a generated command whose template may be flagged
/// destructive. A destructive template never yields `Safe`.
pub fn check_generated(command: &str, destructive: bool) -> SafetyVerdict {
    match check(command) {
        SafetyVerdict::Safe if destructive => SafetyVerdict::RequiresConfirmation {
            level: RiskLevel::Medium,
            reason: "modifies files or system state".to_string(),
        },
        verdict => verdict,
    }
}
