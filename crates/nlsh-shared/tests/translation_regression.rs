//! Translation Regression Suite
//!
//! Loads cases from tests/data/translation_cases.toml and runs each one
//! through a translator trained on the built-in corpus.
//!
//! Run with: cargo test -p nlsh-shared --test translation_regression

use nlsh_shared::training::builtin_examples;
use nlsh_shared::{ModelSnapshot, NlshConfig, Outcome, SessionContext, TargetOs, Translator};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::LazyLock;

#[derive(Debug, Deserialize)]
struct TranslationCase {
    id: String,
    query: String,
    os: String,
    #[serde(default)]
    session: Vec<String>,
    expect_status: String,
    #[serde(default)]
    expect_intent: Option<String>,
    #[serde(default)]
    expect_command: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    notes: String,
}

#[derive(Debug, Deserialize)]
struct TranslationSuite {
    case: Vec<TranslationCase>,
}

fn load_suite() -> TranslationSuite {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/translation_cases.toml");
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    toml::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

static TRANSLATOR: LazyLock<Translator> = LazyLock::new(|| {
    let config = NlshConfig::default();
    let snapshot = ModelSnapshot::train(&builtin_examples(), &config).expect("train builtin corpus");
    Translator::with_snapshot(snapshot, &config)
});

fn status(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Command { .. } => "command",
        Outcome::NeedsConfirmation { .. } => "needs_confirmation",
        Outcome::Clarification { .. } => "clarification",
        Outcome::Unsupported { .. } => "unsupported",
        Outcome::Blocked { .. } => "blocked",
    }
}

#[test]
fn test_suite_loads() {
    let suite = load_suite();
    assert!(suite.case.len() >= 10);
    let mut ids: Vec<&str> = suite.case.iter().map(|c| c.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), suite.case.len(), "duplicate case ids");
    for case in &suite.case {
        assert!(case.os.parse::<TargetOs>().is_ok(), "{}: bad os", case.id);
    }
}

#[test]
fn test_translation_cases() {
    let mut failures = Vec::new();

    for case in load_suite().case {
        let os: TargetOs = case.os.parse().unwrap();
        let mut session = SessionContext::new();
        for earlier in &case.session {
            TRANSLATOR.translate(earlier, os, &mut session).unwrap();
        }
        let tr = TRANSLATOR.translate(&case.query, os, &mut session).unwrap();

        let got_status = status(&tr.outcome);
        if got_status != case.expect_status {
            failures.push(format!(
                "{}: status {} (expected {}) for {:?}",
                case.id, got_status, case.expect_status, tr.outcome
            ));
            continue;
        }
        if let Some(expected) = &case.expect_command {
            if tr.command() != Some(expected.as_str()) {
                failures.push(format!("{}: command {:?} (expected {})", case.id, tr.command(), expected));
            }
        }
        if let Some(expected) = &case.expect_intent {
            let got = tr.steps.last().map(|s| s.intent.as_str()).unwrap_or("none");
            if got != expected {
                failures.push(format!("{}: intent {} (expected {})", case.id, got, expected));
            }
        }
    }

    assert!(failures.is_empty(), "regressions:\n{}", failures.join("\n"));
}
