//! Translation pipeline.
//!
//! Each step of an utterance is classified, its entities extracted and
//! resolved against the session, its template filled and the result passed
//! through the safety gate. Steps share one `SessionContext`; the first step
//! that does not produce a command decides the outcome.

use crate::classifier::Classification;
use crate::config::{ClassifierConfig, NlshConfig};
use crate::context::{self, ResolvedEntity, SessionContext, Unresolved};
use crate::entities::{extract, Entity, EntityKind};
use crate::error::Result;
use crate::intent::{Intent, TargetOs};
use crate::model::{ModelSnapshot, ModelStore};
use crate::safety::{self, RiskLevel, SafetyVerdict};
use crate::templates::{GenerateError, Slot, TemplateTable};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Step separators, longest first. Matched case-insensitively outside quotes.
const SEPARATORS: &[&str] = &[
    ", and then ",
    " and then ",
    ", then ",
    " then ",
    " and ",
    " && ",
    " & ",
];

/// Why the translator needs more input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClarificationReason {
    EmptyInput,
    LowConfidence { confidence: f32 },
    NoAntecedent { slot: Slot, reference: String },
    MissingSlot { slot: Slot, expected: EntityKind },
}

/// Result of a translation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Command {
        command: String,
    },
    NeedsConfirmation {
        command: String,
        level: RiskLevel,
        reason: String,
    },
    Clarification {
        reason: ClarificationReason,
        prompt: String,
    },
    Unsupported {
        intent: Intent,
        os: TargetOs,
    },
    Blocked {
        reason: String,
    },
}

impl Outcome {
    /// The command, if one was produced
    pub fn command(&self) -> Option<&str> {
        match self {
            Outcome::Command { command } | Outcome::NeedsConfirmation { command, .. } => {
                Some(command)
            }
            _ => None,
        }
    }

    pub fn is_command(&self) -> bool {
        self.command().is_some()
    }
}

/// Details of one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub text: String,
    pub intent: Intent,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<(Intent, f32)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<ResolvedEntity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub query: String,
    pub os: TargetOs,
    pub model_version: u64,
    pub steps: Vec<StepResult>,
    pub outcome: Outcome,
}

impl Translation {
    pub fn command(&self) -> Option<&str> {
        self.outcome.command()
    }
}

/// Split an utterance into steps on connectives outside quotes.
pub fn split_steps(text: &str) -> Vec<String> {
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let lower = text.to_ascii_lowercase();
    let mut steps = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    let mut skip_until = 0;

    for (i, ch) in text.char_indices() {
        if i < skip_until {
            prev = Some(ch);
            continue;
        }
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '"' => quote = Some(ch),
            // an apostrophe inside a word ("what's") does not open a quote
            None if ch == '\'' && prev.map_or(true, char::is_whitespace) => quote = Some(ch),
            None => {
                if let Some(sep) = SEPARATORS.iter().find(|s| lower[i..].starts_with(**s)) {
                    steps.push(text[start..i].to_string());
                    start = i + sep.len();
                    skip_until = start;
                }
            }
        }
        prev = Some(ch);
    }
    steps.push(text[start..].to_string());

    steps
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Shareable translator; sessions are passed in per request.
#[derive(Debug)]
pub struct Translator {
    store: Arc<ModelStore>,
    templates: TemplateTable,
    policy: ClassifierConfig,
}

impl Translator {
    pub fn new(store: Arc<ModelStore>, templates: TemplateTable, policy: ClassifierConfig) -> Self {
        Self {
            store,
            templates,
            policy,
        }
    }

    /// Translator over a single snapshot with built-in templates
    pub fn with_snapshot(snapshot: ModelSnapshot, config: &NlshConfig) -> Self {
        Self::new(
            Arc::new(ModelStore::with_snapshot(snapshot)),
            TemplateTable::new(),
            config.classifier.clone(),
        )
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    pub fn templates(&self) -> &TemplateTable {
        &self.templates
    }

    pub fn policy(&self) -> &ClassifierConfig {
        &self.policy
    }

    /// Classify a single step with the current snapshot
    pub fn classify(&self, text: &str) -> Result<Classification> {
        self.store.current()?.classify(text, &self.policy)
    }

    /// Translate an utterance for `os`, updating `session` with the
    /// entities of every step that produced a command.
    pub fn translate(
        &self,
        text: &str,
        os: TargetOs,
        session: &mut SessionContext,
    ) -> Result<Translation> {
        let snapshot = self.store.current()?;
        let parts = split_steps(text);
        debug!(query = text, steps = parts.len(), os = %os, "translating");

        if parts.is_empty() {
            return Ok(Translation {
                query: text.to_string(),
                os,
                model_version: snapshot.version,
                steps: Vec::new(),
                outcome: Outcome::Clarification {
                    reason: ClarificationReason::EmptyInput,
                    prompt: "Describe what you want to do, e.g. 'list files'.".to_string(),
                },
            });
        }

        let mut steps = Vec::with_capacity(parts.len());
        let mut stopped: Option<Outcome> = None;
        for part in parts {
            let step = self.translate_step(&snapshot, &part, os, session)?;
            let produced = step.outcome.is_command();
            if !produced {
                stopped = Some(step.outcome.clone());
            }
            steps.push(step);
            if !produced {
                break;
            }
        }

        let outcome = match stopped {
            Some(outcome) => outcome,
            None => combine(&steps, os),
        };
        info!(query = text, os = %os, outcome = ?outcome, "translated");

        Ok(Translation {
            query: text.to_string(),
            os,
            model_version: snapshot.version,
            steps,
            outcome,
        })
    }

    fn translate_step(
        &self,
        snapshot: &ModelSnapshot,
        text: &str,
        os: TargetOs,
        session: &mut SessionContext,
    ) -> Result<StepResult> {
        let classification = snapshot.classify(text, &self.policy)?;
        debug!(step = text, intent = %classification.intent, confidence = classification.confidence, "classified");

        let mut step = StepResult {
            text: text.to_string(),
            intent: classification.intent,
            confidence: classification.confidence,
            alternatives: classification.alternatives.clone(),
            entities: Vec::new(),
            description: None,
            outcome: Outcome::Blocked {
                reason: String::new(),
            },
        };

        if classification.intent.is_unknown() {
            step.outcome = Outcome::Clarification {
                reason: ClarificationReason::LowConfidence {
                    confidence: classification.confidence,
                },
                prompt: self.suggestion_prompt(&classification),
            };
            return Ok(step);
        }

        let template = match self.templates.lookup(classification.intent, os) {
            Ok(t) => t,
            Err(e) => {
                step.outcome = self.generate_error_outcome(e, classification.intent);
                return Ok(step);
            }
        };
        step.description = Some(template.description.clone());

        let entities = extract(text);
        let resolved = match context::resolve(text, &entities, &template, session) {
            Ok(r) => r,
            Err(Unresolved::NoAntecedent { slot, reference }) => {
                step.entities = wrap_utterance(entities);
                step.outcome = Outcome::Clarification {
                    prompt: format!(
                        "What does '{}' refer to? Name the {} explicitly.",
                        reference,
                        slot_label(slot)
                    ),
                    reason: ClarificationReason::NoAntecedent { slot, reference },
                };
                return Ok(step);
            }
        };

        let plain: Vec<Entity> = resolved.iter().map(|r| r.entity.clone()).collect();
        let rendered = template.render(&plain, os);
        step.entities = resolved;
        let command = match rendered {
            Ok(c) => c,
            Err(e) => {
                step.outcome = self.generate_error_outcome(e, classification.intent);
                return Ok(step);
            }
        };

        step.outcome = match safety::check_generated(&command, template.destructive) {
            SafetyVerdict::Safe => Outcome::Command { command },
            SafetyVerdict::RequiresConfirmation { level, reason } => Outcome::NeedsConfirmation {
                command,
                level,
                reason,
            },
            SafetyVerdict::Blocked { reason } => Outcome::Blocked { reason },
        };

        if step.outcome.is_command() {
            context::commit(&step.entities, session);
        }
        Ok(step)
    }

    fn generate_error_outcome(&self, error: GenerateError, intent: Intent) -> Outcome {
        match error {
            GenerateError::ClarificationNeeded => Outcome::Clarification {
                reason: ClarificationReason::LowConfidence { confidence: 0.0 },
                prompt: "I didn't understand that. Could you rephrase it?".to_string(),
            },
            GenerateError::MissingSlot { slot, expected } => Outcome::Clarification {
                reason: ClarificationReason::MissingSlot { slot, expected },
                prompt: format!(
                    "{}: which {}?",
                    self.templates.description(intent),
                    slot_label(slot)
                ),
            },
            GenerateError::UnsupportedOnPlatform { intent, os } => {
                Outcome::Unsupported { intent, os }
            }
        }
    }

    fn suggestion_prompt(&self, classification: &Classification) -> String {
        let suggestions: Vec<String> = classification
            .alternatives
            .iter()
            .filter(|(intent, _)| !intent.is_unknown())
            .map(|(intent, _)| self.templates.description(*intent).to_lowercase())
            .collect();
        if suggestions.is_empty() {
            "I didn't understand that. Could you rephrase it?".to_string()
        } else {
            format!(
                "I'm not sure what you mean. Did you want to {}?",
                suggestions.join(", or ")
            )
        }
    }
}

fn wrap_utterance(entities: Vec<Entity>) -> Vec<ResolvedEntity> {
    entities
        .into_iter()
        .map(|entity| ResolvedEntity {
            entity,
            origin: context::Origin::Utterance,
        })
        .collect()
}

fn slot_label(slot: Slot) -> String {
    slot.as_str().replace('_', " ")
}

/// Join the steps' commands. Any step needing confirmation makes the whole
/// chain need it.
fn combine(steps: &[StepResult], os: TargetOs) -> Outcome {
    let commands: Vec<&str> = steps.iter().filter_map(|s| s.outcome.command()).collect();
    let command = commands.join(os.command_separator());

    let mut level: Option<RiskLevel> = None;
    let mut reasons: Vec<&str> = Vec::new();
    for step in steps {
        if let Outcome::NeedsConfirmation {
            level: l, reason, ..
        } = &step.outcome
        {
            level = Some(level.map_or(*l, |cur| cur.max(*l)));
            if !reasons.contains(&reason.as_str()) {
                reasons.push(reason);
            }
        }
    }

    match level {
        Some(level) => Outcome::NeedsConfirmation {
            command,
            level,
            reason: reasons.join("; "),
        },
        None => Outcome::Command { command },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::TrainingExample;

    #[test]
    fn test_split_steps_on_connectives() {
        assert_eq!(
            split_steps("create notes.txt and then write 'hi' in it then show it"),
            vec!["create notes.txt", "write 'hi' in it", "show it"]
        );
        assert_eq!(split_steps("ls && pwd"), vec!["ls", "pwd"]);
        assert_eq!(split_steps("list files & show date"), vec!["list files", "show date"]);
    }

    #[test]
    fn test_split_steps_respects_quotes() {
        assert_eq!(
            split_steps("search for 'cats and dogs' then list files"),
            vec!["search for 'cats and dogs'", "list files"]
        );
        assert_eq!(
            split_steps("echo \"this and that\""),
            vec!["echo \"this and that\""]
        );
    }

    #[test]
    fn test_split_steps_apostrophe_is_not_a_quote() {
        assert_eq!(
            split_steps("what's my ip and list files"),
            vec!["what's my ip", "list files"]
        );
    }

    #[test]
    fn test_split_steps_empty() {
        assert!(split_steps("   ").is_empty());
        assert_eq!(split_steps("and list files"), vec!["and list files"]);
    }

    fn corpus() -> Vec<TrainingExample> {
        let data: &[(Intent, &[&str])] = &[
            (
                Intent::CreateDirectory,
                &["create a folder named test", "make a directory called docs", "new folder named work"],
            ),
            (
                Intent::CreateFile,
                &["create test.txt", "create a file called notes.txt", "make an empty file readme.md"],
            ),
            (
                Intent::WriteFile,
                &["write 'hello' in it", "write 'abc' to notes.txt", "put the text 'x' in file.txt"],
            ),
            (
                Intent::ViewFile,
                &["show me notes.txt", "display contents of file.txt", "read it"],
            ),
            (
                Intent::Permissions,
                &["make run.sh executable", "make it executable", "give execute permission to it"],
            ),
            (
                Intent::DeleteDirectory,
                &["delete the folder named old", "remove directory build", "delete folder tmp"],
            ),
        ];
        data.iter()
            .flat_map(|(intent, texts)| texts.iter().map(|t| TrainingExample::new(*t, *intent)))
            .collect()
    }

    fn translator() -> Translator {
        let config = NlshConfig::default();
        let snapshot = ModelSnapshot::train(&corpus(), &config).unwrap();
        Translator::with_snapshot(snapshot, &config)
    }

    #[test]
    fn test_create_folder_command() {
        let t = translator();
        let mut session = SessionContext::new();
        let tr = t
            .translate("create a folder named Project", TargetOs::Posix, &mut session)
            .unwrap();
        assert_eq!(
            tr.outcome,
            Outcome::Command {
                command: "mkdir -p Project".into()
            }
        );
        assert_eq!(tr.steps[0].intent, Intent::CreateDirectory);
        assert_eq!(tr.model_version, 1);
    }

    #[test]
    fn test_substitution_in_name_stays_literal() {
        let t = translator();
        for (os, expected) in [
            (TargetOs::Posix, "mkdir -p '$(whoami)'"),
            (TargetOs::Windows, "New-Item -ItemType Directory -Name '$(whoami)'"),
        ] {
            let mut session = SessionContext::new();
            let tr = t
                .translate("create a folder named '$(whoami)'", os, &mut session)
                .unwrap();
            assert_eq!(tr.command(), Some(expected));
        }
    }

    #[test]
    fn test_multi_step_binds_reference_and_needs_confirmation() {
        let t = translator();
        let mut session = SessionContext::new();
        let tr = t
            .translate(
                "create secrets.txt and write 'password123' in it",
                TargetOs::Posix,
                &mut session,
            )
            .unwrap();
        assert_eq!(
            tr.command(),
            Some("touch secrets.txt && echo password123 > secrets.txt")
        );
        // writing replaces file contents
        assert!(matches!(tr.outcome, Outcome::NeedsConfirmation { .. }));
        assert_eq!(session.last_value(EntityKind::Filename), Some("secrets.txt"));
    }

    #[test]
    fn test_windows_separator() {
        let t = translator();
        let mut session = SessionContext::new();
        let tr = t
            .translate("create test.txt and show me test.txt", TargetOs::Windows, &mut session)
            .unwrap();
        assert_eq!(
            tr.command(),
            Some("New-Item -ItemType File -Name test.txt; Get-Content test.txt")
        );
    }

    #[test]
    fn test_reference_without_antecedent() {
        let t = translator();
        let mut session = SessionContext::new();
        let tr = t.translate("read it", TargetOs::Posix, &mut session).unwrap();
        assert!(matches!(
            tr.outcome,
            Outcome::Clarification {
                reason: ClarificationReason::NoAntecedent { slot: Slot::Filename, .. },
                ..
            }
        ));
        assert!(session.is_empty());
    }

    #[test]
    fn test_unsupported_platform() {
        let t = translator();
        let mut session = SessionContext::new();
        let tr = t
            .translate("make run.sh executable", TargetOs::Windows, &mut session)
            .unwrap();
        assert_eq!(
            tr.outcome,
            Outcome::Unsupported {
                intent: Intent::Permissions,
                os: TargetOs::Windows
            }
        );
        assert!(session.is_empty());
    }

    #[test]
    fn test_gibberish_asks_for_clarification() {
        let t = translator();
        let mut session = SessionContext::new();
        let tr = t.translate("qwzx vbnm", TargetOs::Posix, &mut session).unwrap();
        assert!(matches!(
            tr.outcome,
            Outcome::Clarification {
                reason: ClarificationReason::LowConfidence { .. },
                ..
            }
        ));
        assert_eq!(tr.steps[0].intent, Intent::Unknown);
    }

    #[test]
    fn test_empty_input() {
        let t = translator();
        let mut session = SessionContext::new();
        let tr = t.translate("  ", TargetOs::Posix, &mut session).unwrap();
        assert!(tr.steps.is_empty());
        assert!(matches!(
            tr.outcome,
            Outcome::Clarification {
                reason: ClarificationReason::EmptyInput,
                ..
            }
        ));
    }

    #[test]
    fn test_failed_step_stops_chain() {
        let t = translator();
        let mut session = SessionContext::new();
        let tr = t
            .translate("create a.txt and qwzx vbnm and create b.txt", TargetOs::Posix, &mut session)
            .unwrap();
        assert_eq!(tr.steps.len(), 2);
        assert!(!tr.outcome.is_command());
        // the first step still produced a command and was remembered
        assert_eq!(session.last_value(EntityKind::Filename), Some("a.txt"));
    }

    #[test]
    fn test_unfitted_store_is_an_error() {
        let t = Translator::new(
            Arc::new(ModelStore::empty()),
            TemplateTable::new(),
            ClassifierConfig::default(),
        );
        let mut session = SessionContext::new();
        assert!(t.translate("list files", TargetOs::Posix, &mut session).is_err());
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = Outcome::Command {
            command: "ls".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "command");
        assert_eq!(json["command"], "ls");
    }

    #[test]
    fn test_translator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Translator>();
    }
}
