//! Cross-utterance reference resolution.
//!
//! A `SessionContext` belongs to one session and is passed by `&mut` into
//! each request, so concurrent sessions never share state. `resolve` binds
//! "it"/"that"/"this" to remembered entities for slots the utterance leaves
//! empty; `commit` records the utterance's own entities afterwards.

use crate::entities::{find_references, Entity, EntityKind};
use crate::templates::{assign_slots, CommandTemplate, Slot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Where a resolved entity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Extracted from the current utterance
    Utterance,
    /// Bound from the session through a reference word
    Session,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntity {
    pub entity: Entity,
    pub origin: Origin,
}

/// Remembered value of one entity kind. Higher `seq` is more recent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub value: String,
    pub seq: u64,
}

/// Per-session entity memory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    bindings: BTreeMap<EntityKind, Binding>,
    /// Kind of the last concrete entity committed; its value is
    /// `bindings[primary]`
    primary: Option<EntityKind>,
    seq: u64,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: EntityKind) -> Option<&Binding> {
        self.bindings.get(&kind)
    }

    /// Most recent value of a kind
    pub fn last_value(&self, kind: EntityKind) -> Option<&str> {
        self.get(kind).map(|b| b.value.as_str())
    }

    /// The previous utterance's last concrete entity
    pub fn primary(&self) -> Option<(EntityKind, &Binding)> {
        let kind = self.primary?;
        self.bindings.get(&kind).map(|b| (kind, b))
    }

    pub fn bindings(&self) -> &BTreeMap<EntityKind, Binding> {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Antecedent for a slot: the primary entity if the slot accepts its
    /// kind, else the most recently bound accepted kind.
    fn antecedent(&self, slot: Slot) -> Option<(EntityKind, &Binding)> {
        let accepts = slot.accepts();
        if let Some((kind, binding)) = self.primary() {
            if accepts.contains(&kind) {
                return Some((kind, binding));
            }
        }
        accepts
            .iter()
            .filter_map(|k| self.bindings.get(k).map(|b| (*k, b)))
            .max_by_key(|(_, b)| b.seq)
    }
}

/// A required slot that a reference word could not fill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unresolved {
    NoAntecedent { slot: Slot, reference: String },
}

impl std::fmt::Display for Unresolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unresolved::NoAntecedent { slot, reference } => write!(
                f,
                "nothing earlier in this session for '{}' to refer to (needed a {})",
                reference, slot
            ),
        }
    }
}

/// Bind reference words to session values for required slots the
/// utterance's own entities cannot fill.
///
/// Slots that stay empty without a reference are left for the template
/// engine to report.
pub fn resolve(
    text: &str,
    entities: &[Entity],
    template: &CommandTemplate,
    session: &SessionContext,
) -> Result<Vec<ResolvedEntity>, Unresolved> {
    let placeholders = template.placeholders();
    let slots: Vec<Slot> = placeholders.iter().map(|p| p.slot).collect();
    let assignment = assign_slots(&slots, entities);

    let mut references = find_references(text, entities).into_iter();
    let mut resolved: Vec<ResolvedEntity> = entities
        .iter()
        .cloned()
        .map(|entity| ResolvedEntity {
            entity,
            origin: Origin::Utterance,
        })
        .collect();

    for p in placeholders.iter().filter(|p| p.is_required()) {
        if assignment.is_filled(p.slot) {
            continue;
        }
        let Some(reference) = references.next() else {
            break;
        };
        let Some((kind, binding)) = session.antecedent(p.slot) else {
            debug!(slot = %p.slot, reference = %reference.word, "no antecedent");
            return Err(Unresolved::NoAntecedent {
                slot: p.slot,
                reference: reference.word,
            });
        };
        debug!(slot = %p.slot, reference = %reference.word, value = %binding.value, "bound reference");
        resolved.push(ResolvedEntity {
            entity: Entity::new(kind, binding.value.clone(), reference.span),
            origin: Origin::Session,
        });
    }

    resolved.sort_by_key(|r| r.entity.span.0);
    Ok(resolved)
}

/// Remember the utterance's concrete entities, left to right, so the last
/// mention of a kind wins. Entities bound from the session are skipped.
pub fn commit(entities: &[ResolvedEntity], session: &mut SessionContext) {
    let mut concrete: Vec<&Entity> = entities
        .iter()
        .filter(|r| r.origin == Origin::Utterance)
        .map(|r| &r.entity)
        .collect();
    concrete.sort_by_key(|e| e.span.0);

    for entity in concrete {
        session.seq += 1;
        session.bindings.insert(
            entity.kind,
            Binding {
                value: entity.value.clone(),
                seq: session.seq,
            },
        );
        session.primary = Some(entity.kind);
        debug!(kind = %entity.kind, value = %entity.value, seq = session.seq, "committed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::extract;
    use crate::intent::{Intent, TargetOs};
    use crate::templates::TemplateTable;

    fn template(intent: Intent) -> CommandTemplate {
        TemplateTable::new().lookup(intent, TargetOs::Posix).unwrap()
    }

    fn utterance(entities: Vec<Entity>) -> Vec<ResolvedEntity> {
        entities
            .into_iter()
            .map(|entity| ResolvedEntity {
                entity,
                origin: Origin::Utterance,
            })
            .collect()
    }

    fn run(text: &str, intent: Intent, session: &SessionContext) -> Result<Vec<ResolvedEntity>, Unresolved> {
        let entities = extract(text);
        resolve(text, &entities, &template(intent), session)
    }

    #[test]
    fn test_it_binds_previous_filename() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("create secrets.txt")), &mut session);

        let resolved = run("write 'password123' in it", Intent::WriteFile, &session).unwrap();
        let filename = resolved
            .iter()
            .find(|r| r.origin == Origin::Session)
            .unwrap();
        assert_eq!(filename.entity.kind, EntityKind::Filename);
        assert_eq!(filename.entity.value, "secrets.txt");
    }

    #[test]
    fn test_most_recent_mention_wins() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("create a.txt")), &mut session);
        commit(&utterance(extract("create b.txt")), &mut session);

        let resolved = run("show it", Intent::ViewFile, &session).unwrap();
        assert_eq!(resolved[0].entity.value, "b.txt");
    }

    #[test]
    fn test_last_mention_within_one_utterance_wins() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("compare a.txt to b.txt")), &mut session);
        assert_eq!(session.last_value(EntityKind::Filename), Some("b.txt"));
    }

    #[test]
    fn test_primary_preferred_over_older_accepted_kind() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("create notes.txt")), &mut session);
        commit(&utterance(extract("create a folder named Reports")), &mut session);

        // Filename accepts Name, and the folder is the primary entity
        let resolved = run("view it", Intent::ViewFile, &session).unwrap();
        assert_eq!(resolved[0].entity.value, "Reports");
    }

    #[test]
    fn test_falls_back_to_accepted_kind_when_primary_does_not_fit() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("view notes.txt")), &mut session);
        commit(&utterance(extract("ping example.com")), &mut session);

        let resolved = run("view it", Intent::ViewFile, &session).unwrap();
        assert_eq!(resolved[0].entity.value, "notes.txt");
    }

    #[test]
    fn test_them_binds_previous_pattern() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("find log files")), &mut session);

        let resolved = run("delete them", Intent::DeleteFiles, &session).unwrap();
        assert_eq!(resolved[0].entity.kind, EntityKind::Pattern);
        assert_eq!(resolved[0].entity.value, "*.log");
    }

    #[test]
    fn test_no_antecedent() {
        let session = SessionContext::new();
        assert_eq!(
            run("delete it", Intent::ViewFile, &session),
            Err(Unresolved::NoAntecedent {
                slot: Slot::Filename,
                reference: "it".into()
            })
        );
    }

    #[test]
    fn test_missing_slot_without_reference_is_left_alone() {
        let session = SessionContext::new();
        let resolved = run("show the file", Intent::ViewFile, &session).unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_filled_slot_ignores_reference() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("create old.txt")), &mut session);
        let resolved = run("write 'it works' to new.txt", Intent::WriteFile, &session).unwrap();
        assert!(resolved.iter().all(|r| r.origin == Origin::Utterance));
    }

    #[test]
    fn test_session_bindings_are_not_recommitted() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("create a.txt")), &mut session);
        let seq = session.get(EntityKind::Filename).unwrap().seq;

        let resolved = run("view it", Intent::ViewFile, &session).unwrap();
        commit(&resolved, &mut session);
        assert_eq!(session.get(EntityKind::Filename).unwrap().seq, seq);
    }

    #[test]
    fn test_session_serializes() {
        let mut session = SessionContext::new();
        commit(&utterance(extract("ping 10.0.0.1")), &mut session);
        let json = serde_json::to_string(&session).unwrap();
        let back: SessionContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
