//! Command template engine.
//!
//! Lookup goes exact `(intent, os)` first, then the intent's neutral
//! variant. Slots are filled from entities by `assign_slots`, which the
//! context resolver also uses to work out what an utterance is missing.

use crate::context::ResolvedEntity;
use crate::entities::{Entity, EntityKind};
use crate::error::{NlshError, Result};
use crate::intent::{Intent, TargetOs};
use crate::quoting::{self, QuoteStyle};
use crate::template_data::{builtin, TemplateSet};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// `{slot}` or `{slot=default}`
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)(?:=([^{}]*))?\}").unwrap());

/// Named template parameter. Declaration order is the order slots are
/// filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Directory,
    Filename,
    Pattern,
    Source,
    Destination,
    Path,
    Target,
    NewName,
    Owner,
    Text,
    Url,
    Host,
    Process,
    Package,
    Service,
    Profile,
    Command,
}

impl Slot {
    pub fn from_name(name: &str) -> Option<Slot> {
        let slot = match name {
            "directory" => Slot::Directory,
            "filename" => Slot::Filename,
            "pattern" => Slot::Pattern,
            "source" => Slot::Source,
            "destination" => Slot::Destination,
            "path" => Slot::Path,
            "target" => Slot::Target,
            "new_name" => Slot::NewName,
            "owner" => Slot::Owner,
            "text" => Slot::Text,
            "url" => Slot::Url,
            "host" => Slot::Host,
            "process" => Slot::Process,
            "package" => Slot::Package,
            "service" => Slot::Service,
            "profile" => Slot::Profile,
            "command" => Slot::Command,
            _ => return None,
        };
        Some(slot)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Directory => "directory",
            Slot::Filename => "filename",
            Slot::Pattern => "pattern",
            Slot::Source => "source",
            Slot::Destination => "destination",
            Slot::Path => "path",
            Slot::Target => "target",
            Slot::NewName => "new_name",
            Slot::Owner => "owner",
            Slot::Text => "text",
            Slot::Url => "url",
            Slot::Host => "host",
            Slot::Process => "process",
            Slot::Package => "package",
            Slot::Service => "service",
            Slot::Profile => "profile",
            Slot::Command => "command",
        }
    }

    /// Entity kinds that can fill this slot, most specific first.
    /// The first kind is the one reported when the slot stays empty.
    pub fn accepts(&self) -> &'static [EntityKind] {
        use EntityKind::*;
        match self {
            Slot::Directory => &[Name, Path, Destination, Literal],
            Slot::Filename => &[Filename, Path, Name],
            Slot::Pattern => &[Pattern, Filename, Name],
            Slot::Source => &[Source, Filename, Path, Name],
            Slot::Destination => &[Destination, Path, Filename, Name],
            Slot::Path => &[Path, Filename, Name, Destination],
            Slot::Target => &[Filename, Pattern, Path, Name],
            Slot::NewName => &[Destination, Filename, Name],
            Slot::Owner => &[Destination, Name, Literal],
            Slot::Text => &[Literal],
            Slot::Url => &[Url],
            Slot::Host => &[Host],
            Slot::Process | Slot::Package | Slot::Service | Slot::Command => {
                &[Program, Name, Literal]
            }
            Slot::Profile => &[ProfileName, Literal],
        }
    }

    pub fn expected_kind(&self) -> EntityKind {
        self.accepts()[0]
    }

    pub fn quote_style(&self) -> QuoteStyle {
        match self {
            Slot::Directory
            | Slot::Filename
            | Slot::Source
            | Slot::Destination
            | Slot::Path
            | Slot::NewName => QuoteStyle::Path,
            Slot::Target => QuoteStyle::Glob,
            // `find -name` and `-Filter` do their own matching
            Slot::Pattern => QuoteStyle::Literal,
            _ => QuoteStyle::Literal,
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One placeholder occurrence in a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub slot: Slot,
    pub default: Option<String>,
}

impl Placeholder {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Placeholders of a pattern, one per slot, in canonical slot order.
/// A slot is required if any of its occurrences lacks a default.
pub fn placeholders(pattern: &str) -> Vec<Placeholder> {
    let mut by_slot: BTreeMap<Slot, Option<String>> = BTreeMap::new();
    for caps in PLACEHOLDER_RE.captures_iter(pattern) {
        let Some(slot) = Slot::from_name(&caps[1]) else {
            continue;
        };
        let default = caps.get(2).map(|m| m.as_str().to_string());
        by_slot
            .entry(slot)
            .and_modify(|d| {
                if default.is_none() {
                    *d = None;
                }
            })
            .or_insert(default);
    }
    by_slot
        .into_iter()
        .map(|(slot, default)| Placeholder { slot, default })
        .collect()
}

/// Which entity (by index) fills which slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotAssignment {
    pub filled: BTreeMap<Slot, usize>,
}

impl SlotAssignment {
    pub fn is_filled(&self, slot: Slot) -> bool {
        self.filled.contains_key(&slot)
    }

    pub fn used_entities(&self) -> BTreeSet<usize> {
        self.filled.values().copied().collect()
    }
}

/// Assign entities to slots.
///
/// Slots are visited in canonical order; each takes, for the first of its
/// accepted kinds that has one, the leftmost unused entity of that kind.
/// Every entity fills at most one slot.
pub fn assign_slots(slots: &[Slot], entities: &[Entity]) -> SlotAssignment {
    let mut ordered: Vec<Slot> = slots.to_vec();
    ordered.sort();
    ordered.dedup();

    let mut used = vec![false; entities.len()];
    let mut assignment = SlotAssignment::default();

    for slot in ordered {
        let pick = slot.accepts().iter().find_map(|kind| {
            entities
                .iter()
                .enumerate()
                .find(|(i, e)| !used[*i] && e.kind == *kind)
                .map(|(i, _)| i)
        });
        if let Some(i) = pick {
            used[i] = true;
            assignment.filled.insert(slot, i);
        }
    }
    assignment
}

/// Why no command could be produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerateError {
    /// The request was not understood
    ClarificationNeeded,
    /// A required slot had no entity to fill it
    MissingSlot { slot: Slot, expected: EntityKind },
    /// No template for this OS and no neutral variant
    UnsupportedOnPlatform { intent: Intent, os: TargetOs },
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::ClarificationNeeded => write!(f, "request not understood"),
            GenerateError::MissingSlot { slot, expected } => {
                write!(f, "missing {} (expected a {})", slot, expected)
            }
            GenerateError::UnsupportedOnPlatform { intent, os } => {
                write!(f, "'{}' has no {} command", intent, os.display_name())
            }
        }
    }
}

/// A selected template variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandTemplate {
    pub intent: Intent,
    /// `None` for the neutral variant
    pub os: Option<TargetOs>,
    pub pattern: String,
    pub description: String,
    pub destructive: bool,
}

impl CommandTemplate {
    pub fn placeholders(&self) -> Vec<Placeholder> {
        placeholders(&self.pattern)
    }

    pub fn required_slots(&self) -> Vec<Slot> {
        self.placeholders()
            .into_iter()
            .filter(|p| p.is_required())
            .map(|p| p.slot)
            .collect()
    }

    /// Fill every placeholder from the assignment or its default, each
    /// value quoted as a single argument for `os`.
    pub fn render(
        &self,
        entities: &[Entity],
        os: TargetOs,
    ) -> std::result::Result<String, GenerateError> {
        let placeholders = self.placeholders();
        let slots: Vec<Slot> = placeholders.iter().map(|p| p.slot).collect();
        let assignment = assign_slots(&slots, entities);

        let mut values: BTreeMap<Slot, String> = BTreeMap::new();
        for p in &placeholders {
            match assignment.filled.get(&p.slot) {
                Some(&i) => {
                    values.insert(p.slot, entities[i].value.clone());
                }
                None if p.is_required() => {
                    return Err(GenerateError::MissingSlot {
                        slot: p.slot,
                        expected: p.slot.expected_kind(),
                    });
                }
                None => {}
            }
        }

        let rendered = PLACEHOLDER_RE.replace_all(&self.pattern, |caps: &Captures<'_>| {
            let Some(slot) = Slot::from_name(&caps[1]) else {
                return caps[0].to_string();
            };
            let value = match values.get(&slot) {
                Some(v) => v.as_str(),
                None => caps.get(2).map(|m| m.as_str()).unwrap_or_default(),
            };
            quoting::quote(value, slot.quote_style(), os)
        });
        Ok(rendered.into_owned())
    }
}

/// An `(intent, os)` pair with no usable template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateGap {
    pub intent: Intent,
    pub os: TargetOs,
}

#[derive(Debug, Deserialize)]
struct OverrideFile {
    #[serde(default)]
    template: Vec<OverrideEntry>,
}

#[derive(Debug, Deserialize)]
struct OverrideEntry {
    intent: String,
    /// posix, windows or neutral
    os: String,
    pattern: String,
}

/// Built-in templates plus optional overrides
#[derive(Debug, Clone, Default)]
pub struct TemplateTable {
    overrides: BTreeMap<(Intent, Option<TargetOs>), String>,
}

impl TemplateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table with overrides from a TOML file:
    ///
    /// ```toml
    /// [[template]]
    /// intent = "view_file"
    /// os = "posix"
    /// pattern = "less {filename}"
    /// ```
    ///
    /// Values are quoted on render, so placeholders go unquoted.
    pub fn with_overrides_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let table = Self::with_overrides_str(&contents)?;
        info!(path = %path.display(), count = table.overrides.len(), "Loaded template overrides");
        Ok(table)
    }

    pub fn with_overrides_str(contents: &str) -> Result<Self> {
        let file: OverrideFile = toml::from_str(contents)?;
        let mut table = Self::new();
        for entry in file.template {
            let intent: Intent = entry.intent.parse()?;
            let os = match entry.os.trim().to_lowercase().as_str() {
                "neutral" | "any" => None,
                other => Some(other.parse::<TargetOs>()?),
            };
            table.set_override(intent, os, entry.pattern)?;
        }
        Ok(table)
    }

    /// Add or replace one variant. Every placeholder must name a known slot
    /// and stand outside quotes.
    pub fn set_override(
        &mut self,
        intent: Intent,
        os: Option<TargetOs>,
        pattern: impl Into<String>,
    ) -> Result<()> {
        let pattern = pattern.into();
        if intent.is_unknown() {
            return Err(NlshError::Template("cannot add a template for 'unknown'".into()));
        }
        check_pattern(&pattern)?;
        debug!(intent = %intent, ?os, pattern = %pattern, "template override");
        self.overrides.insert((intent, os), pattern);
        Ok(())
    }

    fn variant(&self, intent: Intent, os: Option<TargetOs>, set: &TemplateSet) -> Option<String> {
        if let Some(p) = self.overrides.get(&(intent, os)) {
            return Some(p.clone());
        }
        let builtin = match os {
            Some(TargetOs::Posix) => set.posix,
            Some(TargetOs::Windows) => set.windows,
            None => set.neutral,
        };
        builtin.map(str::to_string)
    }

    /// Exact variant, else neutral, else `UnsupportedOnPlatform`.
    pub fn lookup(
        &self,
        intent: Intent,
        os: TargetOs,
    ) -> std::result::Result<CommandTemplate, GenerateError> {
        if intent.is_unknown() {
            return Err(GenerateError::ClarificationNeeded);
        }
        let set = builtin(intent);
        let (variant_os, pattern) = match self.variant(intent, Some(os), &set) {
            Some(p) => (Some(os), p),
            None => match self.variant(intent, None, &set) {
                Some(p) => (None, p),
                None => return Err(GenerateError::UnsupportedOnPlatform { intent, os }),
            },
        };
        Ok(CommandTemplate {
            intent,
            os: variant_os,
            pattern,
            description: set.description.to_string(),
            destructive: set.destructive,
        })
    }

    pub fn description(&self, intent: Intent) -> &'static str {
        builtin(intent).description
    }

    /// Fill the template for `intent` on `os` from resolved entities.
    pub fn generate(
        &self,
        intent: Intent,
        resolved: &[ResolvedEntity],
        os: TargetOs,
    ) -> std::result::Result<String, GenerateError> {
        let template = self.lookup(intent, os)?;
        let entities: Vec<Entity> = resolved.iter().map(|r| r.entity.clone()).collect();
        let command = template.render(&entities, os)?;
        debug!(intent = %intent, os = %os, command = %command, "generated");
        Ok(command)
    }

    /// Every trainable `(intent, os)` pair without a template
    pub fn validate(&self) -> Vec<TemplateGap> {
        let mut gaps = Vec::new();
        for &intent in Intent::TRAINABLE {
            for os in TargetOs::ALL {
                if let Err(GenerateError::UnsupportedOnPlatform { .. }) = self.lookup(intent, os) {
                    warn!(intent = %intent, os = %os, "No template for intent on this platform");
                    gaps.push(TemplateGap { intent, os });
                }
            }
        }
        gaps
    }
}

fn check_pattern(pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(NlshError::Template("empty template pattern".into()));
    }
    for caps in PLACEHOLDER_RE.captures_iter(pattern) {
        if Slot::from_name(&caps[1]).is_none() {
            return Err(NlshError::Template(format!(
                "unknown placeholder '{}' in '{}'",
                &caps[0], pattern
            )));
        }
        let Some(whole) = caps.get(0) else { continue };
        let before = pattern[..whole.start()].chars().next_back();
        if matches!(before, Some('"') | Some('\'')) {
            return Err(NlshError::Template(format!(
                "placeholder '{}' is quoted in '{}'; values are quoted automatically",
                whole.as_str(),
                pattern
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Origin;

    fn resolved(entities: Vec<Entity>) -> Vec<ResolvedEntity> {
        entities
            .into_iter()
            .map(|entity| ResolvedEntity {
                entity,
                origin: Origin::Utterance,
            })
            .collect()
    }

    fn name(value: &str) -> Entity {
        Entity::new(EntityKind::Name, value, (0, value.len()))
    }

    #[test]
    fn test_every_builtin_pattern_uses_known_slots() {
        for &intent in Intent::TRAINABLE {
            let set = builtin(intent);
            for pattern in [set.posix, set.windows, set.neutral].into_iter().flatten() {
                check_pattern(pattern).unwrap_or_else(|e| panic!("{}: {}", intent, e));
            }
        }
    }

    #[test]
    fn test_only_known_gap_is_windows_permissions() {
        let gaps = TemplateTable::new().validate();
        assert_eq!(
            gaps,
            vec![TemplateGap {
                intent: Intent::Permissions,
                os: TargetOs::Windows
            }]
        );
    }

    #[test]
    fn test_create_directory_on_both_platforms() {
        let table = TemplateTable::new();
        let entities = resolved(vec![name("Project")]);
        let posix = table.generate(Intent::CreateDirectory, &entities, TargetOs::Posix).unwrap();
        let windows = table.generate(Intent::CreateDirectory, &entities, TargetOs::Windows).unwrap();
        assert_eq!(posix, "mkdir -p Project");
        assert_eq!(windows, "New-Item -ItemType Directory -Name Project");
    }

    #[test]
    fn test_neutral_fallback() {
        let table = TemplateTable::new();
        let posix = table.lookup(Intent::GitStatus, TargetOs::Posix).unwrap();
        assert_eq!(posix.os, None);
        assert_eq!(posix.pattern, "git status");
    }

    #[test]
    fn test_unsupported_platform() {
        let table = TemplateTable::new();
        let entities = resolved(vec![Entity::new(EntityKind::Filename, "run.sh", (0, 6))]);
        assert_eq!(
            table.generate(Intent::Permissions, &entities, TargetOs::Windows),
            Err(GenerateError::UnsupportedOnPlatform {
                intent: Intent::Permissions,
                os: TargetOs::Windows
            })
        );
    }

    #[test]
    fn test_unknown_needs_clarification() {
        let table = TemplateTable::new();
        assert_eq!(
            table.generate(Intent::Unknown, &[], TargetOs::Posix),
            Err(GenerateError::ClarificationNeeded)
        );
    }

    #[test]
    fn test_missing_slot_reports_first_kind() {
        let table = TemplateTable::new();
        assert_eq!(
            table.generate(Intent::ViewFile, &[], TargetOs::Posix),
            Err(GenerateError::MissingSlot {
                slot: Slot::Filename,
                expected: EntityKind::Filename
            })
        );
    }

    #[test]
    fn test_optional_slot_uses_default() {
        let table = TemplateTable::new();
        assert_eq!(
            table.generate(Intent::FileSize, &[], TargetOs::Posix).unwrap(),
            "du -sh ."
        );
    }

    #[test]
    fn test_source_and_destination_assignment() {
        let entities = vec![
            Entity::new(EntityKind::Filename, "file.txt", (5, 13)),
            Entity::new(EntityKind::Destination, "backup", (17, 23)),
        ];
        let table = TemplateTable::new();
        let cmd = table
            .generate(Intent::CopyFiles, &resolved(entities), TargetOs::Posix)
            .unwrap();
        assert_eq!(cmd, "cp -r file.txt backup");
    }

    #[test]
    fn test_each_entity_fills_one_slot() {
        let entities = vec![
            Entity::new(EntityKind::Filename, "a.txt", (0, 5)),
            Entity::new(EntityKind::Filename, "b.txt", (9, 14)),
        ];
        let a = assign_slots(&[Slot::NewName, Slot::Filename], &entities);
        assert_eq!(a.filled[&Slot::Filename], 0);
        assert_eq!(a.filled[&Slot::NewName], 1);
    }

    #[test]
    fn test_repeated_placeholder_gets_one_value() {
        let mut table = TemplateTable::new();
        table
            .set_override(Intent::Echo, Some(TargetOs::Posix), "echo {text} {text}")
            .unwrap();
        let entities = resolved(vec![Entity::new(EntityKind::Literal, "hi", (6, 8))]);
        assert_eq!(
            table.generate(Intent::Echo, &entities, TargetOs::Posix).unwrap(),
            "echo hi hi"
        );
    }

    #[test]
    fn test_powershell_script_block_is_not_a_placeholder() {
        let table = TemplateTable::new();
        let cmd = table.generate(Intent::NetworkInfo, &[], TargetOs::Windows).unwrap();
        assert!(cmd.contains("{$_.AddressFamily -eq 'IPv4'}"));
    }

    #[test]
    fn test_overrides_from_toml() {
        let table = TemplateTable::with_overrides_str(
            r#"
            [[template]]
            intent = "permissions"
            os = "windows"
            pattern = "icacls {filename}"

            [[template]]
            intent = "list_files"
            os = "neutral"
            pattern = "ls -1"
            "#,
        )
        .unwrap();
        assert!(table.validate().is_empty());
        // exact built-in variant still wins over a neutral override
        assert_eq!(table.lookup(Intent::ListFiles, TargetOs::Posix).unwrap().pattern, "ls");
    }

    #[test]
    fn test_override_with_unknown_intent_or_slot_rejected() {
        let bad_intent = "[[template]]\nintent = \"brew_coffee\"\nos = \"posix\"\npattern = \"x\"\n";
        assert!(matches!(
            TemplateTable::with_overrides_str(bad_intent),
            Err(NlshError::UnknownIntent(_))
        ));
        let bad_slot = "[[template]]\nintent = \"echo\"\nos = \"posix\"\npattern = \"echo {colour}\"\n";
        assert!(matches!(
            TemplateTable::with_overrides_str(bad_slot),
            Err(NlshError::Template(_))
        ));
    }

    #[test]
    fn test_quoted_placeholder_in_override_rejected() {
        let mut table = TemplateTable::new();
        for pattern in ["cat \"{filename}\"", "cat '{filename}'"] {
            assert!(matches!(
                table.set_override(Intent::ViewFile, Some(TargetOs::Posix), pattern),
                Err(NlshError::Template(_))
            ));
        }
        // a placeholder inside a larger word is fine
        assert!(table
            .set_override(Intent::GetWifiPass, Some(TargetOs::Windows), "netsh wlan show profile name={profile}")
            .is_ok());
    }

    #[test]
    fn test_values_cannot_expand_or_break_quoting() {
        let table = TemplateTable::new();
        let cases = [
            ("$(whoami)", "mkdir -p '$(whoami)'", "New-Item -ItemType Directory -Name '$(whoami)'"),
            ("a`id`b", "mkdir -p 'a`id`b'", "New-Item -ItemType Directory -Name 'a`id`b'"),
            ("costs $5", "mkdir -p 'costs $5'", "New-Item -ItemType Directory -Name 'costs $5'"),
            (
                "say \"hi\"",
                "mkdir -p 'say \"hi\"'",
                "New-Item -ItemType Directory -Name 'say \"hi\"'",
            ),
        ];
        for (value, posix, windows) in cases {
            let entities = resolved(vec![Entity::new(EntityKind::Literal, value, (0, value.len()))]);
            assert_eq!(
                table.generate(Intent::CreateDirectory, &entities, TargetOs::Posix).unwrap(),
                posix
            );
            assert_eq!(
                table.generate(Intent::CreateDirectory, &entities, TargetOs::Windows).unwrap(),
                windows
            );
        }
    }

    #[test]
    fn test_written_text_reads_back_as_one_argument() {
        let table = TemplateTable::new();
        let text = "it's $HOME and `date`";
        let entities = resolved(vec![
            Entity::new(EntityKind::Literal, text, (6, 6 + text.len())),
            Entity::new(EntityKind::Filename, "notes.txt", (40, 49)),
        ]);
        let posix = table.generate(Intent::WriteFile, &entities, TargetOs::Posix).unwrap();
        let words = shell_words::split(&posix).unwrap();
        assert_eq!(words, vec!["echo", text, ">", "notes.txt"]);
        assert_eq!(
            table.generate(Intent::WriteFile, &entities, TargetOs::Windows).unwrap(),
            "Set-Content -Path notes.txt -Value 'it''s $HOME and `date`'"
        );
    }

    #[test]
    fn test_change_directory_quotes_spaces_and_keeps_home() {
        let table = TemplateTable::new();
        let cd = |value: &str, os| {
            let entities = resolved(vec![Entity::new(EntityKind::Literal, value, (0, value.len()))]);
            table.generate(Intent::ChangeDirectory, &entities, os).unwrap()
        };
        assert_eq!(cd("My Documents", TargetOs::Posix), "cd 'My Documents'");
        assert_eq!(cd("~", TargetOs::Posix), "cd ~");
        assert_eq!(cd("~/My Documents", TargetOs::Posix), "cd ~/'My Documents'");
        assert_eq!(cd("My Documents", TargetOs::Windows), "Set-Location 'My Documents'");
    }

    #[test]
    fn test_delete_target_keeps_glob() {
        let table = TemplateTable::new();
        let entities = resolved(vec![Entity::new(EntityKind::Pattern, "*.log", (7, 12))]);
        assert_eq!(
            table.generate(Intent::DeleteFiles, &entities, TargetOs::Posix).unwrap(),
            "rm *.log"
        );
        assert_eq!(
            table.generate(Intent::FindFiles, &entities, TargetOs::Posix).unwrap(),
            "find . -name '*.log'"
        );
    }

    #[test]
    fn test_placeholders_required_if_any_occurrence_lacks_default() {
        let p = placeholders("a {text=x} b {text} {path=.}");
        assert_eq!(
            p,
            vec![
                Placeholder {
                    slot: Slot::Path,
                    default: Some(".".into())
                },
                Placeholder {
                    slot: Slot::Text,
                    default: None
                },
            ]
        );
    }
}
