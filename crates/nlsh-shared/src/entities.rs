//! Entity extraction.
//!
//! A single ordered rule table maps surface text to typed entities. Every
//! rule proposes candidates; `resolve_candidates` is the one place where
//! overlaps are settled: lower priority number first, then the longer match,
//! then the leftmost one. Accepted entities come back in text order.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Entity types, declared in rule priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Literal,
    Url,
    Path,
    Pattern,
    Filename,
    Host,
    ProfileName,
    Program,
    Name,
    Destination,
    Source,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Literal => "literal",
            EntityKind::Url => "url",
            EntityKind::Path => "path",
            EntityKind::Pattern => "pattern",
            EntityKind::Filename => "filename",
            EntityKind::Host => "host",
            EntityKind::ProfileName => "profile_name",
            EntityKind::Program => "program",
            EntityKind::Name => "name",
            EntityKind::Destination => "destination",
            EntityKind::Source => "source",
        }
    }

    /// Kinds whose values are free words and so need the stop-word filter
    fn is_free_word(&self) -> bool {
        matches!(
            self,
            EntityKind::ProfileName
                | EntityKind::Program
                | EntityKind::Name
                | EntityKind::Destination
                | EntityKind::Source
        )
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value found in an utterance. `span` is a byte range into the
/// text that was passed to `extract`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub value: String,
    pub span: (usize, usize),
}

impl Entity {
    pub fn new(kind: EntityKind, value: impl Into<String>, span: (usize, usize)) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    fn overlaps(&self, other: &Entity) -> bool {
        self.span.0 < other.span.1 && other.span.0 < self.span.1
    }
}

/// An anaphoric word ("it", "that", "this") outside every entity span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub word: String,
    pub span: (usize, usize),
}

/// Words that refer back to an earlier entity
pub const REFERENCE_WORDS: &[&str] = &["it", "that", "this", "them"];

/// Free-word captures that are never entity values
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "my", "me", "all", "every", "everything", "file", "files", "folder",
    "directory", "dir", "named", "called", "new", "current", "here", "there", "and", "then",
    "of", "for", "with", "in", "on", "to", "into", "from", "as", "process", "service",
    "package", "program", "running", "size", "status", "via", "remote", "one", "level",
    "empty", "some", "execution", "is", "be", "up", "down",
];

/// Command verbs that can sit right before "folder"/"directory"; never a
/// name or a location
const COMMAND_VERBS: &[&str] = &[
    "create", "make", "delete", "remove", "erase", "open", "show", "list", "enter", "copy",
    "move", "rename", "compress", "zip", "extract", "find", "search", "navigate", "switch",
    "change", "cd", "mkdir", "rmdir", "count", "view", "read", "write", "go",
];

const EXTENSIONS: &[&str] = &[
    "txt", "py", "js", "ts", "json", "xml", "html", "css", "md", "log", "csv", "yml", "yaml",
    "toml", "ini", "cfg", "conf", "sh", "bat", "ps1", "exe", "dll", "so", "zip", "tar", "gz",
    "tgz", "7z", "rar", "jpg", "jpeg", "png", "gif", "svg", "webp", "pdf", "doc", "docx",
    "xls", "xlsx", "ppt", "pptx", "mp3", "mp4", "mkv", "mov", "wav", "avi", "rs", "go",
    "java", "rb", "cpp", "c", "h", "tmp", "bak", "sql", "db",
];

/// Natural-language file type names and their extension
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("python", "py"),
    ("javascript", "js"),
    ("typescript", "ts"),
    ("java", "java"),
    ("rust", "rs"),
    ("ruby", "rb"),
    ("golang", "go"),
    ("shell", "sh"),
    ("text", "txt"),
    ("markdown", "md"),
    ("config", "cfg"),
    ("image", "png"),
];

/// Maps the first capture group to an entity value
type ValueMapper = fn(&str) -> String;

struct Rule {
    priority: u8,
    kind: EntityKind,
    regex: Regex,
    map: ValueMapper,
}

impl Rule {
    fn new(priority: u8, kind: EntityKind, pattern: &str, map: ValueMapper) -> Self {
        Self {
            priority,
            kind,
            regex: Regex::new(pattern).unwrap(),
            map,
        }
    }
}

fn keep(s: &str) -> String {
    s.to_string()
}

fn home(_: &str) -> String {
    "~".to_string()
}

fn parent(_: &str) -> String {
    "..".to_string()
}

fn ext_glob(s: &str) -> String {
    format!("*.{}", s.trim_start_matches('.').to_lowercase())
}

fn language_glob(s: &str) -> String {
    let word = s.to_lowercase();
    let ext = LANGUAGE_EXTENSIONS
        .iter()
        .find(|(lang, _)| *lang == word)
        .map(|(_, ext)| *ext)
        .unwrap_or(word.as_str());
    format!("*.{}", ext)
}

fn lowercase(s: &str) -> String {
    s.to_lowercase()
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let exts = EXTENSIONS.join("|");
    let langs = LANGUAGE_EXTENSIONS
        .iter()
        .map(|(l, _)| *l)
        .collect::<Vec<_>>()
        .join("|");
    let word = r"[\w\-.]+";
    let location = r#"[\w\-.~/\\:]+"#;

    vec![
        // Quoted text
        Rule::new(0, EntityKind::Literal, r#""([^"]+)""#, keep),
        Rule::new(0, EntityKind::Literal, r"(?:^|[\s(=])'([^']+)'", keep),
        // URLs
        Rule::new(1, EntityKind::Url, r#"(?i)\b(https?://[^\s<>"']+|www\.[^\s<>"']+)"#, keep),
        // Absolute, home-relative and dot-relative paths
        Rule::new(
            2,
            EntityKind::Path,
            r#"(?:^|[\s"'=])((?:~|\.\.?)?/[\w\-.~/]*|~)"#,
            keep,
        ),
        Rule::new(2, EntityKind::Path, r"(?i)\b([a-z]:\\[\w\-.\\]*)", keep),
        Rule::new(2, EntityKind::Path, r"(?i)\bgo\s+(home)\b", home),
        Rule::new(2, EntityKind::Path, r"(?i)\b(home)\s+(?:directory|folder)\b", home),
        // Globs and file-type mentions
        Rule::new(3, EntityKind::Pattern, r"(\*\.[\w]+|\*)", keep),
        Rule::new(3, EntityKind::Pattern, &format!(r"(?i)\b({exts})\s+files?\b"), ext_glob),
        Rule::new(3, EntityKind::Pattern, &format!(r"(?i)\b({langs})\s+files?\b"), language_glob),
        Rule::new(3, EntityKind::Pattern, &format!(r"(?i)(?:^|\s)(\.(?:{exts}))\b"), ext_glob),
        // Names with a known extension
        Rule::new(
            4,
            EntityKind::Filename,
            &format!(r"(?i)\b([\w\-][\w\-.]*\.(?:{exts}))\b"),
            keep,
        ),
        // Hosts
        Rule::new(5, EntityKind::Host, r"\b(\d{1,3}(?:\.\d{1,3}){3})\b", keep),
        Rule::new(
            5,
            EntityKind::Host,
            r"(?i)\b((?:[\w\-]+@)?(?:[a-z0-9\-]+\.)+[a-z]{2,})\b",
            lowercase,
        ),
        Rule::new(5, EntityKind::Host, r"(?i)\b(localhost)\b", lowercase),
        // Wi-Fi profiles
        Rule::new(
            6,
            EntityKind::ProfileName,
            &format!(
                r"(?i)\b(?:password|key|wifi)\s+(?:for|of)\s+(?:(?:wifi|wireless)\s+)?(?:(?:network|profile)\s+)?({word})"
            ),
            keep,
        ),
        Rule::new(6, EntityKind::ProfileName, &format!(r"(?i)\bprofile\s+({word})"), keep),
        Rule::new(
            6,
            EntityKind::ProfileName,
            &format!(r"(?i)\b(?:wifi|wireless)\s+network\s+({word})"),
            keep,
        ),
        // Processes, packages, services and commands
        Rule::new(
            7,
            EntityKind::Program,
            &format!(
                r"(?i)\b(?:kill|terminate|stop|end\s+task|force\s+quit|pkill|killall)\s+(?:the\s+)?(?:running\s+)?(?:process\s+)?(?:named\s+|called\s+)?({word})"
            ),
            keep,
        ),
        Rule::new(
            7,
            EntityKind::Program,
            &format!(r"(?i)\bprocess\s+(?:named\s+|called\s+)?({word})"),
            keep,
        ),
        Rule::new(
            7,
            EntityKind::Program,
            r"(?i)\b(?:install|uninstall)\s+(?:the\s+)?(?:package\s+|program\s+)?([\w\-.+]+)",
            keep,
        ),
        Rule::new(7, EntityKind::Program, r"(?i)\bpackage\s+([\w\-.+]+)", keep),
        Rule::new(
            7,
            EntityKind::Program,
            r"(?i)\b(?:service|systemctl\s+status)\s+(?:status\s+)?(?:for\s+|of\s+)?([\w\-.@]+)",
            keep,
        ),
        Rule::new(7, EntityKind::Program, r"(?i)\b([\w\-.@]+)\s+service\b", keep),
        Rule::new(
            7,
            EntityKind::Program,
            &format!(r"(?i)\bis\s+(?:the\s+)?({word})\s+(?:running|active|up)\b"),
            keep,
        ),
        Rule::new(
            7,
            EntityKind::Program,
            &format!(
                r"(?i)\b(?:allow|unblock|let|permit\s+traffic\s+for|port\s+for|rule\s+for)\s+({word})"
            ),
            keep,
        ),
        Rule::new(
            7,
            EntityKind::Program,
            &format!(
                r"(?i)\b(?:help\s+(?:with|for|on)|help|man|manual\s+for|documentation\s+for|how\s+do\s+i\s+use|what\s+does)\s+({word})"
            ),
            keep,
        ),
        // Names given to files and folders
        Rule::new(8, EntityKind::Name, &format!(r#"(?i)\b(?:named|called)\s+["']?({word})"#), keep),
        Rule::new(8, EntityKind::Name, &format!(r"(?i)\b(?:folder|directory|dir)\s+({word})"), keep),
        Rule::new(8, EntityKind::Name, &format!(r"(?i)\b({word})\s+(?:folder|directory)\b"), keep),
        Rule::new(8, EntityKind::Name, r"(?i)\bgo\s+(back|up)\b", parent),
        Rule::new(8, EntityKind::Name, r"(?i)\b(parent)\s+(?:directory|folder)\b", parent),
        // Prepositional targets
        Rule::new(
            9,
            EntityKind::Destination,
            &format!(r#"(?i)\b(?:to|into)\s+(?:the\s+)?["']?({location})"#),
            keep,
        ),
        Rule::new(
            10,
            EntityKind::Source,
            &format!(r#"(?i)\bfrom\s+(?:the\s+)?["']?({location})"#),
            keep,
        ),
    ]
});

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(it|that|this|them)\b").unwrap());

struct Candidate {
    priority: u8,
    entity: Entity,
}

fn is_filtered(kind: EntityKind, value: &str) -> bool {
    let lower = value.to_lowercase();
    if value.trim().is_empty() {
        return true;
    }
    if REFERENCE_WORDS.contains(&lower.as_str()) {
        return kind != EntityKind::Literal;
    }
    if matches!(kind, EntityKind::Name | EntityKind::Destination | EntityKind::Source)
        && COMMAND_VERBS.contains(&lower.as_str())
    {
        return true;
    }
    kind.is_free_word() && STOP_WORDS.contains(&lower.as_str())
}

fn candidate_from(rule: &Rule, caps: &Captures<'_>) -> Option<Candidate> {
    let group = caps.get(1).or_else(|| caps.get(0))?;
    let raw = group.as_str();
    if is_filtered(rule.kind, raw) {
        return None;
    }
    let value = (rule.map)(raw);
    Some(Candidate {
        priority: rule.priority,
        entity: Entity::new(rule.kind, value, (group.start(), group.end())),
    })
}

/// Settle overlapping candidates: priority, then longer, then leftmost.
fn resolve_candidates(mut candidates: Vec<Candidate>) -> Vec<Entity> {
    candidates.sort_by(|a, b| {
        let len_a = a.entity.span.1 - a.entity.span.0;
        let len_b = b.entity.span.1 - b.entity.span.0;
        a.priority
            .cmp(&b.priority)
            .then(len_b.cmp(&len_a))
            .then(a.entity.span.0.cmp(&b.entity.span.0))
    });

    let mut accepted: Vec<Entity> = Vec::new();
    for candidate in candidates {
        if accepted.iter().all(|e| !e.overlaps(&candidate.entity)) {
            accepted.push(candidate.entity);
        }
    }
    accepted.sort_by_key(|e| e.span.0);
    accepted
}

/// Extract typed entities in left-to-right order.
pub fn extract(text: &str) -> Vec<Entity> {
    let candidates = RULES
        .iter()
        .flat_map(|rule| {
            rule.regex
                .captures_iter(text)
                .filter_map(move |caps| candidate_from(rule, &caps))
        })
        .collect();
    resolve_candidates(candidates)
}

/// Reference words that are not part of any extracted entity
pub fn find_references(text: &str, entities: &[Entity]) -> Vec<Reference> {
    REFERENCE_RE
        .find_iter(text)
        .filter(|m| {
            entities
                .iter()
                .all(|e| m.end() <= e.span.0 || m.start() >= e.span.1)
        })
        .map(|m| Reference {
            word: m.as_str().to_lowercase(),
            span: (m.start(), m.end()),
        })
        .collect()
}
