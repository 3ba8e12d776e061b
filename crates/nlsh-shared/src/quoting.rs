//! Quoting slot values for the target shell.
//!
//! Every value reaches the shell as a literal. POSIX words go through
//! `shell_words::quote` (single quotes, `'` written as `'\''`); PowerShell
//! arguments are single-quoted with embedded quotes doubled. Plain words
//! such as `Project` or `notes.txt` are left bare on both.

use crate::intent::TargetOs;
use std::borrow::Cow;

/// How much of a value the shell may still interpret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Nothing expands
    Literal,
    /// A leading `~` or `~/` stays bare so it expands to the home directory
    Path,
    /// As `Path`, and `*` and `?` stay bare so the shell globs them
    Glob,
}

/// Characters PowerShell reads as a single quote
const POWERSHELL_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Quote `value` as one argument for `os`.
pub fn quote(value: &str, style: QuoteStyle, os: TargetOs) -> String {
    match os {
        TargetOs::Posix => quote_posix(value, style),
        TargetOs::Windows => quote_powershell(value),
    }
}

fn quote_posix(value: &str, style: QuoteStyle) -> String {
    if style == QuoteStyle::Literal {
        return posix_word(value).into_owned();
    }
    let (home, rest) = split_home(value);
    if !home.is_empty() && rest.is_empty() {
        return home.to_string();
    }
    let body = match style {
        QuoteStyle::Glob => posix_glob(rest),
        _ => posix_word(rest).into_owned(),
    };
    format!("{}{}", home, body)
}

/// `~` or `~/` prefix and the remainder
fn split_home(value: &str) -> (&str, &str) {
    if value == "~" {
        ("~", "")
    } else if let Some(rest) = value.strip_prefix("~/") {
        ("~/", rest)
    } else {
        ("", value)
    }
}

fn posix_word(word: &str) -> Cow<'_, str> {
    // `~name` would expand to another user's home
    if word.starts_with('~') {
        return Cow::Owned(format!("'{}'", word.replace('\'', "'\\''")));
    }
    shell_words::quote(word)
}

/// Quote the runs between `*` and `?`, leaving the wildcards bare
fn posix_glob(value: &str) -> String {
    if value.is_empty() {
        return posix_word(value).into_owned();
    }
    let mut out = String::new();
    let mut run_start = 0;
    for (i, c) in value.char_indices() {
        if c == '*' || c == '?' {
            if run_start < i {
                out.push_str(&posix_word(&value[run_start..i]));
            }
            out.push(c);
            run_start = i + c.len_utf8();
        }
    }
    if run_start < value.len() {
        out.push_str(&posix_word(&value[run_start..]));
    }
    out
}

fn powershell_bare(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '\\' | ':' | '*' | '?'))
}

/// Cmdlets expand `*` and `?` themselves, so no glob handling is needed
fn quote_powershell(value: &str) -> String {
    if powershell_bare(value) {
        return value.to_string();
    }
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if POWERSHELL_QUOTES.contains(&c) {
            out.push(c);
        }
        out.push(c);
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posix(value: &str) -> String {
        quote(value, QuoteStyle::Literal, TargetOs::Posix)
    }

    fn powershell(value: &str) -> String {
        quote(value, QuoteStyle::Literal, TargetOs::Windows)
    }

    /// The POSIX word must read back as exactly one argument equal to `value`
    fn assert_posix_literal(value: &str, style: QuoteStyle) {
        let quoted = quote(value, style, TargetOs::Posix);
        assert_eq!(
            shell_words::split(&quoted).unwrap(),
            vec![value.to_string()],
            "{} quoted as {}",
            value,
            quoted
        );
    }

    #[test]
    fn test_plain_words_stay_bare() {
        for value in ["Project", "notes.txt", "google.com", "src/main.rs", "."] {
            assert_eq!(posix(value), value);
            assert_eq!(powershell(value), value);
        }
    }

    #[test]
    fn test_posix_expansions_are_quoted() {
        assert_eq!(posix("costs $5"), "'costs $5'");
        assert_eq!(posix("$(whoami)"), "'$(whoami)'");
        assert_eq!(posix("a`id`b"), "'a`id`b'");
        assert_eq!(posix("He said \"hi\""), "'He said \"hi\"'");
        assert_eq!(posix("a; rm -rf /"), "'a; rm -rf /'");
    }

    #[test]
    fn test_posix_single_quote_round_trips() {
        for value in ["it's", "'", "a'b'c", "", "~bob", "tab\there"] {
            assert_posix_literal(value, QuoteStyle::Literal);
        }
    }

    #[test]
    fn test_powershell_quoting() {
        assert_eq!(powershell("costs $5"), "'costs $5'");
        assert_eq!(powershell("$(whoami)"), "'$(whoami)'");
        assert_eq!(powershell("a`id`b"), "'a`id`b'");
        assert_eq!(powershell("He said \"hi\""), "'He said \"hi\"'");
        assert_eq!(powershell("it's"), "'it''s'");
        assert_eq!(powershell("it\u{2019}s"), "'it\u{2019}\u{2019}s'");
        assert_eq!(powershell("-Force"), "'-Force'");
        assert_eq!(powershell(""), "''");
    }

    #[test]
    fn test_home_prefix_stays_bare_for_paths() {
        let path = |v| quote(v, QuoteStyle::Path, TargetOs::Posix);
        assert_eq!(path("~"), "~");
        assert_eq!(path("~/"), "~/");
        assert_eq!(path("~/My Documents"), "~/'My Documents'");
        assert_eq!(path("My Documents"), "'My Documents'");
        // only a literal for text slots
        assert_eq!(posix("~/notes"), "'~/notes'");
    }

    #[test]
    fn test_glob_keeps_wildcards() {
        let glob = |v| quote(v, QuoteStyle::Glob, TargetOs::Posix);
        assert_eq!(glob("*.txt"), "*.txt");
        assert_eq!(glob("*"), "*");
        assert_eq!(glob("my file*.txt"), "'my file'*.txt");
        assert_eq!(glob("~/logs/*.log"), "~/logs/*.log");
        assert_eq!(glob("$(id)*"), "'$(id)'*");
        assert_eq!(quote("*.txt", QuoteStyle::Glob, TargetOs::Windows), "*.txt");
    }

    #[test]
    fn test_path_values_read_back_unchanged() {
        for value in ["My Documents", "a$b", "it's here", "x\"y"] {
            assert_posix_literal(value, QuoteStyle::Path);
        }
    }
}
