//! REPL - interactive translation session
//!
//! Unlike one-shot mode, the session context survives between lines, so
//! "create a folder called logs" followed by "go into it" resolves.

use crate::commands::App;
use crate::errors::{exit_code, EXIT_SUCCESS};
use crate::logging::HistoryEntry;
use crate::output;
use anyhow::Result;
use nlsh_shared::{SessionContext, TargetOs};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::time::Instant;

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Exit,
    Help,
    ShowContext,
    ClearContext,
    SetOs(TargetOs),
    BadMeta(String),
    Query(String),
}

impl ReplInput {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "" => ReplInput::Empty,
            "exit" | "quit" | ":q" | ":quit" => ReplInput::Exit,
            ":help" | ":h" => ReplInput::Help,
            ":context" | ":ctx" => ReplInput::ShowContext,
            ":clear" => ReplInput::ClearContext,
            _ => match line.strip_prefix(":os") {
                Some(rest) => match rest.trim().parse() {
                    Ok(os) => ReplInput::SetOs(os),
                    Err(_) => ReplInput::BadMeta(line.to_string()),
                },
                None if line.starts_with(':') => ReplInput::BadMeta(line.to_string()),
                None => ReplInput::Query(line.to_string()),
            },
        }
    }
}

fn print_prompt(os: TargetOs) {
    print!("{} ", format!("nlsh[{}]>", os).bright_blue());
    let _ = io::stdout().flush();
}

fn print_help() {
    println!("Type a request in plain English, e.g. \"create a folder called logs\".");
    println!("  :context      show remembered entities");
    println!("  :clear        forget them");
    println!("  :os <posix|windows>  switch target shell");
    println!("  exit          leave");
}

/// Start the REPL; returns when stdin closes or the user exits
pub fn run(app: &mut App) -> Result<i32> {
    // load the model up front so the first query is not slow
    app.translator()?;

    let mut session = SessionContext::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("nlshctl interactive mode. Type :help for commands.");
    loop {
        print_prompt(app.target_os());

        let line = match lines.next() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                output::display_error(&format!("Error reading input: {}", e));
                continue;
            }
            None => break,
        };

        match ReplInput::parse(&line) {
            ReplInput::Empty => continue,
            ReplInput::Exit => break,
            ReplInput::Help => print_help(),
            ReplInput::ShowContext => {
                println!("{}", serde_json::to_string_pretty(&session)?);
            }
            ReplInput::ClearContext => {
                session.clear();
                output::display_success("Context cleared");
            }
            ReplInput::SetOs(os) => {
                app.opts.os = Some(os);
                output::display_success(&format!("Target is now {}", os.display_name()));
            }
            ReplInput::BadMeta(text) => {
                output::display_error(&format!("Unknown command '{}'. Try :help", text));
            }
            ReplInput::Query(query) => {
                let started = Instant::now();
                match app.translate(&query, &mut session) {
                    Ok(translation) => {
                        let code = exit_code(&translation.outcome);
                        if app.opts.json {
                            println!("{}", serde_json::to_string_pretty(&translation)?);
                        } else {
                            output::display_translation(&translation, app.opts.explain);
                        }
                        HistoryEntry::from_translation(
                            &translation,
                            started.elapsed().as_millis() as u64,
                            code,
                        )
                        .write();
                    }
                    Err(e) => output::display_error(&format!("{:#}", e)),
                }
            }
        }
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta_commands() {
        assert_eq!(ReplInput::parse("   "), ReplInput::Empty);
        assert_eq!(ReplInput::parse("quit"), ReplInput::Exit);
        assert_eq!(ReplInput::parse(":q"), ReplInput::Exit);
        assert_eq!(ReplInput::parse(":context"), ReplInput::ShowContext);
        assert_eq!(ReplInput::parse(":clear"), ReplInput::ClearContext);
        assert_eq!(
            ReplInput::parse(":os windows"),
            ReplInput::SetOs(TargetOs::Windows)
        );
        assert_eq!(
            ReplInput::parse(":os beos"),
            ReplInput::BadMeta(":os beos".into())
        );
        assert_eq!(
            ReplInput::parse(":frobnicate"),
            ReplInput::BadMeta(":frobnicate".into())
        );
    }

    #[test]
    fn test_parse_query_is_trimmed() {
        assert_eq!(
            ReplInput::parse("  list files here \n"),
            ReplInput::Query("list files here".into())
        );
    }
}
