//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap. A bare query is translated; the
//! subcommands cover model management and the interactive session.

use clap::{ArgAction, Parser, Subcommand};
use nlsh_shared::TargetOs;
use std::path::PathBuf;

/// Natural language to shell command translator
#[derive(Parser, Debug)]
#[command(name = "nlshctl")]
#[command(about = "Translate plain English into shell commands", long_about = None)]
#[command(version = env!("NLSH_VERSION"))]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// What you want to do, e.g. "create a folder named Project"
    #[arg(value_name = "QUERY")]
    pub query: Vec<String>,

    #[command(flatten)]
    pub opts: GlobalOpts,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Target shell family (default: this machine, or config default_os)
    #[arg(long, global = true, value_parser = parse_os)]
    pub os: Option<TargetOs>,

    /// Output JSON only
    #[arg(long, global = true)]
    pub json: bool,

    /// Explain the generated command
    #[arg(long, global = true)]
    pub explain: bool,

    /// Config file (overrides user and system config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Translate a request
    Run {
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show model and build information
    Info,

    /// List the intents the model knows
    Intents,

    /// Retrain the model from the built-in and taught examples
    Retrain,

    /// Teach a new phrase for an intent
    Learn {
        /// Example phrase
        #[arg(long)]
        text: String,

        /// Intent label, e.g. create_directory
        #[arg(long)]
        intent: String,

        /// Retrain right away
        #[arg(long)]
        retrain: bool,
    },

    /// Explain a shell command
    Explain {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Interactive session; "it" and "that" refer to earlier requests
    Repl,
}

fn parse_os(s: &str) -> Result<TargetOs, String> {
    s.parse::<TargetOs>().map_err(|e| e.to_string())
}

impl Cli {
    /// The command to run. A query that is just a subcommand name runs that
    /// subcommand.
    pub fn resolved_command(&self) -> Option<Commands> {
        match &self.command {
            Some(Commands::Run { query }) => Some(
                redirect(&query.join(" ")).unwrap_or_else(|| Commands::Run {
                    query: query.clone(),
                }),
            ),
            Some(cmd) => Some(cmd.clone()),
            None if self.query.is_empty() => None,
            None => Some(redirect(&self.query.join(" ")).unwrap_or_else(|| Commands::Run {
                query: self.query.clone(),
            })),
        }
    }
}

fn redirect(query: &str) -> Option<Commands> {
    match query.trim().to_lowercase().as_str() {
        "info" => Some(Commands::Info),
        "intents" => Some(Commands::Intents),
        "retrain" => Some(Commands::Retrain),
        "repl" => Some(Commands::Repl),
        _ => None,
    }
}
