//! nlshctl - translate plain English into shell commands
//!
//! With a query, prints one command and exits with a code describing the
//! outcome. With no arguments, starts the interactive session.

use clap::Parser;
use nlshctl::cli::{Cli, Commands};
use nlshctl::commands::{self, App};
use nlshctl::logging::init_tracing;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.opts.verbose);

    let command = cli.resolved_command().unwrap_or(Commands::Repl);
    let code = match App::new(cli.opts.clone()) {
        Ok(mut app) => commands::dispatch(&mut app, command)
            .unwrap_or_else(|e| commands::fatal(&e)),
        Err(e) => commands::fatal(&e),
    };
    std::process::exit(code);
}
