//! nlshctl library - command-line front end for nlsh
//!
//! Exposes the CLI pieces so integration tests can drive them without
//! spawning the binary.

pub mod cli;
pub mod commands;
pub mod errors;
pub mod logging;
pub mod model_file;
pub mod output;
pub mod redact;
pub mod repl;
pub mod training_store;
