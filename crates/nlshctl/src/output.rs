//! Output formatting - ASCII-only terminal output
//!
//! The command itself goes to stdout on its own line so it can be piped or
//! copied; everything else is decoration around it.

use nlsh_shared::explain::explain_command;
use nlsh_shared::model::ModelSnapshot;
use nlsh_shared::translator::StepResult;
use nlsh_shared::{Intent, Outcome, TemplateTable, Translation, VersionInfo};
use owo_colors::OwoColorize;
use std::collections::BTreeMap;

/// Display a translation
pub fn display_translation(translation: &Translation, explain: bool) {
    match &translation.outcome {
        Outcome::Command { command } => {
            println!("{}", command);
            if explain {
                display_explanation(translation, command);
            }
        }
        Outcome::NeedsConfirmation {
            command,
            level,
            reason,
        } => {
            println!("{}", command);
            eprintln!(
                "{} {} risk: {}. Review before running.",
                "[CONFIRM]".yellow(),
                level,
                reason
            );
            if explain {
                display_explanation(translation, command);
            }
        }
        Outcome::Clarification { prompt, .. } => {
            eprintln!("{} {}", "[UNCLEAR]".yellow(), prompt);
        }
        Outcome::Unsupported { intent, os } => {
            eprintln!(
                "{} '{}' has no {} command.",
                "[UNSUPPORTED]".bright_red(),
                intent,
                os.display_name()
            );
        }
        Outcome::Blocked { reason } => {
            eprintln!(
                "{} Refusing to generate a command: {}.",
                "[BLOCKED]".bright_red(),
                reason
            );
        }
    }
}

fn display_explanation(translation: &Translation, command: &str) {
    eprintln!();
    for step in &translation.steps {
        display_step(step);
    }
    eprintln!("  {}", explain_command(command).dimmed());
}

fn display_step(step: &StepResult) {
    let conf_pct = (step.confidence * 100.0).round() as u32;
    let confidence = format!("{}%", conf_pct);
    let confidence = if conf_pct >= 70 {
        confidence.bright_green().to_string()
    } else {
        confidence.yellow().to_string()
    };
    eprintln!(
        "  * {} -> {} ({})",
        step.text,
        step.intent.as_str().cyan(),
        confidence
    );
    if let Some(description) = &step.description {
        eprintln!("    {}", description.dimmed());
    }
}

/// Display model and build information
pub fn display_info(snapshot: &ModelSnapshot, model_path: &str, version: &VersionInfo) {
    let metrics = &snapshot.metrics;
    println!("nlshctl {}", version);
    println!();
    println!("[MODEL]");
    println!("  Type:        TF-IDF + linear SVM (local, offline)");
    println!("  Path:        {}", model_path);
    println!("  Version:     {}", snapshot.version);
    println!("  Intents:     {}", metrics.num_intents);
    println!("  Examples:    {}", metrics.num_samples);
    println!("  Vocabulary:  {}", metrics.vocabulary_size);
    if let (Some(acc), Some(std)) = (metrics.accuracy, metrics.accuracy_std) {
        println!("  Accuracy:    {:.1}% (+/- {:.1}%)", acc * 100.0, std * 100.0);
    }
    println!("  Trained:     {}", metrics.trained_at.to_rfc3339());
}

/// Display the intents of a model with descriptions and example counts
pub fn display_intents(counts: &BTreeMap<Intent, usize>, templates: &TemplateTable) {
    for (intent, count) in counts {
        println!(
            "  {:<22} {:>3}  {}",
            intent.as_str().cyan(),
            count,
            templates.description(*intent).dimmed()
        );
    }
    println!();
    println!("{} intents", counts.len());
}

/// Display retrain results
pub fn display_retrain(snapshot: &ModelSnapshot) {
    let metrics = &snapshot.metrics;
    display_success(&format!(
        "Retrained on {} examples across {} intents",
        metrics.num_samples, metrics.num_intents
    ));
    if let (Some(acc), Some(std)) = (metrics.accuracy, metrics.accuracy_std) {
        println!(
            "     Cross-validated accuracy: {:.1}% (+/- {:.1}%)",
            acc * 100.0,
            std * 100.0
        );
    }
}

/// Display an error
pub fn display_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red(), message);
}

/// Display a success message
pub fn display_success(message: &str) {
    println!("{} {}", "[OK]".bright_green(), message);
}

/// Display an informational message
pub fn display_note(message: &str) {
    eprintln!("{} {}", "[NOTE]".cyan(), message);
}
