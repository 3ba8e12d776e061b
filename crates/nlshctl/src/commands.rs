//! Command handlers. Each returns the process exit code.

use crate::cli::{Commands, GlobalOpts};
use crate::errors::{exit_code, EXIT_GENERAL_ERROR, EXIT_SUCCESS};
use crate::logging::HistoryEntry;
use crate::model_file::{self, ModelFile};
use crate::output;
use crate::repl;
use crate::training_store::TrainingStore;
use anyhow::{Context, Result};
use nlsh_shared::explain::explain_command;
use nlsh_shared::{
    ModelSnapshot, ModelStore, NlshConfig, SessionContext, TargetOs, TemplateTable, Translation,
    Translator, VersionInfo,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Everything a command needs: configuration, files and the translator
pub struct App {
    pub config: NlshConfig,
    pub opts: GlobalOpts,
    pub model_file: ModelFile,
    pub training_store: TrainingStore,
    translator: Option<Translator>,
}

impl App {
    pub fn new(opts: GlobalOpts) -> Result<Self> {
        let config = NlshConfig::load(opts.config.as_deref()).context("Failed to load config")?;
        Ok(Self::with_config(config, opts))
    }

    pub fn with_config(config: NlshConfig, opts: GlobalOpts) -> Self {
        Self {
            model_file: ModelFile::from_config(&config),
            training_store: TrainingStore::from_config(&config),
            config,
            opts,
            translator: None,
        }
    }

    pub fn target_os(&self) -> TargetOs {
        self.opts.os.unwrap_or_else(|| self.config.shell.target_os())
    }

    fn templates(&self) -> Result<TemplateTable> {
        let table = match &self.config.paths.templates {
            Some(path) => TemplateTable::with_overrides_file(path)
                .with_context(|| format!("Failed to load templates {}", path.display()))?,
            None => TemplateTable::new(),
        };
        // logs a warning per gap
        table.validate();
        Ok(table)
    }

    /// Translator over the saved model, trained on first use
    pub fn translator(&mut self) -> Result<&Translator> {
        if self.translator.is_none() {
            let (snapshot, trained) = self
                .model_file
                .load_or_train(&self.config, &self.training_store)?;
            if trained && !self.opts.json {
                output::display_note(&format!(
                    "Trained a new model at {}",
                    self.model_file.path().display()
                ));
            }
            let store = Arc::new(ModelStore::with_snapshot(snapshot));
            let translator = Translator::new(store, self.templates()?, self.config.classifier.clone());
            self.translator = Some(translator);
        }
        self.translator
            .as_ref()
            .context("translator not initialised")
    }

    /// Retrain and save, numbering the snapshot after the one it replaces.
    /// A live translator picks the new snapshot up immediately.
    pub fn retrain(&mut self) -> Result<Arc<ModelSnapshot>> {
        let mut snapshot = model_file::train(&self.config, &self.training_store, true)?;
        let snapshot = match &self.translator {
            Some(translator) => translator.store().swap(snapshot),
            None => {
                // an unreadable old model is simply replaced
                let previous = self.model_file.load().map(|s| s.version).unwrap_or(0);
                snapshot.version = previous + 1;
                Arc::new(snapshot)
            }
        };
        self.model_file.save(&snapshot)?;
        Ok(snapshot)
    }

    pub fn translate(&mut self, query: &str, session: &mut SessionContext) -> Result<Translation> {
        let os = self.target_os();
        self.translator()?.translate(query, os, session).map_err(Into::into)
    }
}

pub fn dispatch(app: &mut App, command: Commands) -> Result<i32> {
    match command {
        Commands::Run { query } => run(app, &query.join(" ")),
        Commands::Info => info_cmd(app),
        Commands::Intents => intents(app),
        Commands::Retrain => retrain(app),
        Commands::Learn {
            text,
            intent,
            retrain: and_retrain,
        } => learn(app, &text, &intent, and_retrain),
        Commands::Explain { command } => explain(app, &command.join(" ")),
        Commands::Repl => repl::run(app),
    }
}

/// Translate one query in a fresh session
pub fn run(app: &mut App, query: &str) -> Result<i32> {
    let started = Instant::now();
    let mut session = SessionContext::new();
    let translation = app.translate(query, &mut session)?;
    let code = exit_code(&translation.outcome);

    if app.opts.json {
        println!("{}", serde_json::to_string_pretty(&translation)?);
    } else {
        output::display_translation(&translation, app.opts.explain);
    }

    HistoryEntry::from_translation(&translation, started.elapsed().as_millis() as u64, code)
        .write();
    Ok(code)
}

fn info_cmd(app: &mut App) -> Result<i32> {
    let snapshot = app.translator()?.store().current()?;
    let version = VersionInfo::current();
    if app.opts.json {
        let value = serde_json::json!({
            "version": version,
            "model_path": app.model_file.path(),
            "model_version": snapshot.version,
            "metrics": snapshot.metrics,
            "intents": snapshot.intents(),
            "target_os": app.target_os(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        output::display_info(&snapshot, &app.model_file.path().display().to_string(), &version);
    }
    Ok(EXIT_SUCCESS)
}

fn intents(app: &mut App) -> Result<i32> {
    let json = app.opts.json;
    let translator = app.translator()?;
    let counts = translator.store().current()?.class_counts();
    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        output::display_intents(&counts, translator.templates());
    }
    Ok(EXIT_SUCCESS)
}

fn retrain(app: &mut App) -> Result<i32> {
    let snapshot = app.retrain()?;
    info!(version = snapshot.version, "Retrained");
    if app.opts.json {
        println!("{}", serde_json::to_string_pretty(&snapshot.metrics)?);
    } else {
        output::display_retrain(&snapshot);
    }
    Ok(EXIT_SUCCESS)
}

fn learn(app: &mut App, text: &str, intent: &str, and_retrain: bool) -> Result<i32> {
    let added = app.training_store.add(text, intent)?;
    if added {
        output::display_success(&format!("Learned \"{}\" as {}", text.trim(), intent));
    } else {
        output::display_note("Already known, nothing added");
    }
    if and_retrain {
        return retrain(app);
    }
    if added {
        output::display_note("Run `nlshctl retrain` to use it");
    }
    Ok(EXIT_SUCCESS)
}

fn explain(app: &App, command: &str) -> Result<i32> {
    let explanation = explain_command(command);
    if app.opts.json {
        let value = serde_json::json!({ "command": command, "explanation": explanation });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", explanation);
    }
    Ok(EXIT_SUCCESS)
}

/// Report a fatal error and return its exit code
pub fn fatal(error: &anyhow::Error) -> i32 {
    output::display_error(&format!("{:#}", error));
    EXIT_GENERAL_ERROR
}
