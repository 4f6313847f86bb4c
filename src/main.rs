//! StudioDesk admin CLI: inspect and seed the vertical/template configuration.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use studiodesk_lib::error::{EngineError, EngineErrorPayload};
use studiodesk_lib::forms;
use studiodesk_lib::state::{load_config, AppState};
use studiodesk_lib::templates::{EventTemplateEngine, TemplateFilter, UuidIdGenerator};
use studiodesk_lib::types::Config;
use studiodesk_lib::verticals::{DefaultConfig, VerticalRegistry};

#[derive(Parser)]
#[command(name = "studiodesk", version, about = "Project vertical and event template admin")]
struct Cli {
    /// Use this database instead of the one in ~/.studiodesk/config.json
    #[arg(long, value_name = "PATH", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all verticals
    List,
    /// Show one vertical and its assembled form
    Show { vertical: String },
    /// List templates, optionally for one vertical
    Templates { vertical: Option<String> },
    /// Stamp a template into fresh events
    Instantiate { template: String },
    /// Export one vertical as JSON
    Export { vertical: String },
    /// Import a vertical from a JSON file
    Import { path: PathBuf },
    /// Insert the built-in verticals into an empty database
    Seed,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config().unwrap_or_else(|e| {
        log::warn!("{e}. Using default configuration.");
        Config::default()
    });
    if cli.db.is_some() {
        config.db_path = cli.db;
    }
    if matches!(cli.command, Commands::Seed) {
        config.seed_defaults = false;
    }
    let state = AppState::with_config(config);

    match run(&state, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            let payload = EngineErrorPayload::from(&e);
            if let Ok(text) = serde_json::to_string_pretty(&payload) {
                eprintln!("{text}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(state: &AppState, command: Commands) -> Result<(), EngineError> {
    match command {
        Commands::List => print(state.with_db(|db| VerticalRegistry::new(db).list())?),
        Commands::Show { vertical } => {
            let vertical = state.with_db(|db| VerticalRegistry::new(db).get(&vertical))?;
            let form = forms::assemble(&vertical);
            print(json!({ "vertical": vertical, "form": form }))
        }
        Commands::Templates { vertical } => {
            let filter = TemplateFilter { vertical };
            print(state.with_db(|db| EventTemplateEngine::new(db).list_templates(&filter))?)
        }
        Commands::Instantiate { template } => print(state.with_db(|db| {
            EventTemplateEngine::new(db).instantiate_by_id(&template, &mut UuidIdGenerator)
        })?),
        Commands::Export { vertical } => {
            let text = state.with_db(|db| VerticalRegistry::new(db).export_json(&vertical))?;
            println!("{text}");
            Ok(())
        }
        Commands::Import { path } => {
            print(state.with_db(|db| VerticalRegistry::new(db).import_file(&path))?)
        }
        Commands::Seed => {
            let inserted = state.with_db(|db| {
                let defaults = DefaultConfig::builtin()?;
                VerticalRegistry::new(db).seed_defaults(&defaults)
            })?;
            print(json!({ "inserted": inserted }))
        }
    }
}

fn print<T: Serialize>(value: T) -> Result<(), EngineError> {
    let text = serde_json::to_string_pretty(&value).map_err(|e| EngineError::Parse {
        what: "output".to_string(),
        message: e.to_string(),
    })?;
    println!("{text}");
    Ok(())
}
