//! aicron — schedule recurring prompts through the system crontab.
//!
//! Each invocation runs one operation to completion and exits; cron itself
//! triggers the `run` subcommand at schedule time.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "aicron")]
#[command(about = "Schedule recurring prompts via cron")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new scheduled job
    Create {
        /// Prompt text to execute on each run
        prompt: String,
        /// Five-field cron expression, e.g. "0 9 * * *"
        #[arg(short, long)]
        schedule: String,
    },
    /// List all jobs (the default when no subcommand is given)
    List,
    /// Show the most recent run results across all jobs
    Runs,
    /// Show job details and recent runs
    Show { id: i64 },
    /// Execute a job now (the subcommand cron invokes)
    Run { id: i64 },
    /// Delete a job, its crontab entry, and its run history
    Remove { id: i64 },
    /// Disable a job and drop its crontab entry
    Pause { id: i64 },
    /// Re-enable a paused job
    Resume { id: i64 },
    /// Get or set configuration values
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List all configuration keys
    List,
    /// Print a single value
    Get { key: String },
    /// Set a value, e.g. `config set prompt_command "opencode run"`
    Set { key: String, value: String },
    /// Remove a key
    Delete { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "aicron=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // load config: explicit AICRON_CONFIG path > ~/.aicron/aicron.toml
    let config_path = std::env::var("AICRON_CONFIG").ok();
    let config = aicron_core::AicronConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        aicron_core::AicronConfig::default()
    });

    ensure_parent_dir(&config.database.path);
    let store = aicron_store::JobStore::open(&config.database.path)?;

    match cli.command.unwrap_or(Commands::List) {
        Commands::Create { prompt, schedule } => {
            commands::create(&store, &config, &prompt, &schedule).await
        }
        Commands::List => commands::list(&store).await,
        Commands::Runs => commands::recent(&store),
        Commands::Show { id } => commands::show(&store, id),
        Commands::Run { id } => commands::run(&store, &config, id).await,
        Commands::Remove { id } => commands::remove(&store, id).await,
        Commands::Pause { id } => commands::pause(&store, id).await,
        Commands::Resume { id } => commands::resume(&store, &config, id).await,
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config_list(&store),
            ConfigAction::Get { key } => commands::config_get(&store, &key),
            ConfigAction::Set { key, value } => commands::config_set(&store, &key, &value),
            ConfigAction::Delete { key } => commands::config_delete(&store, &key),
        },
    }
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
