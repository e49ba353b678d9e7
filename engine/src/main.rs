// TaskOptima
// Main entry point for the taskoptima binary

use clap::Parser;
use sdk::NewTask;
use taskoptima_engine::cli::{Cli, Command, TaskAction};
use taskoptima_engine::config::Config;
use taskoptima_engine::handlers::{
    handle_ask, handle_history, handle_schedule, handle_serve, handle_tasks_add,
    handle_tasks_clear, handle_tasks_complete, handle_tasks_list, OutputFormat,
};
use taskoptima_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // --log wins over the config file; RUST_LOG wins over both
    let log_level = cli.log.as_deref().unwrap_or(&config.core.log_level);
    init_telemetry_with_level(log_level);

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");

    tracing::info!("TaskOptima v{} ({} - {})", version, commit, timestamp);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Command::Serve { host, port } => {
            tracing::info!("Starting API server...");
            handle_serve(&config, host, port).await
        }

        Command::Ask { question } => {
            tracing::debug!("Asking: {}", question);
            handle_ask(question, &config, format).await
        }

        Command::Schedule => handle_schedule(&config, format).await,

        Command::History { limit } => handle_history(limit, &config, format).await,

        Command::Tasks { action } => {
            tracing::debug!("Task management: {:?}", action);
            match action {
                TaskAction::Add {
                    title,
                    priority,
                    deadline,
                } => {
                    let new_task = NewTask {
                        title,
                        priority,
                        deadline,
                    };
                    handle_tasks_add(new_task, &config, format).await
                }
                TaskAction::List => handle_tasks_list(&config, format).await,
                TaskAction::Complete { id } => handle_tasks_complete(id, &config, format).await,
                TaskAction::Clear => handle_tasks_clear(&config, format).await,
            }
        }
    }
}
