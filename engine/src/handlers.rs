//! Command handlers for CLI operations
//!
//! This module implements the handlers for the terminal commands:
//! - serve: Run the HTTP API
//! - ask / schedule: Talk to the assistant
//! - history: Show recent conversations
//! - tasks: Add, list, complete and clear tasks

use anyhow::{Context, Result};
use chrono::Local;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::agent::Assistant;
use crate::api::{self, AppState};
use crate::config::Config;
use crate::db::Database;
use crate::llm::{ollama::OllamaClient, InferenceClient};
use crate::planner::{self, Urgency};
use sdk::{NewTask, Task};

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Open the configured database
async fn open_database(config: &Config) -> Result<Database> {
    let db_path = config.database_path();
    Database::new(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

/// Build the assistant from config
fn build_assistant(config: &Config, database: &Database) -> Assistant {
    let client: Arc<dyn InferenceClient> = Arc::new(OllamaClient::from_config(&config.llm));
    Assistant::new(database, client).with_history_limit(config.agent.history_limit)
}

/// Start the HTTP API server
///
/// `host` and `port` override the `[server]` section when given.
pub async fn handle_serve(config: &Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", host, port))?;

    let database = open_database(config).await?;
    let assistant = build_assistant(config, &database);

    if !assistant.client().check_health().await {
        tracing::warn!(
            "Ollama is not reachable at {}; assistant requests will fail until it is running",
            config.llm.base_url
        );
    }

    api::serve(addr, AppState::new(database, assistant)).await?;
    Ok(())
}

/// Ask the assistant a question
pub async fn handle_ask(question: String, config: &Config, format: OutputFormat) -> Result<()> {
    let database = open_database(config).await?;
    let assistant = build_assistant(config, &database);

    let entry = assistant.answer(&question).await?;

    match format {
        OutputFormat::Text => println!("{}", entry.response.trim()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
    }

    Ok(())
}

/// Ask for a 7-day schedule
pub async fn handle_schedule(config: &Config, format: OutputFormat) -> Result<()> {
    let database = open_database(config).await?;
    let assistant = build_assistant(config, &database);

    let schedule = assistant.suggest_schedule().await?;

    match format {
        OutputFormat::Text => println!("{}", schedule.trim()),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "schedule": schedule }))?)
        }
    }

    Ok(())
}

/// Show the most recent conversation entries
pub async fn handle_history(limit: Option<i64>, config: &Config, format: OutputFormat) -> Result<()> {
    let database = open_database(config).await?;
    let assistant = build_assistant(config, &database);

    let limit = limit.unwrap_or(config.agent.history_limit);
    let entries = assistant.history_with_limit(limit).await?;

    match format {
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No conversations in history");
                return Ok(());
            }

            println!("Conversation History (last {} entries):", limit);
            println!();

            for entry in &entries {
                let asked = chrono::DateTime::from_timestamp(entry.timestamp, 0)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "Unknown".to_string());

                println!("[{}]", asked);
                println!("  Q: {}", entry.question);
                println!("  A: {}", entry.response.trim());
                println!();
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "entries": entries,
                "count": entries.len(),
                "limit": limit
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Add a task
pub async fn handle_tasks_add(new_task: NewTask, config: &Config, format: OutputFormat) -> Result<()> {
    planner::validate_new_task(&new_task)?;

    let database = open_database(config).await?;
    let task = database.tasks().create_task(&new_task).await?;

    match format {
        OutputFormat::Text => println!("✓ Added task {}: {}", task.id, task.title),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&task)?),
    }

    Ok(())
}

/// List every task with its urgency tag
pub async fn handle_tasks_list(config: &Config, format: OutputFormat) -> Result<()> {
    let database = open_database(config).await?;
    let tasks = database.tasks().list_tasks().await?;
    let today = Local::now().date_naive();

    match format {
        OutputFormat::Text => {
            if tasks.is_empty() {
                println!("No tasks");
                return Ok(());
            }

            for task in &tasks {
                println!("{}", format_task_line(task, urgency_label(task, today)));
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = tasks
                .iter()
                .map(|task| {
                    let urgency = Urgency::of(&task.summary(), today).ok();
                    json!({ "task": task, "urgency": urgency })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "tasks": rows }))?);
        }
    }

    Ok(())
}

/// Mark a task completed
pub async fn handle_tasks_complete(id: i64, config: &Config, format: OutputFormat) -> Result<()> {
    let database = open_database(config).await?;
    let task = database
        .tasks()
        .complete_task(id)
        .await?
        .ok_or(sdk::EngineError::TaskNotFound(id))?;

    match format {
        OutputFormat::Text => println!("✓ Completed task {}: {}", task.id, task.title),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&task)?),
    }

    Ok(())
}

/// Delete every completed task
pub async fn handle_tasks_clear(config: &Config, format: OutputFormat) -> Result<()> {
    let database = open_database(config).await?;
    let deleted = database.tasks().delete_completed_tasks().await?;

    match format {
        OutputFormat::Text => println!("All completed tasks deleted ({} removed).", deleted),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "message": "All completed tasks deleted.",
                "deleted": deleted
            }))?
        ),
    }

    Ok(())
}

fn urgency_label(task: &Task, today: chrono::NaiveDate) -> &'static str {
    match Urgency::of(&task.summary(), today) {
        Ok(Urgency::Overdue) => "OVERDUE",
        Ok(Urgency::Urgent) => "URGENT",
        Ok(Urgency::Unclassified) => "",
        Err(_) => "BAD DEADLINE",
    }
}

fn format_task_line(task: &Task, label: &str) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{}] {:>4}  {}  (priority: {}, deadline: {})",
        mark, task.id, task.title, task.priority, task.deadline
    );

    if !label.is_empty() {
        line.push_str("  ");
        line.push_str(label);
    }

    line
}
