//! CLI interface for TaskOptima
//!
//! This module provides the command-line interface using clap's derive API.
//! It defines all commands and global flags for running the server and for
//! working with the task list from a terminal.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TaskOptima productivity assistant
///
/// Keeps a local task list and answers questions about it with a language
/// model running on your machine.
#[derive(Parser, Debug)]
#[command(name = "taskoptima")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the assistant a question about your tasks
    Ask {
        /// The question to ask
        question: String,
    },

    /// Suggest a 7-day schedule for the open tasks
    Schedule,

    /// Show recent conversations
    History {
        /// Number of entries to show (default: agent.history_limit)
        #[arg(short, long, value_parser = clap::value_parser!(i64).range(1..))]
        limit: Option<i64>,
    },

    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },
}

/// Task management actions
#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Priority (1 is the most urgent)
        #[arg(short, long, default_value = "3")]
        priority: i64,

        /// Deadline as YYYY-MM-DD
        #[arg(short, long)]
        deadline: String,
    },

    /// List all tasks with their urgency
    List,

    /// Mark a task as completed
    Complete {
        /// Task ID
        id: i64,
    },

    /// Delete every completed task
    Clear,
}
