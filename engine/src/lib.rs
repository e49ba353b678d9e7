//! TaskOptima Engine Library
//!
//! This library provides the core functionality of TaskOptima.
//! It is used by both the main binary and integration tests.

/// Configuration management module
pub mod config;

/// Database persistence module
pub mod db;

/// Task classification and prompt composition
pub mod planner;

/// Inference client abstraction layer
pub mod llm;

/// Task assistant module
pub mod agent;

/// REST API module
pub mod api;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
