//! Error types and handling
//!
//! This module provides the error types used throughout TaskOptima.
//! All errors implement the `ErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Security
//!
//! Hints are static strings. They never echo task titles, prompts or
//! model output back to the caller.

use thiserror::Error;

/// Trait for TaskOptima error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All engine errors implement this trait.
pub trait ErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or fixed by the caller. Non-recoverable
    /// errors typically require manual intervention or a restart.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Configuration**: Invalid or missing configuration
/// - **Database**: SQLite operation failures
/// - **LLM Provider**: Local inference runtime failures
/// - **Planning**: Tasks that cannot be classified
/// - **Input**: Unknown task ids and rejected payloads
///
/// # Examples
///
/// ```
/// use sdk::errors::{EngineError, ErrorExt};
///
/// let error = EngineError::TaskNotFound(7);
/// assert_eq!(error.to_string(), "Task not found");
/// assert!(error.is_recoverable());
///
/// let malformed = EngineError::MalformedDeadline {
///     title: "Write report".to_string(),
///     deadline: "next week".to_string(),
/// };
/// println!("Hint: {}", malformed.user_hint());
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // LLM provider errors
    #[error("LLM provider error: {0}")]
    LLMProvider(String),

    // Planning errors
    #[error("Malformed deadline '{deadline}' for task '{title}': expected YYYY-MM-DD")]
    MalformedDeadline { title: String, deadline: String },

    // Input errors
    #[error("Task not found")]
    TaskNotFound(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Database(_) => "Database operation failed. Try restarting the server",
            Self::LLMProvider(_) => "Local model unavailable. Check that the inference runtime is running",
            Self::MalformedDeadline { .. } => "Deadlines must be calendar dates in the form YYYY-MM-DD",
            Self::TaskNotFound(_) => "No task exists with that id",
            Self::InvalidInput(_) => "The request was rejected. Check the submitted fields",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) | Self::Io(_) => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_deadline_message() {
        let err = EngineError::MalformedDeadline {
            title: "Taxes".to_string(),
            deadline: "2024/04/15".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("2024/04/15"));
        assert!(message.contains("Taxes"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_task_not_found_message() {
        let err = EngineError::TaskNotFound(42);
        assert_eq!(err.to_string(), "Task not found");
        assert_eq!(err.user_hint(), "No task exists with that id");
    }

    #[test]
    fn test_config_errors_are_fatal() {
        assert!(!EngineError::Config("bad".to_string()).is_recoverable());
        assert!(EngineError::LLMProvider("down".to_string()).is_recoverable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
