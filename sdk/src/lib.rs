//! TaskOptima SDK
//!
//! Shared types and errors for TaskOptima components.
//! The engine library, its HTTP layer and its CLI all speak these types.

/// Error types and handling
pub mod errors;

/// Task and conversation records
pub mod types;

// Re-export commonly used types
pub use errors::{EngineError, ErrorExt};
pub use types::{ConversationEntry, NewTask, Task, TaskSummary};
