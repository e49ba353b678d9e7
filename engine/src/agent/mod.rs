//! Task Assistant
//!
//! This module answers questions about the user's task list. The assistant
//! loads the open tasks, builds a prompt through the planner, hands it to the
//! injected inference client and records each exchange in the conversation log.

pub mod core;

pub use self::core::{storage_error, Assistant};
