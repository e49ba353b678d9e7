//! Task and conversation records

use serde::{Deserialize, Serialize};

/// A stored task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub priority: i64,
    /// Calendar date encoded as `YYYY-MM-DD`
    pub deadline: String,
    #[serde(default)]
    pub completed: bool,
    /// Unix seconds
    pub created_at: i64,
}

impl Task {
    /// The view of this task handed to the planner
    pub fn summary(&self) -> TaskSummary {
        TaskSummary {
            title: self.title.clone(),
            priority: self.priority,
            deadline: self.deadline.clone(),
            completed: self.completed,
        }
    }
}

/// Payload for creating a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub priority: i64,
    pub deadline: String,
}

/// Task-like record consumed by classification and prompt composition
///
/// A missing `completed` flag deserializes as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub title: String,
    pub priority: i64,
    pub deadline: String,
    #[serde(default)]
    pub completed: bool,
}

impl TaskSummary {
    /// Create an incomplete task summary
    pub fn new(title: impl Into<String>, priority: i64, deadline: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            priority,
            deadline: deadline.into(),
            completed: false,
        }
    }

    /// Mark the summary as completed
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }
}

/// One persisted question/answer exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub question: String,
    pub response: String,
    /// Unix seconds
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_completed_defaults_to_false() {
        let summary: TaskSummary =
            serde_json::from_str(r#"{"title":"Read","priority":2,"deadline":"2024-06-10"}"#)
                .unwrap();
        assert!(!summary.completed);
    }

    #[test]
    fn test_task_summary_copies_fields() {
        let task = Task {
            id: 3,
            title: "Ship release".to_string(),
            priority: 1,
            deadline: "2024-06-11".to_string(),
            completed: true,
            created_at: 1_718_000_000,
        };

        let summary = task.summary();
        assert_eq!(summary.title, "Ship release");
        assert_eq!(summary.priority, 1);
        assert_eq!(summary.deadline, "2024-06-11");
        assert!(summary.completed);
    }

    #[test]
    fn test_summary_builder() {
        let summary = TaskSummary::new("Gym", 3, "2024-06-12").completed();
        assert!(summary.completed);
        assert_eq!(summary.priority, 3);
    }
}
