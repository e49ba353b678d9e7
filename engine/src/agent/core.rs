//! Assistant Core
//!
//! Each request runs one fixed pipeline:
//!
//! 1. Load the incomplete tasks from the task store
//! 2. Classify them and compose the prompt
//! 3. Send the prompt to the inference client (single shot)
//! 4. Append the exchange to the conversation log
//!
//! A malformed deadline stops the pipeline at step 2. Nothing is sent to the
//! model and nothing is logged.

use chrono::{Local, NaiveDate};
use sdk::{ConversationEntry, EngineError, TaskSummary};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::db::{ConversationRepository, Database, TaskRepository};
use crate::llm::InferenceClient;
use crate::planner;

/// Default number of conversation entries returned by [`Assistant::history`]
pub const DEFAULT_HISTORY_LIMIT: i64 = 20;

/// Question-answering and scheduling front end over the task store
#[derive(Clone)]
pub struct Assistant {
    tasks: TaskRepository,
    conversations: ConversationRepository,
    client: Arc<dyn InferenceClient>,
    history_limit: i64,
}

impl Assistant {
    /// Create a new assistant
    pub fn new(db: &Database, client: Arc<dyn InferenceClient>) -> Self {
        Self {
            tasks: db.tasks(),
            conversations: db.conversations(),
            client,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, history_limit: i64) -> Self {
        self.history_limit = history_limit;
        self
    }

    /// The inference client this assistant sends prompts to
    pub fn client(&self) -> &Arc<dyn InferenceClient> {
        &self.client
    }

    /// Answer a question using today's local date
    pub async fn answer(&self, question: &str) -> Result<ConversationEntry, EngineError> {
        self.answer_on(question, Local::now().date_naive()).await
    }

    /// Answer a question, classifying deadlines relative to `today`
    pub async fn answer_on(
        &self,
        question: &str,
        today: NaiveDate,
    ) -> Result<ConversationEntry, EngineError> {
        if question.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let open_tasks = self.open_task_summaries().await?;

        let prompt = planner::compose_query_prompt(&open_tasks, question, today).map_err(|e| {
            warn!("Refusing to build prompt: {}", e);
            e
        })?;

        debug!(
            "Composed query prompt: tasks={}, chars={}",
            open_tasks.len(),
            prompt.len()
        );

        let response = self.complete(&prompt).await?;

        self.conversations
            .append(question, &response)
            .await
            .map_err(storage_error)
    }

    /// Ask the model for a 7-day plan covering every open task
    ///
    /// Schedule suggestions are not written to the conversation log.
    pub async fn suggest_schedule(&self) -> Result<String, EngineError> {
        let open_tasks = self.open_task_summaries().await?;
        let prompt = planner::compose_schedule_prompt(&open_tasks);

        debug!(
            "Composed schedule prompt: tasks={}, chars={}",
            open_tasks.len(),
            prompt.len()
        );

        self.complete(&prompt).await
    }

    /// Most recent exchanges, newest first, bounded by the configured limit
    pub async fn history(&self) -> Result<Vec<ConversationEntry>, EngineError> {
        self.history_with_limit(self.history_limit).await
    }

    /// Most recent exchanges, newest first
    ///
    /// `limit` must be positive; SQLite would read a negative limit as
    /// "no limit".
    pub async fn history_with_limit(
        &self,
        limit: i64,
    ) -> Result<Vec<ConversationEntry>, EngineError> {
        if limit <= 0 {
            return Err(EngineError::InvalidInput(format!(
                "history limit must be greater than 0, got {}",
                limit
            )));
        }

        self.conversations
            .recent(limit)
            .await
            .map_err(storage_error)
    }

    async fn open_task_summaries(&self) -> Result<Vec<TaskSummary>, EngineError> {
        let tasks = self
            .tasks
            .list_incomplete_tasks()
            .await
            .map_err(storage_error)?;

        Ok(tasks.iter().map(|task| task.summary()).collect())
    }

    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        let start = Instant::now();
        let response = self.client.complete(prompt).await?;

        info!(
            "{} ({}) answered in {}ms",
            self.client.name(),
            self.client.model(),
            start.elapsed().as_millis()
        );

        Ok(response)
    }
}

/// Convert a repository failure into the engine's storage error
pub fn storage_error(err: anyhow::Error) -> EngineError {
    EngineError::Database(format!("{:#}", err))
}
