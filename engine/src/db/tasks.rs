/// Task persistence operations
///
/// All queries use parameterized queries for SQL injection prevention.
/// Tasks are only ever created, flipped to completed, or bulk-deleted once
/// completed.
use anyhow::{Context, Result};
use sdk::{NewTask, Task};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::time::{SystemTime, UNIX_EPOCH};

const TASK_COLUMNS: &str = "id, title, priority, deadline, completed, created_at";

/// Task repository for database operations
#[derive(Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    /// Create a new task repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new task
    ///
    /// The store assigns the id and the creation timestamp; `completed`
    /// starts out false.
    pub async fn create_task(&self, new_task: &NewTask) -> Result<Task> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

        let result = sqlx::query(
            "INSERT INTO tasks (title, priority, deadline, completed, created_at) VALUES (?, ?, ?, 0, ?)",
        )
        .bind(&new_task.title)
        .bind(new_task.priority)
        .bind(&new_task.deadline)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create task")?;

        Ok(Task {
            id: result.last_insert_rowid(),
            title: new_task.title.clone(),
            priority: new_task.priority,
            deadline: new_task.deadline.clone(),
            completed: false,
            created_at: now,
        })
    }

    /// Get a task by ID
    pub async fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS))
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch task")?;

        Ok(row.as_ref().map(task_from_row))
    }

    /// Get every task in creation order
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!("SELECT {} FROM tasks ORDER BY id ASC", TASK_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch tasks")?;

        Ok(rows.iter().map(task_from_row).collect())
    }

    /// Get the tasks that are not completed yet, in creation order
    pub async fn list_incomplete_tasks(&self) -> Result<Vec<Task>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE completed = 0 ORDER BY id ASC",
            TASK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch incomplete tasks")?;

        Ok(rows.iter().map(task_from_row).collect())
    }

    /// Mark a task as completed
    ///
    /// Returns the updated task, or `None` when no task has this id.
    pub async fn complete_task(&self, task_id: i64) -> Result<Option<Task>> {
        let result = sqlx::query("UPDATE tasks SET completed = 1 WHERE id = ?")
            .bind(task_id)
            .execute(&self.pool)
            .await
            .context("Failed to complete task")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_task(task_id).await
    }

    /// Delete every completed task
    ///
    /// Returns the number of deleted rows.
    pub async fn delete_completed_tasks(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE completed = 1")
            .execute(&self.pool)
            .await
            .context("Failed to delete completed tasks")?;

        Ok(result.rows_affected())
    }
}

fn task_from_row(r: &SqliteRow) -> Task {
    Task {
        id: r.get("id"),
        title: r.get("title"),
        priority: r.get("priority"),
        deadline: r.get("deadline"),
        completed: r.get("completed"),
        created_at: r.get("created_at"),
    }
}
