//! REST API
//!
//! HTTP front end for the task store and the assistant.
//!
//! # Endpoints
//!
//! - POST /tasks - Create a task
//! - GET /tasks - List every task
//! - PUT /tasks/:id/complete - Mark a task completed
//! - DELETE /tasks/completed - Delete all completed tasks
//! - POST /agent/query - Ask the assistant a question
//! - POST /agent/schedule - Ask for a 7-day schedule
//! - GET /agent/history - Most recent conversation entries
//! - GET /api/status - Server status
//!
//! Errors are returned as `{"error": "..."}` with a status code derived from
//! the [`EngineError`] variant.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use sdk::{ConversationEntry, EngineError, NewTask, Task};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::agent::{storage_error, Assistant};
use crate::db::Database;
use crate::planner;

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    db: Database,
    assistant: Assistant,
}

impl AppState {
    pub fn new(db: Database, assistant: Assistant) -> Self {
        Self { db, assistant }
    }
}

/// Body of `POST /agent/query`
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub schedule: String,
}

/// Error wrapper that renders an [`EngineError`] as a JSON response
#[derive(Debug)]
pub struct ApiError(EngineError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            EngineError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            EngineError::MalformedDeadline { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::LLMProvider(_) => StatusCode::BAD_GATEWAY,
            EngineError::Config(_) | EngineError::Database(_) | EngineError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(EngineError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(EngineError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/tasks", post(create_task_handler).get(list_tasks_handler))
        .route("/tasks/", post(create_task_handler).get(list_tasks_handler))
        .route("/tasks/completed", delete(clear_completed_handler))
        .route("/tasks/:id/complete", put(complete_task_handler))
        .route("/agent/query", post(query_handler))
        .route("/agent/schedule", post(schedule_handler))
        .route("/agent/history", get(history_handler))
        .route("/api/status", get(status_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind to `addr` and serve until Ctrl-C
///
/// The WAL is flushed once the server has drained.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), EngineError> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let db = state.db.clone();

    tracing::info!("API server listening on http://{}", local_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("API server shutting down gracefully");
        })
        .await?;

    db.flush_wal().await.map_err(storage_error)?;
    Ok(())
}

async fn create_task_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<Task> {
    let Json(new_task) = payload?;
    planner::validate_new_task(&new_task)?;

    let task = state
        .db
        .tasks()
        .create_task(&new_task)
        .await
        .map_err(storage_error)?;

    tracing::info!("Created task {} '{}'", task.id, task.title);
    Ok(Json(task))
}

async fn list_tasks_handler(State(state): State<AppState>) -> ApiResult<Vec<Task>> {
    let tasks = state.db.tasks().list_tasks().await.map_err(storage_error)?;
    Ok(Json(tasks))
}

async fn complete_task_handler(
    State(state): State<AppState>,
    task_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Task> {
    let Path(task_id) = task_id?;
    let task = state
        .db
        .tasks()
        .complete_task(task_id)
        .await
        .map_err(storage_error)?
        .ok_or(EngineError::TaskNotFound(task_id))?;

    Ok(Json(task))
}

async fn clear_completed_handler(
    State(state): State<AppState>,
) -> ApiResult<serde_json::Value> {
    let deleted = state
        .db
        .tasks()
        .delete_completed_tasks()
        .await
        .map_err(storage_error)?;

    tracing::info!("Deleted {} completed tasks", deleted);
    Ok(Json(json!({ "message": "All completed tasks deleted." })))
}

async fn query_handler(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<QueryResponse> {
    let Json(request) = payload?;
    let entry = state.assistant.answer(&request.question).await?;

    Ok(Json(QueryResponse {
        response: entry.response,
    }))
}

async fn schedule_handler(State(state): State<AppState>) -> ApiResult<ScheduleResponse> {
    let schedule = state.assistant.suggest_schedule().await?;
    Ok(Json(ScheduleResponse { schedule }))
}

async fn history_handler(State(state): State<AppState>) -> ApiResult<Vec<ConversationEntry>> {
    let history = state.assistant.history().await?;
    Ok(Json(history))
}

async fn status_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let client = state.assistant.client();
    let inference_available = client.check_health().await;

    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "commit": env!("GIT_COMMIT_HASH"),
        "model": client.model(),
        "inference_available": inference_available,
    }))
}
