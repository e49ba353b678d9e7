//! Integration tests for the REST API
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`;
//! the inference client is replaced by an in-process fake.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Local};
use sdk::NewTask;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use taskoptima_engine::agent::Assistant;
use taskoptima_engine::api::{router, AppState};
use taskoptima_engine::db::Database;
use taskoptima_engine::llm::{self, InferenceClient, LLMError};
use tempfile::TempDir;
use tower::ServiceExt;

/// Replies with a fixed answer, or fails when `reply` is `None`
struct FakeClient {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for FakeClient {
    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, prompt: &str) -> llm::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| LLMError::ProviderUnavailable("model offline".to_string()))
    }

    async fn check_health(&self) -> bool {
        self.reply.is_some()
    }
}

struct TestApp {
    _dir: TempDir,
    db: Database,
    app: Router,
}

async fn setup(client: Arc<FakeClient>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let db = Database::new(&dir.path().join("taskoptima.db")).await.unwrap();
    let assistant = Assistant::new(&db, client as Arc<dyn InferenceClient>);
    let app = router(AppState::new(db.clone(), assistant));

    TestApp { _dir: dir, db, app }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

fn date_from_today(days: i64) -> String {
    (Local::now().date_naive() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn test_create_and_list_tasks() {
    let test = setup(FakeClient::replying("ok")).await;

    let (status, created) = send(
        &test.app,
        Method::POST,
        "/tasks/",
        Some(json!({ "title": "Write report", "priority": 2, "deadline": "2030-01-15" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["title"], "Write report");
    assert_eq!(created["completed"], false);
    assert!(created["id"].as_i64().unwrap() > 0);

    let (status, list) = send(&test.app, Method::GET, "/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["deadline"], "2030-01-15");
}

#[tokio::test]
async fn test_create_task_validation() {
    let test = setup(FakeClient::replying("ok")).await;

    let (status, body) = send(
        &test.app,
        Method::POST,
        "/tasks",
        Some(json!({ "title": "Bad", "priority": 2, "deadline": "15/01/2030" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("15/01/2030"));

    let (status, _) = send(
        &test.app,
        Method::POST,
        "/tasks",
        Some(json!({ "title": "", "priority": 2, "deadline": "2030-01-15" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &test.app,
        Method::POST,
        "/tasks",
        Some(json!({ "title": "No deadline" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, list) = send(&test.app, Method::GET, "/tasks", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_complete_task() {
    let test = setup(FakeClient::replying("ok")).await;

    let (_, created) = send(
        &test.app,
        Method::POST,
        "/tasks",
        Some(json!({ "title": "Call bank", "priority": 3, "deadline": "2030-02-01" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, task) = send(&test.app, Method::PUT, &format!("/tasks/{}/complete", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["completed"], true);

    let (status, body) = send(&test.app, Method::PUT, "/tasks/9999/complete", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");
}

#[tokio::test]
async fn test_complete_task_with_non_numeric_id() {
    let test = setup(FakeClient::replying("ok")).await;

    let (status, body) = send(&test.app, Method::PUT, "/tasks/abc/complete", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn test_clear_completed_tasks() {
    let test = setup(FakeClient::replying("ok")).await;
    let repo = test.db.tasks();

    let done = repo
        .create_task(&NewTask {
            title: "Done".to_string(),
            priority: 2,
            deadline: "2030-01-01".to_string(),
        })
        .await
        .unwrap();
    repo.complete_task(done.id).await.unwrap();
    repo.create_task(&NewTask {
        title: "Open".to_string(),
        priority: 2,
        deadline: "2030-01-02".to_string(),
    })
    .await
    .unwrap();

    let (status, body) = send(&test.app, Method::DELETE, "/tasks/completed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All completed tasks deleted.");

    let (_, list) = send(&test.app, Method::GET, "/tasks", None).await;
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Open"]);
}

#[tokio::test]
async fn test_query_persists_history() {
    let client = FakeClient::replying("Do the overdue report first.");
    let test = setup(Arc::clone(&client)).await;

    send(
        &test.app,
        Method::POST,
        "/tasks",
        Some(json!({ "title": "Report", "priority": 2, "deadline": date_from_today(-3) })),
    )
    .await;
    send(
        &test.app,
        Method::POST,
        "/tasks",
        Some(json!({ "title": "Dentist", "priority": 4, "deadline": date_from_today(1) })),
    )
    .await;

    let (status, body) = send(
        &test.app,
        Method::POST,
        "/agent/query",
        Some(json!({ "question": "What should I focus on?" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Do the overdue report first.");

    let prompt = &client.prompts()[0];
    assert!(prompt.contains("Overdue Tasks:\n- Report"));
    assert!(prompt.contains("Urgent Tasks:\n- Dentist"));
    assert!(prompt.contains("What should I focus on?"));

    let (status, history) = send(&test.app, Method::GET, "/agent/history", None).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["question"], "What should I focus on?");
    assert_eq!(history[0]["response"], "Do the overdue report first.");
    assert!(history[0]["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_query_with_malformed_deadline_is_rejected() {
    let client = FakeClient::replying("never");
    let test = setup(Arc::clone(&client)).await;

    // Written straight to the store, bypassing request validation
    test.db
        .tasks()
        .create_task(&NewTask {
            title: "Legacy".to_string(),
            priority: 2,
            deadline: "next week".to_string(),
        })
        .await
        .unwrap();

    let (status, body) = send(
        &test.app,
        Method::POST,
        "/agent/query",
        Some(json!({ "question": "Anything urgent?" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Legacy"));
    assert!(client.prompts().is_empty());

    let (_, history) = send(&test.app, Method::GET, "/agent/history", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_inference_failure_is_bad_gateway() {
    let test = setup(FakeClient::failing()).await;

    let (status, body) = send(
        &test.app,
        Method::POST,
        "/agent/query",
        Some(json!({ "question": "Hello?" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("model offline"));
}

#[tokio::test]
async fn test_blank_question_is_bad_request() {
    let test = setup(FakeClient::replying("ok")).await;

    let (status, _) = send(
        &test.app,
        Method::POST,
        "/agent/query",
        Some(json!({ "question": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schedule() {
    let client = FakeClient::replying("Monday: Gym");
    let test = setup(Arc::clone(&client)).await;

    send(
        &test.app,
        Method::POST,
        "/tasks",
        Some(json!({ "title": "Gym", "priority": 3, "deadline": "2030-03-01" })),
    )
    .await;

    let (status, body) = send(&test.app, Method::POST, "/agent/schedule", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["schedule"], "Monday: Gym");
    assert!(client.prompts()[0].contains("- Gym (priority: 3, deadline: 2030-03-01)"));

    let (_, history) = send(&test.app, Method::GET, "/agent/history", None).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_is_newest_first_and_bounded() {
    let test = setup(FakeClient::replying("ok")).await;

    for i in 0..25 {
        test.db
            .conversations()
            .append(&format!("question {}", i), "ok")
            .await
            .unwrap();
    }

    let (_, history) = send(&test.app, Method::GET, "/agent/history", None).await;
    let history = history.as_array().unwrap();

    assert_eq!(history.len(), 20);
    assert_eq!(history[0]["question"], "question 24");
    assert_eq!(history[19]["question"], "question 5");
}

#[tokio::test]
async fn test_status() {
    let test = setup(FakeClient::failing()).await;

    let (status, body) = send(&test.app, Method::GET, "/api/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["model"], "fake-model");
    assert_eq!(body["inference_available"], false);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let test = setup(FakeClient::replying("ok")).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/tasks")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = test.app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}
