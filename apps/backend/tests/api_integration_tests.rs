use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use taskboard::db::MemoryStore;
use taskboard::AppState;
use tower::ServiceExt; // for `oneshot` and `ready`

fn test_app() -> axum::Router {
    taskboard::create_app(AppState::new(Arc::new(MemoryStore::new())))
}

/// Helper function to send a request to the API and decode the JSON reply
async fn request(
    app: axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    (status, json)
}

fn new_task() -> Value {
    json!({
        "title": "A",
        "description": "d",
        "email": "x@y.com",
        "status": "todo"
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = request(test_app(), Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task Management server is running");
    assert_eq!(body["status"], "OK");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_number());
}

#[tokio::test]
async fn test_create_task_returns_201() {
    let (status, body) = request(test_app(), Method::POST, "/tasks", Some(new_task())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["acknowledged"], true);
    assert!(body["inserted_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_create_task_missing_fields_returns_400() {
    let (status, body) = request(
        test_app(),
        Method::POST,
        "/tasks",
        Some(json!({ "title": "A", "email": "x@y.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("description"));
}

/// Helper to send a raw body with an optional content type
async fn request_raw(
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let response = test_app()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_missing_body_returns_400() {
    let (status, body) = request_raw(Method::POST, "/tasks", None, "").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_non_object_body_returns_400() {
    let id = uuid::Uuid::new_v4();
    let cases = [
        (Method::POST, "/tasks".to_string(), "[]"),
        (Method::POST, "/tasks".to_string(), "null"),
        (Method::POST, "/tasks".to_string(), "{not json"),
        (Method::PUT, format!("/tasks/{}", id), "[]"),
        (Method::PATCH, format!("/tasks/{}", id), "null"),
        (Method::POST, "/user".to_string(), "null"),
        (Method::POST, "/user".to_string(), "[]"),
    ];

    for (method, uri, raw) in cases {
        let (status, body) =
            request_raw(method.clone(), &uri, Some("application/json"), raw).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {} {}", method, uri, raw);
        assert_eq!(body["code"], "VALIDATION_ERROR", "{} {} {}", method, uri, raw);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn test_padded_email_is_listed() {
    let app = test_app();
    let mut task = new_task();
    task["email"] = json!(" x@y.com");

    let (status, _) = request(app.clone(), Method::POST, "/tasks", Some(task)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(app, Method::GET, "/tasks?email=%20x@y.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["email"], "x@y.com");
}

#[tokio::test]
async fn test_list_tasks_requires_email() {
    let (status, body) = request(test_app(), Method::GET, "/tasks", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is required");
}

#[tokio::test]
async fn test_list_tasks_unknown_email_returns_404() {
    let (status, body) = request(test_app(), Method::GET, "/tasks?email=nobody@y.com", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_TASKS_FOUND");
}

#[tokio::test]
async fn test_invalid_id_returns_400() {
    for method in [Method::PUT, Method::PATCH, Method::DELETE] {
        let body = (method != Method::DELETE).then(new_task);
        let (status, json) = request(test_app(), method.clone(), "/tasks/not-an-id", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{} /tasks/not-an-id", method);
        assert_eq!(json["code"], "INVALID_IDENTIFIER");
    }
}

#[tokio::test]
async fn test_unknown_id_returns_404() {
    let id = uuid::Uuid::new_v4();
    let uri = format!("/tasks/{}", id);

    let (status, _) = request(test_app(), Method::PUT, &uri, Some(new_task())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        test_app(),
        Method::PATCH,
        &uri,
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(test_app(), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TASK_NOT_FOUND");
}

#[tokio::test]
async fn test_create_user_and_conflict() {
    let app = test_app();
    let user = json!({ "email": "x@y.com", "name": "Ann" });

    let (status, body) = request(app.clone(), Method::POST, "/user", Some(user.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["inserted_id"].is_string());

    let (status, body) = request(app, Method::POST, "/user", Some(user)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_create_user_missing_name_returns_400() {
    let (status, _) = request(
        test_app(),
        Method::POST,
        "/user",
        Some(json!({ "email": "x@y.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_storage_failure_returns_500_without_details() {
    let store = Arc::new(MemoryStore::new());
    let app = taskboard::create_app(AppState::new(store.clone()));
    store.set_unavailable(true);

    let (status, body) = request(app, Method::POST, "/tasks", Some(new_task())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[tokio::test]
async fn test_openapi_documents_task_routes() {
    let (status, body) = request(test_app(), Method::GET, "/api/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/").is_some());
    assert!(body["paths"].get("/tasks").is_some());
    assert!(body["paths"].get("/tasks/{id}").is_some());
    assert!(body["paths"].get("/user").is_some());
}
