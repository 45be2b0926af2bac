use axum::Router;
use axum::http::{Method, StatusCode};
use insta::assert_snapshot;
use lifetriage_server::category::CategoryService;
use lifetriage_server::web::{AppState, create_app};
use serde_json::json;

mod common;

use common::{TestContext, send, send_json};

async fn setup_app() -> (TestContext, Router) {
    let state = common::setup().await.expect("Failed to setup test context");
    let app = create_app(AppState::new(state.db.clone()));
    (state, app)
}

async fn create_task(app: &Router, body: serde_json::Value) -> serde_json::Value {
    let (status, created) = send_json(app, Method::POST, "/api/tasks", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    created
}

#[tokio::test]
async fn can_create_task_with_defaults() {
    let (_state, app) = setup_app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"description": "Buy milk"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_str().is_some_and(|id| uuid::Uuid::parse_str(id).is_ok()));
    assert_eq!(body["description"], "Buy milk");
    assert_eq!(body["priority"], 1);
    assert_eq!(body["completed"], false);
    assert_eq!(body["category_id"], serde_json::Value::Null);
    assert_eq!(body["category"], serde_json::Value::Null);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn can_reject_task_without_description() {
    let (_state, app) = setup_app().await;

    for payload in [json!({}), json!({"description": ""}), json!({"priority": 2})] {
        let (status, body) = send_json(&app, Method::POST, "/api/tasks", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Description is required"}));
    }

    let (_, tasks) = send_json(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(tasks, json!([]));
}

#[tokio::test]
async fn can_reject_malformed_json_body() {
    let (_state, app) = setup_app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({"description": "Walk", "priority": "high"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn can_reject_body_without_json_content_type() {
    let (_state, app) = setup_app().await;

    let (status, body) = send_json(&app, Method::POST, "/api/tasks", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn can_create_task_in_category() {
    let (state, app) = setup_app().await;
    let inserted = CategoryService::new(&state.db).seed_categories().await.unwrap();
    let health = inserted
        .iter()
        .find(|category| category.name() == "Health")
        .unwrap();

    let body = create_task(
        &app,
        json!({
            "description": "Go for a run",
            "category_id": health.id().to_string(),
            "priority": 2,
        }),
    )
    .await;

    assert_eq!(body["category_id"], health.id().to_string());
    assert_eq!(
        body["category"],
        json!({"id": health.id().to_string(), "name": "Health"})
    );
    assert_eq!(body["priority"], 2);
}

#[tokio::test]
async fn can_reject_unknown_category_on_create() {
    let (_state, app) = setup_app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/tasks",
        Some(json!({
            "description": "Budget",
            "category_id": "00000000-0000-0000-0000-000000000001",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Category 00000000-0000-0000-0000-000000000001 does not exist"})
    );
}

#[tokio::test]
async fn can_fetch_created_task() {
    let (_state, app) = setup_app().await;
    let created = create_task(&app, json!({"description": "Water plants"})).await;
    let uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::GET, &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn can_return_not_found_for_unknown_task() {
    let (_state, app) = setup_app().await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/tasks/00000000-0000-0000-0000-000000000000",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_snapshot!(String::from_utf8(body).unwrap(), @r#"{"error":"Task not found"}"#);
}

#[tokio::test]
async fn can_return_not_found_for_malformed_id() {
    let (_state, app) = setup_app().await;

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = send_json(&app, method, "/api/tasks/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Task not found"}));
    }

    let (status, _) = send_json(
        &app,
        Method::PUT,
        "/api/tasks/not-a-uuid",
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn can_return_not_found_for_undecodable_id() {
    let (_state, app) = setup_app().await;

    let (status, body) = send_json(&app, Method::GET, "/api/tasks/%FF", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Task not found"}));
}

#[tokio::test]
async fn can_reject_malformed_category_query() {
    let (_state, app) = setup_app().await;

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/api/tasks?category=Work&category=Health",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn can_mark_task_completed() {
    let (_state, app) = setup_app().await;
    let created = create_task(&app, json!({"description": "File taxes"})).await;
    let uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

    let (status, body) =
        send_json(&app, Method::PUT, &uri, Some(json!({"completed": true}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["completed"], true);
    assert_eq!(body["description"], "File taxes");
    assert_eq!(body["priority"], created["priority"]);
    assert_eq!(body["created_at"], created["created_at"]);
}

#[tokio::test]
async fn can_reject_blank_description_on_update() {
    let (_state, app) = setup_app().await;
    let created = create_task(&app, json!({"description": "Clean desk"})).await;
    let uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

    let (status, body) = send_json(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"description": "", "completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Description is required"}));

    let (_, stored) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(stored, created);
}

#[tokio::test]
async fn can_return_not_found_when_updating_unknown_task() {
    let (_state, app) = setup_app().await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/api/tasks/00000000-0000-0000-0000-000000000000",
        Some(json!({"completed": true})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Task not found"}));
}

#[tokio::test]
async fn can_delete_task() {
    let (_state, app) = setup_app().await;
    let created = create_task(&app, json!({"description": "Return library books"})).await;
    let uri = format!("/api/tasks/{}", created["id"].as_str().unwrap());

    let (status, body) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Task deleted"}));

    let (status, _) = send_json(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send_json(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Task not found"}));
}

#[tokio::test]
async fn can_list_tasks_filtered_by_category() {
    let (state, app) = setup_app().await;
    let inserted = CategoryService::new(&state.db).seed_categories().await.unwrap();
    let work = inserted
        .iter()
        .find(|category| category.name() == "Work")
        .unwrap();

    let first = create_task(&app, json!({"description": "Personal errand"})).await;
    let second = create_task(
        &app,
        json!({"description": "Prepare slides", "category_id": work.id().to_string()}),
    )
    .await;

    let (status, all) = send_json(&app, Method::GET, "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all, json!([first, second.clone()]));

    let (status, filtered) = send_json(&app, Method::GET, "/api/tasks?category=Work", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered, json!([second]));

    let (_, unknown) = send_json(&app, Method::GET, "/api/tasks?category=Hobbies", None).await;
    assert_eq!(unknown, json!([]));
}
