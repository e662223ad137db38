use eisenhower_core::db::{open_db, open_db_in_memory};
use eisenhower_server::{router, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

async fn spawn_app(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn spawn_empty_app() -> String {
    spawn_app(AppState::try_new(open_db_in_memory().unwrap()).unwrap()).await
}

async fn create(client: &Client, base: &str, body: Value) -> Value {
    let response = client
        .post(format!("{base}/tasks"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.unwrap();
    created["task"].clone()
}

#[tokio::test]
async fn welcome_describes_the_api() {
    let base = spawn_empty_app().await;
    let body: Value = reqwest::get(format!("{base}/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["title"], "To-Do list API");
    assert!(body["description"].as_str().unwrap().contains("Eisenhower"));
    assert!(!body["version"].as_str().unwrap().is_empty());
    assert!(body["contact"]["name"].is_string());
}

#[tokio::test]
async fn create_then_get_then_delete_then_not_found() {
    let base = spawn_empty_app().await;
    let client = Client::new();

    let task = create(
        &client,
        &base,
        json!({"title": "Finish report", "is_urgent": true, "is_important": true}),
    )
    .await;
    assert_eq!(task["quadrant"], "Q1");
    assert_eq!(task["quadrant_label"], "Do First");
    assert_eq!(task["completed"], false);
    assert!(task["created_at"].as_i64().unwrap() > 0);

    let id = task["id"].as_str().unwrap().to_string();
    let fetched: Value = client
        .get(format!("{base}/tasks/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, task);

    let deleted = client
        .delete(format!("{base}/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = client
        .get(format!("{base}/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["error"], "task_not_found");

    let delete_again = client
        .delete(format!("{base}/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(delete_again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let base = spawn_empty_app().await;
    let response = Client::new()
        .post(format!("{base}/tasks"))
        .json(&json!({"title": "   "}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "validation_failed");
}

#[tokio::test]
async fn unparseable_bodies_use_error_envelope() {
    let base = spawn_empty_app().await;
    let client = Client::new();

    for body in [json!({}), json!({"title": "x", "is_urgent": "yes"})] {
        let response = client
            .post(format!("{base}/tasks"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        let envelope: Value = response.json().await.unwrap();
        assert_eq!(envelope["error"], "invalid_body");
        assert!(!envelope["detail"].as_str().unwrap().is_empty());
    }

    let not_json = client
        .post(format!("{base}/tasks"))
        .header("content-type", "application/json")
        .body("{title")
        .send()
        .await
        .unwrap();
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
    let envelope: Value = not_json.json().await.unwrap();
    assert_eq!(envelope["error"], "invalid_body");

    let task = create(&client, &base, json!({"title": "Keep me"})).await;
    let id = task["id"].as_str().unwrap();
    let bad_patch = client
        .patch(format!("{base}/tasks/{id}"))
        .json(&json!({"completed": "done"}))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_patch.status(), StatusCode::BAD_REQUEST);
    let envelope: Value = bad_patch.json().await.unwrap();
    assert_eq!(envelope["error"], "invalid_body");
}

#[tokio::test]
async fn concurrent_requests_share_the_store() {
    let base = spawn_empty_app().await;
    let client = Client::new();

    let mut handles = Vec::new();
    for n in 0..16 {
        let client = client.clone();
        let base = base.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("{base}/tasks"))
                .json(&json!({"title": format!("parallel {n}"), "is_urgent": n % 2 == 0}))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let list: Value = client
        .get(format!("{base}/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["count"], 16);
}

#[tokio::test]
async fn client_supplied_quadrant_is_ignored() {
    let base = spawn_empty_app().await;
    let task = create(
        &Client::new(),
        &base,
        json!({"title": "Tidy desk", "quadrant": "Q1"}),
    )
    .await;
    assert_eq!(task["quadrant"], "Q4");
}

#[tokio::test]
async fn patch_moves_task_between_quadrants() {
    let base = spawn_empty_app().await;
    let client = Client::new();
    let task = create(&client, &base, json!({"title": "Book flights", "is_important": true})).await;
    assert_eq!(task["quadrant"], "Q2");
    let id = task["id"].as_str().unwrap();

    let response = client
        .patch(format!("{base}/tasks/{id}"))
        .json(&json!({"is_urgent": true, "completed": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["quadrant"], "Q1");
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Book flights");
    assert_eq!(updated["created_at"], task["created_at"]);
}

#[tokio::test]
async fn malformed_or_unknown_ids_are_rejected() {
    let base = spawn_empty_app().await;
    let client = Client::new();

    let malformed = client
        .get(format!("{base}/tasks/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let unknown = client
        .patch(format!("{base}/tasks/00000000-0000-4000-8000-000000000000"))
        .json(&json!({"completed": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_stats_and_filters_over_seeded_store() {
    let state = AppState::try_new(open_db_in_memory().unwrap()).unwrap();
    assert_eq!(state.seed_demo_tasks().await.unwrap(), 4);
    let base = spawn_app(state).await;
    let client = Client::new();

    let list: Value = client
        .get(format!("{base}/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["count"], 4);
    assert_eq!(list["tasks"].as_array().unwrap().len(), 4);

    let stats: Value = client
        .get(format!("{base}/tasks/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total_tasks"], 4);
    assert_eq!(
        stats["by_quadrant"],
        json!({"Q1": 1, "Q2": 1, "Q3": 1, "Q4": 1})
    );
    assert_eq!(stats["by_status"], json!({"completed": 1, "pending": 3}));

    let q2: Value = client
        .get(format!("{base}/tasks/quadrant/Q2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(q2["quadrant"], "Q2");
    assert_eq!(q2["label"], "Schedule");
    assert_eq!(q2["count"], 1);
    assert_eq!(q2["tasks"][0]["is_important"], true);
    assert_eq!(q2["tasks"][0]["is_urgent"], false);

    let completed: Value = client
        .get(format!("{base}/tasks/status/completed"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["count"], 1);

    let pending: Value = client
        .get(format!("{base}/tasks/status/pending"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(pending["count"], 3);
}

#[tokio::test]
async fn filter_errors_follow_route_contract() {
    let base = spawn_empty_app().await;
    let client = Client::new();

    let bad_quadrant = client
        .get(format!("{base}/tasks/quadrant/Q5"))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_quadrant.status(), StatusCode::BAD_REQUEST);
    let body: Value = bad_quadrant.json().await.unwrap();
    assert_eq!(body["error"], "invalid_quadrant");

    let lowercase = client
        .get(format!("{base}/tasks/quadrant/q1"))
        .send()
        .await
        .unwrap();
    assert_eq!(lowercase.status(), StatusCode::BAD_REQUEST);

    let bad_status = client
        .get(format!("{base}/tasks/status/archived"))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_status.status(), StatusCode::NOT_FOUND);
    let body: Value = bad_status.json().await.unwrap();
    assert_eq!(body["error"], "status_not_found");
}

#[tokio::test]
async fn search_requires_two_characters_and_matches_description() {
    let base = spawn_empty_app().await;
    let client = Client::new();
    create(
        &client,
        &base,
        json!({"title": "Homework", "description": "Read the SQLite docs"}),
    )
    .await;
    create(&client, &base, json!({"title": "Groceries"})).await;

    let short = client
        .get(format!("{base}/tasks/search?q=s"))
        .send()
        .await
        .unwrap();
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);

    let missing = client
        .get(format!("{base}/tasks/search"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let hits: Value = client
        .get(format!("{base}/tasks/search?q=sqlite"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits["query"], "sqlite");
    assert_eq!(hits["count"], 1);
    assert_eq!(hits["tasks"][0]["title"], "Homework");
}

#[tokio::test]
async fn unknown_routes_use_error_envelope() {
    let base = spawn_empty_app().await;
    let response = reqwest::get(format!("{base}/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "route_not_found");
}

#[tokio::test]
async fn file_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    let base = spawn_app(AppState::try_new(open_db(&path).unwrap()).unwrap()).await;
    let task = create(&Client::new(), &base, json!({"title": "Persist me"})).await;
    let id = task["id"].as_str().unwrap().to_string();

    let restarted = spawn_app(AppState::try_new(open_db(&path).unwrap()).unwrap()).await;
    let fetched: Value = reqwest::get(format!("{restarted}/tasks/{id}"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["title"], "Persist me");
}
