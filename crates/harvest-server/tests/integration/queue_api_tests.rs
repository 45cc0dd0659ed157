use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::integration::common::{TestApp, setup_test_app};

async fn queue_url(app: &TestApp, url: &str, priority: i64) -> String {
    let (status, body) = app
        .post_json("/api/v1/urls/", json!({"url": url, "priority": priority}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

/// Pin `created_at` so age ordering does not depend on insert timing.
async fn age(app: &TestApp, id: &str, seconds_ago: f64) {
    sqlx::query(
        "UPDATE scrape_url SET created_at = NOW() - make_interval(secs => $2) WHERE id = $1",
    )
    .bind(Uuid::parse_str(id).unwrap())
    .bind(seconds_ago)
    .execute(&app.pool)
    .await
    .unwrap();
}

fn ids(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn pending_prefers_priority_then_age() {
    let app = setup_test_app().await;

    let a = queue_url(&app, "https://a.example", 5).await;
    let b = queue_url(&app, "https://b.example", 9).await;
    let c = queue_url(&app, "https://c.example", 9).await;
    age(&app, &a, 30.0).await;
    age(&app, &b, 20.0).await;
    age(&app, &c, 10.0).await;

    let (status, body) = app.get("/api/v1/urls/pending?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![b.clone(), c.clone()]);

    let (_, body) = app.get("/api/v1/urls/pending").await;
    assert_eq!(ids(&body), vec![b, c, a]);
}

#[tokio::test]
async fn default_priority_is_five() {
    let app = setup_test_app().await;

    let (_, body) = app
        .post_json("/api/v1/urls/", json!({"url": "https://example.com"}))
        .await;

    assert_eq!(body["priority"], 5);
    assert_eq!(body["status"], "pending");
}

#[tokio::test]
async fn claim_removes_urls_from_pending() {
    let app = setup_test_app().await;

    let high = queue_url(&app, "https://high.example", 10).await;
    let low = queue_url(&app, "https://low.example", 1).await;

    let (status, claimed) = app
        .post_json("/api/v1/urls/claim?limit=1", json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&claimed), vec![high]);
    assert_eq!(claimed[0]["status"], "in_progress");

    let (_, pending) = app.get("/api/v1/urls/pending").await;
    assert_eq!(ids(&pending), vec![low]);
}

#[tokio::test]
async fn result_then_release_flow() {
    let app = setup_test_app().await;

    let id = queue_url(&app, "https://example.com", 5).await;
    app.post_json("/api/v1/urls/claim", json!({})).await;

    let (status, released) = app
        .post_json(&format!("/api/v1/urls/{id}/release"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(released["status"], "pending");

    let (status, body) = app
        .post_json(&format!("/api/v1/urls/{id}/release"), json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("not in_progress"));

    let (status, done) = app
        .post_json(
            &format!("/api/v1/urls/{id}/result"),
            json!({"status": "success"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "success");
    assert!(done["last_scraped_at"].is_string());
}

#[tokio::test]
async fn result_with_non_result_status_is_422() {
    let app = setup_test_app().await;

    let id = queue_url(&app, "https://example.com", 5).await;
    let (status, body) = app
        .post_json(
            &format!("/api/v1/urls/{id}/result"),
            json!({"status": "pending"}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("errors").is_none());
}

#[tokio::test]
async fn result_and_release_for_missing_url_are_404() {
    let app = setup_test_app().await;
    let id = Uuid::new_v4();

    let (status, _) = app
        .post_json(
            &format!("/api/v1/urls/{id}/result"),
            json!({"status": "failed"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post_json(&format!("/api/v1/urls/{id}/release"), json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
