use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::integration::common::setup_test_app;

#[tokio::test]
async fn root_returns_welcome_message() {
    let app = setup_test_app().await;

    let (status, json) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Welcome to Web Analysis System");
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app().await;

    let (status, json) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app().await;

    let (status, json) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["info"]["title"], "Harvest API");
}

#[tokio::test]
async fn config_lifecycle() {
    let app = setup_test_app().await;

    let (status, created) = app
        .post_json(
            "/api/v1/configs/",
            json!({"site_name": "example", "selectors": {"title": "h1"}}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["selectors"], json!({"title": "h1"}));
    let id = created["id"].as_str().unwrap().to_string();
    assert!(Uuid::parse_str(&id).is_ok());

    let (status, fetched) = app.get(&format!("/api/v1/configs/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["selectors"], json!({"title": "h1"}));

    let (status, body) = app.delete(&format!("/api/v1/configs/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, json) = app.get(&format!("/api/v1/configs/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["detail"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn collection_routes_accept_both_slash_forms() {
    let app = setup_test_app().await;

    let (status, _) = app
        .post_json(
            "/api/v1/configs",
            json!({"site_name": "no-slash", "selectors": {}}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, with_slash) = app.get("/api/v1/configs/").await;
    assert_eq!(status, StatusCode::OK);
    let (_, without_slash) = app.get("/api/v1/configs").await;
    assert_eq!(with_slash, without_slash);
    assert_eq!(with_slash.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_honors_skip_and_limit() {
    let app = setup_test_app().await;

    for _ in 0..3 {
        let (status, _) = app
            .post_json("/api/v1/jobs/", json!({"schedule_id": null, "status": "pending"}))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = app.get("/api/v1/jobs/").await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, page) = app.get("/api/v1/jobs/?skip=1&limit=1").await;
    assert_eq!(page.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_query_returns_structured_422() {
    let app = setup_test_app().await;

    let (status, json) = app.get("/api/v1/urls/?limit=lots").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"], "Validation Error");
    assert_eq!(json["errors"][0]["loc"][0], "query");
}

#[tokio::test]
async fn malformed_id_returns_422() {
    let app = setup_test_app().await;

    let (status, json) = app.get("/api/v1/configs/not-a-uuid").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"], "Validation Error");
    assert_eq!(json["errors"][0]["loc"], json!(["path", "id"]));
}

#[tokio::test]
async fn missing_required_field_returns_422() {
    let app = setup_test_app().await;

    let (status, json) = app
        .post_json("/api/v1/configs/", json!({"selectors": {}}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"], "Validation Error");
    assert_eq!(json["errors"][0]["loc"][0], "body");
}

#[tokio::test]
async fn unknown_status_value_returns_422() {
    let app = setup_test_app().await;

    let (status, json) = app
        .post_json("/api/v1/jobs/", json!({"status": "archived"}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["detail"], "Validation Error");
}

#[tokio::test]
async fn out_of_range_priority_returns_422() {
    let app = setup_test_app().await;

    let (status, _) = app
        .post_json(
            "/api/v1/urls/",
            json!({"url": "https://example.com", "priority": 11}),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn invalid_url_is_a_domain_validation_error() {
    let app = setup_test_app().await;

    let (status, json) = app
        .post_json("/api/v1/urls/", json!({"url": "ftp://example.com/file"}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["detail"].as_str().unwrap().contains("http or https"));
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn unknown_reference_is_a_storage_conflict() {
    let app = setup_test_app().await;

    let (status, json) = app
        .post_json(
            "/api/v1/urls/",
            json!({"url": "https://example.com", "config_id": Uuid::new_v4()}),
        )
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["detail"], "Data conflict during create.");
}

#[tokio::test]
async fn put_applies_only_supplied_fields() {
    let app = setup_test_app().await;

    let (_, created) = app
        .post_json(
            "/api/v1/configs/",
            json!({"site_name": "before", "selectors": {"title": "h1"}}),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = app
        .put_json(&format!("/api/v1/configs/{id}"), json!({"site_name": "after"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["site_name"], "after");
    assert_eq!(updated["selectors"], json!({"title": "h1"}));

    let (_, updated) = app
        .put_json(&format!("/api/v1/configs/{id}"), json!({"selectors": {}}))
        .await;
    assert_eq!(updated["site_name"], "after");
    assert_eq!(updated["selectors"], json!({}));
}

#[tokio::test]
async fn put_null_clears_nullable_reference() {
    let app = setup_test_app().await;

    let (_, job) = app.post_json("/api/v1/jobs/", json!({})).await;
    let (_, url) = app
        .post_json(
            "/api/v1/urls/",
            json!({"url": "https://example.com", "job_id": job["id"]}),
        )
        .await;
    assert_eq!(url["job_id"], job["id"]);

    let id = url["id"].as_str().unwrap();
    let (status, updated) = app
        .put_json(&format!("/api/v1/urls/{id}"), json!({"job_id": null}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["job_id"].is_null());
    assert_eq!(updated["url"], "https://example.com");
}

#[tokio::test]
async fn put_missing_returns_404() {
    let app = setup_test_app().await;

    let id = Uuid::new_v4();
    let (status, json) = app
        .put_json(&format!("/api/v1/jobs/{id}"), json!({"status": "running"}))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json["detail"],
        format!("ScrapingJob not found for ID {id}.")
    );
}

#[tokio::test]
async fn delete_missing_returns_404() {
    let app = setup_test_app().await;

    let (status, json) = app
        .delete(&format!("/api/v1/urls/{}", Uuid::new_v4()))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["detail"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn deleting_job_cascades_to_urls() {
    let app = setup_test_app().await;

    let (_, job) = app.post_json("/api/v1/jobs/", json!({})).await;
    let (_, url) = app
        .post_json(
            "/api/v1/urls/",
            json!({"url": "https://example.com", "job_id": job["id"]}),
        )
        .await;

    let (status, _) = app
        .delete(&format!("/api/v1/jobs/{}", job["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(&format!("/api/v1/urls/{}", url["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_outage_returns_503() {
    let app = setup_test_app().await;
    app.pool.close().await;

    let (status, json) = app
        .send(
            Request::get("/api/v1/configs/")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        json["detail"],
        "Could not complete list due to a database issue."
    );
}
