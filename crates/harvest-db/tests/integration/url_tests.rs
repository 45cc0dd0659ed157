use harvest_core::{
    CrudStore, DatabaseErrorKind, NewScrapeUrl, Patch, Priority, ScrapeUrlUpdate, UrlStatus,
};
use uuid::Uuid;

use crate::integration::common::setup_test_db;

#[tokio::test]
async fn create_url_with_defaults() {
    let (db, _container) = setup_test_db().await;
    let repo = db.url_repo();

    let url = repo
        .create(NewScrapeUrl::new("https://example.com/page"))
        .await
        .unwrap();

    assert_eq!(url.url, "https://example.com/page");
    assert_eq!(url.priority, Priority::default());
    assert_eq!(url.status, UrlStatus::Pending);
    assert!(url.config_id.is_none());
    assert!(url.job_id.is_none());
    assert!(url.last_scraped_at.is_none());
}

#[tokio::test]
async fn create_with_unknown_config_is_conflict() {
    let (db, _container) = setup_test_db().await;
    let repo = db.url_repo();

    let err = repo
        .create(NewScrapeUrl::new("https://example.com").with_config(Uuid::new_v4()))
        .await
        .unwrap_err();

    assert_eq!(err.database_kind(), Some(DatabaseErrorKind::Conflict));
    assert_eq!(err.detail(), "Data conflict during create.");
    assert!(repo.list(0, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_rejects_invalid_url_before_storage() {
    let (db, _container) = setup_test_db().await;
    let repo = db.url_repo();

    let err = repo
        .create(NewScrapeUrl::new("not a url"))
        .await
        .unwrap_err();

    assert!(matches!(err, harvest_core::AppError::ValidationError(_)));
    assert!(repo.list(0, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_priority_and_detach_config() {
    let (db, _container) = setup_test_db().await;
    let configs = db.config_repo();
    let repo = db.url_repo();

    let config = configs
        .create(harvest_core::NewScrapeConfig {
            site_name: "example".into(),
            selectors: Default::default(),
        })
        .await
        .unwrap();
    let url = repo
        .create(NewScrapeUrl::new("https://example.com").with_config(config.id))
        .await
        .unwrap();

    let updated = repo
        .update(
            url.clone(),
            ScrapeUrlUpdate {
                priority: Patch::Set(Priority::MAX),
                config_id: Patch::Set(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.priority, Priority::MAX);
    assert!(updated.config_id.is_none());
    assert_eq!(updated.url, url.url);
    assert_eq!(updated.status, url.status);
}

#[tokio::test]
async fn failed_update_leaves_row_unchanged() {
    let (db, _container) = setup_test_db().await;
    let repo = db.url_repo();

    let url = repo
        .create(NewScrapeUrl::new("https://example.com"))
        .await
        .unwrap();

    let err = repo
        .update(
            url.clone(),
            ScrapeUrlUpdate {
                status: Patch::Set(UrlStatus::Success),
                job_id: Patch::Set(Some(Uuid::new_v4())),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.database_kind(), Some(DatabaseErrorKind::Conflict));

    let stored = repo.get(url.id).await.unwrap().unwrap();
    assert_eq!(stored, url);
}
