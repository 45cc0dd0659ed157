use chrono::Utc;
use harvest_core::{CrudStore, JobStatus, NewScrapeUrl, NewScrapingJob, Patch, ScrapingJobUpdate};
use uuid::Uuid;

use crate::integration::common::setup_test_db;

#[tokio::test]
async fn create_job_uses_defaults() {
    let (db, _container) = setup_test_db().await;
    let repo = db.job_repo();

    let job = repo.create(NewScrapingJob::default()).await.unwrap();

    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.total_urls, 0);
    assert_eq!(job.success_count, 0);
    assert_eq!(job.error_count, 0);
    assert!(job.schedule_id.is_none());
    assert!(job.finished_at.is_none());
}

#[tokio::test]
async fn create_job_with_schedule_and_status() {
    let (db, _container) = setup_test_db().await;
    let repo = db.job_repo();

    let schedule_id = Uuid::new_v4();
    let job = repo
        .create(NewScrapingJob {
            schedule_id: Some(schedule_id),
            status: JobStatus::Running,
        })
        .await
        .unwrap();

    assert_eq!(job.schedule_id, Some(schedule_id));
    assert_eq!(job.status, JobStatus::Running);
}

#[tokio::test]
async fn finish_job_updates_counters_and_status() {
    let (db, _container) = setup_test_db().await;
    let repo = db.job_repo();

    let job = repo.create(NewScrapingJob::default()).await.unwrap();
    let finished_at = Utc::now();
    let update = ScrapingJobUpdate {
        finished_at: Patch::Set(Some(finished_at)),
        total_urls: Patch::Set(10),
        success_count: Patch::Set(8),
        error_count: Patch::Set(2),
        status: Patch::Set(JobStatus::Completed),
    };

    let updated = repo.update(job.clone(), update).await.unwrap();
    assert_eq!(updated.total_urls, 10);
    assert_eq!(updated.success_count, 8);
    assert_eq!(updated.error_count, 2);
    assert_eq!(updated.status, JobStatus::Completed);
    assert!(updated.finished_at.is_some());
    assert_eq!(updated.started_at, job.started_at);
}

#[tokio::test]
async fn explicit_null_clears_finished_at() {
    let (db, _container) = setup_test_db().await;
    let repo = db.job_repo();

    let job = repo.create(NewScrapingJob::default()).await.unwrap();
    let job = repo
        .update(
            job,
            ScrapingJobUpdate {
                finished_at: Patch::Set(Some(Utc::now())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(job.finished_at.is_some());

    let job = repo
        .update(
            job,
            ScrapingJobUpdate {
                finished_at: Patch::Set(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(job.finished_at.is_none());
}

#[tokio::test]
async fn remove_job_cascades_to_urls() {
    let (db, _container) = setup_test_db().await;
    let jobs = db.job_repo();
    let urls = db.url_repo();

    let job = jobs.create(NewScrapingJob::default()).await.unwrap();
    let url = urls
        .create(NewScrapeUrl::new("https://example.com/job").with_job(job.id))
        .await
        .unwrap();

    assert!(jobs.remove(job.id).await.unwrap().is_some());
    assert!(urls.get(url.id).await.unwrap().is_none());
}
