//! Table bindings for each entity: row types and the SQL fragments
//! [`Repository`](crate::repository::Repository) needs.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use harvest_core::models::{
    NewScrapeConfig, NewScrapeUrl, NewScrapingJob, Priority, ScrapeConfig, ScrapeUrl,
    ScrapingJob, Selectors,
};

use crate::repository::Entity;

// -- scrape_config --

#[derive(sqlx::FromRow)]
pub struct ScrapeConfigRow {
    id: Uuid,
    site_name: String,
    selectors: Json<Selectors>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ScrapeConfigRow> for ScrapeConfig {
    fn from(row: ScrapeConfigRow) -> Self {
        ScrapeConfig {
            id: row.id,
            site_name: row.site_name,
            selectors: row.selectors.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Entity for ScrapeConfig {
    const TABLE: &'static str = "scrape_config";
    type Row = ScrapeConfigRow;

    fn push_insert(input: &NewScrapeConfig, query: &mut QueryBuilder<'_, Postgres>) {
        query.push("(site_name, selectors) VALUES (");
        let mut values = query.separated(", ");
        values.push_bind(input.site_name.clone());
        values.push_bind(Json(input.selectors.clone()));
        values.push_unseparated(")");
    }

    fn push_assignments(&self, query: &mut QueryBuilder<'_, Postgres>) {
        let mut set = query.separated(", ");
        set.push("site_name = ")
            .push_bind_unseparated(self.site_name.clone());
        set.push("selectors = ")
            .push_bind_unseparated(Json(self.selectors.clone()));
        set.push("updated_at = NOW()");
    }
}

// -- scraping_job --

#[derive(sqlx::FromRow)]
pub struct ScrapingJobRow {
    id: Uuid,
    schedule_id: Option<Uuid>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    total_urls: i64,
    success_count: i64,
    error_count: i64,
    status: String,
}

/// Storage keeps counters non-negative with a CHECK; clamp anyway so a bad row
/// cannot wrap around.
fn counter(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

impl From<ScrapingJobRow> for ScrapingJob {
    fn from(row: ScrapingJobRow) -> Self {
        ScrapingJob {
            id: row.id,
            schedule_id: row.schedule_id,
            started_at: row.started_at,
            finished_at: row.finished_at,
            total_urls: counter(row.total_urls),
            success_count: counter(row.success_count),
            error_count: counter(row.error_count),
            status: row.status.parse().unwrap_or_default(),
        }
    }
}

impl Entity for ScrapingJob {
    const TABLE: &'static str = "scraping_job";
    type Row = ScrapingJobRow;

    fn push_insert(input: &NewScrapingJob, query: &mut QueryBuilder<'_, Postgres>) {
        query.push("(schedule_id, status) VALUES (");
        let mut values = query.separated(", ");
        values.push_bind(input.schedule_id);
        values.push_bind(input.status.as_str());
        values.push_unseparated(")");
    }

    fn push_assignments(&self, query: &mut QueryBuilder<'_, Postgres>) {
        let mut set = query.separated(", ");
        set.push("finished_at = ")
            .push_bind_unseparated(self.finished_at);
        set.push("total_urls = ")
            .push_bind_unseparated(i64::from(self.total_urls));
        set.push("success_count = ")
            .push_bind_unseparated(i64::from(self.success_count));
        set.push("error_count = ")
            .push_bind_unseparated(i64::from(self.error_count));
        set.push("status = ")
            .push_bind_unseparated(self.status.as_str());
    }
}

// -- scrape_url --

#[derive(sqlx::FromRow)]
pub struct ScrapeUrlRow {
    id: Uuid,
    url: String,
    priority: i16,
    config_id: Option<Uuid>,
    job_id: Option<Uuid>,
    status: String,
    created_at: DateTime<Utc>,
    last_scraped_at: Option<DateTime<Utc>>,
}

impl From<ScrapeUrlRow> for ScrapeUrl {
    fn from(row: ScrapeUrlRow) -> Self {
        ScrapeUrl {
            id: row.id,
            url: row.url,
            priority: Priority::try_from(row.priority).unwrap_or_default(),
            config_id: row.config_id,
            job_id: row.job_id,
            status: row.status.parse().unwrap_or_default(),
            created_at: row.created_at,
            last_scraped_at: row.last_scraped_at,
        }
    }
}

impl Entity for ScrapeUrl {
    const TABLE: &'static str = "scrape_url";
    type Row = ScrapeUrlRow;

    fn push_insert(input: &NewScrapeUrl, query: &mut QueryBuilder<'_, Postgres>) {
        query.push("(url, priority, config_id, job_id) VALUES (");
        let mut values = query.separated(", ");
        values.push_bind(input.url.clone());
        values.push_bind(i16::from(input.priority));
        values.push_bind(input.config_id);
        values.push_bind(input.job_id);
        values.push_unseparated(")");
    }

    fn push_assignments(&self, query: &mut QueryBuilder<'_, Postgres>) {
        let mut set = query.separated(", ");
        set.push("url = ").push_bind_unseparated(self.url.clone());
        set.push("priority = ")
            .push_bind_unseparated(i16::from(self.priority));
        set.push("config_id = ")
            .push_bind_unseparated(self.config_id);
        set.push("job_id = ").push_bind_unseparated(self.job_id);
        set.push("status = ")
            .push_bind_unseparated(self.status.as_str());
    }
}
