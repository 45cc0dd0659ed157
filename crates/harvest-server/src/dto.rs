use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use harvest_core::models::{
    NewScrapeConfig, NewScrapeUrl, NewScrapingJob, Priority, ScrapeConfig, ScrapeConfigUpdate,
    ScrapeUrl, ScrapeUrlUpdate, ScrapingJob, ScrapingJobUpdate, Selectors,
};
use harvest_core::patch::Patch;
use harvest_core::status::{JobStatus, UrlStatus};

// ---------------------------------------------------------------------------
// Configs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateConfigRequest {
    pub site_name: String,
    #[schema(value_type = Object)]
    pub selectors: Selectors,
}

impl From<CreateConfigRequest> for NewScrapeConfig {
    fn from(body: CreateConfigRequest) -> Self {
        NewScrapeConfig {
            site_name: body.site_name,
            selectors: body.selectors,
        }
    }
}

/// Partial update: omitted fields are left untouched.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateConfigRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub site_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub selectors: Patch<Selectors>,
}

impl From<UpdateConfigRequest> for ScrapeConfigUpdate {
    fn from(body: UpdateConfigRequest) -> Self {
        ScrapeConfigUpdate {
            site_name: body.site_name,
            selectors: body.selectors,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ConfigResponse {
    pub id: Uuid,
    pub site_name: String,
    #[schema(value_type = Object)]
    pub selectors: Selectors,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScrapeConfig> for ConfigResponse {
    fn from(config: ScrapeConfig) -> Self {
        Self {
            id: config.id,
            site_name: config.site_name,
            selectors: config.selectors,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub schedule_id: Option<Uuid>,
    #[serde(default)]
    #[schema(value_type = String, example = "pending")]
    pub status: JobStatus,
}

impl From<CreateJobRequest> for NewScrapingJob {
    fn from(body: CreateJobRequest) -> Self {
        NewScrapingJob {
            schedule_id: body.schedule_id,
            status: body.status,
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateJobRequest {
    /// `null` clears the finish time.
    #[serde(default)]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub finished_at: Patch<Option<DateTime<Utc>>>,
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub total_urls: Patch<u32>,
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub success_count: Patch<u32>,
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub error_count: Patch<u32>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "completed")]
    pub status: Patch<JobStatus>,
}

impl From<UpdateJobRequest> for ScrapingJobUpdate {
    fn from(body: UpdateJobRequest) -> Self {
        ScrapingJobUpdate {
            finished_at: body.finished_at,
            total_urls: body.total_urls,
            success_count: body.success_count,
            error_count: body.error_count,
            status: body.status,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct JobResponse {
    pub id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_urls: u32,
    pub success_count: u32,
    pub error_count: u32,
    pub status: String,
}

impl From<ScrapingJob> for JobResponse {
    fn from(job: ScrapingJob) -> Self {
        Self {
            id: job.id,
            schedule_id: job.schedule_id,
            started_at: job.started_at,
            finished_at: job.finished_at,
            total_urls: job.total_urls,
            success_count: job.success_count,
            error_count: job.error_count,
            status: job.status.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUrlRequest {
    pub url: String,
    #[serde(default)]
    #[schema(value_type = i16, minimum = 1, maximum = 10, default = 5)]
    pub priority: Priority,
    #[serde(default)]
    pub config_id: Option<Uuid>,
    #[serde(default)]
    pub job_id: Option<Uuid>,
}

impl From<CreateUrlRequest> for NewScrapeUrl {
    fn from(body: CreateUrlRequest) -> Self {
        NewScrapeUrl {
            url: body.url,
            priority: body.priority,
            config_id: body.config_id,
            job_id: body.job_id,
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateUrlRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub url: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i16>, minimum = 1, maximum = 10)]
    pub priority: Patch<Priority>,
    /// `null` detaches the URL from its config.
    #[serde(default)]
    #[schema(value_type = Option<Uuid>)]
    pub config_id: Patch<Option<Uuid>>,
    /// `null` detaches the URL from its job.
    #[serde(default)]
    #[schema(value_type = Option<Uuid>)]
    pub job_id: Patch<Option<Uuid>>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "in_progress")]
    pub status: Patch<UrlStatus>,
}

impl From<UpdateUrlRequest> for ScrapeUrlUpdate {
    fn from(body: UpdateUrlRequest) -> Self {
        ScrapeUrlUpdate {
            url: body.url,
            priority: body.priority,
            config_id: body.config_id,
            job_id: body.job_id,
            status: body.status,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ScrapeResultRequest {
    /// `success` or `failed`.
    #[schema(value_type = String, example = "success")]
    pub status: UrlStatus,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UrlResponse {
    pub id: Uuid,
    pub url: String,
    pub priority: u8,
    pub config_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub last_scraped_at: Option<DateTime<Utc>>,
}

impl From<ScrapeUrl> for UrlResponse {
    fn from(url: ScrapeUrl) -> Self {
        Self {
            id: url.id,
            url: url.url,
            priority: url.priority.get(),
            config_id: url.config_id,
            job_id: url.job_id,
            status: url.status.to_string(),
            created_at: url.created_at,
            last_scraped_at: url.last_scraped_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Rows to skip (default 0).
    pub skip: Option<u64>,
    /// Maximum rows to return (default 100).
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn skip(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(100)
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BatchQuery {
    /// Maximum URLs to return.
    pub limit: Option<u64>,
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
    /// Present only for rejected input shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            errors: None,
        }
    }
}

/// One rejected input location.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    /// Where the problem is, e.g. `["body"]` or `["path", "id"]`.
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}
