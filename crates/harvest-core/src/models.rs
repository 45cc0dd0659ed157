use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::patch::Patch;
use crate::status::{JobStatus, UrlStatus};
use crate::traits::{Changeset, Record, Validate};

/// CSS/XPath selectors keyed by field name.
pub type Selectors = serde_json::Map<String, serde_json::Value>;

/// Scrape priority, 1 (least urgent) to 10 (most urgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(1);
    pub const MAX: Priority = Priority(10);

    pub fn new(value: i16) -> Result<Self, AppError> {
        Self::try_from(value).map_err(AppError::ValidationError)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(5)
    }
}

impl TryFrom<i16> for Priority {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        if (i16::from(Self::MIN.0)..=i16::from(Self::MAX.0)).contains(&value) {
            Ok(Priority(value as u8))
        } else {
            Err(format!("priority must be between 1 and 10, got {value}"))
        }
    }
}

impl From<Priority> for i16 {
    fn from(priority: Priority) -> Self {
        i16::from(priority.0)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that `raw` is an absolute http(s) URL with a host.
pub fn validate_target_url(raw: &str) -> Result<(), AppError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| AppError::validation(format!("Invalid URL '{raw}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::validation(format!(
            "Invalid URL '{raw}': scheme must be http or https"
        )));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(AppError::validation(format!(
            "Invalid URL '{raw}': missing host"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ScrapeConfig
// ---------------------------------------------------------------------------

/// Named set of selectors for one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeConfig {
    pub id: Uuid,
    pub site_name: String,
    pub selectors: Selectors,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewScrapeConfig {
    pub site_name: String,
    pub selectors: Selectors,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeConfigUpdate {
    #[serde(default)]
    pub site_name: Patch<String>,
    #[serde(default)]
    pub selectors: Patch<Selectors>,
}

impl Validate for NewScrapeConfig {}

impl Validate for ScrapeConfigUpdate {}

impl Changeset<ScrapeConfig> for ScrapeConfigUpdate {
    fn apply(self, target: &mut ScrapeConfig) {
        self.site_name.apply_to(&mut target.site_name);
        self.selectors.apply_to(&mut target.selectors);
    }
}

impl Record for ScrapeConfig {
    const NAME: &'static str = "ScrapeConfig";
    type Create = NewScrapeConfig;
    type Update = ScrapeConfigUpdate;

    fn id(&self) -> Uuid {
        self.id
    }
}

// ---------------------------------------------------------------------------
// ScrapingJob
// ---------------------------------------------------------------------------

/// One scraping run and its counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapingJob {
    pub id: Uuid,
    pub schedule_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_urls: u32,
    pub success_count: u32,
    pub error_count: u32,
    pub status: JobStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewScrapingJob {
    #[serde(default)]
    pub schedule_id: Option<Uuid>,
    #[serde(default)]
    pub status: JobStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapingJobUpdate {
    #[serde(default)]
    pub finished_at: Patch<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub total_urls: Patch<u32>,
    #[serde(default)]
    pub success_count: Patch<u32>,
    #[serde(default)]
    pub error_count: Patch<u32>,
    #[serde(default)]
    pub status: Patch<JobStatus>,
}

impl Validate for NewScrapingJob {}

impl Validate for ScrapingJobUpdate {}

impl Changeset<ScrapingJob> for ScrapingJobUpdate {
    fn apply(self, target: &mut ScrapingJob) {
        self.finished_at.apply_to(&mut target.finished_at);
        self.total_urls.apply_to(&mut target.total_urls);
        self.success_count.apply_to(&mut target.success_count);
        self.error_count.apply_to(&mut target.error_count);
        self.status.apply_to(&mut target.status);
    }
}

impl Record for ScrapingJob {
    const NAME: &'static str = "ScrapingJob";
    type Create = NewScrapingJob;
    type Update = ScrapingJobUpdate;

    fn id(&self) -> Uuid {
        self.id
    }
}

// ---------------------------------------------------------------------------
// ScrapeUrl
// ---------------------------------------------------------------------------

/// A URL waiting in (or done with) the scrape queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeUrl {
    pub id: Uuid,
    pub url: String,
    pub priority: Priority,
    pub config_id: Option<Uuid>,
    pub job_id: Option<Uuid>,
    pub status: UrlStatus,
    pub created_at: DateTime<Utc>,
    pub last_scraped_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewScrapeUrl {
    pub url: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub config_id: Option<Uuid>,
    #[serde(default)]
    pub job_id: Option<Uuid>,
}

impl NewScrapeUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            priority: Priority::default(),
            config_id: None,
            job_id: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_config(mut self, config_id: Uuid) -> Self {
        self.config_id = Some(config_id);
        self
    }

    pub fn with_job(mut self, job_id: Uuid) -> Self {
        self.job_id = Some(job_id);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeUrlUpdate {
    #[serde(default)]
    pub url: Patch<String>,
    #[serde(default)]
    pub priority: Patch<Priority>,
    #[serde(default)]
    pub config_id: Patch<Option<Uuid>>,
    #[serde(default)]
    pub job_id: Patch<Option<Uuid>>,
    #[serde(default)]
    pub status: Patch<UrlStatus>,
}

impl Validate for NewScrapeUrl {
    fn validate(&self) -> Result<(), AppError> {
        validate_target_url(&self.url)
    }
}

impl Validate for ScrapeUrlUpdate {
    fn validate(&self) -> Result<(), AppError> {
        match self.url.as_set() {
            Some(url) => validate_target_url(url),
            None => Ok(()),
        }
    }
}

impl Changeset<ScrapeUrl> for ScrapeUrlUpdate {
    fn apply(self, target: &mut ScrapeUrl) {
        self.url.apply_to(&mut target.url);
        self.priority.apply_to(&mut target.priority);
        self.config_id.apply_to(&mut target.config_id);
        self.job_id.apply_to(&mut target.job_id);
        self.status.apply_to(&mut target.status);
    }
}

impl Record for ScrapeUrl {
    const NAME: &'static str = "ScrapeUrl";
    type Create = NewScrapeUrl;
    type Update = ScrapeUrlUpdate;

    fn id(&self) -> Uuid {
        self.id
    }
}
