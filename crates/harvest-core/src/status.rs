use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of a scraping job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!(
                "Unknown job status: {s}. Expected one of: pending, running, completed, failed"
            )),
        }
    }
}

/// Status of a URL in the scrape queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlStatus {
    #[default]
    Pending,
    InProgress,
    Success,
    Failed,
}

impl UrlStatus {
    pub const ALL: [UrlStatus; 4] = [
        UrlStatus::Pending,
        UrlStatus::InProgress,
        UrlStatus::Success,
        UrlStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrlStatus::Pending => "pending",
            UrlStatus::InProgress => "in_progress",
            UrlStatus::Success => "success",
            UrlStatus::Failed => "failed",
        }
    }

    /// A scrape attempt has finished, one way or the other.
    pub fn is_result(&self) -> bool {
        matches!(self, UrlStatus::Success | UrlStatus::Failed)
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UrlStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(UrlStatus::Pending),
            "in_progress" => Ok(UrlStatus::InProgress),
            "success" => Ok(UrlStatus::Success),
            "failed" => Ok(UrlStatus::Failed),
            _ => Err(format!(
                "Unknown URL status: {s}. Expected one of: pending, in_progress, success, failed"
            )),
        }
    }
}
