pub mod error;
pub mod models;
pub mod patch;
pub mod queue;
pub mod status;
pub mod traits;

pub use error::{AppError, DatabaseErrorKind};
pub use models::{
    NewScrapeConfig, NewScrapeUrl, NewScrapingJob, Priority, ScrapeConfig, ScrapeConfigUpdate,
    ScrapeUrl, ScrapeUrlUpdate, ScrapingJob, ScrapingJobUpdate, Selectors,
};
pub use patch::Patch;
pub use status::{JobStatus, UrlStatus};
pub use traits::{Changeset, CrudStore, Record, UrlQueue, Validate};
