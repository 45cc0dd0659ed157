pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod repository;
pub mod url_queue;

pub use config::DatabaseConfig;
pub use database::{ConfigRepository, Database, JobRepository, UrlRepository};
pub use repository::{Entity, Repository};
