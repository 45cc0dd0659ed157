use std::future::Future;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::ScrapeUrl;
use crate::status::UrlStatus;

/// Domain rules an input must satisfy before it reaches storage.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// A partial update for `T`: applies only the fields the caller supplied.
pub trait Changeset<T>: Validate {
    fn apply(self, target: &mut T);
}

/// A persisted entity with its creation and update inputs.
pub trait Record: Clone + Send + Sync + Unpin + 'static {
    /// Name used in error messages (e.g. `"ScrapeConfig"`).
    const NAME: &'static str;

    type Create: Validate + Send + Sync;
    type Update: Changeset<Self> + Send + Sync;

    fn id(&self) -> Uuid;
}

/// Uniform CRUD over one entity type.
///
/// Write operations are atomic: they either commit and return the stored state,
/// or roll back and return an error.
pub trait CrudStore<R: Record>: Send + Sync + Clone {
    /// Look up by identifier. A missing row is `Ok(None)`, not an error.
    fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<R>, AppError>> + Send;

    /// Like [`get`](Self::get), but a missing row is [`AppError::NotFound`].
    fn get_or_fail(&self, id: Uuid) -> impl Future<Output = Result<R, AppError>> + Send {
        let lookup = self.get(id);
        async move { lookup.await?.ok_or_else(|| AppError::not_found(R::NAME, id)) }
    }

    /// Up to `limit` rows after skipping `skip`, in storage order.
    fn list(&self, skip: u64, limit: u64)
    -> impl Future<Output = Result<Vec<R>, AppError>> + Send;

    fn create(&self, input: R::Create) -> impl Future<Output = Result<R, AppError>> + Send;

    /// Apply `input` onto the stored state of `existing` and persist the result.
    ///
    /// Fields `input` leaves unset keep whatever value is stored at write time.
    fn update(
        &self,
        existing: R,
        input: R::Update,
    ) -> impl Future<Output = Result<R, AppError>> + Send;

    /// Delete by identifier and return the prior state, or `None` if absent.
    fn remove(&self, id: Uuid) -> impl Future<Output = Result<Option<R>, AppError>> + Send;
}

/// Selection of pending URLs for scraping.
pub trait UrlQueue: Send + Sync + Clone {
    /// Pending URLs by priority (highest first), then age (oldest first).
    ///
    /// Read-only: repeated calls may return the same rows.
    fn pending_ordered(
        &self,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<ScrapeUrl>, AppError>> + Send;

    /// Atomically move the next `limit` pending URLs to `in_progress` and return them
    /// in queue order. Concurrent callers never receive the same row.
    fn claim_pending(
        &self,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<ScrapeUrl>, AppError>> + Send;

    /// Record the outcome of a scrape. `status` must be `success` or `failed`.
    fn mark_scraped(
        &self,
        id: Uuid,
        status: UrlStatus,
    ) -> impl Future<Output = Result<Option<ScrapeUrl>, AppError>> + Send;

    /// Return an `in_progress` URL to `pending`. `None` if absent or not in progress.
    fn release(&self, id: Uuid)
    -> impl Future<Output = Result<Option<ScrapeUrl>, AppError>> + Send;
}
