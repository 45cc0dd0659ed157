use uuid::Uuid;

use harvest_core::error::AppError;
use harvest_core::models::ScrapeUrl;
use harvest_core::queue::sort_queue;
use harvest_core::status::UrlStatus;
use harvest_core::traits::UrlQueue;

use crate::entities::ScrapeUrlRow;
use crate::error::{Operation, translate};
use crate::repository::Repository;

const NAME: &str = "ScrapeUrl";

fn bind_limit(limit: u64) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

impl UrlQueue for Repository<ScrapeUrl> {
    async fn pending_ordered(&self, limit: u64) -> Result<Vec<ScrapeUrl>, AppError> {
        let rows = sqlx::query_as::<_, ScrapeUrlRow>(
            r#"
            SELECT * FROM scrape_url
            WHERE status = 'pending'
            ORDER BY priority DESC, created_at ASC
            LIMIT $1
            "#,
        )
        .bind(bind_limit(limit))
        .fetch_all(self.pool())
        .await
        .map_err(|e| translate(NAME, Operation::PendingOrdered, e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn claim_pending(&self, limit: u64) -> Result<Vec<ScrapeUrl>, AppError> {
        let mut tx = self.begin(Operation::Claim).await?;
        let result = sqlx::query_as::<_, ScrapeUrlRow>(
            r#"
            UPDATE scrape_url
            SET status = 'in_progress'
            WHERE id IN (
                SELECT id FROM scrape_url
                WHERE status = 'pending'
                ORDER BY priority DESC, created_at ASC
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(bind_limit(limit))
        .fetch_all(&mut *tx)
        .await;
        let rows = Self::settle(tx, Operation::Claim, result).await?;

        // RETURNING does not preserve the subquery's order.
        let mut claimed: Vec<ScrapeUrl> = rows.into_iter().map(Into::into).collect();
        sort_queue(&mut claimed);

        if !claimed.is_empty() {
            tracing::info!(count = claimed.len(), "Claimed pending URLs");
        }
        Ok(claimed)
    }

    async fn mark_scraped(
        &self,
        id: Uuid,
        status: UrlStatus,
    ) -> Result<Option<ScrapeUrl>, AppError> {
        if !status.is_result() {
            return Err(AppError::validation(format!(
                "status must be 'success' or 'failed', got '{status}'"
            )));
        }

        let mut tx = self.begin(Operation::MarkScraped).await?;
        let result = sqlx::query_as::<_, ScrapeUrlRow>(
            r#"
            UPDATE scrape_url
            SET status = $2, last_scraped_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await;
        let row = Self::settle(tx, Operation::MarkScraped, result).await?;

        match row {
            Some(row) => {
                tracing::info!(%id, %status, "Recorded scrape result");
                Ok(Some(row.into()))
            }
            None => {
                tracing::warn!(%id, "Scrape result for non-existent URL");
                Ok(None)
            }
        }
    }

    async fn release(&self, id: Uuid) -> Result<Option<ScrapeUrl>, AppError> {
        let mut tx = self.begin(Operation::Release).await?;
        let result = sqlx::query_as::<_, ScrapeUrlRow>(
            r#"
            UPDATE scrape_url
            SET status = 'pending'
            WHERE id = $1 AND status = 'in_progress'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await;
        let row = Self::settle(tx, Operation::Release, result).await?;

        if row.is_some() {
            tracing::info!(%id, "Released URL back to pending");
        }
        Ok(row.map(Into::into))
    }
}
