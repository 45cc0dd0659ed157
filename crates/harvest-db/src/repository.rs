use std::marker::PhantomData;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use harvest_core::error::AppError;
use harvest_core::traits::{Changeset, CrudStore, Record, Validate};

use crate::error::{Operation, translate};

/// A [`Record`] with a PostgreSQL table behind it.
///
/// Implementations describe the SQL that differs between entities; the
/// transaction and error handling is shared by [`Repository`].
pub trait Entity: Record {
    const TABLE: &'static str;

    /// Row shape as selected with `SELECT *` / `RETURNING *`.
    type Row: for<'r> FromRow<'r, PgRow> + Into<Self> + Send + Unpin;

    /// Push `(columns) VALUES (binds)` for a new row.
    fn push_insert(input: &Self::Create, query: &mut QueryBuilder<'_, Postgres>);

    /// Push `column = bind, ...` for every column an update may change.
    fn push_assignments(&self, query: &mut QueryBuilder<'_, Postgres>);
}

/// Generic PostgreSQL repository: CRUD for any [`Entity`].
///
/// Stateless apart from the pool handle; clone freely.
pub struct Repository<E> {
    pool: PgPool,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub(crate) async fn begin(
        &self,
        operation: Operation,
    ) -> Result<Transaction<'static, Postgres>, AppError> {
        self.pool
            .begin()
            .await
            .map_err(|e| translate(E::NAME, operation, e))
    }

    /// Commit on success; on failure roll back first, then translate.
    pub(crate) async fn settle<T>(
        tx: Transaction<'static, Postgres>,
        operation: Operation,
        result: Result<T, sqlx::Error>,
    ) -> Result<T, AppError> {
        match result {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| translate(E::NAME, operation, e))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(
                        entity = E::NAME,
                        operation = %operation,
                        error = %rollback_err,
                        "Rollback failed; connection will be discarded"
                    );
                }
                Err(translate(E::NAME, operation, err))
            }
        }
    }

    /// Lock the stored row, apply `input` onto it, and write it back.
    ///
    /// The changeset is merged onto the row as it is now, not onto the
    /// caller's copy, so concurrent writes to other columns survive.
    async fn merge_locked(
        tx: &mut Transaction<'static, Postgres>,
        id: Uuid,
        input: E::Update,
    ) -> Result<Option<E::Row>, sqlx::Error> {
        let sql = format!("SELECT * FROM {} WHERE id = $1 FOR UPDATE", E::TABLE);
        let Some(row) = sqlx::query_as::<_, E::Row>(&sql)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
        else {
            return Ok(None);
        };

        let mut current: E = row.into();
        input.apply(&mut current);

        let mut query = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", E::TABLE));
        current.push_assignments(&mut query);
        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" RETURNING *");

        query
            .build_query_as::<E::Row>()
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<E: Entity> CrudStore<E> for Repository<E> {
    async fn get(&self, id: Uuid) -> Result<Option<E>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);
        let row = sqlx::query_as::<_, E::Row>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| translate(E::NAME, Operation::Get, e))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<E>, AppError> {
        let sql = format!("SELECT * FROM {} OFFSET $1 LIMIT $2", E::TABLE);
        let rows = sqlx::query_as::<_, E::Row>(&sql)
            .bind(i64::try_from(skip).unwrap_or(i64::MAX))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| translate(E::NAME, Operation::List, e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: E::Create) -> Result<E, AppError> {
        input.validate()?;
        tracing::debug!(entity = E::NAME, "Attempting to create record");

        let mut query = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} ", E::TABLE));
        E::push_insert(&input, &mut query);
        query.push(" RETURNING *");

        let mut tx = self.begin(Operation::Create).await?;
        let result = query
            .build_query_as::<E::Row>()
            .fetch_one(&mut *tx)
            .await;
        let created: E = Self::settle(tx, Operation::Create, result).await?.into();

        tracing::info!(entity = E::NAME, id = %created.id(), "Created record");
        Ok(created)
    }

    async fn update(&self, existing: E, input: E::Update) -> Result<E, AppError> {
        input.validate()?;
        let id = existing.id();
        tracing::debug!(entity = E::NAME, %id, "Attempting to update record");

        let mut tx = self.begin(Operation::Update).await?;
        let result = Self::merge_locked(&mut tx, id, input).await;
        let updated = Self::settle(tx, Operation::Update, result)
            .await?
            .ok_or_else(|| AppError::not_found(E::NAME, id))?;

        tracing::info!(entity = E::NAME, %id, "Updated record");
        Ok(updated.into())
    }

    async fn remove(&self, id: Uuid) -> Result<Option<E>, AppError> {
        tracing::debug!(entity = E::NAME, %id, "Attempting to remove record");

        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING *", E::TABLE);
        let mut tx = self.begin(Operation::Remove).await?;
        let result = sqlx::query_as::<_, E::Row>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await;

        match Self::settle(tx, Operation::Remove, result).await? {
            Some(row) => {
                tracing::info!(entity = E::NAME, %id, "Removed record");
                Ok(Some(row.into()))
            }
            None => {
                tracing::warn!(entity = E::NAME, %id, "Attempted to remove non-existent record");
                Ok(None)
            }
        }
    }
}
