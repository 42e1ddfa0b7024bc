//! Generic `SQLite` CRUD repository over one bound table.

use std::marker::PhantomData;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use testmon_app::ports::CrudRepository;
use testmon_domain::error::{AlreadyExistsError, EntityInUseError, NotFoundError, TestmonError};
use testmon_domain::page::{Page, PageSpec};
use testmon_storage::{MapError, Record};

use crate::error::{StorageError, is_foreign_key_violation, is_unique_violation};
use crate::table::{Row, Table};

/// Shared CRUD logic for all three tables, parameterized by the bound
/// record type. Entity-specific behavior (the metric repository's
/// referential classification) is layered on top.
pub struct SqliteRepository<R> {
    pool: SqlitePool,
    _record: PhantomData<R>,
}

impl<R> SqliteRepository<R> {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl<R> SqliteRepository<R>
where
    R: Table,
    for<'r> Row<R>: FromRow<'r, SqliteRow> + Send + Unpin,
{
    async fn fetch_total(&self) -> Result<usize, TestmonError> {
        let total: i64 = sqlx::query_scalar(R::COUNT)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(usize::try_from(total).unwrap_or_default())
    }

    fn not_found(uid: &str) -> TestmonError {
        NotFoundError {
            kind: R::KIND,
            uid: uid.to_string(),
        }
        .into()
    }
}

impl<R> CrudRepository<R::Domain> for SqliteRepository<R>
where
    R: Table,
    for<'r> Row<R>: FromRow<'r, SqliteRow> + Send + Unpin,
{
    async fn create(&self, item: R::Domain) -> Result<R::Domain, TestmonError> {
        let record = R::from_domain(&item)?;
        match record.insert(&self.pool).await {
            Ok(_) => Ok(item),
            Err(err) if is_unique_violation(&err) => Err(AlreadyExistsError {
                kind: R::KIND,
                uid: record.uid().to_string(),
            }
            .into()),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn update(&self, item: R::Domain) -> Result<R::Domain, TestmonError> {
        let record = R::from_domain(&item)?;
        let done = record
            .update(&self.pool)
            .await
            .map_err(StorageError::from)?;
        if done.rows_affected() == 0 {
            return Err(Self::not_found(record.uid()));
        }
        Ok(item)
    }

    async fn get(&self, uid: &str) -> Result<R::Domain, TestmonError> {
        let row: Option<Row<R>> = sqlx::query_as(R::SELECT_BY_UID)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;
        match row {
            Some(row) => Ok(row.0.into_domain()?),
            None => Err(Self::not_found(uid)),
        }
    }

    async fn delete(&self, uid: &str) -> Result<(), TestmonError> {
        let result = sqlx::query(R::DELETE_BY_UID)
            .bind(uid)
            .execute(&self.pool)
            .await;
        match result {
            Ok(done) if done.rows_affected() == 0 => Err(Self::not_found(uid)),
            Ok(_) => Ok(()),
            Err(err) if is_foreign_key_violation(&err) => Err(EntityInUseError {
                kind: R::KIND,
                uid: uid.to_string(),
            }
            .into()),
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn list(&self, page: Option<PageSpec>) -> Result<Page<R::Domain>, TestmonError> {
        match page {
            None => {
                let rows: Vec<Row<R>> = sqlx::query_as(R::SELECT_ALL)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(StorageError::from)?;
                let all = rows
                    .into_iter()
                    .map(|row| row.0.into_domain())
                    .collect::<Result<Vec<_>, MapError>>()?;
                Ok(Page::complete(all))
            }
            Some(spec) => {
                let total = self.fetch_total().await?;
                let limit = i64::try_from(spec.page_size()).unwrap_or(i64::MAX);
                let offset = i64::try_from(spec.offset()).unwrap_or(i64::MAX);
                let rows: Vec<Row<R>> = sqlx::query_as(R::SELECT_PAGE)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(StorageError::from)?;
                let slice = rows
                    .into_iter()
                    .map(|row| row.0.into_domain())
                    .collect::<Result<Vec<_>, MapError>>()?;
                Ok(Page::paginated(slice, spec, total))
            }
        }
    }

    async fn count(&self) -> Result<usize, TestmonError> {
        self.fetch_total().await
    }

    async fn truncate(&self) -> Result<(), TestmonError> {
        sqlx::query(R::TRUNCATE)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;
        Ok(())
    }
}
