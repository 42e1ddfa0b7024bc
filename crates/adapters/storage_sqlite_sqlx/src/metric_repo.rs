//! `SQLite` implementation of [`MetricRepository`].

use sqlx::sqlite::{SqliteQueryResult, SqliteRow};
use sqlx::{FromRow, Row as _, Sqlite, SqlitePool};

use testmon_app::ports::{CrudRepository, MetricFilter, MetricRepository};
use testmon_domain::error::{
    AlreadyExistsError, EntityKind, LinkedEntityMissingError, TestmonError,
};
use testmon_domain::metric::Metric;
use testmon_domain::page::{Page, PageSpec};
use testmon_storage::{MapError, MetricRecord, Record};

use crate::error::{StorageError, is_foreign_key_violation, is_unique_violation};
use crate::repository::SqliteRepository;
use crate::table::{Row, Table};

impl<'r> FromRow<'r, SqliteRow> for Row<MetricRecord> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(MetricRecord {
            uid: row.try_get("uid")?,
            sid: row.try_get("sid")?,
            xid: row.try_get("xid")?,
            item_start_time: row.try_get("item_start_time")?,
            item_path: row.try_get("item_path")?,
            item: row.try_get("item")?,
            variant: row.try_get("variant")?,
            item_fs_loc: row.try_get("item_fs_loc")?,
            kind: row.try_get("kind")?,
            component: row.try_get("component")?,
            wall_time: row.try_get("wall_time")?,
            user_time: row.try_get("user_time")?,
            kernel_time: row.try_get("kernel_time")?,
            cpu_usage: row.try_get("cpu_usage")?,
            mem_usage: row.try_get("mem_usage")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO test_metrics (uid, sid, xid, item_start_time, item_path, item, variant,
        item_fs_loc, kind, component, wall_time, user_time, kernel_time, cpu_usage, mem_usage)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE: &str = r"
    UPDATE test_metrics
    SET sid = ?, xid = ?, item_start_time = ?, item_path = ?, item = ?, variant = ?,
        item_fs_loc = ?, kind = ?, component = ?, wall_time = ?, user_time = ?,
        kernel_time = ?, cpu_usage = ?, mem_usage = ?
    WHERE uid = ?
";

impl Table for MetricRecord {
    const SELECT_BY_UID: &'static str = "SELECT * FROM test_metrics WHERE uid = ?";
    const SELECT_ALL: &'static str = "SELECT * FROM test_metrics ORDER BY uid ASC";
    const SELECT_PAGE: &'static str =
        "SELECT * FROM test_metrics ORDER BY uid ASC LIMIT ? OFFSET ?";
    const COUNT: &'static str = "SELECT COUNT(*) FROM test_metrics";
    const DELETE_BY_UID: &'static str = "DELETE FROM test_metrics WHERE uid = ?";
    const TRUNCATE: &'static str = "DELETE FROM test_metrics";

    async fn insert(&self, pool: &SqlitePool) -> Result<SqliteQueryResult, sqlx::Error> {
        sqlx::query(INSERT)
            .bind(self.uid.as_str())
            .bind(self.sid.as_str())
            .bind(self.xid.as_str())
            .bind(self.item_start_time.as_str())
            .bind(self.item_path.as_str())
            .bind(self.item.as_str())
            .bind(self.variant.as_str())
            .bind(self.item_fs_loc.as_str())
            .bind(self.kind.as_str())
            .bind(self.component.as_str())
            .bind(self.wall_time)
            .bind(self.user_time)
            .bind(self.kernel_time)
            .bind(self.cpu_usage)
            .bind(self.mem_usage)
            .execute(pool)
            .await
    }

    async fn update(&self, pool: &SqlitePool) -> Result<SqliteQueryResult, sqlx::Error> {
        sqlx::query(UPDATE)
            .bind(self.sid.as_str())
            .bind(self.xid.as_str())
            .bind(self.item_start_time.as_str())
            .bind(self.item_path.as_str())
            .bind(self.item.as_str())
            .bind(self.variant.as_str())
            .bind(self.item_fs_loc.as_str())
            .bind(self.kind.as_str())
            .bind(self.component.as_str())
            .bind(self.wall_time)
            .bind(self.user_time)
            .bind(self.kernel_time)
            .bind(self.cpu_usage)
            .bind(self.mem_usage)
            .bind(self.uid.as_str())
            .execute(pool)
            .await
    }
}

const SESSION_EXISTS: &str = "SELECT COUNT(*) FROM sessions WHERE uid = ?";
const SELECT_FILTERED: &str = "SELECT * FROM test_metrics";
const COUNT_FILTERED: &str = "SELECT COUNT(*) FROM test_metrics";

fn filter_clause(filter: &MetricFilter) -> String {
    let mut conditions: Vec<&str> = Vec::new();
    if filter.session_id.is_some() {
        conditions.push("sid = ?");
    }
    if filter.node_id.is_some() {
        conditions.push("xid = ?");
    }
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

/// `SQLite`-backed metric repository.
pub struct SqliteMetricRepository {
    inner: SqliteRepository<MetricRecord>,
}

impl SqliteMetricRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqliteRepository::new(pool),
        }
    }

    fn pool(&self) -> &SqlitePool {
        self.inner.pool()
    }

    /// `SQLite` reports foreign-key failures without naming the
    /// constraint, so probe the referenced rows — session first — to
    /// decide which side is missing.
    async fn classify_missing_reference(&self, record: &MetricRecord) -> TestmonError {
        let session_present: Result<i64, sqlx::Error> = sqlx::query_scalar(SESSION_EXISTS)
            .bind(record.sid.as_str())
            .fetch_one(self.pool())
            .await;
        match session_present {
            Ok(0) => LinkedEntityMissingError {
                missing: EntityKind::Session,
                missing_uid: record.sid.clone(),
                dependent: EntityKind::Metric,
                dependent_uid: record.uid.clone(),
            }
            .into(),
            Ok(_) => LinkedEntityMissingError {
                missing: EntityKind::Machine,
                missing_uid: record.xid.clone(),
                dependent: EntityKind::Metric,
                dependent_uid: record.uid.clone(),
            }
            .into(),
            Err(err) => StorageError::from(err).into(),
        }
    }

    async fn fetch_filtered(
        &self,
        filter: &MetricFilter,
        page: Option<PageSpec>,
    ) -> Result<Vec<MetricRecord>, TestmonError> {
        let clause = filter_clause(filter);
        let sql = match page {
            None => format!("{SELECT_FILTERED}{clause} ORDER BY uid ASC"),
            Some(_) => format!("{SELECT_FILTERED}{clause} ORDER BY uid ASC LIMIT ? OFFSET ?"),
        };
        let mut query = sqlx::query_as::<Sqlite, Row<MetricRecord>>(&sql);
        if let Some(sid) = &filter.session_id {
            query = query.bind(sid.as_str());
        }
        if let Some(xid) = &filter.node_id {
            query = query.bind(xid.as_str());
        }
        if let Some(spec) = page {
            let limit = i64::try_from(spec.page_size()).unwrap_or(i64::MAX);
            let offset = i64::try_from(spec.offset()).unwrap_or(i64::MAX);
            query = query.bind(limit).bind(offset);
        }
        let rows = query
            .fetch_all(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    async fn count_filtered(&self, filter: &MetricFilter) -> Result<usize, TestmonError> {
        let sql = format!("{COUNT_FILTERED}{}", filter_clause(filter));
        let mut query = sqlx::query_scalar::<Sqlite, i64>(&sql);
        if let Some(sid) = &filter.session_id {
            query = query.bind(sid.as_str());
        }
        if let Some(xid) = &filter.node_id {
            query = query.bind(xid.as_str());
        }
        let total = query
            .fetch_one(self.pool())
            .await
            .map_err(StorageError::from)?;
        Ok(usize::try_from(total).unwrap_or_default())
    }
}

impl CrudRepository<Metric> for SqliteMetricRepository {
    async fn create(&self, item: Metric) -> Result<Metric, TestmonError> {
        let record = MetricRecord::from_domain(&item)?;
        match record.insert(self.pool()).await {
            Ok(_) => Ok(item),
            Err(err) if is_unique_violation(&err) => Err(AlreadyExistsError {
                kind: EntityKind::Metric,
                uid: record.uid.clone(),
            }
            .into()),
            Err(err) if is_foreign_key_violation(&err) => {
                Err(self.classify_missing_reference(&record).await)
            }
            Err(err) => Err(StorageError::from(err).into()),
        }
    }

    async fn update(&self, item: Metric) -> Result<Metric, TestmonError> {
        self.inner.update(item).await
    }

    async fn get(&self, uid: &str) -> Result<Metric, TestmonError> {
        self.inner.get(uid).await
    }

    async fn delete(&self, uid: &str) -> Result<(), TestmonError> {
        self.inner.delete(uid).await
    }

    async fn list(&self, page: Option<PageSpec>) -> Result<Page<Metric>, TestmonError> {
        self.inner.list(page).await
    }

    async fn count(&self) -> Result<usize, TestmonError> {
        self.inner.count().await
    }

    async fn truncate(&self) -> Result<(), TestmonError> {
        self.inner.truncate().await
    }
}

impl MetricRepository for SqliteMetricRepository {
    async fn find_by(
        &self,
        filter: MetricFilter,
        page: Option<PageSpec>,
    ) -> Result<Page<Metric>, TestmonError> {
        match page {
            None => {
                let records = self.fetch_filtered(&filter, None).await?;
                let all = records
                    .into_iter()
                    .map(Record::into_domain)
                    .collect::<Result<Vec<_>, MapError>>()?;
                Ok(Page::complete(all))
            }
            Some(spec) => {
                let total = self.count_filtered(&filter).await?;
                let records = self.fetch_filtered(&filter, Some(spec)).await?;
                let slice = records
                    .into_iter()
                    .map(Record::into_domain)
                    .collect::<Result<Vec<_>, MapError>>()?;
                Ok(Page::paginated(slice, spec, total))
            }
        }
    }
}
