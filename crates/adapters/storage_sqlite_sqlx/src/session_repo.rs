//! `SQLite` implementation of [`SessionRepository`].

use sqlx::sqlite::{SqliteQueryResult, SqliteRow};
use sqlx::{FromRow, Row as _, SqlitePool};

use testmon_app::ports::SessionRepository;
use testmon_storage::SessionRecord;

use crate::repository::SqliteRepository;
use crate::table::{Row, Table};

impl<'r> FromRow<'r, SqliteRow> for Row<SessionRecord> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(SessionRecord {
            uid: row.try_get("uid")?,
            run_date: row.try_get("run_date")?,
            scm_id: row.try_get("scm_id")?,
            description: row.try_get("description")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO sessions (uid, run_date, scm_id, description)
    VALUES (?, ?, ?, ?)
";

const UPDATE: &str = r"
    UPDATE sessions
    SET run_date = ?, scm_id = ?, description = ?
    WHERE uid = ?
";

impl Table for SessionRecord {
    const SELECT_BY_UID: &'static str = "SELECT * FROM sessions WHERE uid = ?";
    const SELECT_ALL: &'static str = "SELECT * FROM sessions ORDER BY uid ASC";
    const SELECT_PAGE: &'static str = "SELECT * FROM sessions ORDER BY uid ASC LIMIT ? OFFSET ?";
    const COUNT: &'static str = "SELECT COUNT(*) FROM sessions";
    const DELETE_BY_UID: &'static str = "DELETE FROM sessions WHERE uid = ?";
    const TRUNCATE: &'static str = "DELETE FROM sessions";

    async fn insert(&self, pool: &SqlitePool) -> Result<SqliteQueryResult, sqlx::Error> {
        sqlx::query(INSERT)
            .bind(self.uid.as_str())
            .bind(self.run_date.as_str())
            .bind(self.scm_id.as_str())
            .bind(self.description.as_str())
            .execute(pool)
            .await
    }

    async fn update(&self, pool: &SqlitePool) -> Result<SqliteQueryResult, sqlx::Error> {
        sqlx::query(UPDATE)
            .bind(self.run_date.as_str())
            .bind(self.scm_id.as_str())
            .bind(self.description.as_str())
            .bind(self.uid.as_str())
            .execute(pool)
            .await
    }
}

/// `SQLite`-backed session repository.
pub type SqliteSessionRepository = SqliteRepository<SessionRecord>;

impl SessionRepository for SqliteSessionRepository {}
