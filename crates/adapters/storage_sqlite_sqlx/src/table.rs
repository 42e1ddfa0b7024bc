//! The per-table SQL contract implemented by each storage record.

use std::future::Future;

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteQueryResult;
use testmon_storage::Record;

/// Wrapper for decoding database rows into storage records without
/// implementing foreign traits on `testmon-storage` types.
pub struct Row<R>(pub R);

/// A [`Record`] bound to one `SQLite` table.
///
/// Statements live as per-table constants in each repository module, in
/// the usual adapter style; nothing builds SQL dynamically for the plain
/// CRUD path. Listings always order by `uid` so that both backends
/// return identical sequences.
pub trait Table: Record {
    const SELECT_BY_UID: &'static str;
    const SELECT_ALL: &'static str;
    const SELECT_PAGE: &'static str;
    const COUNT: &'static str;
    const DELETE_BY_UID: &'static str;
    const TRUNCATE: &'static str;

    /// Execute the insert of this record, every column bound in
    /// declaration order.
    fn insert(
        &self,
        pool: &SqlitePool,
    ) -> impl Future<Output = Result<SqliteQueryResult, sqlx::Error>> + Send;

    /// Execute the full-row update of this record, keyed by uid.
    fn update(
        &self,
        pool: &SqlitePool,
    ) -> impl Future<Output = Result<SqliteQueryResult, sqlx::Error>> + Send;
}
