//! `SQLite` implementation of [`MachineRepository`].

use sqlx::sqlite::{SqliteQueryResult, SqliteRow};
use sqlx::{FromRow, Row as _, SqlitePool};

use testmon_app::ports::MachineRepository;
use testmon_storage::MachineRecord;

use crate::repository::SqliteRepository;
use crate::table::{Row, Table};

impl<'r> FromRow<'r, SqliteRow> for Row<MachineRecord> {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(MachineRecord {
            uid: row.try_get("uid")?,
            cpu_frequency: row.try_get("cpu_frequency")?,
            cpu_vendor: row.try_get("cpu_vendor")?,
            cpu_count: row.try_get("cpu_count")?,
            cpu_type: row.try_get("cpu_type")?,
            total_ram: row.try_get("total_ram")?,
            hostname: row.try_get("hostname")?,
            machine_type: row.try_get("machine_type")?,
            machine_arch: row.try_get("machine_arch")?,
            system_info: row.try_get("system_info")?,
            python_info: row.try_get("python_info")?,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO execution_contexts (uid, cpu_frequency, cpu_vendor, cpu_count, cpu_type,
        total_ram, hostname, machine_type, machine_arch, system_info, python_info)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const UPDATE: &str = r"
    UPDATE execution_contexts
    SET cpu_frequency = ?, cpu_vendor = ?, cpu_count = ?, cpu_type = ?, total_ram = ?,
        hostname = ?, machine_type = ?, machine_arch = ?, system_info = ?, python_info = ?
    WHERE uid = ?
";

impl Table for MachineRecord {
    const SELECT_BY_UID: &'static str = "SELECT * FROM execution_contexts WHERE uid = ?";
    const SELECT_ALL: &'static str = "SELECT * FROM execution_contexts ORDER BY uid ASC";
    const SELECT_PAGE: &'static str =
        "SELECT * FROM execution_contexts ORDER BY uid ASC LIMIT ? OFFSET ?";
    const COUNT: &'static str = "SELECT COUNT(*) FROM execution_contexts";
    const DELETE_BY_UID: &'static str = "DELETE FROM execution_contexts WHERE uid = ?";
    const TRUNCATE: &'static str = "DELETE FROM execution_contexts";

    async fn insert(&self, pool: &SqlitePool) -> Result<SqliteQueryResult, sqlx::Error> {
        sqlx::query(INSERT)
            .bind(self.uid.as_str())
            .bind(self.cpu_frequency)
            .bind(self.cpu_vendor.as_str())
            .bind(self.cpu_count)
            .bind(self.cpu_type.as_str())
            .bind(self.total_ram)
            .bind(self.hostname.as_str())
            .bind(self.machine_type.as_str())
            .bind(self.machine_arch.as_str())
            .bind(self.system_info.as_str())
            .bind(self.python_info.as_str())
            .execute(pool)
            .await
    }

    async fn update(&self, pool: &SqlitePool) -> Result<SqliteQueryResult, sqlx::Error> {
        sqlx::query(UPDATE)
            .bind(self.cpu_frequency)
            .bind(self.cpu_vendor.as_str())
            .bind(self.cpu_count)
            .bind(self.cpu_type.as_str())
            .bind(self.total_ram)
            .bind(self.hostname.as_str())
            .bind(self.machine_type.as_str())
            .bind(self.machine_arch.as_str())
            .bind(self.system_info.as_str())
            .bind(self.python_info.as_str())
            .bind(self.uid.as_str())
            .execute(pool)
            .await
    }
}

/// `SQLite`-backed machine repository.
pub type SqliteMachineRepository = SqliteRepository<MachineRecord>;

impl MachineRepository for SqliteMachineRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use testmon_app::ports::CrudRepository;
    use testmon_domain::error::TestmonError;
    use testmon_domain::machine::{Machine, MachineBuilder};
    use testmon_domain::page::PageSpec;

    async fn setup() -> SqliteMachineRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteMachineRepository::new(db.pool().clone())
    }

    fn builder(uid: &str) -> MachineBuilder {
        Machine::builder()
            .uid(uid)
            .cpu_frequency(2400)
            .cpu_vendor("GenuineIntel")
            .cpu_count(8)
            .cpu_type("x86_64")
            .total_ram(16_384)
            .hostname("ci-runner-01")
            .machine_type("physical")
            .machine_arch("amd64")
            .system_info("Linux 6.1")
            .python_info("3.12.1")
    }

    fn machine(uid: &str) -> Machine {
        builder(uid).build().unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_machine() {
        let repo = setup().await;
        repo.create(machine("m-1")).await.unwrap();

        let fetched = repo.get("m-1").await.unwrap();
        assert_eq!(fetched, machine("m-1"));
    }

    #[tokio::test]
    async fn should_reject_duplicate_uid() {
        let repo = setup().await;
        repo.create(machine("m-1")).await.unwrap();

        let result = repo.create(machine("m-1")).await;
        assert!(matches!(result, Err(TestmonError::AlreadyExists(_))));
        // the first row is unaffected by the failed insert
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_uid() {
        let repo = setup().await;
        let result = repo.get("m-unknown").await;
        assert!(matches!(result, Err(TestmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_update_existing_machine() {
        let repo = setup().await;
        repo.create(machine("m-1")).await.unwrap();

        let updated = builder("m-1").hostname("ci-runner-02").build().unwrap();
        repo.update(updated).await.unwrap();

        assert_eq!(repo.get("m-1").await.unwrap().hostname, "ci-runner-02");
    }

    #[tokio::test]
    async fn should_refuse_update_of_unknown_machine() {
        let repo = setup().await;
        let result = repo.update(machine("m-unknown")).await;
        assert!(matches!(result, Err(TestmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_machine() {
        let repo = setup().await;
        repo.create(machine("m-1")).await.unwrap();

        repo.delete("m-1").await.unwrap();

        assert!(matches!(repo.get("m-1").await, Err(TestmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_unknown_machine() {
        let repo = setup().await;
        let result = repo.delete("m-unknown").await;
        assert!(matches!(result, Err(TestmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_in_ascending_uid_order() {
        let repo = setup().await;
        for uid in ["m-3", "m-1", "m-2"] {
            repo.create(machine(uid)).await.unwrap();
        }

        let page = repo.list(None).await.unwrap();
        let uids: Vec<&str> = page.data.iter().map(|m| m.uid.as_str()).collect();
        assert_eq!(uids, ["m-1", "m-2", "m-3"]);
        assert_eq!(page.page_no, None);
        assert_eq!(page.next_page, None);
    }

    #[tokio::test]
    async fn should_paginate_listing() {
        let repo = setup().await;
        for i in 0..30 {
            repo.create(machine(&format!("m-{i:02}"))).await.unwrap();
        }

        let first = repo.list(Some(PageSpec::new(0, 5).unwrap())).await.unwrap();
        assert_eq!(first.data.len(), 5);
        assert_eq!(first.data[0].uid.as_str(), "m-00");
        assert_eq!(first.next_page, Some(1));

        let last = repo.list(Some(PageSpec::new(5, 5).unwrap())).await.unwrap();
        assert_eq!(last.data[0].uid.as_str(), "m-25");
        assert_eq!(last.next_page, None);

        let past_end = repo.list(Some(PageSpec::new(10, 5).unwrap())).await.unwrap();
        assert!(past_end.data.is_empty());
        assert_eq!(past_end.next_page, None);
    }

    #[tokio::test]
    async fn should_truncate_all_machines() {
        let repo = setup().await;
        repo.create(machine("m-1")).await.unwrap();
        repo.create(machine("m-2")).await.unwrap();

        repo.truncate().await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
