//! In-memory implementation of [`MachineRepository`].

use testmon_app::ports::{CrudRepository, MachineRepository};
use testmon_domain::error::TestmonError;
use testmon_domain::machine::Machine;
use testmon_domain::page::{Page, PageSpec};
use testmon_storage::{MachineRecord, MetricRecord};

use crate::repository::MemoryRepository;
use crate::store::{SharedMap, lock};

/// Machine repository over the shared in-memory store.
pub struct MemoryMachineRepository {
    inner: MemoryRepository<MachineRecord>,
    metrics: SharedMap<MetricRecord>,
}

impl MemoryMachineRepository {
    pub(crate) fn new(machines: SharedMap<MachineRecord>, metrics: SharedMap<MetricRecord>) -> Self {
        Self {
            inner: MemoryRepository::new(machines),
            metrics,
        }
    }
}

impl CrudRepository<Machine> for MemoryMachineRepository {
    async fn create(&self, item: Machine) -> Result<Machine, TestmonError> {
        self.inner.create(item).await
    }

    async fn update(&self, item: Machine) -> Result<Machine, TestmonError> {
        self.inner.update(item).await
    }

    async fn get(&self, uid: &str) -> Result<Machine, TestmonError> {
        self.inner.get(uid).await
    }

    async fn delete(&self, uid: &str) -> Result<(), TestmonError> {
        self.inner.delete(uid).await?;
        // emulate ON DELETE CASCADE on the metric table
        lock(&self.metrics).retain(|_, record| record.xid != uid);
        Ok(())
    }

    async fn list(&self, page: Option<PageSpec>) -> Result<Page<Machine>, TestmonError> {
        self.inner.list(page).await
    }

    async fn count(&self) -> Result<usize, TestmonError> {
        self.inner.count().await
    }

    async fn truncate(&self) -> Result<(), TestmonError> {
        self.inner.truncate().await
    }
}

impl MachineRepository for MemoryMachineRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use testmon_domain::error::ValidationError;
    use testmon_domain::machine::MachineBuilder;

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
        let repo = MemoryStore::new().machine_repository();
        repo.create(machine("m-1")).await.unwrap();

        let fetched = repo.get("m-1").await.unwrap();
        assert_eq!(fetched, machine("m-1"));
    }

    #[tokio::test]
    async fn should_reject_duplicate_uid() {
        let repo = MemoryStore::new().machine_repository();
        repo.create(machine("m-1")).await.unwrap();

        let result = repo.create(machine("m-1")).await;
        assert!(matches!(result, Err(TestmonError::AlreadyExists(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_uid() {
        let repo = MemoryStore::new().machine_repository();
        let result = repo.get("m-unknown").await;
        assert!(matches!(result, Err(TestmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_update_existing_machine() {
        let repo = MemoryStore::new().machine_repository();
        repo.create(machine("m-1")).await.unwrap();

        let updated = builder("m-1").hostname("ci-runner-02").build().unwrap();
        repo.update(updated.clone()).await.unwrap();

        assert_eq!(repo.get("m-1").await.unwrap().hostname, "ci-runner-02");
    }

    #[tokio::test]
    async fn should_refuse_update_of_unknown_machine() {
        let repo = MemoryStore::new().machine_repository();
        let result = repo.update(machine("m-unknown")).await;
        assert!(matches!(result, Err(TestmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_delete_machine() {
        let repo = MemoryStore::new().machine_repository();
        repo.create(machine("m-1")).await.unwrap();

        repo.delete("m-1").await.unwrap();

        assert!(matches!(repo.get("m-1").await, Err(TestmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_unknown_machine() {
        let repo = MemoryStore::new().machine_repository();
        let result = repo.delete("m-unknown").await;
        assert!(matches!(result, Err(TestmonError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_in_ascending_uid_order() {
        let repo = MemoryStore::new().machine_repository();
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
        let repo = MemoryStore::new().machine_repository();
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
        let repo = MemoryStore::new().machine_repository();
        repo.create(machine("m-1")).await.unwrap();
        repo.create(machine("m-2")).await.unwrap();

        repo.truncate().await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn should_propagate_builder_validation() {
        let result = builder("m-1").cpu_count(0).build();
        assert!(matches!(
            result,
            Err(TestmonError::Validation(ValidationError::ZeroCpuCount))
        ));
    }
}
