//! Generic in-memory CRUD repository over one record table.

use testmon_app::ports::CrudRepository;
use testmon_domain::error::{AlreadyExistsError, NotFoundError, TestmonError};
use testmon_domain::page::{Page, PageSpec};
use testmon_storage::{MapError, Record};

use crate::store::{SharedMap, lock};

/// Shared CRUD logic for all three tables. Entity-specific behavior
/// (referential checks, cascade deletes) is layered on top by the
/// concrete repositories.
pub(crate) struct MemoryRepository<R> {
    data: SharedMap<R>,
}

impl<R: Record> MemoryRepository<R> {
    pub(crate) fn new(data: SharedMap<R>) -> Self {
        Self { data }
    }

    fn not_found(uid: &str) -> TestmonError {
        NotFoundError {
            kind: R::KIND,
            uid: uid.to_string(),
        }
        .into()
    }
}

impl<R: Record> CrudRepository<R::Domain> for MemoryRepository<R> {
    async fn create(&self, item: R::Domain) -> Result<R::Domain, TestmonError> {
        let record = R::from_domain(&item)?;
        let mut data = lock(&self.data);
        if data.contains_key(record.uid()) {
            return Err(AlreadyExistsError {
                kind: R::KIND,
                uid: record.uid().to_string(),
            }
            .into());
        }
        data.insert(record.uid().to_string(), record);
        Ok(item)
    }

    async fn update(&self, item: R::Domain) -> Result<R::Domain, TestmonError> {
        let record = R::from_domain(&item)?;
        let mut data = lock(&self.data);
        if !data.contains_key(record.uid()) {
            return Err(Self::not_found(record.uid()));
        }
        data.insert(record.uid().to_string(), record);
        Ok(item)
    }

    async fn get(&self, uid: &str) -> Result<R::Domain, TestmonError> {
        let record = lock(&self.data)
            .get(uid)
            .cloned()
            .ok_or_else(|| Self::not_found(uid))?;
        Ok(record.into_domain()?)
    }

    async fn delete(&self, uid: &str) -> Result<(), TestmonError> {
        lock(&self.data)
            .remove(uid)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(uid))
    }

    async fn list(&self, page: Option<PageSpec>) -> Result<Page<R::Domain>, TestmonError> {
        let data = lock(&self.data);
        match page {
            None => {
                let all = data
                    .values()
                    .map(|record| record.clone().into_domain())
                    .collect::<Result<Vec<_>, MapError>>()?;
                Ok(Page::complete(all))
            }
            Some(spec) => {
                let total = data.len();
                let slice = data
                    .values()
                    .skip(spec.offset())
                    .take(spec.page_size())
                    .map(|record| record.clone().into_domain())
                    .collect::<Result<Vec<_>, MapError>>()?;
                Ok(Page::paginated(slice, spec, total))
            }
        }
    }

    async fn count(&self) -> Result<usize, TestmonError> {
        Ok(lock(&self.data).len())
    }

    async fn truncate(&self) -> Result<(), TestmonError> {
        lock(&self.data).clear();
        Ok(())
    }
}
