//! Storage record for test metrics.

use testmon_domain::error::EntityKind;
use testmon_domain::metric::Metric;

use crate::record::{MapError, Record, path_to_posix, posix_to_path};

/// Row shape of the `test_metrics` table.
///
/// `sid` and `xid` are foreign references to the owning session and
/// execution context; `item_fs_loc` holds the POSIX-normalized
/// filesystem location.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub uid: String,
    pub sid: String,
    pub xid: String,
    pub item_start_time: String,
    pub item_path: String,
    pub item: String,
    pub variant: String,
    pub item_fs_loc: String,
    pub kind: String,
    pub component: String,
    pub wall_time: f64,
    pub user_time: f64,
    pub kernel_time: f64,
    pub cpu_usage: f64,
    pub mem_usage: f64,
}

impl Record for MetricRecord {
    type Domain = Metric;

    const KIND: EntityKind = EntityKind::Metric;

    fn uid(&self) -> &str {
        &self.uid
    }

    fn from_domain(domain: &Metric) -> Result<Self, MapError> {
        Ok(Self {
            uid: domain.uid_str(),
            sid: domain.session_id.clone(),
            xid: domain.node_id.clone(),
            item_start_time: domain.item_start_time.to_rfc3339(),
            item_path: domain.item_path.clone(),
            item: domain.item.clone(),
            variant: domain.variant.clone(),
            item_fs_loc: path_to_posix(&domain.item_path_fs),
            kind: domain.item_type.clone(),
            component: domain.component.clone(),
            wall_time: domain.wall_time,
            user_time: domain.user_time,
            kernel_time: domain.kernel_time,
            cpu_usage: domain.cpu_usage,
            mem_usage: domain.memory_usage,
        })
    }

    fn into_domain(self) -> Result<Metric, MapError> {
        let uid = uuid::Uuid::parse_str(&self.uid)?;
        let item_start_time = chrono::DateTime::parse_from_rfc3339(&self.item_start_time)?.to_utc();
        Ok(Metric {
            uid,
            session_id: self.sid,
            node_id: self.xid,
            item_start_time,
            item_path: self.item_path,
            item: self.item,
            variant: self.variant,
            item_path_fs: posix_to_path(&self.item_fs_loc),
            item_type: self.kind,
            component: self.component,
            wall_time: self.wall_time,
            user_time: self.user_time,
            kernel_time: self.kernel_time,
            memory_usage: self.mem_usage,
            cpu_usage: self.cpu_usage,
        })
    }
}
