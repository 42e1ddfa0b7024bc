//! Metric — resource measurements for a single test execution.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::Timestamp;

/// Tolerance applied when comparing measured float fields. Measurements
/// come from wall clocks and sampled counters, so exact comparison is
/// meaningless.
pub const FLOAT_TOLERANCE: f64 = 1e-5;

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() < FLOAT_TOLERANCE
}

/// Measurements reported for one executed test item.
///
/// Immutable once created; removed only through truncation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    pub uid: Uuid,
    /// Reference to the owning [`MonitorSession`](crate::session::MonitorSession).
    pub session_id: String,
    /// Reference to the [`Machine`](crate::machine::Machine) that ran the item.
    pub node_id: String,
    pub item_start_time: Timestamp,
    pub item_path: String,
    pub item: String,
    pub variant: String,
    pub item_path_fs: PathBuf,
    pub item_type: String,
    pub component: String,
    pub wall_time: f64,
    pub user_time: f64,
    pub kernel_time: f64,
    pub memory_usage: f64,
    pub cpu_usage: f64,
}

impl Metric {
    /// Create a builder for constructing a [`Metric`].
    #[must_use]
    pub fn builder() -> MetricBuilder {
        MetricBuilder::default()
    }

    /// Canonical lowercase-hex identity, as used by the storage layer.
    #[must_use]
    pub fn uid_str(&self) -> String {
        self.uid.as_simple().to_string()
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
            && self.session_id == other.session_id
            && self.node_id == other.node_id
            && self.item_start_time == other.item_start_time
            && self.item_path == other.item_path
            && self.item == other.item
            && self.variant == other.variant
            && self.item_path_fs == other.item_path_fs
            && self.item_type == other.item_type
            && self.component == other.component
            && close_enough(self.wall_time, other.wall_time)
            && close_enough(self.user_time, other.user_time)
            && close_enough(self.kernel_time, other.kernel_time)
            && close_enough(self.memory_usage, other.memory_usage)
            && close_enough(self.cpu_usage, other.cpu_usage)
    }
}

/// Step-by-step builder for [`Metric`].
#[derive(Debug, Default)]
pub struct MetricBuilder {
    uid: Option<Uuid>,
    session_id: String,
    node_id: String,
    item_start_time: Option<Timestamp>,
    item_path: String,
    item: String,
    variant: String,
    item_path_fs: PathBuf,
    item_type: String,
    component: String,
    wall_time: f64,
    user_time: f64,
    kernel_time: f64,
    memory_usage: f64,
    cpu_usage: f64,
}

impl MetricBuilder {
    #[must_use]
    pub fn uid(mut self, uid: Uuid) -> Self {
        self.uid = Some(uid);
        self
    }

    #[must_use]
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    #[must_use]
    pub fn node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = node_id.into();
        self
    }

    #[must_use]
    pub fn item_start_time(mut self, item_start_time: Timestamp) -> Self {
        self.item_start_time = Some(item_start_time);
        self
    }

    #[must_use]
    pub fn item_path(mut self, item_path: impl Into<String>) -> Self {
        self.item_path = item_path.into();
        self
    }

    #[must_use]
    pub fn item(mut self, item: impl Into<String>) -> Self {
        self.item = item.into();
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    #[must_use]
    pub fn item_path_fs(mut self, item_path_fs: impl Into<PathBuf>) -> Self {
        self.item_path_fs = item_path_fs.into();
        self
    }

    #[must_use]
    pub fn item_type(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = item_type.into();
        self
    }

    #[must_use]
    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    #[must_use]
    pub fn wall_time(mut self, wall_time: f64) -> Self {
        self.wall_time = wall_time;
        self
    }

    #[must_use]
    pub fn user_time(mut self, user_time: f64) -> Self {
        self.user_time = user_time;
        self
    }

    #[must_use]
    pub fn kernel_time(mut self, kernel_time: f64) -> Self {
        self.kernel_time = kernel_time;
        self
    }

    #[must_use]
    pub fn memory_usage(mut self, memory_usage: f64) -> Self {
        self.memory_usage = memory_usage;
        self
    }

    #[must_use]
    pub fn cpu_usage(mut self, cpu_usage: f64) -> Self {
        self.cpu_usage = cpu_usage;
        self
    }

    /// Consume the builder and return a [`Metric`], generating a fresh
    /// uid when none was supplied.
    #[must_use]
    pub fn build(self) -> Metric {
        Metric {
            uid: self.uid.unwrap_or_else(Uuid::new_v4),
            session_id: self.session_id,
            node_id: self.node_id,
            item_start_time: self.item_start_time.unwrap_or_else(crate::time::now),
            item_path: self.item_path,
            item: self.item,
            variant: self.variant,
            item_path_fs: self.item_path_fs,
            item_type: self.item_type,
            component: self.component,
            wall_time: self.wall_time,
            user_time: self.user_time,
            kernel_time: self.kernel_time,
            memory_usage: self.memory_usage,
            cpu_usage: self.cpu_usage,
        }
    }
}
