//! Application services composing the repository ports.

pub mod monitoring;

pub use monitoring::MonitoringMetricsService;
