pub mod alert;
pub mod health;
pub mod report;
pub mod service;
pub mod status;

pub use alert::Alert;
pub use health::{HealthResult, ProbeDetail, ProbeOutcome};
pub use report::{StatusReport, StatusSummary};
pub use service::{ONLINE_STATUS, ServiceInfo};
pub use status::{MAX_ALERTS, StatusStore};
