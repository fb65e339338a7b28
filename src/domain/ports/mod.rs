pub mod notifier;
pub mod probe;
pub mod store;

pub use notifier::{ChannelConfigError, NotificationChannel, NotificationError};
pub use probe::{ConsoleProbe, ProbeError, RpcProbe, SupervisorProbe};
pub use store::{StatusRepository, StoreError};
