//! Pure decision logic: no I/O, no clocks beyond what callers pass in.

pub mod alerts;
pub mod classification;
pub mod console;

pub use alerts::{TargetSource, transition_alert};
pub use classification::TargetClassifier;
pub use console::{FAILURE_KEYWORDS, assess_console_output};
