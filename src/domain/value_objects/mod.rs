pub mod category;
pub mod severity;
pub mod transition;

pub use category::TargetCategory;
pub use severity::Severity;
pub use transition::Transition;
