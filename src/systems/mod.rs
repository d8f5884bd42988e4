//! Single-context systems driven by the controller

pub mod history;
pub mod validation;

pub use history::{HistoryLimits, SnapshotHistory};
pub use validation::{parse_command, CommandError};
