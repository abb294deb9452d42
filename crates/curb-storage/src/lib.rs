pub mod db;
pub mod migrations;
pub mod models;
pub mod names;

pub use db::Database;
pub use models::{hours_minutes, UsageAggregate, UsageEntry};
pub use names::normalize_process_name;
