//! Helper utility functions for CLI commands

use anyhow::{Context, Result};
use curb_core::CurbConfig;
use curb_storage::{hours_minutes, Database};
use std::path::Path;

/// Safely truncate a string to a maximum number of characters (not bytes).
/// This avoids panics when slicing multi-byte UTF-8 characters.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// `7300` -> `"2h 1m"`
pub fn format_duration(seconds: u64) -> String {
    let (hours, minutes) = hours_minutes(seconds);
    format!("{hours}h {minutes}m")
}

pub fn load_config(path: Option<&Path>) -> Result<CurbConfig> {
    CurbConfig::load(path).context("Failed to load configuration")
}

/// Open the usage ledger named by the config, or the default one
pub fn open_database(config: &CurbConfig) -> Result<Database> {
    Database::new(config.storage.database_path.clone()).context("Failed to open usage database")
}
