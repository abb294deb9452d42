//! Database helper functions for the text encodings stored in `usage_log`.

use chrono::NaiveDate;

/// Calendar-day key stored in the `date` column.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Convert a SQLite `SUM()` result into seconds, treating negatives as zero.
pub fn seconds_from_sum(total: i64) -> u64 {
    u64::try_from(total).unwrap_or(0)
}
