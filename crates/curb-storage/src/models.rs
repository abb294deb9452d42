use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// One immutable usage fact: `duration_seconds` of focus on `process_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub date: NaiveDate,
    pub process_name: String,
    pub window_title: String,
    pub duration_seconds: u32,
    pub recorded_at: DateTime<Local>,
}

impl UsageEntry {
    /// Build an entry whose calendar date is taken from `recorded_at`.
    #[must_use]
    pub fn new(
        process_name: &str,
        window_title: &str,
        duration_seconds: u32,
        recorded_at: DateTime<Local>,
    ) -> Self {
        Self {
            date: recorded_at.date_naive(),
            process_name: process_name.trim().to_string(),
            window_title: window_title.to_string(),
            duration_seconds,
            recorded_at,
        }
    }
}

/// Whole hours and remaining whole minutes of `seconds`.
#[must_use]
pub const fn hours_minutes(seconds: u64) -> (u64, u64) {
    (seconds / 3600, (seconds % 3600) / 60)
}

/// Total focus time of one application over one day. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageAggregate {
    pub process_name: String,
    pub total_seconds: u64,
}

impl UsageAggregate {
    /// Whole hours and remaining minutes.
    #[must_use]
    pub const fn hours_minutes(&self) -> (u64, u64) {
        hours_minutes(self.total_seconds)
    }

    /// Hours rounded to two decimals.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hours(&self) -> f64 {
        (self.total_seconds as f64 / 3600.0 * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_date_follows_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 5, 3, 23, 59, 0).unwrap();
        let entry = UsageEntry::new(" app.exe ", "title", 5, at);
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        assert_eq!(entry.process_name, "app.exe");
    }

    #[test]
    fn test_hours_minutes_truncates() {
        assert_eq!(hours_minutes(0), (0, 0));
        assert_eq!(hours_minutes(3599), (0, 59));
        assert_eq!(hours_minutes(7300), (2, 1));
    }

    #[test]
    fn test_aggregate_hours_minutes() {
        let agg = UsageAggregate {
            process_name: "app.exe".to_string(),
            total_seconds: 7300,
        };
        assert_eq!(agg.hours_minutes(), (2, 1));
        assert!((agg.hours() - 2.03).abs() < f64::EPSILON);
    }
}
