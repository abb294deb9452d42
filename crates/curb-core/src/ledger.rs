use anyhow::Result;
use chrono::NaiveDate;
use curb_storage::{Database, UsageAggregate, UsageEntry};

/// Durable per-day usage store as seen by the daemon
pub trait UsageLedger: Send {
    /// Append one immutable usage entry
    fn record(&self, entry: &UsageEntry) -> Result<()>;

    /// Seconds recorded for `process_name` on `date`, case-insensitive
    fn total_seconds_on(&self, process_name: &str, date: NaiveDate) -> Result<u64>;

    /// Per-application totals for `date`, largest first
    fn daily_summary_on(&self, date: NaiveDate) -> Result<Vec<UsageAggregate>>;
}

impl UsageLedger for Database {
    fn record(&self, entry: &UsageEntry) -> Result<()> {
        Database::record(self, entry)
    }

    fn total_seconds_on(&self, process_name: &str, date: NaiveDate) -> Result<u64> {
        Database::total_seconds_on(self, process_name, date)
    }

    fn daily_summary_on(&self, date: NaiveDate) -> Result<Vec<UsageAggregate>> {
        Database::daily_summary_on(self, date)
    }
}
