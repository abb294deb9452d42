use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::params;

use super::helpers::{date_key, seconds_from_sum};
use super::Database;
use crate::models::{UsageAggregate, UsageEntry};
use crate::names::normalize_process_name;

impl Database {
    /// Append one usage entry
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert operation fails
    pub fn record(&self, entry: &UsageEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO usage_log (date, process_name, window_title, duration_sec, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                date_key(entry.date),
                entry.process_name,
                entry.window_title,
                entry.duration_seconds,
                entry.recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Total seconds recorded for a process on one calendar day (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn total_seconds_on(&self, process_name: &str, date: NaiveDate) -> Result<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(duration_sec), 0) FROM usage_log
             WHERE date = ?1 AND LOWER(process_name) = ?2",
            params![date_key(date), normalize_process_name(process_name)],
            |row| row.get(0),
        )?;
        Ok(seconds_from_sum(total))
    }

    /// Total seconds recorded for a process today
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn total_seconds_today(&self, process_name: &str) -> Result<u64> {
        self.total_seconds_on(process_name, Local::now().date_naive())
    }

    /// Per-application totals for one day, largest first
    ///
    /// Names differing only in case are folded into one row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn daily_summary_on(&self, date: NaiveDate) -> Result<Vec<UsageAggregate>> {
        let mut stmt = self.conn.prepare(
            "SELECT MIN(process_name), SUM(duration_sec) AS total
             FROM usage_log
             WHERE date = ?1
             GROUP BY LOWER(process_name)
             ORDER BY total DESC, LOWER(process_name) ASC",
        )?;

        let summary = stmt
            .query_map(params![date_key(date)], |row| {
                Ok(UsageAggregate {
                    process_name: row.get(0)?,
                    total_seconds: seconds_from_sum(row.get(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summary)
    }

    /// Per-application totals for today
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn daily_summary(&self) -> Result<Vec<UsageAggregate>> {
        self.daily_summary_on(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 4, day, hour, minute, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    #[test]
    fn test_record_then_total_sums_exactly() {
        let db = Database::open_in_memory().unwrap();
        db.record(&UsageEntry::new("app.exe", "a", 5, at(10, 9, 0)))
            .unwrap();
        db.record(&UsageEntry::new("app.exe", "b", 7, at(10, 9, 1)))
            .unwrap();
        db.record(&UsageEntry::new("other.exe", "", 100, at(10, 9, 2)))
            .unwrap();

        assert_eq!(db.total_seconds_on("app.exe", day(10)).unwrap(), 12);
    }

    #[test]
    fn test_total_is_case_insensitive() {
        let db = Database::open_in_memory().unwrap();
        db.record(&UsageEntry::new("Chrome.exe", "", 30, at(10, 12, 0)))
            .unwrap();
        db.record(&UsageEntry::new("CHROME.EXE", "", 15, at(10, 12, 5)))
            .unwrap();

        assert_eq!(db.total_seconds_on("chrome.exe", day(10)).unwrap(), 45);
        assert_eq!(db.total_seconds_on(" chrome.EXE ", day(10)).unwrap(), 45);
    }

    #[test]
    fn test_previous_day_does_not_leak() {
        let db = Database::open_in_memory().unwrap();
        db.record(&UsageEntry::new("app.exe", "", 3600, at(10, 23, 59)))
            .unwrap();
        db.record(&UsageEntry::new("app.exe", "", 5, at(11, 0, 0)))
            .unwrap();

        assert_eq!(db.total_seconds_on("app.exe", day(10)).unwrap(), 3600);
        assert_eq!(db.total_seconds_on("app.exe", day(11)).unwrap(), 5);
    }

    #[test]
    fn test_unknown_process_is_zero() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.total_seconds_on("nothing.exe", day(10)).unwrap(), 0);
    }

    #[test]
    fn test_daily_summary_groups_and_orders() {
        let db = Database::open_in_memory().unwrap();
        db.record(&UsageEntry::new("code.exe", "", 60, at(10, 8, 0)))
            .unwrap();
        db.record(&UsageEntry::new("Steam.exe", "", 100, at(10, 8, 1)))
            .unwrap();
        db.record(&UsageEntry::new("steam.exe", "", 100, at(10, 8, 2)))
            .unwrap();
        db.record(&UsageEntry::new("vlc.exe", "", 500, at(9, 8, 0)))
            .unwrap();

        let summary = db.daily_summary_on(day(10)).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].process_name.to_lowercase(), "steam.exe");
        assert_eq!(summary[0].total_seconds, 200);
        assert_eq!(summary[1].process_name, "code.exe");
        assert_eq!(summary[1].total_seconds, 60);
    }

    #[test]
    fn test_daily_summary_empty_day() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.daily_summary_on(day(1)).unwrap().is_empty());
    }

    #[test]
    fn test_reopen_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("usage_log.db");

        {
            let db = Database::new(Some(path.clone())).unwrap();
            db.record(&UsageEntry::new("app.exe", "", 42, at(10, 10, 0)))
                .unwrap();
        }

        let reopened = Database::new(Some(path)).unwrap();
        assert_eq!(reopened.total_seconds_on("app.exe", day(10)).unwrap(), 42);
    }

    #[test]
    fn test_today_queries_see_entries_recorded_now() {
        let db = Database::open_in_memory().unwrap();
        let now = Local::now();
        db.record(&UsageEntry::new("Game.exe", "g", 30, now)).unwrap();
        db.record(&UsageEntry::new("game.EXE", "g", 15, now)).unwrap();
        db.record(&UsageEntry::new("code.exe", "c", 5, now)).unwrap();

        assert_eq!(db.total_seconds_today("GAME.exe").unwrap(), 45);
        assert_eq!(db.total_seconds_today("missing.exe").unwrap(), 0);

        let summary = db.daily_summary().unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].total_seconds, 45);
        assert!(summary[0].process_name.eq_ignore_ascii_case("game.exe"));
        assert_eq!(summary[1].process_name, "code.exe");
        assert_eq!(summary[1].total_seconds, 5);
    }
}
