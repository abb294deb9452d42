use anyhow::Result;
use rusqlite::Connection;

/// Initialize database schema
///
/// Safe to run against an existing store: every statement is `IF NOT EXISTS`,
/// so reopening never touches recorded rows.
///
/// # Errors
///
/// Returns an error if table or index creation fails
pub fn init_schema(conn: &Connection) -> Result<()> {
    // Usage log - append-only focus time facts
    conn.execute(
        "CREATE TABLE IF NOT EXISTS usage_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            process_name TEXT NOT NULL,
            window_title TEXT DEFAULT '',
            duration_sec INTEGER NOT NULL,
            recorded_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_usage_date_process
         ON usage_log(date, process_name)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_twice() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO usage_log (date, process_name, duration_sec, recorded_at)
             VALUES ('2024-01-01', 'a.exe', 5, '2024-01-01T10:00:00+00:00')",
            [],
        )
        .unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM usage_log", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
