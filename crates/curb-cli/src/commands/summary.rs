//! Daily usage summary from the ledger

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::path::Path;
use tabled::{Table, Tabled};

use super::helpers::{format_duration, load_config, open_database};

#[derive(Tabled)]
struct UsageRow {
    #[tabled(rename = "Application")]
    application: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Hours")]
    hours: String,
}

/// `None` means today
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .context("Invalid date format. Use YYYY-MM-DD"),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn handle_summary(config_path: Option<&Path>, date: Option<&str>) -> Result<()> {
    let date = parse_date(date)?;
    let config = load_config(config_path)?;
    let db = open_database(&config)?;

    let summary = db.daily_summary_on(date)?;
    if summary.is_empty() {
        println!("No usage recorded for {date}");
        return Ok(());
    }

    let total: u64 = summary.iter().map(|item| item.total_seconds).sum();
    let rows: Vec<UsageRow> = summary
        .iter()
        .map(|item| UsageRow {
            application: item.process_name.clone(),
            time: format_duration(item.total_seconds),
            hours: format!("{:.2}", item.hours()),
        })
        .collect();

    println!("\nPC usage for {date}");
    println!("{}", Table::new(rows));
    println!("\nTotal: {}", format_duration(total));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_date() {
        let date = parse_date(Some(" 2024-01-15 ")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_defaults_to_today() {
        assert_eq!(parse_date(None).unwrap(), Local::now().date_naive());
    }

    #[test]
    fn test_parse_rejects_other_formats() {
        assert!(parse_date(Some("15/01/2024")).is_err());
        assert!(parse_date(Some("2024-13-01")).is_err());
    }
}
