//! One-shot policy evaluation against live data.
//!
//! Nothing is recorded, terminated or shown.

use anyhow::Result;
use chrono::Local;
use curb_core::monitor::is_protected;
use curb_core::{ForegroundUsage, PolicyEngine, ProcessInspector, WindowsInspector};
use std::path::Path;

use super::helpers::{format_duration, load_config, open_database};

pub async fn handle_check(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let db = open_database(&config)?;
    let inspector = WindowsInspector::new(&config.inspector);
    let engine = PolicyEngine::new(config.policy);
    let now = Local::now();

    let running = inspector.list_processes().await;
    let usage = match inspector.current_foreground().await {
        Some(sample) => Some(ForegroundUsage {
            seconds_today: db.total_seconds_on(&sample.process_name, now.date_naive())?,
            process_name: sample.process_name,
        }),
        None => None,
    };

    println!("Time:        {}", now.format("%Y-%m-%d %H:%M:%S"));
    println!("Processes:   {}", running.len());
    match &usage {
        Some(u) => println!(
            "Foreground:  {} ({} today)",
            u.process_name,
            format_duration(u.seconds_today)
        ),
        None => println!("Foreground:  (none)"),
    }
    println!(
        "Curfew:      {}",
        if engine.is_curfew(now.time()) { "active" } else { "inactive" }
    );

    match engine.evaluate(now, None, &running, usage.as_ref()) {
        Some(violation) => {
            println!("\nVIOLATION ({}): {violation}", violation.kind());
            if let Some(name) = violation.process_to_terminate() {
                if is_protected(name) {
                    println!("{name} is protected and would not be terminated");
                } else {
                    println!("{name} would be terminated");
                }
            }
        }
        None => println!("\nNo violation"),
    }

    Ok(())
}
