//! Live views of the process inspector

use anyhow::Result;
use curb_core::monitor::is_protected;
use curb_core::{ProcessInspector, WindowsInspector};
use curb_storage::names::same_process;
use std::path::Path;
use tabled::{Table, Tabled};

use super::helpers::{load_config, truncate_str};

#[derive(Tabled)]
struct ProcessRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "PID")]
    pid: u32,
    #[tabled(rename = "Session")]
    session: String,
    #[tabled(rename = "Memory (KB)")]
    memory_kb: u64,
    #[tabled(rename = "Note")]
    note: &'static str,
}

fn note_for(name: &str, blacklist: &[String]) -> &'static str {
    if is_protected(name) {
        "protected"
    } else if blacklist.iter().any(|entry| same_process(entry, name)) {
        "blacklisted"
    } else {
        ""
    }
}

pub async fn handle_processes(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let inspector = WindowsInspector::new(&config.inspector);

    let mut processes = inspector.list_processes().await;
    if processes.is_empty() {
        println!("No processes listed (is tasklist.exe reachable?)");
        return Ok(());
    }
    processes.sort_by_key(|p| std::cmp::Reverse(p.mem_usage_kb));

    let rows: Vec<ProcessRow> = processes
        .into_iter()
        .map(|p| ProcessRow {
            note: note_for(&p.name, &config.policy.blacklist),
            session: format!("{} ({})", p.session_name, p.session_num),
            name: p.name,
            pid: p.pid,
            memory_kb: p.mem_usage_kb,
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}

pub async fn handle_foreground(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let inspector = WindowsInspector::new(&config.inspector);

    match inspector.current_foreground().await {
        Some(sample) => {
            println!("Process: {}", sample.process_name);
            println!("PID:     {}", sample.pid);
            println!("Window:  {}", truncate_str(&sample.window_title, 80));
        }
        None => println!("No foreground application detected"),
    }
    Ok(())
}
