mod commands;
mod surface;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use commands::config::ConfigAction;

#[derive(Parser)]
#[command(name = "curb")]
#[command(about = "Screen-time limiter: curfew, blacklist and daily caps", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the per-user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the monitor until Ctrl-C
    Run {
        /// Append log output to this file instead of stderr
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Show a day's usage per application
    Summary {
        /// Date to show (YYYY-MM-DD format, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List running processes
    Processes,
    /// Show the current foreground application
    Foreground,
    /// Evaluate the policy once without acting on the result
    Check,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Run {
            log_file: Some(path),
        } => setup_file_logging(path)?,
        _ => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp_secs()
            .init(),
    }

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run { .. } => commands::run::run_monitor(config_path).await,
        Commands::Summary { date } => {
            commands::summary::handle_summary(config_path, date.as_deref())
        }
        Commands::Processes => commands::processes::handle_processes(config_path).await,
        Commands::Foreground => commands::processes::handle_foreground(config_path).await,
        Commands::Check => commands::check::handle_check(config_path).await,
        Commands::Config { action } => {
            commands::config::handle_config_command(config_path, action)
        }
    }
}

fn setup_file_logging(log_path: &Path) -> Result<()> {
    use std::fs::{create_dir_all, OpenOptions};

    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .format_timestamp_secs()
        .init();

    Ok(())
}
