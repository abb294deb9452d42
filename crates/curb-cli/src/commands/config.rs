/// Configuration management command handlers
use anyhow::Result;
use clap::Subcommand;
use curb_core::config::default_config_path;
use curb_core::CurbConfig;
use std::path::{Path, PathBuf};

use super::helpers::load_config;

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

pub fn handle_config_command(config_path: Option<&Path>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Init { force } => {
            let path = resolve_path(config_path)?;
            CurbConfig::write_default(&path, force)?;
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigAction::Path => {
            let path = resolve_path(config_path)?;
            let state = if path.exists() { "" } else { " (not created yet)" };
            println!("{}{state}", path.display());
        }
    }
    Ok(())
}
