//! Foreground monitor: wires the real adapters into the daemon

use anyhow::Result;
use curb_ai::{AiConfig, MessageGenerator, ScoldingService};
use curb_core::{dismissal_channel, Daemon, WindowsInspector};
use std::path::Path;
use std::time::Duration;

use super::helpers::{load_config, open_database};
use crate::surface::ConsoleSurface;

pub async fn run_monitor(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let db = open_database(&config)?;
    let inspector = WindowsInspector::new(&config.inspector);
    let generator = build_generator(&config.ai).await;
    let message_timeout = Duration::from_secs(config.ai.timeout_seconds.max(1));

    let (dismiss_tx, dismiss_rx) = dismissal_channel();
    let surface = ConsoleSurface::new(config.presentation.countdown_seconds, dismiss_tx);

    log::info!("Starting curb monitor...");
    let mut daemon = Daemon::new(
        config.policy,
        Box::new(inspector),
        Box::new(db),
        generator,
        Box::new(surface),
    )
    .with_message_timeout(message_timeout);
    daemon.run(dismiss_rx).await;

    Ok(())
}

/// The configured message generator, or `None` to use fallback messages only
async fn build_generator(config: &AiConfig) -> Option<Box<dyn MessageGenerator>> {
    if !config.enabled {
        log::info!("Message generation disabled, using built-in messages");
        return None;
    }

    let service = match ScoldingService::new(config) {
        Ok(service) => service,
        Err(e) => {
            log::warn!("Failed to set up message generator, using built-in messages: {e:#}");
            return None;
        }
    };

    if !service.is_available().await {
        log::warn!(
            "{} provider at {} is not reachable yet; built-in messages will be used until it is",
            config.provider,
            config.effective_base_url()
        );
    }

    Some(Box::new(service))
}
