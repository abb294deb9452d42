//! Intervention coordinator.
//!
//! One task drives [`Daemon::tick_at`] on a fixed cadence. The daemon is
//! either monitoring (sample, record, evaluate) or intervening (a block is
//! on screen and ticks do nothing until the surface reports dismissal).


use chrono::{DateTime, Local, NaiveDate};
use curb_ai::{FallbackMessages, MessageGenerator};
use curb_storage::UsageEntry;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::config::PolicyConfig;
use crate::ledger::UsageLedger;
use crate::monitor::{ForegroundSample, ProcessInspector};
use crate::policy::{ForegroundUsage, PolicyEngine, Violation};
use crate::presentation::{DismissalReceiver, PresentationSurface};
use crate::report::format_usage_summary;

/// Longest wait for a generated message before the fallback is used
pub const DEFAULT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Monitoring,
    Intervening,
}

/// Transient poll state: current mode and when the last block started
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterventionState {
    mode: Mode,
    last_intervention: Option<DateTime<Local>>,
}

impl InterventionState {
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn is_intervening(&self) -> bool {
        self.mode == Mode::Intervening
    }

    #[must_use]
    pub const fn last_intervention(&self) -> Option<DateTime<Local>> {
        self.last_intervention
    }

    fn begin(&mut self, now: DateTime<Local>) {
        self.mode = Mode::Intervening;
        self.last_intervention = Some(now);
    }

    fn resume(&mut self) {
        self.mode = Mode::Monitoring;
    }
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A block is on screen; nothing was sampled
    Suppressed,
    /// Usage recorded, evaluation skipped because of the cooldown
    CoolingDown,
    /// Usage recorded, no violation
    Clear,
    /// A violation started an intervention
    Intervened(Violation),
}

pub struct Daemon {
    inspector: Box<dyn ProcessInspector>,
    ledger: Box<dyn UsageLedger>,
    generator: Option<Box<dyn MessageGenerator>>,
    surface: Box<dyn PresentationSurface>,
    policy: PolicyEngine,
    fallback: FallbackMessages,
    message_timeout: Duration,
    state: InterventionState,
}

impl Daemon {
    /// Wire the daemon to its collaborators.
    ///
    /// Without a `generator` every intervention uses the built-in fallback
    /// messages.
    #[must_use]
    pub fn new(
        policy: PolicyConfig,
        inspector: Box<dyn ProcessInspector>,
        ledger: Box<dyn UsageLedger>,
        generator: Option<Box<dyn MessageGenerator>>,
        surface: Box<dyn PresentationSurface>,
    ) -> Self {
        log::info!("Blacklist: {:?}", policy.blacklist);
        log::info!(
            "Curfew: {} - {} (blocks all: {})",
            policy.curfew_start.format("%H:%M"),
            policy.curfew_end.format("%H:%M"),
            policy.curfew_blocks_all
        );
        log::info!("Max usage per app: {} seconds", policy.max_usage_seconds);

        Self {
            inspector,
            ledger,
            generator,
            surface,
            policy: PolicyEngine::new(policy),
            fallback: FallbackMessages::new(),
            message_timeout: DEFAULT_MESSAGE_TIMEOUT,
            state: InterventionState::default(),
        }
    }

    /// Cap the wait for the message generator
    #[must_use]
    pub fn with_message_timeout(mut self, limit: Duration) -> Self {
        self.message_timeout = limit;
        self
    }

    #[must_use]
    pub const fn state(&self) -> &InterventionState {
        &self.state
    }

    fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.policy.config().poll_interval_seconds.max(1))
    }

    /// Poll until Ctrl-C.
    ///
    /// `dismissals` is the receiving end of the channel handed to the
    /// presentation surface.
    pub async fn run(&mut self, dismissals: DismissalReceiver) {
        self.run_until(dismissals, tokio::signal::ctrl_c()).await;
    }

    /// Poll until `shutdown` completes
    pub async fn run_until<F: Future>(
        &mut self,
        mut dismissals: DismissalReceiver,
        shutdown: F,
    ) {
        tokio::pin!(shutdown);

        let mut ticker = interval(self.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!(
            "Monitoring started (interval: {}s)",
            self.poll_interval().as_secs()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.tick_at(Local::now()).await;
                    log::debug!("Tick: {outcome:?}");
                }
                Some(_) = dismissals.recv() => self.on_dismissed(),
                _ = &mut shutdown => {
                    log::info!("Received shutdown signal, stopping...");
                    break;
                }
            }
        }

        log::info!("Monitoring stopped.");
    }

    /// Run one poll cycle as of `now`
    pub async fn tick_at(&mut self, now: DateTime<Local>) -> TickOutcome {
        if self.state.is_intervening() {
            return TickOutcome::Suppressed;
        }

        let foreground = self.inspector.current_foreground().await;
        if let Some(sample) = &foreground {
            self.record_usage(sample, now);
        }

        if self.policy.in_cooldown(now, self.state.last_intervention()) {
            return TickOutcome::CoolingDown;
        }

        let running = self.inspector.list_processes().await;
        let usage = foreground.map(|sample| ForegroundUsage {
            seconds_today: self.seconds_on(&sample.process_name, now.date_naive()),
            process_name: sample.process_name,
        });

        match self.policy.evaluate(
            now,
            self.state.last_intervention(),
            &running,
            usage.as_ref(),
        ) {
            Some(violation) => {
                self.intervene(now, &violation).await;
                TickOutcome::Intervened(violation)
            }
            None => TickOutcome::Clear,
        }
    }

    /// The presentation surface was dismissed
    pub fn on_dismissed(&mut self) {
        if self.state.is_intervening() {
            self.state.resume();
            log::info!("Block dismissed, monitoring resumed");
        } else {
            log::debug!("Ignoring dismissal while monitoring");
        }
    }

    fn record_usage(&self, sample: &ForegroundSample, now: DateTime<Local>) {
        let seconds =
            u32::try_from(self.policy.config().poll_interval_seconds).unwrap_or(u32::MAX);
        let entry = UsageEntry::new(&sample.process_name, &sample.window_title, seconds, now);
        if let Err(e) = self.ledger.record(&entry) {
            log::error!(
                "Failed to record usage for '{}': {e:#}",
                sample.process_name
            );
        }
    }

    /// Today's total for one process; storage failures count as zero
    fn seconds_on(&self, process_name: &str, date: NaiveDate) -> u64 {
        self.ledger
            .total_seconds_on(process_name, date)
            .unwrap_or_else(|e| {
                log::error!("Failed to get usage for '{process_name}': {e:#}");
                0
            })
    }

    async fn intervene(&mut self, now: DateTime<Local>, violation: &Violation) {
        self.state.begin(now);
        log::warn!("INTERVENTION ({}): {violation}", violation.kind());

        if let Some(name) = violation.process_to_terminate() {
            if !self.inspector.terminate(name).await {
                log::warn!("Could not terminate {name}");
            }
        }

        let summary = self
            .ledger
            .daily_summary_on(now.date_naive())
            .unwrap_or_else(|e| {
                log::error!("Failed to get usage summary: {e:#}");
                Vec::new()
            });
        let context = format!("{violation}\n\n{}", format_usage_summary(&summary));
        let message = self.compose_message(&context).await;

        if let Err(e) = self.surface.show(&format!("{violation}\n\n{message}")) {
            log::error!("Presentation surface failed: {e:#}; resuming monitoring");
            self.state.resume();
        }
    }

    /// Generated message, or the next fallback when generation fails
    async fn compose_message(&self, context: &str) -> String {
        let Some(generator) = &self.generator else {
            return self.fallback.next_message().to_string();
        };

        match timeout(self.message_timeout, generator.generate(context)).await {
            Ok(Ok(message)) if !message.trim().is_empty() => message,
            Ok(Ok(_)) => {
                log::warn!("Message generator returned nothing, using fallback");
                self.fallback.next_message().to_string()
            }
            Ok(Err(e)) => {
                log::warn!("Message generation failed, using fallback: {e:#}");
                self.fallback.next_message().to_string()
            }
            Err(_) => {
                log::warn!(
                    "Message generation timed out after {}s, using fallback",
                    self.message_timeout.as_secs()
                );
                self.fallback.next_message().to_string()
            }
        }
    }
}
