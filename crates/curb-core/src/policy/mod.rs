//! Pure policy evaluation.
//!
//! [`PolicyEngine::evaluate`] decides whether the current instant violates
//! the usage policy. It performs no I/O and has no side effects; acting on a
//! violation (terminating, showing a block) is the daemon's job.

#[cfg(test)]
mod tests;

use chrono::{DateTime, Local, NaiveTime};
use curb_storage::hours_minutes;
use curb_storage::names::same_process;
use std::fmt;

use crate::config::PolicyConfig;
use crate::monitor::ProcessRecord;

/// Accumulated focus time of the current foreground process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundUsage {
    pub process_name: String,
    pub seconds_today: u64,
}

/// A detected policy violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Inside the night-time window
    Curfew { start: NaiveTime, end: NaiveTime },
    /// A blacklisted application is running
    Blacklist { process_name: String },
    /// The foreground application exceeded its daily cap
    UsageExceeded {
        process_name: String,
        seconds: u64,
        limit_seconds: u64,
    },
}

impl Violation {
    /// Process the daemon should terminate, if any
    #[must_use]
    pub fn process_to_terminate(&self) -> Option<&str> {
        match self {
            Self::Blacklist { process_name } => Some(process_name),
            Self::Curfew { .. } | Self::UsageExceeded { .. } => None,
        }
    }

    /// Whole hours of usage for [`Violation::UsageExceeded`]
    #[must_use]
    pub const fn hours(&self) -> Option<u64> {
        match self {
            Self::UsageExceeded { seconds, .. } => Some(hours_minutes(*seconds).0),
            Self::Curfew { .. } | Self::Blacklist { .. } => None,
        }
    }

    /// Remaining whole minutes for [`Violation::UsageExceeded`]
    #[must_use]
    pub const fn minutes(&self) -> Option<u64> {
        match self {
            Self::UsageExceeded { seconds, .. } => Some(hours_minutes(*seconds).1),
            Self::Curfew { .. } | Self::Blacklist { .. } => None,
        }
    }

    /// Short machine-friendly kind, used in logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Curfew { .. } => "curfew",
            Self::Blacklist { .. } => "blacklist",
            Self::UsageExceeded { .. } => "usage_exceeded",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curfew { start, end } => write!(
                f,
                "It is curfew time ({} - {}). Stop using the PC.",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            Self::Blacklist { process_name } => write!(
                f,
                "Blocked application \"{process_name}\" is running and will be closed."
            ),
            Self::UsageExceeded {
                process_name,
                seconds,
                limit_seconds,
            } => {
                let (hours, minutes) = hours_minutes(*seconds);
                let (limit_h, limit_m) = hours_minutes(*limit_seconds);
                write!(
                    f,
                    "\"{process_name}\" has been used for {hours}h {minutes}m today, \
                     over the limit of {limit_h}h {limit_m}m."
                )
            }
        }
    }
}

/// Whether `time` falls in the half-open window `[start, end)`.
///
/// A window with `start > end` wraps past midnight. `start == end` is a
/// zero-width window and never matches.
#[must_use]
pub fn in_window(time: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start <= end {
        start <= time && time < end
    } else {
        time >= start || time < end
    }
}

/// Evaluates usage against one [`PolicyConfig`]
pub struct PolicyEngine {
    config: PolicyConfig,
}

impl PolicyEngine {
    #[must_use]
    pub const fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Whether `time` lies inside the configured curfew
    #[must_use]
    pub fn is_curfew(&self, time: NaiveTime) -> bool {
        in_window(time, self.config.curfew_start, self.config.curfew_end)
    }

    /// Whether a previous intervention still suppresses new ones
    #[must_use]
    pub fn in_cooldown(&self, now: DateTime<Local>, last: Option<DateTime<Local>>) -> bool {
        let Some(last) = last else {
            return false;
        };
        let cooldown = i64::try_from(self.config.intervention_cooldown_seconds).unwrap_or(i64::MAX);
        now.signed_duration_since(last).num_seconds() < cooldown
    }

    /// Decide whether `now` violates the policy.
    ///
    /// Checks run in a fixed order and the first match wins: cooldown
    /// suppression, curfew, blacklist, usage cap.
    #[must_use]
    pub fn evaluate(
        &self,
        now: DateTime<Local>,
        last_intervention: Option<DateTime<Local>>,
        running: &[ProcessRecord],
        foreground: Option<&ForegroundUsage>,
    ) -> Option<Violation> {
        if self.in_cooldown(now, last_intervention) {
            return None;
        }

        if self.config.curfew_blocks_all && self.is_curfew(now.time()) {
            return Some(Violation::Curfew {
                start: self.config.curfew_start,
                end: self.config.curfew_end,
            });
        }

        if let Some(process_name) = self.find_blacklisted(running) {
            return Some(Violation::Blacklist { process_name });
        }

        let usage = foreground?;
        if usage.seconds_today > self.config.max_usage_seconds {
            return Some(Violation::UsageExceeded {
                process_name: usage.process_name.clone(),
                seconds: usage.seconds_today,
                limit_seconds: self.config.max_usage_seconds,
            });
        }

        None
    }

    /// First blacklist entry, in config order, that is running
    fn find_blacklisted(&self, running: &[ProcessRecord]) -> Option<String> {
        self.config.blacklist.iter().find_map(|entry| {
            running
                .iter()
                .find(|process| same_process(&process.name, entry))
                .map(|process| process.name.clone())
        })
    }
}
