pub mod config;
pub mod daemon;
pub mod error;
pub mod ledger;
pub mod monitor;
pub mod policy;
pub mod presentation;
pub mod report;

pub use config::CurbConfig;
pub use daemon::{Daemon, InterventionState, Mode, TickOutcome};
pub use error::{ConfigError, InspectorError, ParseError};
pub use ledger::UsageLedger;
pub use monitor::{ForegroundSample, ProcessInspector, ProcessRecord, WindowsInspector};
pub use policy::{ForegroundUsage, PolicyEngine, Violation};
pub use presentation::{
    dismissal_channel, DismissalReceiver, DismissalSender, Dismissed, PresentationSurface,
};
