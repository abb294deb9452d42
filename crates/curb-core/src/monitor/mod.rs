//! Process inspection through external OS tooling.
//!
//! Inspectors never surface tool failures to the caller: a failed listing is
//! an empty listing, a failed foreground query is no sample, a failed
//! termination is `false`. Each failure is logged where it happens.

mod command;
pub mod parser;
pub mod windows;

use async_trait::async_trait;
use curb_storage::names::same_process;
use serde::{Deserialize, Serialize};

use crate::error::InspectorError;

pub use windows::WindowsInspector;

/// OS-critical processes that are never terminated, whatever the policy says
pub const PROTECTED_PROCESSES: [&str; 10] = [
    "csrss.exe",
    "wininit.exe",
    "services.exe",
    "lsass.exe",
    "svchost.exe",
    "explorer.exe",
    "dwm.exe",
    "winlogon.exe",
    "smss.exe",
    "system",
];

/// One row of the running-process listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub name: String,
    pub pid: u32,
    pub session_name: String,
    pub session_num: u32,
    pub mem_usage_kb: u64,
}

/// The process owning input focus at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundSample {
    pub process_name: String,
    pub window_title: String,
    pub pid: u32,
}

/// Whether `name` belongs to the protected set (case-insensitive)
#[must_use]
pub fn is_protected(name: &str) -> bool {
    PROTECTED_PROCESSES
        .iter()
        .any(|protected| same_process(protected, name))
}

/// Refuse termination of empty or protected names
///
/// # Errors
///
/// Returns [`InspectorError::ProtectedProcess`] for names that must not be killed
pub fn check_terminable(name: &str) -> Result<(), InspectorError> {
    if name.trim().is_empty() || is_protected(name) {
        return Err(InspectorError::ProtectedProcess {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Source of process and focus information for the poll loop
#[async_trait]
pub trait ProcessInspector: Send + Sync {
    /// All running processes; empty when the listing tool fails
    async fn list_processes(&self) -> Vec<ProcessRecord>;

    /// Current focus owner; `None` when absent or when the query fails
    async fn current_foreground(&self) -> Option<ForegroundSample>;

    /// Kill every process named `name`; `true` iff the tool reported success.
    /// Only called through [`ProcessInspector::terminate`].
    async fn kill_by_name(&self, name: &str) -> bool;

    /// Terminate `name` unless it is protected
    ///
    /// The protected check runs before any tool is invoked and does not
    /// depend on configuration. Implementors should not override this.
    async fn terminate(&self, name: &str) -> bool {
        if let Err(e) = check_terminable(name) {
            log::warn!("{e}");
            return false;
        }
        self.kill_by_name(name).await
    }

    /// Whether any running process has this name (case-insensitive)
    async fn is_process_running(&self, name: &str) -> bool {
        self.list_processes()
            .await
            .iter()
            .any(|p| same_process(&p.name, name))
    }
}
