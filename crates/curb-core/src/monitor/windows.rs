//! Windows process inspection through `tasklist`, `powershell` and `taskkill`.
//!
//! Works natively on Windows and from WSL, where System32 is mounted under
//! `/mnt/c`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::command::run_tool;
use super::parser::{parse_foreground, parse_tasklist_csv};
use super::{ForegroundSample, ProcessInspector, ProcessRecord};
use crate::config::InspectorConfig;

const SYSTEM32_CANDIDATES: [&str; 4] = [
    "/mnt/c/Windows/System32",
    "/mnt/c/WINDOWS/system32",
    "/mnt/c/Windows/system32",
    r"C:\Windows\System32",
];

/// Prints `name<TAB>title<TAB>pid` for the window owning focus
const FOREGROUND_SCRIPT: &str = r#"
Add-Type @"
using System;
using System.Runtime.InteropServices;
using System.Text;
public class Win32 {
    [DllImport("user32.dll")]
    public static extern IntPtr GetForegroundWindow();
    [DllImport("user32.dll")]
    public static extern int GetWindowText(IntPtr hWnd, StringBuilder text, int count);
    [DllImport("user32.dll")]
    public static extern uint GetWindowThreadProcessId(IntPtr hWnd, out uint processId);
}
"@

$hwnd = [Win32]::GetForegroundWindow()
$sb = New-Object System.Text.StringBuilder 256
[Win32]::GetWindowText($hwnd, $sb, 256) | Out-Null
$title = $sb.ToString()

$fgPid = 0
[Win32]::GetWindowThreadProcessId($hwnd, [ref]$fgPid) | Out-Null

if ($fgPid -gt 0) {
    $proc = Get-Process -Id $fgPid -ErrorAction SilentlyContinue
    $procName = if ($proc) { $proc.ProcessName } else { "Unknown" }
    Write-Output "$procName`t$title`t$fgPid"
} else {
    Write-Output "Unknown`tUnknown`t0"
}
"#;

/// Locate the System32 directory: the configured one, else the first
/// existing well-known location.
fn find_system32(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        return Some(dir.to_path_buf());
    }
    SYSTEM32_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_dir())
}

/// Full path of `exe` inside System32 when it exists there, else the bare
/// name so the `PATH` lookup applies.
fn resolve_tool(system32: Option<&Path>, exe: &str) -> PathBuf {
    system32
        .map(|dir| dir.join(exe))
        .filter(|full| full.is_file())
        .unwrap_or_else(|| PathBuf::from(exe))
}

pub struct WindowsInspector {
    tasklist: PathBuf,
    taskkill: PathBuf,
    powershell: PathBuf,
    timeout: Duration,
}

impl WindowsInspector {
    #[must_use]
    pub fn new(config: &InspectorConfig) -> Self {
        let system32 = find_system32(config.system32_dir.as_deref());
        let inspector = Self {
            tasklist: resolve_tool(system32.as_deref(), "tasklist.exe"),
            taskkill: resolve_tool(system32.as_deref(), "taskkill.exe"),
            powershell: resolve_tool(system32.as_deref(), "powershell.exe"),
            timeout: Duration::from_secs(config.command_timeout_seconds),
        };
        log::info!(
            "WindowsInspector initialized: tasklist={}, taskkill={}, powershell={}, timeout={:?}",
            inspector.tasklist.display(),
            inspector.taskkill.display(),
            inspector.powershell.display(),
            inspector.timeout
        );
        inspector
    }

    /// PowerShell starts slowly, so the foreground query gets double time
    fn foreground_timeout(&self) -> Duration {
        self.timeout * 2
    }
}

#[async_trait]
impl ProcessInspector for WindowsInspector {
    async fn list_processes(&self) -> Vec<ProcessRecord> {
        match run_tool(&self.tasklist, &["/FO", "CSV", "/NH"], self.timeout).await {
            Ok(stdout) => parse_tasklist_csv(&stdout),
            Err(e) => {
                log::error!("Process listing failed: {e}");
                Vec::new()
            }
        }
    }

    async fn current_foreground(&self) -> Option<ForegroundSample> {
        let args = [
            "-NoProfile",
            "-NonInteractive",
            "-Command",
            FOREGROUND_SCRIPT,
        ];
        match run_tool(&self.powershell, &args, self.foreground_timeout()).await {
            Ok(stdout) => parse_foreground(&stdout),
            Err(e) => {
                log::error!("Foreground detection failed: {e}");
                None
            }
        }
    }

    async fn kill_by_name(&self, name: &str) -> bool {
        match run_tool(&self.taskkill, &["/F", "/IM", name], self.timeout).await {
            Ok(_) => {
                log::info!("Successfully killed process: {name}");
                true
            }
            Err(e) => {
                log::warn!("Failed to kill {name}: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_tool_falls_back_to_bare_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_tool(Some(dir.path()), "tasklist.exe"),
            PathBuf::from("tasklist.exe")
        );
        assert_eq!(resolve_tool(None, "taskkill.exe"), PathBuf::from("taskkill.exe"));
    }

    #[test]
    fn test_resolve_tool_prefers_system32() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("tasklist.exe");
        std::fs::write(&exe, b"").unwrap();
        assert_eq!(resolve_tool(Some(dir.path()), "tasklist.exe"), exe);
    }

    #[test]
    fn test_configured_system32_wins() {
        let configured = Path::new("/custom/System32");
        assert_eq!(
            find_system32(Some(configured)),
            Some(PathBuf::from("/custom/System32"))
        );
    }

    #[test]
    fn test_foreground_timeout_is_doubled() {
        let inspector = WindowsInspector::new(&InspectorConfig {
            command_timeout_seconds: 5,
            system32_dir: None,
        });
        assert_eq!(inspector.foreground_timeout(), Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_tools_degrade_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let inspector = WindowsInspector {
            tasklist: dir.path().join("tasklist.exe"),
            taskkill: dir.path().join("taskkill.exe"),
            powershell: dir.path().join("powershell.exe"),
            timeout: Duration::from_secs(1),
        };

        assert!(inspector.list_processes().await.is_empty());
        assert!(inspector.current_foreground().await.is_none());
        assert!(!inspector.terminate("chrome.exe").await);
    }
}
