use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::InspectorError;

/// Run an external tool with a hard time limit and return its stdout.
///
/// A missing binary, a non-zero exit and a timeout are all errors. On
/// timeout the child is killed when its future is dropped and any partial
/// output is discarded.
pub async fn run_tool(
    program: &Path,
    args: &[&str],
    timeout: Duration,
) -> Result<String, InspectorError> {
    let tool = program.display().to_string();

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, child).await {
        Err(_) => return Err(InspectorError::Timeout { tool, timeout }),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InspectorError::ToolNotFound { tool })
        }
        Ok(Err(source)) => return Err(InspectorError::Io { tool, source }),
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InspectorError::NonZeroExit {
            tool,
            code: output.status.code(),
            stderr: stderr.trim().chars().take(200).collect(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
