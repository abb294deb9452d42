use std::time::Duration;
use thiserror::Error;

/// Failure of an external inspection or termination tool
#[derive(Debug, Error)]
pub enum InspectorError {
    #[error("{tool} not found; check that the Windows System32 directory is reachable")]
    ToolNotFound { tool: String },

    #[error("{tool} exited with status {code:?}: {stderr}")]
    NonZeroExit {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    #[error("failed to run {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to terminate protected process {name}")]
    ProtectedProcess { name: String },
}

/// A single row of tool output that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("empty process name")]
    EmptyName,

    #[error("invalid process id {0:?}")]
    InvalidPid(String),
}

/// Configuration that could not be loaded or does not make sense
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
