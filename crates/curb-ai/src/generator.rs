use anyhow::Result;
use async_trait::async_trait;

/// Produces the short text shown alongside an intervention.
///
/// Implementations may fail or be unreachable; callers are expected to fall
/// back to [`crate::FallbackMessages`] instead of retrying.
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    /// Generate a message for the given violation and usage context
    async fn generate(&self, usage_context: &str) -> Result<String>;
}
