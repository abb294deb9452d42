use anyhow::Result;
use tokio::sync::mpsc;

/// Emitted once by a presentation surface when the user dismisses a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dismissed;

pub type DismissalSender = mpsc::UnboundedSender<Dismissed>;
pub type DismissalReceiver = mpsc::UnboundedReceiver<Dismissed>;

/// Create the channel a surface uses to report dismissals to the daemon
#[must_use]
pub fn dismissal_channel() -> (DismissalSender, DismissalReceiver) {
    mpsc::unbounded_channel()
}

/// Blocking surface that displays intervention text
///
/// `show` must return promptly; the surface reports the later dismissal by
/// sending [`Dismissed`] on the sender it was constructed with.
pub trait PresentationSurface: Send + Sync {
    fn show(&self, text: &str) -> Result<()>;
}
