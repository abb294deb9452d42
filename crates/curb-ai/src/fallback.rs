use std::sync::atomic::{AtomicUsize, Ordering};

/// Built-in messages used whenever generation fails
pub const DEFAULT_FALLBACK_MESSAGES: [&str; 5] = [
    "Are you wasting time in front of the screen? Stand up and take a deep breath.",
    "The same app again. Do you really need it right now?",
    "That time could have been a chapter of a book. Revisit your priorities.",
    "Focus is finite. Reset, then work on what actually matters.",
    "Time does not come back. Spend this moment on your future self.",
];

/// Rotating pool of fallback messages
#[derive(Debug, Default)]
pub struct FallbackMessages {
    index: AtomicUsize,
}

impl FallbackMessages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next message in rotation; wraps around after the last one
    pub fn next_message(&self) -> &'static str {
        let i = self.index.fetch_add(1, Ordering::Relaxed);
        DEFAULT_FALLBACK_MESSAGES[i % DEFAULT_FALLBACK_MESSAGES.len()]
    }
}
