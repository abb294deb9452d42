//! Terminal presentation surface.
//!
//! Prints the block text as a banner, keeps it locked for the countdown, then
//! waits for Enter (or end of input) on a background thread and reports the
//! dismissal to the daemon.

use anyhow::{Context, Result};
use curb_core::{DismissalSender, Dismissed, PresentationSurface};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;
use textwrap::core::display_width;

const BANNER_WIDTH: usize = 72;

pub struct ConsoleSurface {
    countdown_seconds: u64,
    dismissals: DismissalSender,
}

impl ConsoleSurface {
    pub const fn new(countdown_seconds: u64, dismissals: DismissalSender) -> Self {
        Self {
            countdown_seconds,
            dismissals,
        }
    }
}

impl PresentationSurface for ConsoleSurface {
    fn show(&self, text: &str) -> Result<()> {
        println!("\n{}", render_banner(text));

        let countdown = self.countdown_seconds;
        let dismissals = self.dismissals.clone();
        thread::Builder::new()
            .name("curb-block".to_string())
            .spawn(move || {
                wait_for_dismissal(countdown);
                if dismissals.send(Dismissed).is_err() {
                    log::debug!("Daemon stopped before the block was dismissed");
                }
            })
            .context("Failed to start block thread")?;

        Ok(())
    }
}

fn wait_for_dismissal(countdown_seconds: u64) {
    let mut stdout = io::stdout();
    for remaining in (1..=countdown_seconds).rev() {
        print!("\rYou can close this in {remaining}s...  ");
        // Progress output only
        let _ = stdout.flush();
        thread::sleep(Duration::from_secs(1));
    }
    println!("\rPress Enter to get back to work.        ");

    let mut line = String::new();
    if let Err(e) = io::stdin().lock().read_line(&mut line) {
        log::warn!("Failed to read from stdin, dismissing block: {e}");
    }
}

/// Frame `text` in a fixed-width box, wrapping long lines on word boundaries.
///
/// Padding is measured in terminal columns, so wide glyphs keep the right
/// border aligned.
pub fn render_banner(text: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    let inner = BANNER_WIDTH - 4;

    let mut out = vec![rule.clone()];
    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            out.push(format!("| {:inner$} |", ""));
            continue;
        }
        for line in textwrap::wrap(paragraph, inner) {
            let pad = inner.saturating_sub(display_width(&line));
            out.push(format!("| {line}{} |", " ".repeat(pad)));
        }
    }
    out.push(rule);
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(banner: &str) -> Vec<&str> {
        let lines: Vec<&str> = banner.lines().collect();
        lines[1..lines.len() - 1].to_vec()
    }

    #[test]
    fn test_banner_frames_every_line() {
        let banner = render_banner("Blocked application \"chrome.exe\"\n\nGo outside.");
        let lines: Vec<&str> = banner.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "=".repeat(BANNER_WIDTH));
        assert_eq!(lines[4], "=".repeat(BANNER_WIDTH));
        for line in framed(&banner) {
            assert_eq!(display_width(line), BANNER_WIDTH);
            assert!(line.starts_with("| ") && line.ends_with(" |"));
        }
        assert!(lines[1].contains("chrome.exe"));
        assert!(lines[3].contains("Go outside."));
    }

    #[test]
    fn test_long_text_wraps_on_words() {
        let text = "focus ".repeat(30);
        let banner = render_banner(&text);
        let lines = framed(&banner);

        assert!(lines.len() > 1);
        for line in lines {
            assert_eq!(display_width(line), BANNER_WIDTH);
            let content = line.trim_start_matches("| ").trim_end_matches(" |").trim_end();
            assert!(content.split(' ').all(|word| word == "focus"));
        }
    }

    #[test]
    fn test_wide_characters_keep_border_aligned() {
        // Each CJK glyph is two columns wide
        let banner = render_banner("\u{4f60}\u{597d}\u{4e16}\u{754c} stop now \u{26a1}");
        for line in framed(&banner) {
            assert_eq!(display_width(line), BANNER_WIDTH);
        }

        let long = "\u{6642}\u{9593}".repeat(40);
        let banner = render_banner(&long);
        let lines = framed(&banner);
        assert!(lines.len() >= 2);
        for line in lines {
            assert_eq!(display_width(line), BANNER_WIDTH);
        }
    }
}
