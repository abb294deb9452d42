//! Process-name normalization shared by every case-insensitive comparison.

/// Normalize a process name into its comparison key.
///
/// Trims surrounding whitespace and lowercases ASCII letters only, which is
/// exactly what SQLite's built-in `LOWER()` does, so keys computed here match
/// keys computed inside SQL queries.
#[must_use]
pub fn normalize_process_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Case-insensitive process-name equality.
#[must_use]
pub fn same_process(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize_process_name("  Chrome.EXE "), "chrome.exe");
    }

    #[test]
    fn test_normalize_leaves_non_ascii_alone() {
        // SQLite LOWER() only folds ASCII; we must agree with it
        assert_eq!(normalize_process_name("\u{00C9}DIT.exe"), "\u{00C9}dit.exe");
    }

    #[test]
    fn test_same_process() {
        assert!(same_process("Discord.exe", "discord.EXE"));
        assert!(!same_process("discord.exe", "discord"));
    }
}
