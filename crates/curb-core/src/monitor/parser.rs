//! Row-by-row parsing of tool output.
//!
//! Every row is validated on its own into a typed record or a
//! [`ParseError`]; a bad row is skipped without affecting its neighbours.

use crate::error::ParseError;

use super::{ForegroundSample, ProcessRecord};

/// `tasklist /FO CSV` columns: name, pid, session name, session number, memory
const TASKLIST_FIELDS: usize = 5;

/// Placeholder the foreground script prints when no window has focus
const UNKNOWN_PROCESS: &str = "Unknown";

/// Split one CSV line, honouring double quotes and `""` escapes
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Normalize a memory column such as `"150,000 K"` to a plain KiB count.
///
/// Thousands separators (`,`, `.`, spaces) are dropped; an `M`/`G` suffix
/// scales the value. Anything unreadable is 0.
#[must_use]
pub fn parse_memory_kb(raw: &str) -> u64 {
    let raw = raw.trim();
    let numeric_len = raw
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, ',' | '.' | ' ' | '\u{a0}' | '\u{202f}')))
        .unwrap_or(raw.len());
    let (number, suffix) = raw.split_at(numeric_len);

    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    let Ok(value) = digits.parse::<u64>() else {
        return 0;
    };

    let multiplier = match suffix.trim().chars().next() {
        Some('M' | 'm') => 1024,
        Some('G' | 'g') => 1024 * 1024,
        _ => 1,
    };
    value.saturating_mul(multiplier)
}

/// Parse one `tasklist /FO CSV /NH` row
///
/// # Errors
///
/// Returns a [`ParseError`] when the row has too few fields, an empty name
/// or a non-numeric pid. Session number and memory fall back to 0.
pub fn parse_tasklist_row(line: &str) -> Result<ProcessRecord, ParseError> {
    let fields = split_csv_row(line);
    let [name, pid, session_name, session_num, memory, ..] = fields.as_slice() else {
        return Err(ParseError::TooFewFields {
            expected: TASKLIST_FIELDS,
            found: fields.len(),
        });
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }

    let pid = pid
        .trim()
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidPid(pid.trim().to_string()))?;

    Ok(ProcessRecord {
        name: name.to_string(),
        pid,
        session_name: session_name.trim().to_string(),
        session_num: session_num.trim().parse().unwrap_or(0),
        mem_usage_kb: parse_memory_kb(memory),
    })
}

/// Parse the full listing, dropping malformed rows individually
#[must_use]
pub fn parse_tasklist_csv(text: &str) -> Vec<ProcessRecord> {
    let processes: Vec<ProcessRecord> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| match parse_tasklist_row(line) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("Skipping malformed tasklist row {}: {line:?} ({e})", i + 1);
                None
            }
        })
        .collect();

    log::debug!("Parsed {} processes from tasklist output", processes.len());
    processes
}

/// Parse the foreground script's `name\ttitle\tpid` line
///
/// Returns `None` for empty output, a line without a tab, an empty name or
/// the `Unknown` placeholder. A missing or non-numeric pid becomes 0.
#[must_use]
pub fn parse_foreground(output: &str) -> Option<ForegroundSample> {
    let Some(line) = output.lines().map(str::trim_end).find(|l| l.contains('\t')) else {
        if !output.trim().is_empty() {
            log::warn!(
                "Unexpected foreground output format: {:?}",
                output.chars().take(100).collect::<String>()
            );
        }
        return None;
    };

    let mut parts = line.split('\t').map(str::trim);
    let process_name = parts.next().unwrap_or_default();
    let window_title = parts.next().unwrap_or_default();
    let pid = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);

    if process_name.is_empty() || process_name == UNKNOWN_PROCESS {
        return None;
    }

    Some(ForegroundSample {
        process_name: process_name.to_string(),
        window_title: window_title.to_string(),
        pid,
    })
}
