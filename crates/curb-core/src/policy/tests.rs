use super::*;
use chrono::{Duration, TimeZone};

fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn at(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 1, 15, hour, minute, second)
        .unwrap()
}

fn process(name: &str) -> ProcessRecord {
    ProcessRecord {
        name: name.to_string(),
        pid: 100,
        session_name: "Console".to_string(),
        session_num: 1,
        mem_usage_kb: 1024,
    }
}

fn usage(name: &str, seconds: u64) -> ForegroundUsage {
    ForegroundUsage {
        process_name: name.to_string(),
        seconds_today: seconds,
    }
}

fn config() -> PolicyConfig {
    PolicyConfig {
        blacklist: vec!["chrome.exe".to_string()],
        curfew_start: t(1, 0),
        curfew_end: t(6, 0),
        max_usage_seconds: 7200,
        poll_interval_seconds: 5,
        intervention_cooldown_seconds: 60,
        curfew_blocks_all: true,
    }
}

// ============================================================================
// Curfew window
// ============================================================================

#[test]
fn test_window_without_wrap_is_half_open() {
    assert!(!in_window(t(0, 59), t(1, 0), t(6, 0)));
    assert!(in_window(t(1, 0), t(1, 0), t(6, 0)));
    assert!(in_window(t(5, 59), t(1, 0), t(6, 0)));
    assert!(!in_window(t(6, 0), t(1, 0), t(6, 0)));
}

#[test]
fn test_window_wrapping_midnight_uses_or() {
    let (start, end) = (t(23, 0), t(6, 0));
    assert!(in_window(t(23, 0), start, end));
    assert!(in_window(t(23, 59), start, end));
    assert!(in_window(t(0, 0), start, end));
    assert!(in_window(t(5, 59), start, end));
    assert!(!in_window(t(6, 0), start, end));
    assert!(!in_window(t(12, 0), start, end));
    assert!(!in_window(t(22, 59), start, end));
}

#[test]
fn test_zero_width_window_never_matches() {
    for hour in 0..24 {
        assert!(!in_window(t(hour, 0), t(3, 0), t(3, 0)));
    }
}

// ============================================================================
// Cooldown
// ============================================================================

#[test]
fn test_cooldown_suppresses_everything_for_sixty_seconds() {
    let engine = PolicyEngine::new(config());
    let last = at(3, 0, 0);
    let running = [process("chrome.exe")];

    for offset in [1, 30, 59] {
        let now = last + Duration::seconds(offset);
        assert_eq!(engine.evaluate(now, Some(last), &running, None), None);
    }

    let after = last + Duration::seconds(60);
    assert!(engine.evaluate(after, Some(last), &running, None).is_some());
}

#[test]
fn test_no_previous_intervention_means_no_cooldown() {
    let engine = PolicyEngine::new(config());
    assert!(!engine.in_cooldown(at(12, 0, 0), None));
}

// ============================================================================
// Check order
// ============================================================================

#[test]
fn test_curfew_wins_over_blacklist_and_usage() {
    let engine = PolicyEngine::new(config());
    let running = [process("chrome.exe")];
    let fg = usage("app.exe", 99_999);

    let violation = engine.evaluate(at(2, 30, 0), None, &running, Some(&fg));
    assert_eq!(
        violation,
        Some(Violation::Curfew {
            start: t(1, 0),
            end: t(6, 0)
        })
    );
    assert!(violation.unwrap().to_string().contains("01:00 - 06:00"));
}

#[test]
fn test_curfew_ignored_when_not_blocking_all() {
    let engine = PolicyEngine::new(PolicyConfig {
        curfew_blocks_all: false,
        ..config()
    });
    assert_eq!(engine.evaluate(at(2, 30, 0), None, &[], None), None);
}

#[test]
fn test_blacklist_names_running_process() {
    let engine = PolicyEngine::new(config());
    let running = [process("explorer.exe"), process("Chrome.EXE")];

    let violation = engine.evaluate(at(14, 0, 0), None, &running, None).unwrap();
    assert_eq!(
        violation,
        Violation::Blacklist {
            process_name: "Chrome.EXE".to_string()
        }
    );
    assert_eq!(violation.process_to_terminate(), Some("Chrome.EXE"));
}

#[test]
fn test_blacklist_follows_config_order() {
    let engine = PolicyEngine::new(PolicyConfig {
        blacklist: vec!["steam.exe".to_string(), "vlc.exe".to_string()],
        ..config()
    });
    let running = [process("vlc.exe"), process("steam.exe")];

    let violation = engine.evaluate(at(14, 0, 0), None, &running, None);
    assert_eq!(
        violation,
        Some(Violation::Blacklist {
            process_name: "steam.exe".to_string()
        })
    );
}

#[test]
fn test_empty_blacklist_never_fires() {
    let engine = PolicyEngine::new(PolicyConfig {
        blacklist: Vec::new(),
        ..config()
    });
    let running = [process("chrome.exe")];
    assert_eq!(engine.evaluate(at(14, 0, 0), None, &running, None), None);
}

#[test]
fn test_blacklist_wins_over_usage() {
    let engine = PolicyEngine::new(config());
    let running = [process("chrome.exe")];
    let fg = usage("app.exe", 10_000);

    let violation = engine.evaluate(at(14, 0, 0), None, &running, Some(&fg));
    assert_eq!(violation.unwrap().kind(), "blacklist");
}

// ============================================================================
// Usage cap
// ============================================================================

#[test]
fn test_usage_exceeded_reports_hours_and_minutes() {
    let engine = PolicyEngine::new(config());
    let fg = usage("app.exe", 7300);

    let violation = engine.evaluate(at(14, 0, 0), None, &[], Some(&fg)).unwrap();
    assert_eq!(
        violation,
        Violation::UsageExceeded {
            process_name: "app.exe".to_string(),
            seconds: 7300,
            limit_seconds: 7200,
        }
    );
    assert_eq!(violation.hours(), Some(2));
    assert_eq!(violation.minutes(), Some(1));
    assert!(violation.to_string().contains("2h 1m"));
    assert_eq!(violation.process_to_terminate(), None);
}

#[test]
fn test_hours_only_for_usage_violations() {
    let curfew = Violation::Curfew {
        start: t(1, 0),
        end: t(6, 0),
    };
    assert_eq!(curfew.hours(), None);
    assert_eq!(curfew.minutes(), None);
    assert_eq!(hours_minutes(3599), (0, 59));
}

#[test]
fn test_usage_at_limit_is_not_exceeded() {
    let engine = PolicyEngine::new(config());
    let fg = usage("app.exe", 7200);
    assert_eq!(engine.evaluate(at(14, 0, 0), None, &[], Some(&fg)), None);
}

#[test]
fn test_no_foreground_skips_usage_check() {
    let engine = PolicyEngine::new(config());
    assert_eq!(engine.evaluate(at(14, 0, 0), None, &[], None), None);
}
