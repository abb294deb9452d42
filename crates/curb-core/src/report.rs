use curb_storage::UsageAggregate;

/// Human-readable summary of one day's usage, as sent to the message generator
#[must_use]
pub fn format_usage_summary(summary: &[UsageAggregate]) -> String {
    if summary.is_empty() {
        return String::from("No usage recorded today yet.");
    }

    let mut lines = vec![String::from("== Today's PC usage ==")];
    for item in summary {
        let (hours, minutes) = item.hours_minutes();
        lines.push(format!("  {}: {hours}h {minutes}m", item.process_name));
    }
    lines.join("\n")
}
