//! Plain-text rendering helpers for the command surface.

use chrono::{DateTime, Utc};

/// Compact "how long ago" label for a stored RFC 3339 timestamp.
pub fn time_ago(rfc3339: &str) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(rfc3339) else {
        return "-".to_string();
    };
    let secs = (Utc::now() - then.with_timezone(&Utc)).num_seconds().max(0);

    if secs < 60 {
        return format!("{secs}s ago");
    }
    let minutes = secs / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Absolute timestamp for detail views.
pub fn format_ts(rfc3339: &str) -> String {
    match DateTime::parse_from_rfc3339(rfc3339) {
        Ok(dt) => dt
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
        Err(_) => "-".to_string(),
    }
}

/// Truncate a prompt for one-line table cells, char-aware.
pub fn preview(prompt: &str, max_chars: usize) -> String {
    if prompt.chars().count() <= max_chars {
        return prompt.to_string();
    }
    let head: String = prompt.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{head}...")
}

/// Run status label: in flight, ok, or the non-zero exit code.
pub fn exit_label(exit_code: Option<i64>) -> String {
    match exit_code {
        None => "running".to_string(),
        Some(0) => "ok".to_string(),
        Some(code) => format!("exit {code}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn time_ago_buckets() {
        let at = |d: Duration| (Utc::now() - d).to_rfc3339();
        assert!(time_ago(&at(Duration::seconds(5))).ends_with("s ago"));
        assert_eq!(time_ago(&at(Duration::minutes(3))), "3m ago");
        assert_eq!(time_ago(&at(Duration::hours(7))), "7h ago");
        assert_eq!(time_ago(&at(Duration::days(2))), "2d ago");
    }

    #[test]
    fn time_ago_tolerates_garbage() {
        assert_eq!(time_ago("not a timestamp"), "-");
    }

    #[test]
    fn preview_keeps_short_prompts() {
        assert_eq!(preview("say hi", 40), "say hi");
    }

    #[test]
    fn preview_truncates_long_prompts() {
        let long = "x".repeat(50);
        let p = preview(&long, 40);
        assert_eq!(p.chars().count(), 40);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn exit_labels() {
        assert_eq!(exit_label(None), "running");
        assert_eq!(exit_label(Some(0)), "ok");
        assert_eq!(exit_label(Some(3)), "exit 3");
    }
}
