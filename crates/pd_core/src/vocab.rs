//! Host <-> PagerDuty vocabulary tables.
//!
//! Severity collapses four host tiers into two urgencies, so it cannot be inverted:
//! `urgency_to_severity(severity_to_urgency(s))` is only `s` for `critical` and `medium`.
//! Unknown severities default to `high` urgency. Unknown statuses pass through unchanged in both
//! directions; existing callers may rely on either behavior, so the two are kept as they are.

pub const URGENCY_HIGH: &str = "high";
pub const URGENCY_LOW: &str = "low";

/// Maps a host severity (any case) to PagerDuty urgency.
pub fn severity_to_urgency(severity: &str) -> &'static str {
    match severity.to_lowercase().as_str() {
        "critical" | "sev1" | "p1" | "high" | "sev2" | "p2" => URGENCY_HIGH,
        "medium" | "sev3" | "p3" | "low" | "sev4" | "p4" => URGENCY_LOW,
        _ => URGENCY_HIGH,
    }
}

/// Maps a PagerDuty urgency back to the representative host severity.
pub fn urgency_to_severity(urgency: &str) -> &'static str {
    match urgency.to_lowercase().as_str() {
        URGENCY_HIGH => "critical",
        _ => "medium",
    }
}

/// Maps a host status to PagerDuty status; unrecognized values are returned as given.
pub fn status_to_provider_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "open" | "triggered" => "triggered".to_string(),
        "acknowledged" | "investigating" => "acknowledged".to_string(),
        "resolved" | "closed" => "resolved".to_string(),
        _ => status.to_string(),
    }
}

/// Maps a PagerDuty status to host status; unrecognized values are returned as given.
pub fn provider_status_to_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "triggered" => "open".to_string(),
        "acknowledged" => "acknowledged".to_string(),
        "resolved" => "resolved".to_string(),
        _ => status.to_string(),
    }
}
