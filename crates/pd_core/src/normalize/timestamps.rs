use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::error::{AppError, ErrorKind};

fn canonicalize_rfc3339_utc(dt: OffsetDateTime) -> Option<String> {
    let utc = dt.to_offset(UtcOffset::UTC);
    utc.format(&Rfc3339).ok()
}

/// Canonical RFC3339 UTC form of a provider timestamp.
///
/// Empty or unparseable input yields `None` (the zero timestamp); conversion never fails on a bad
/// timestamp and no other formats are guessed at.
pub fn normalize_rfc3339(raw_input: &str) -> Option<String> {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return None;
    }
    match OffsetDateTime::parse(trimmed, &Rfc3339) {
        Ok(dt) => canonicalize_rfc3339_utc(dt),
        Err(e) => {
            tracing::debug!(raw = trimmed, error = %e, "dropping unparseable timestamp");
            None
        }
    }
}

pub fn now_rfc3339_utc() -> Result<String, AppError> {
    OffsetDateTime::now_utc().format(&Rfc3339).map_err(|e| {
        AppError::new(ErrorKind::InvalidRequest, "TIME_FORMAT_FAILED", "Failed to format time")
            .with_details(e.to_string())
    })
}
