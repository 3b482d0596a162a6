use std::time::Duration;

use serde_json::Value;

use crate::error::AppError;

/// Decrypted adapter config exactly as the host sends it.
pub type RawConfig = serde_json::Map<String, Value>;

pub const DEFAULT_SOURCE: &str = "pagerduty";
pub const DEFAULT_API_URL: &str = "https://api.pagerduty.com";
pub const DEFAULT_SEVERITY: &str = "critical";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn non_empty(raw: &RawConfig, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn timeout(raw: &RawConfig) -> Duration {
    raw.get("timeoutSeconds")
        .and_then(Value::as_u64)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::config(format!("pagerduty {field} is required"))
            .with_details(format!("field={field}")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentConfig {
    pub source: String,
    pub default_severity: String,
    pub api_token: String,
    pub api_url: String,
    /// Service reference for newly created incidents. Never used as a query filter.
    pub service_id: String,
    /// Email of a valid PagerDuty user; required on writes.
    pub from_email: String,
    pub timeout: Duration,
}

impl IncidentConfig {
    /// Key lookup with fallback. Does not validate; see [`IncidentConfig::validate`].
    pub fn parse(raw: &RawConfig) -> Self {
        Self {
            source: non_empty(raw, "source").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            default_severity: non_empty(raw, "defaultSeverity")
                .unwrap_or_else(|| DEFAULT_SEVERITY.to_string()),
            api_token: non_empty(raw, "apiToken").unwrap_or_default(),
            api_url: non_empty(raw, "apiURL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            service_id: non_empty(raw, "serviceID").unwrap_or_default(),
            from_email: non_empty(raw, "fromEmail").unwrap_or_default(),
            timeout: timeout(raw),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.api_token, "apiToken")?;
        require(&self.api_url, "apiURL")?;
        require(&self.service_id, "serviceID")?;
        require(&self.from_email, "fromEmail")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub source: String,
    pub api_token: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn parse(raw: &RawConfig) -> Self {
        Self {
            source: non_empty(raw, "source").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            api_token: non_empty(raw, "apiToken").unwrap_or_default(),
            api_url: non_empty(raw, "apiURL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout: timeout(raw),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.api_token, "apiToken")?;
        require(&self.api_url, "apiURL")
    }
}
