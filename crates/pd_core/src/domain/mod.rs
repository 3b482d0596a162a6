use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open-ended side-channel for provider detail with no first-class host field.
pub type Metadata = serde_json::Map<String, Value>;

/// Canonical incident representation handed back to the host.
///
/// Notes:
/// - `status` and `severity` are in host vocabulary (`open`, `critical`, ...).
/// - Timestamps are RFC3339 UTC strings; `None` is the zero timestamp and is used whenever the
///   provider value is absent or unparseable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub severity: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub fields: Metadata,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub tags: BTreeMap<String, String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineEntry {
    pub id: String,
    pub incident_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    pub kind: String,
    pub body: String,
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub actor: Metadata,
    pub metadata: Metadata,
}

/// Canonical, human-readable scope names. Each must be resolved to provider ids before use.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryScope {
    pub service: String,
    pub team: String,
    pub environment: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct IncidentQuery {
    /// Free text. The incident listing endpoint has no text search, so this is never translated.
    pub query: String,
    pub statuses: Vec<String>,
    pub severities: Vec<String>,
    pub scope: QueryScope,
    pub limit: i64,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceQuery {
    pub name: String,
    pub scope: QueryScope,
    pub limit: i64,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateIncidentInput {
    pub title: String,
    pub description: String,
    pub status: String,
    pub severity: String,
    pub service: String,
    pub fields: Metadata,
    pub metadata: Metadata,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateIncidentInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub severity: Option<String>,
    pub service: Option<String>,
    pub fields: Option<Metadata>,
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineAppendInput {
    pub at: Option<String>,
    pub kind: String,
    pub body: String,
    pub actor: Metadata,
    pub metadata: Metadata,
}
