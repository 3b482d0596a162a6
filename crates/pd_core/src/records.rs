//! Raw PagerDuty REST v2 shapes. Every field tolerates absence and `null`.

use serde::{Deserialize, Deserializer};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `{id, type, summary, html_url}` reference object used for services, teams, users, policies.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PdReference {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PdAssignment {
    #[serde(deserialize_with = "null_as_default")]
    pub assignee: PdReference,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PdIncidentBody {
    #[serde(deserialize_with = "null_as_default")]
    pub details: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PdIncident {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub incident_key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub urgency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub service: PdReference,
    #[serde(deserialize_with = "null_as_default")]
    pub assignments: Vec<PdAssignment>,
    pub body: Option<PdIncidentBody>,
    #[serde(deserialize_with = "null_as_default")]
    pub last_status_change_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PdLogEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    pub agent: Option<PdReference>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PdService {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alert_creation: String,
    pub escalation_policy: Option<PdReference>,
    #[serde(deserialize_with = "null_as_default")]
    pub teams: Vec<PdReference>,
}

/// Minimal `{id, name}` row returned by the services/teams listing used for name lookup.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamedEntity {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

impl NamedEntity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// The wrapped record is required; a reply without it fails to decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentEnvelope {
    pub incident: PdIncident,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IncidentList {
    #[serde(deserialize_with = "null_as_default")]
    pub incidents: Vec<PdIncident>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogEntryList {
    #[serde(deserialize_with = "null_as_default")]
    pub log_entries: Vec<PdLogEntry>,
}

/// The wrapped record is required; a reply without it fails to decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceEnvelope {
    pub service: PdService,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceList {
    #[serde(deserialize_with = "null_as_default")]
    pub services: Vec<PdService>,
}
