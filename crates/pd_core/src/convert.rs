use serde_json::{json, Value};

use crate::domain::{Incident, Metadata, Service, TimelineEntry};
use crate::normalize::timestamps::normalize_rfc3339;
use crate::records::{PdIncident, PdLogEntry, PdService};
use crate::vocab::{provider_status_to_status, urgency_to_severity};

// Metadata keys written by the converters. Callers read these back, so they are stable.
pub const META_SOURCE: &str = "source";
pub const META_INCIDENT_KEY: &str = "incident_key";
pub const META_SERVICE_ID: &str = "service_id";
pub const META_SERVICE_URL: &str = "service_url";
pub const META_HTML_URL: &str = "html_url";
pub const META_LAST_STATUS_CHANGE_AT: &str = "last_status_change_at";
pub const META_PROVIDER_STATUS: &str = "pagerduty_status";
pub const META_URGENCY: &str = "urgency";
pub const META_ASSIGNMENTS: &str = "assignments";
pub const META_SUMMARY: &str = "summary";
pub const META_DESCRIPTION: &str = "description";
pub const META_STATUS: &str = "status";
pub const META_ALERT_CREATION: &str = "alert_creation";
pub const META_ESCALATION_POLICY: &str = "escalation_policy";
pub const META_TEAMS: &str = "teams";
pub const META_TYPE: &str = "type";

fn string(value: &str) -> Value {
    Value::String(value.to_string())
}

/// Builds a host incident from a PagerDuty incident. Never fails; absent data stays empty.
pub fn to_host_incident(record: &PdIncident, source: &str) -> Incident {
    let mut metadata = Metadata::new();
    metadata.insert(META_SOURCE.into(), string(source));
    metadata.insert(META_INCIDENT_KEY.into(), string(&record.incident_key));
    metadata.insert(META_SERVICE_ID.into(), string(&record.service.id));
    metadata.insert(META_SERVICE_URL.into(), string(&record.service.html_url));
    metadata.insert(META_HTML_URL.into(), string(&record.html_url));
    metadata.insert(
        META_LAST_STATUS_CHANGE_AT.into(),
        string(&record.last_status_change_at),
    );
    metadata.insert(META_PROVIDER_STATUS.into(), string(&record.status));
    metadata.insert(META_URGENCY.into(), string(&record.urgency));

    if !record.assignments.is_empty() {
        let assignees = record
            .assignments
            .iter()
            .map(|a| {
                json!({
                    "id": a.assignee.id,
                    "name": a.assignee.summary,
                    "html_url": a.assignee.html_url,
                })
            })
            .collect();
        metadata.insert(META_ASSIGNMENTS.into(), Value::Array(assignees));
    }

    Incident {
        id: record.id.clone(),
        title: record.title.clone(),
        description: record
            .body
            .as_ref()
            .map(|b| b.details.clone())
            .unwrap_or_default(),
        status: provider_status_to_status(&record.status),
        severity: urgency_to_severity(&record.urgency).to_string(),
        service: record.service.summary.clone(),
        created_at: normalize_rfc3339(&record.created_at),
        updated_at: normalize_rfc3339(&record.updated_at),
        fields: Metadata::new(),
        metadata,
    }
}

/// Builds a host service. Team summaries are also copied to positional `team_<i>` tags in source
/// order.
pub fn to_host_service(record: &PdService, source: &str) -> Service {
    let mut svc = Service {
        id: record.id.clone(),
        name: record.name.clone(),
        ..Service::default()
    };

    svc.metadata.insert(META_SOURCE.into(), string(source));
    svc.metadata.insert(META_SUMMARY.into(), string(&record.summary));
    svc.metadata
        .insert(META_DESCRIPTION.into(), string(&record.description));
    svc.metadata.insert(META_STATUS.into(), string(&record.status));
    svc.metadata.insert(META_HTML_URL.into(), string(&record.html_url));
    svc.metadata
        .insert(META_ALERT_CREATION.into(), string(&record.alert_creation));

    if let Some(policy) = record.escalation_policy.as_ref().filter(|p| !p.id.is_empty()) {
        svc.metadata.insert(
            META_ESCALATION_POLICY.into(),
            json!({ "id": policy.id, "summary": policy.summary }),
        );
    }

    if !record.teams.is_empty() {
        let mut teams = Vec::with_capacity(record.teams.len());
        for (i, team) in record.teams.iter().enumerate() {
            teams.push(json!({ "id": team.id, "summary": team.summary }));
            svc.tags.insert(format!("team_{i}"), team.summary.clone());
        }
        svc.metadata.insert(META_TEAMS.into(), Value::Array(teams));
    }

    svc
}

pub fn to_timeline_entry(record: &PdLogEntry, incident_id: &str) -> TimelineEntry {
    let mut entry = TimelineEntry {
        id: record.id.clone(),
        incident_id: incident_id.to_string(),
        at: normalize_rfc3339(&record.created_at),
        kind: record.kind.clone(),
        body: record.summary.clone(),
        ..TimelineEntry::default()
    };
    entry.metadata.insert(META_TYPE.into(), string(&record.kind));

    if let Some(agent) = &record.agent {
        entry.actor.insert("name".into(), string(&agent.summary));
    }

    entry
}
