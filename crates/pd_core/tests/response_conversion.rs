use pd_core::convert::{to_host_incident, to_host_service, to_timeline_entry};
use pd_core::records::{IncidentEnvelope, PdIncident, PdLogEntry, PdService};
use pretty_assertions::assert_eq;
use serde_json::json;

fn full_incident() -> PdIncident {
    let raw = json!({
        "incident": {
            "id": "PINCIDENT1",
            "incident_key": "key123",
            "title": "Checkout failing",
            "status": "acknowledged",
            "urgency": "high",
            "html_url": "https://acme.pagerduty.com/incidents/PINCIDENT1",
            "service": {
                "id": "PSVC1",
                "type": "service_reference",
                "summary": "Checkout API",
                "html_url": "https://acme.pagerduty.com/services/PSVC1"
            },
            "assignments": [
                { "assignee": { "id": "PUSER1", "summary": "Ada", "html_url": "https://acme.pagerduty.com/users/PUSER1" } },
                { "assignee": { "id": "PUSER2", "summary": "Grace", "html_url": "https://acme.pagerduty.com/users/PUSER2" } }
            ],
            "body": { "type": "incident_body", "details": "Error rate above 5%" },
            "last_status_change_at": "2025-11-21T10:30:00Z",
            "created_at": "2025-11-21T10:00:00Z",
            "updated_at": "2025-11-21T11:00:00+01:00"
        }
    });
    serde_json::from_value::<IncidentEnvelope>(raw).expect("decode").incident
}

#[test]
fn incident_fields_are_mapped_into_host_vocabulary() {
    let inc = to_host_incident(&full_incident(), "pagerduty");
    assert_eq!(inc.id, "PINCIDENT1");
    assert_eq!(inc.title, "Checkout failing");
    assert_eq!(inc.description, "Error rate above 5%");
    assert_eq!(inc.status, "acknowledged");
    assert_eq!(inc.severity, "critical");
    assert_eq!(inc.service, "Checkout API");
    assert_eq!(inc.created_at.as_deref(), Some("2025-11-21T10:00:00Z"));
    assert_eq!(inc.updated_at.as_deref(), Some("2025-11-21T10:00:00Z"));
}

#[test]
fn incident_metadata_carries_every_provider_specific_field() {
    let inc = to_host_incident(&full_incident(), "pd-prod");
    let expected = json!({
        "source": "pd-prod",
        "incident_key": "key123",
        "service_id": "PSVC1",
        "service_url": "https://acme.pagerduty.com/services/PSVC1",
        "html_url": "https://acme.pagerduty.com/incidents/PINCIDENT1",
        "last_status_change_at": "2025-11-21T10:30:00Z",
        "pagerduty_status": "acknowledged",
        "urgency": "high",
        "assignments": [
            { "id": "PUSER1", "name": "Ada", "html_url": "https://acme.pagerduty.com/users/PUSER1" },
            { "id": "PUSER2", "name": "Grace", "html_url": "https://acme.pagerduty.com/users/PUSER2" }
        ]
    });
    assert_eq!(serde_json::Value::Object(inc.metadata), expected);
}

#[test]
fn sparse_incident_degrades_to_zero_values() {
    let record: PdIncident = serde_json::from_value(json!({
        "id": "P2",
        "status": "triggered",
        "urgency": "low",
        "created_at": "not a timestamp"
    }))
    .expect("decode");
    let inc = to_host_incident(&record, "pagerduty");
    assert_eq!(inc.status, "open");
    assert_eq!(inc.severity, "medium");
    assert_eq!(inc.description, "");
    assert_eq!(inc.service, "");
    assert_eq!(inc.created_at, None);
    assert_eq!(inc.updated_at, None);
    assert!(!inc.metadata.contains_key("assignments"));
}

#[test]
fn unknown_provider_status_passes_through() {
    let record = PdIncident {
        id: "P3".to_string(),
        status: "snoozed".to_string(),
        ..PdIncident::default()
    };
    let inc = to_host_incident(&record, "pagerduty");
    assert_eq!(inc.status, "snoozed");
    assert_eq!(inc.severity, "medium");
}

#[test]
fn service_teams_become_positional_tags_in_source_order() {
    let record: PdService = serde_json::from_value(json!({
        "id": "PSVC1",
        "name": "Checkout API",
        "summary": "Checkout API",
        "description": "Handles checkout",
        "status": "active",
        "html_url": "https://acme.pagerduty.com/services/PSVC1",
        "alert_creation": "create_alerts_and_incidents",
        "escalation_policy": { "id": "PEP1", "type": "escalation_policy_reference", "summary": "Primary" },
        "teams": [
            { "id": "TZ", "type": "team_reference", "summary": "Zeta" },
            { "id": "TA", "type": "team_reference", "summary": "Alpha" }
        ]
    }))
    .expect("decode");

    let svc = to_host_service(&record, "pagerduty");
    assert_eq!(svc.id, "PSVC1");
    assert_eq!(svc.name, "Checkout API");
    assert_eq!(svc.tags.get("team_0").map(String::as_str), Some("Zeta"));
    assert_eq!(svc.tags.get("team_1").map(String::as_str), Some("Alpha"));
    assert_eq!(svc.tags.len(), 2);

    let expected = json!({
        "source": "pagerduty",
        "summary": "Checkout API",
        "description": "Handles checkout",
        "status": "active",
        "html_url": "https://acme.pagerduty.com/services/PSVC1",
        "alert_creation": "create_alerts_and_incidents",
        "escalation_policy": { "id": "PEP1", "summary": "Primary" },
        "teams": [
            { "id": "TZ", "summary": "Zeta" },
            { "id": "TA", "summary": "Alpha" }
        ]
    });
    assert_eq!(serde_json::Value::Object(svc.metadata), expected);
}

#[test]
fn service_without_policy_or_teams_omits_those_keys() {
    let record: PdService = serde_json::from_value(json!({
        "id": "PSVC2",
        "name": "Batch",
        "description": null,
        "escalation_policy": null,
        "teams": []
    }))
    .expect("decode");
    let svc = to_host_service(&record, "pagerduty");
    assert!(svc.tags.is_empty());
    assert!(!svc.metadata.contains_key("escalation_policy"));
    assert!(!svc.metadata.contains_key("teams"));
    assert_eq!(svc.metadata.get("description"), Some(&json!("")));
}

#[test]
fn log_entry_becomes_timeline_entry() {
    let record: PdLogEntry = serde_json::from_value(json!({
        "id": "LOG1",
        "type": "acknowledge_log_entry",
        "summary": "Acknowledged by Ada",
        "created_at": "2025-11-21T10:05:00Z",
        "agent": { "id": "PUSER1", "type": "user_reference", "summary": "Ada" }
    }))
    .expect("decode");
    let entry = to_timeline_entry(&record, "PINCIDENT1");
    assert_eq!(entry.id, "LOG1");
    assert_eq!(entry.incident_id, "PINCIDENT1");
    assert_eq!(entry.kind, "acknowledge_log_entry");
    assert_eq!(entry.body, "Acknowledged by Ada");
    assert_eq!(entry.at.as_deref(), Some("2025-11-21T10:05:00Z"));
    assert_eq!(serde_json::Value::Object(entry.actor), json!({ "name": "Ada" }));
    assert_eq!(
        serde_json::Value::Object(entry.metadata),
        json!({ "type": "acknowledge_log_entry" })
    );
}

#[test]
fn log_entry_without_agent_has_no_actor() {
    let record: PdLogEntry = serde_json::from_value(json!({
        "id": "LOG2",
        "type": "trigger_log_entry",
        "summary": "Triggered",
        "created_at": "garbage",
        "agent": null
    }))
    .expect("decode");
    let entry = to_timeline_entry(&record, "P1");
    assert!(entry.actor.is_empty());
    assert_eq!(entry.at, None);
}
