use pd_core::config::{IncidentConfig, RawConfig};
use pd_core::context::RequestContext;
use pd_core::convert::{to_host_incident, to_timeline_entry};
use pd_core::domain::{
    CreateIncidentInput, Incident, IncidentQuery, TimelineAppendInput, TimelineEntry,
    UpdateIncidentInput,
};
use pd_core::error::AppError;
use pd_core::provider::IncidentProvider;
use pd_core::records::{IncidentEnvelope, IncidentList, LogEntryList};
use pd_core::translate::translate_incident_query;
use pd_core::vocab::{severity_to_urgency, status_to_provider_status};
use serde_json::{json, Map, Value};

use crate::client::{entity_path, NotFound, PagerDutyClient};

#[derive(Debug, Clone)]
pub struct PagerDutyIncidentProvider {
    cfg: IncidentConfig,
    client: PagerDutyClient,
}

impl PagerDutyIncidentProvider {
    /// Parses and validates host config; refuses to start without credentials.
    pub fn new(raw: &RawConfig) -> Result<Self, AppError> {
        Self::from_config(IncidentConfig::parse(raw))
    }

    pub fn from_config(cfg: IncidentConfig) -> Result<Self, AppError> {
        cfg.validate()?;
        let client = PagerDutyClient::new(&cfg.api_url, &cfg.api_token, cfg.timeout)
            .with_from_email(&cfg.from_email);
        Ok(Self { cfg, client })
    }

    fn incident_path(id: &str) -> Result<String, AppError> {
        entity_path("incident", "/incidents", id)
    }

    fn convert(&self, envelope: IncidentEnvelope) -> Incident {
        to_host_incident(&envelope.incident, &self.cfg.source)
    }
}

fn create_payload(input: &CreateIncidentInput, cfg: &IncidentConfig) -> Value {
    let severity = if input.severity.is_empty() {
        cfg.default_severity.as_str()
    } else {
        input.severity.as_str()
    };
    let mut incident = Map::new();
    incident.insert("type".into(), json!("incident"));
    incident.insert("title".into(), json!(input.title));
    incident.insert(
        "service".into(),
        json!({ "id": cfg.service_id, "type": "service_reference" }),
    );
    incident.insert("urgency".into(), json!(severity_to_urgency(severity)));

    let details = if input.description.is_empty() {
        input.fields.get("body").cloned()
    } else {
        Some(json!(input.description))
    };
    if let Some(details) = details {
        incident.insert(
            "body".into(),
            json!({ "type": "incident_body", "details": details }),
        );
    }
    json!({ "incident": incident })
}

fn update_payload(input: &UpdateIncidentInput) -> Value {
    let mut incident = Map::new();
    incident.insert("type".into(), json!("incident"));
    if let Some(title) = &input.title {
        incident.insert("title".into(), json!(title));
    }
    if let Some(status) = &input.status {
        incident.insert("status".into(), json!(status_to_provider_status(status)));
    }
    if let Some(severity) = &input.severity {
        incident.insert("urgency".into(), json!(severity_to_urgency(severity)));
    }
    json!({ "incident": incident })
}

impl IncidentProvider for PagerDutyIncidentProvider {
    fn query(&self, ctx: &RequestContext, query: &IncidentQuery) -> Result<Vec<Incident>, AppError> {
        let params = translate_incident_query(ctx, query, &self.client)?;
        if params.matches_nothing() {
            tracing::debug!(
                empty = ?params.empty_filters().collect::<Vec<_>>(),
                "scope filter resolved to no ids; skipping incident listing"
            );
            return Ok(Vec::new());
        }

        let list: IncidentList = self.client.list_json(ctx, "/incidents", &params)?;
        Ok(list
            .incidents
            .iter()
            .map(|inc| to_host_incident(inc, &self.cfg.source))
            .collect())
    }

    fn list(&self, ctx: &RequestContext) -> Result<Vec<Incident>, AppError> {
        self.query(ctx, &IncidentQuery::default())
    }

    fn get(&self, ctx: &RequestContext, id: &str) -> Result<Incident, AppError> {
        let envelope: IncidentEnvelope = self.client.get_json(
            ctx,
            &Self::incident_path(id)?,
            &[],
            NotFound::Entity("incident"),
        )?;
        Ok(self.convert(envelope))
    }

    fn create(&self, ctx: &RequestContext, input: &CreateIncidentInput) -> Result<Incident, AppError> {
        let envelope: IncidentEnvelope = self.client.send_json(
            ctx,
            "POST",
            "/incidents",
            &create_payload(input, &self.cfg),
            201,
            NotFound::Error,
        )?;
        tracing::info!(id = %envelope.incident.id, "created pagerduty incident");
        Ok(self.convert(envelope))
    }

    fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: &UpdateIncidentInput,
    ) -> Result<Incident, AppError> {
        let envelope: IncidentEnvelope = self.client.send_json(
            ctx,
            "PUT",
            &Self::incident_path(id)?,
            &update_payload(input),
            200,
            NotFound::Entity("incident"),
        )?;
        Ok(self.convert(envelope))
    }

    fn get_timeline(&self, ctx: &RequestContext, id: &str) -> Result<Vec<TimelineEntry>, AppError> {
        let list: LogEntryList = self.client.get_json(
            ctx,
            &format!("{}/log_entries", Self::incident_path(id)?),
            &[],
            NotFound::Entity("incident"),
        )?;
        Ok(list
            .log_entries
            .iter()
            .map(|le| to_timeline_entry(le, id))
            .collect())
    }

    fn append_timeline(
        &self,
        ctx: &RequestContext,
        id: &str,
        entry: &TimelineAppendInput,
    ) -> Result<(), AppError> {
        self.client.send(
            ctx,
            "POST",
            &format!("{}/notes", Self::incident_path(id)?),
            &json!({ "note": { "content": entry.body } }),
            201,
            NotFound::Entity("incident"),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> IncidentConfig {
        let mut raw = RawConfig::new();
        raw.insert("apiToken".into(), json!("t"));
        raw.insert("serviceID".into(), json!("PDEFAULT"));
        raw.insert("fromEmail".into(), json!("ops@example.com"));
        raw.insert("defaultSeverity".into(), json!("low"));
        IncidentConfig::parse(&raw)
    }

    #[test]
    fn create_payload_uses_default_severity_and_description() {
        let input = CreateIncidentInput {
            title: "db down".to_string(),
            description: "replica lag".to_string(),
            ..CreateIncidentInput::default()
        };
        let payload = create_payload(&input, &cfg());
        assert_eq!(
            payload,
            json!({
                "incident": {
                    "type": "incident",
                    "title": "db down",
                    "service": { "id": "PDEFAULT", "type": "service_reference" },
                    "urgency": "low",
                    "body": { "type": "incident_body", "details": "replica lag" }
                }
            })
        );
    }

    #[test]
    fn create_payload_falls_back_to_body_field() {
        let mut input = CreateIncidentInput {
            title: "t".to_string(),
            severity: "sev1".to_string(),
            ..CreateIncidentInput::default()
        };
        input.fields.insert("body".into(), json!("from fields"));
        let payload = create_payload(&input, &cfg());
        assert_eq!(payload["incident"]["urgency"], json!("high"));
        assert_eq!(payload["incident"]["body"]["details"], json!("from fields"));
    }

    #[test]
    fn update_payload_maps_vocabulary_and_skips_unset() {
        let input = UpdateIncidentInput {
            status: Some("closed".to_string()),
            severity: Some("p3".to_string()),
            ..UpdateIncidentInput::default()
        };
        assert_eq!(
            update_payload(&input),
            json!({ "incident": { "type": "incident", "status": "resolved", "urgency": "low" } })
        );
    }
}
