//! In-memory reference providers.
//!
//! One mutex guards all state and is held for the whole of each operation. Everything crossing the
//! boundary is cloned on the way in and on the way out, so callers never share a map with the
//! store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::context::RequestContext;
use crate::domain::{
    CreateIncidentInput, Incident, IncidentQuery, Service, ServiceQuery,
    TimelineAppendInput, TimelineEntry, UpdateIncidentInput,
};
use crate::error::{AppError, ErrorKind};
use crate::normalize::timestamps::now_rfc3339_utc;
use crate::provider::{IncidentProvider, ServiceProvider};

const DEFAULT_STATUS: &str = "open";

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    m.lock().map_err(|_| {
        AppError::new(
            ErrorKind::InvalidRequest,
            "MOCK_STATE_POISONED",
            "In-memory provider state is unusable after a panic",
        )
    })
}

fn apply_limit<T>(mut items: Vec<T>, limit: i64) -> Vec<T> {
    if limit > 0 {
        items.truncate(limit as usize);
    }
    items
}

#[derive(Debug, Default)]
struct IncidentState {
    next_id: u64,
    next_entry_id: u64,
    incidents: Vec<Incident>,
    timelines: HashMap<String, Vec<TimelineEntry>>,
}

impl IncidentState {
    fn find_mut(&mut self, id: &str) -> Result<&mut Incident, AppError> {
        self.incidents
            .iter_mut()
            .find(|inc| inc.id == id)
            .ok_or_else(|| AppError::not_found("incident not found").with_details(format!("id={id}")))
    }
}

#[derive(Debug, Default)]
pub struct MockIncidentProvider {
    state: Mutex<IncidentState>,
}

impl MockIncidentProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

fn incident_matches(inc: &Incident, q: &IncidentQuery) -> bool {
    if !q.statuses.is_empty() && !q.statuses.iter().any(|s| s.eq_ignore_ascii_case(&inc.status)) {
        return false;
    }
    if !q.severities.is_empty()
        && !q
            .severities
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&inc.severity))
    {
        return false;
    }
    if !q.query.is_empty() && !contains_ci(&inc.title, &q.query) {
        return false;
    }
    if !q.scope.service.is_empty() && !contains_ci(&inc.service, &q.scope.service) {
        return false;
    }
    if !q.scope.team.is_empty() {
        let team = inc
            .metadata
            .get("team")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        if !contains_ci(team, &q.scope.team) {
            return false;
        }
    }
    q.metadata
        .iter()
        .all(|(k, v)| inc.metadata.get(k) == Some(v))
}

impl IncidentProvider for MockIncidentProvider {
    fn query(&self, _ctx: &RequestContext, query: &IncidentQuery) -> Result<Vec<Incident>, AppError> {
        let state = lock(&self.state)?;
        let matched = state
            .incidents
            .iter()
            .filter(|inc| incident_matches(inc, query))
            .cloned()
            .collect();
        Ok(apply_limit(matched, query.limit))
    }

    fn list(&self, _ctx: &RequestContext) -> Result<Vec<Incident>, AppError> {
        Ok(lock(&self.state)?.incidents.clone())
    }

    fn get(&self, _ctx: &RequestContext, id: &str) -> Result<Incident, AppError> {
        let mut state = lock(&self.state)?;
        let inc = state.find_mut(id)?;
        Ok(inc.clone())
    }

    fn create(
        &self,
        _ctx: &RequestContext,
        input: &CreateIncidentInput,
    ) -> Result<Incident, AppError> {
        let now = now_rfc3339_utc()?;
        let mut state = lock(&self.state)?;
        state.next_id += 1;
        let status = if input.status.is_empty() {
            DEFAULT_STATUS.to_string()
        } else {
            input.status.clone()
        };
        let incident = Incident {
            id: format!("inc-{}", state.next_id),
            title: input.title.clone(),
            description: input.description.clone(),
            status,
            severity: input.severity.clone(),
            service: input.service.clone(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
            fields: input.fields.clone(),
            metadata: input.metadata.clone(),
        };
        state.timelines.insert(incident.id.clone(), Vec::new());
        state.incidents.push(incident.clone());
        Ok(incident)
    }

    fn update(
        &self,
        _ctx: &RequestContext,
        id: &str,
        input: &UpdateIncidentInput,
    ) -> Result<Incident, AppError> {
        let now = now_rfc3339_utc()?;
        let mut state = lock(&self.state)?;
        let inc = state.find_mut(id)?;
        if let Some(title) = &input.title {
            inc.title = title.clone();
        }
        if let Some(description) = &input.description {
            inc.description = description.clone();
        }
        if let Some(status) = &input.status {
            inc.status = status.clone();
        }
        if let Some(severity) = &input.severity {
            inc.severity = severity.clone();
        }
        if let Some(service) = &input.service {
            inc.service = service.clone();
        }
        if let Some(fields) = &input.fields {
            inc.fields = fields.clone();
        }
        if let Some(metadata) = &input.metadata {
            inc.metadata = metadata.clone();
        }
        inc.updated_at = Some(now);
        Ok(inc.clone())
    }

    fn get_timeline(&self, _ctx: &RequestContext, id: &str) -> Result<Vec<TimelineEntry>, AppError> {
        let state = lock(&self.state)?;
        state
            .timelines
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("incident not found").with_details(format!("id={id}")))
    }

    fn append_timeline(
        &self,
        _ctx: &RequestContext,
        id: &str,
        entry: &TimelineAppendInput,
    ) -> Result<(), AppError> {
        let at = match &entry.at {
            Some(at) => at.clone(),
            None => now_rfc3339_utc()?,
        };
        let mut state = lock(&self.state)?;
        state.find_mut(id)?;
        state.next_entry_id += 1;
        let stored = TimelineEntry {
            id: format!("tl-{}", state.next_entry_id),
            incident_id: id.to_string(),
            at: Some(at),
            kind: entry.kind.clone(),
            body: entry.body.clone(),
            actor: entry.actor.clone(),
            metadata: entry.metadata.clone(),
        };
        state.timelines.entry(id.to_string()).or_default().push(stored);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockServiceProvider {
    services: Mutex<Vec<Service>>,
}

impl MockServiceProvider {
    pub fn with_services(services: Vec<Service>) -> Self {
        Self {
            services: Mutex::new(services),
        }
    }
}

fn service_matches(svc: &Service, q: &ServiceQuery) -> bool {
    if !q.name.is_empty() && !contains_ci(&svc.name, &q.name) {
        return false;
    }
    if !q.scope.team.is_empty() && !svc.tags.values().any(|t| contains_ci(t, &q.scope.team)) {
        return false;
    }
    q.metadata
        .iter()
        .all(|(k, v)| svc.metadata.get(k) == Some(v))
}

impl ServiceProvider for MockServiceProvider {
    fn query(&self, _ctx: &RequestContext, query: &ServiceQuery) -> Result<Vec<Service>, AppError> {
        let services = lock(&self.services)?;
        let matched = services
            .iter()
            .filter(|svc| service_matches(svc, query))
            .cloned()
            .collect();
        Ok(apply_limit(matched, query.limit))
    }

    fn get(&self, _ctx: &RequestContext, id: &str) -> Result<Service, AppError> {
        lock(&self.services)?
            .iter()
            .find(|svc| svc.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("service not found").with_details(format!("id={id}")))
    }
}
