//! Host query -> PagerDuty filter parameters.
//!
//! Every recognized input adds filters and nothing removes them. Scope names are resolved to ids
//! (service first, then team) before metadata passthrough ids are appended, and both land in the
//! same multi-valued parameter: a scope that resolves to nothing plus an explicit `service_id`
//! yields `service_ids[] = [<that id>]`.
//!
//! A configured default service is never applied here. No filters means "everything visible to
//! the credential".

use serde_json::Value;

use crate::context::RequestContext;
use crate::domain::{IncidentQuery, Metadata, ServiceQuery};
use crate::error::AppError;
use crate::filters::{
    FilterParams, DEFAULT_LIMIT, PARAM_INCIDENT_KEY, PARAM_LIMIT, PARAM_QUERY, PARAM_SERVICE_IDS,
    PARAM_STATUSES, PARAM_TEAM_IDS, PARAM_URGENCIES,
};
use crate::resolve::{EntityKind, EntityLister, NameResolver};
use crate::vocab::{severity_to_urgency, status_to_provider_status};

pub const META_FILTER_SERVICE_ID: &str = "service_id";
pub const META_FILTER_TEAM_ID: &str = "team_id";
pub const META_FILTER_INCIDENT_KEY: &str = "incident_key";

fn metadata_str<'m>(metadata: &'m Metadata, key: &str) -> Option<&'m str> {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
}

fn apply_limit(params: &mut FilterParams, limit: i64) {
    let limit = if limit > 0 { limit } else { DEFAULT_LIMIT };
    params.set(PARAM_LIMIT, limit.to_string());
}

fn apply_scope_ids<L: EntityLister + ?Sized>(
    params: &mut FilterParams,
    resolver: &NameResolver<'_, L>,
    ctx: &RequestContext,
    kind: EntityKind,
    name: &str,
    key: &str,
) -> Result<(), AppError> {
    if name.is_empty() {
        return Ok(());
    }
    let ids = resolver.resolve_ids(ctx, kind, name)?;
    if ids.is_empty() {
        tracing::debug!(kind = kind.label(), name, "scope resolved to no ids; filter matches nothing");
    }
    params.extend(key, ids);
    Ok(())
}

/// Builds `/incidents` listing parameters. Fails only when a scope lookup fails.
pub fn translate_incident_query<L: EntityLister + ?Sized>(
    ctx: &RequestContext,
    query: &IncidentQuery,
    lister: &L,
) -> Result<FilterParams, AppError> {
    let resolver = NameResolver::new(lister);
    let mut params = FilterParams::new();

    apply_limit(&mut params, query.limit);

    for status in &query.statuses {
        params.append(PARAM_STATUSES, status_to_provider_status(status));
    }
    for severity in &query.severities {
        params.append(PARAM_URGENCIES, severity_to_urgency(severity));
    }

    if !query.query.is_empty() {
        tracing::debug!("incident listing has no text search; dropping free-text query");
    }

    apply_scope_ids(
        &mut params,
        &resolver,
        ctx,
        EntityKind::Service,
        &query.scope.service,
        PARAM_SERVICE_IDS,
    )?;
    apply_scope_ids(
        &mut params,
        &resolver,
        ctx,
        EntityKind::Team,
        &query.scope.team,
        PARAM_TEAM_IDS,
    )?;
    if !query.scope.environment.is_empty() {
        tracing::debug!(
            environment = %query.scope.environment,
            "environment scope has no provider equivalent; ignoring"
        );
    }

    if let Some(id) = metadata_str(&query.metadata, META_FILTER_SERVICE_ID) {
        params.append(PARAM_SERVICE_IDS, id);
    }
    if let Some(id) = metadata_str(&query.metadata, META_FILTER_TEAM_ID) {
        params.append(PARAM_TEAM_IDS, id);
    }
    if let Some(key) = metadata_str(&query.metadata, META_FILTER_INCIDENT_KEY) {
        params.set(PARAM_INCIDENT_KEY, key);
    }

    Ok(params)
}

/// Builds `/services` listing parameters. `name` goes to the server-side fuzzy `query` verbatim.
pub fn translate_service_query<L: EntityLister + ?Sized>(
    ctx: &RequestContext,
    query: &ServiceQuery,
    lister: &L,
) -> Result<FilterParams, AppError> {
    let resolver = NameResolver::new(lister);
    let mut params = FilterParams::new();

    apply_limit(&mut params, query.limit);

    if !query.name.is_empty() {
        params.set(PARAM_QUERY, query.name.as_str());
    }

    apply_scope_ids(
        &mut params,
        &resolver,
        ctx,
        EntityKind::Team,
        &query.scope.team,
        PARAM_TEAM_IDS,
    )?;

    if let Some(id) = metadata_str(&query.metadata, META_FILTER_TEAM_ID) {
        params.append(PARAM_TEAM_IDS, id);
    }

    Ok(params)
}
