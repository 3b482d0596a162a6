use std::time::Duration;

use pd_core::context::RequestContext;
use pd_core::error::AppError;
use pd_core::filters::FilterParams;
use pd_core::records::NamedEntity;
use pd_core::resolve::{EntityKind, EntityLister};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const ACCEPT: &str = "application/vnd.pagerduty+json;version=2";

/// Blocking PagerDuty REST v2 client. Every call is bounded by the request context.
#[derive(Debug, Clone)]
pub struct PagerDutyClient {
    base_url: String,
    api_token: String,
    from_email: Option<String>,
    timeout: Duration,
    agent: ureq::Agent,
}

/// What a 404 means for a given call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    /// A referenced entity does not exist.
    Entity(&'static str),
    /// Treated like any other non-2xx response.
    Error,
}

/// Builds `{collection}/{id}` for a single-entity endpoint.
///
/// An empty id cannot name anything and is reported as not found. Ids that would change the
/// request path or query (`/`, `?`, `#`, `%`, whitespace, control characters) are rejected.
pub fn entity_path(what: &'static str, collection: &str, id: &str) -> Result<String, AppError> {
    if id.is_empty() {
        return Err(AppError::not_found(format!("{what} not found")).with_details("empty id"));
    }
    if id
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(AppError::invalid_request(format!("invalid {what} id"))
            .with_details(format!("id={id:?}")));
    }
    Ok(format!("{collection}/{id}"))
}

impl PagerDutyClient {
    pub fn new(base_url: &str, api_token: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            from_email: None,
            timeout,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Sets the `From` header sent on writes.
    pub fn with_from_email(mut self, from_email: &str) -> Self {
        self.from_email = Some(from_email.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, ctx: &RequestContext, method: &str, path: &str) -> Result<ureq::Request, AppError> {
        ctx.check()?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method, %url, "pagerduty request");
        Ok(self
            .agent
            .request(method, &url)
            .timeout(ctx.call_timeout(self.timeout))
            .set("Authorization", &format!("Token token={}", self.api_token))
            .set("Accept", ACCEPT))
    }

    fn write_request(
        &self,
        ctx: &RequestContext,
        method: &str,
        path: &str,
    ) -> Result<ureq::Request, AppError> {
        let mut req = self
            .request(ctx, method, path)?
            .set("Content-Type", "application/json");
        if let Some(from) = &self.from_email {
            req = req.set("From", from);
        }
        Ok(req)
    }

    fn finish(
        result: Result<ureq::Response, ureq::Error>,
        expected: u16,
        not_found: NotFound,
    ) -> Result<ureq::Response, AppError> {
        let err = match result {
            Ok(r) if r.status() == expected => return Ok(r),
            Ok(r) => {
                let status = r.status();
                AppError::transport_status(status, r.into_string().unwrap_or_default())
            }
            Err(ureq::Error::Status(status, r)) => {
                if let (404, NotFound::Entity(what)) = (status, not_found) {
                    return Err(AppError::not_found(format!("{what} not found")).with_status(404));
                }
                AppError::transport_status(status, r.into_string().unwrap_or_default())
                    .with_retryable(status == 429 || status >= 500)
            }
            Err(ureq::Error::Transport(t)) => {
                AppError::transport("Failed to call PagerDuty").with_details(t.to_string())
            }
        };
        tracing::warn!(error = %err, "pagerduty call failed");
        Err(err)
    }

    fn decode<T: DeserializeOwned>(resp: ureq::Response) -> Result<T, AppError> {
        resp.into_json::<T>().map_err(|e| {
            AppError::decode("Failed to decode PagerDuty response").with_details(e.to_string())
        })
    }

    /// GET with query parameters in insertion order; expects 200.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        params: &[(&str, &str)],
        not_found: NotFound,
    ) -> Result<T, AppError> {
        let mut req = self.request(ctx, "GET", path)?;
        for (k, v) in params {
            req = req.query(k, v);
        }
        let resp = Self::finish(req.call(), 200, not_found)?;
        Self::decode(resp)
    }

    /// GET a listing endpoint with a translated filter set.
    pub fn list_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        params: &FilterParams,
    ) -> Result<T, AppError> {
        self.get_json(ctx, path, &params.query_pairs(), NotFound::Error)
    }

    /// POST/PUT a JSON body and decode the reply.
    pub fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        method: &str,
        path: &str,
        body: &B,
        expected: u16,
        not_found: NotFound,
    ) -> Result<T, AppError> {
        let resp = self.send(ctx, method, path, body, expected, not_found)?;
        Self::decode(resp)
    }

    /// POST/PUT a JSON body, ignoring the reply body.
    pub fn send<B: Serialize>(
        &self,
        ctx: &RequestContext,
        method: &str,
        path: &str,
        body: &B,
        expected: u16,
        not_found: NotFound,
    ) -> Result<ureq::Response, AppError> {
        let payload = serde_json::to_value(body).map_err(|e| {
            AppError::invalid_request("Failed to encode PagerDuty request").with_details(e.to_string())
        })?;
        let req = self.write_request(ctx, method, path)?;
        Self::finish(req.send_json(payload), expected, not_found)
    }
}

impl EntityLister for PagerDutyClient {
    fn list_entities(
        &self,
        ctx: &RequestContext,
        kind: EntityKind,
        query: &str,
        limit: u32,
    ) -> Result<Vec<NamedEntity>, AppError> {
        let limit = limit.to_string();
        let mut body: serde_json::Map<String, serde_json::Value> = self.get_json(
            ctx,
            &format!("/{}", kind.collection()),
            &[("query", query), ("limit", limit.as_str())],
            NotFound::Error,
        )?;
        match body.remove(kind.collection()) {
            Some(serde_json::Value::Null) | None => Ok(Vec::new()),
            Some(rows) => serde_json::from_value(rows).map_err(|e| {
                AppError::decode(format!("Failed to decode {} listing", kind.collection()))
                    .with_details(e.to_string())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::error::ErrorKind;

    #[test]
    fn entity_path_accepts_plain_ids() {
        assert_eq!(entity_path("incident", "/incidents", "PINC1").unwrap(), "/incidents/PINC1");
    }

    #[test]
    fn entity_path_rejects_empty_and_path_changing_ids() {
        let empty = entity_path("incident", "/incidents", "").unwrap_err();
        assert!(empty.is_not_found());
        assert_eq!(empty.message, "incident not found");

        for id in ["X/log_entries", "X?y", "X#y", "X%2Fy", "X y", "X\n"] {
            let err = entity_path("service", "/services", id).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidRequest, "id {id:?}");
        }
    }
}
