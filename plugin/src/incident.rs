use pd_core::config::RawConfig;
use pd_core::context::RequestContext;
use pd_core::domain::{CreateIncidentInput, IncidentQuery, TimelineAppendInput, UpdateIncidentInput};
use pd_core::error::AppError;
use pd_core::provider::IncidentProvider;
use pd_http::PagerDutyIncidentProvider;
use serde_json::{json, Value};

use crate::host::PluginHost;
use crate::rpc::{
    decode_payload, encode_result, unknown_method, Handler, IdInputPayload, IdPayload, RpcRequest,
};

pub const METHOD_QUERY: &str = "incident.query";
pub const METHOD_LIST: &str = "incident.list";
pub const METHOD_GET: &str = "incident.get";
pub const METHOD_CREATE: &str = "incident.create";
pub const METHOD_UPDATE: &str = "incident.update";
pub const METHOD_TIMELINE_GET: &str = "incident.timeline.get";
pub const METHOD_TIMELINE_APPEND: &str = "incident.timeline.append";

/// Routes one incident method to `provider`.
pub fn dispatch<P: IncidentProvider + ?Sized>(
    provider: &P,
    ctx: &RequestContext,
    method: &str,
    payload: Value,
) -> Result<Value, AppError> {
    match method {
        METHOD_QUERY => {
            let query: IncidentQuery = decode_payload(method, payload)?;
            encode_result(&provider.query(ctx, &query)?)
        }
        METHOD_LIST => encode_result(&provider.list(ctx)?),
        METHOD_GET => {
            let p: IdPayload = decode_payload(method, payload)?;
            encode_result(&provider.get(ctx, &p.id)?)
        }
        METHOD_CREATE => {
            let input: CreateIncidentInput = decode_payload(method, payload)?;
            encode_result(&provider.create(ctx, &input)?)
        }
        METHOD_UPDATE => {
            let p: IdInputPayload<UpdateIncidentInput> = decode_payload(method, payload)?;
            encode_result(&provider.update(ctx, &p.id, &p.input)?)
        }
        METHOD_TIMELINE_GET => {
            let p: IdPayload = decode_payload(method, payload)?;
            encode_result(&provider.get_timeline(ctx, &p.id)?)
        }
        METHOD_TIMELINE_APPEND => {
            let p: IdInputPayload<TimelineAppendInput> = decode_payload(method, payload)?;
            provider.append_timeline(ctx, &p.id, &p.input)?;
            Ok(json!({ "status": "ok" }))
        }
        other => Err(unknown_method(other)),
    }
}

/// The incident plugin process state.
pub struct IncidentPlugin {
    host: PluginHost<Box<dyn IncidentProvider>>,
}

impl IncidentPlugin {
    pub fn new(
        factory: impl FnMut(&RawConfig) -> Result<Box<dyn IncidentProvider>, AppError> + 'static,
    ) -> Self {
        Self {
            host: PluginHost::new(factory),
        }
    }

    /// Builds a PagerDuty-backed provider from the first request's config.
    pub fn pagerduty() -> Self {
        Self::new(|cfg| {
            let provider = PagerDutyIncidentProvider::new(cfg)?;
            Ok(Box::new(provider) as Box<dyn IncidentProvider>)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.host.is_initialized()
    }
}

impl Handler for IncidentPlugin {
    fn handle(&mut self, ctx: &RequestContext, request: RpcRequest) -> Result<Value, AppError> {
        let provider = self.host.ensure_provider(&request.config)?;
        dispatch(&**provider, ctx, &request.method, request.payload)
    }
}
