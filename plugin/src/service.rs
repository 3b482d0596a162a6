use pd_core::config::RawConfig;
use pd_core::context::RequestContext;
use pd_core::domain::ServiceQuery;
use pd_core::error::AppError;
use pd_core::provider::ServiceProvider;
use pd_http::PagerDutyServiceProvider;
use serde_json::Value;

use crate::host::PluginHost;
use crate::rpc::{decode_payload, encode_result, unknown_method, Handler, IdPayload, RpcRequest};

pub const METHOD_QUERY: &str = "service.query";
pub const METHOD_GET: &str = "service.get";

pub fn dispatch<P: ServiceProvider + ?Sized>(
    provider: &P,
    ctx: &RequestContext,
    method: &str,
    payload: Value,
) -> Result<Value, AppError> {
    match method {
        METHOD_QUERY => {
            let query: ServiceQuery = decode_payload(method, payload)?;
            encode_result(&provider.query(ctx, &query)?)
        }
        METHOD_GET => {
            let p: IdPayload = decode_payload(method, payload)?;
            encode_result(&provider.get(ctx, &p.id)?)
        }
        other => Err(unknown_method(other)),
    }
}

pub struct ServicePlugin {
    host: PluginHost<Box<dyn ServiceProvider>>,
}

impl ServicePlugin {
    pub fn new(
        factory: impl FnMut(&RawConfig) -> Result<Box<dyn ServiceProvider>, AppError> + 'static,
    ) -> Self {
        Self {
            host: PluginHost::new(factory),
        }
    }

    pub fn pagerduty() -> Self {
        Self::new(|cfg| {
            let provider = PagerDutyServiceProvider::new(cfg)?;
            Ok(Box::new(provider) as Box<dyn ServiceProvider>)
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.host.is_initialized()
    }
}

impl Handler for ServicePlugin {
    fn handle(&mut self, ctx: &RequestContext, request: RpcRequest) -> Result<Value, AppError> {
        let provider = self.host.ensure_provider(&request.config)?;
        dispatch(&**provider, ctx, &request.method, request.payload)
    }
}
