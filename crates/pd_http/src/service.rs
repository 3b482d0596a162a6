use pd_core::config::{RawConfig, ServiceConfig};
use pd_core::context::RequestContext;
use pd_core::convert::to_host_service;
use pd_core::domain::{Service, ServiceQuery};
use pd_core::error::AppError;
use pd_core::provider::ServiceProvider;
use pd_core::records::{ServiceEnvelope, ServiceList};
use pd_core::translate::translate_service_query;

use crate::client::{entity_path, NotFound, PagerDutyClient};

#[derive(Debug, Clone)]
pub struct PagerDutyServiceProvider {
    cfg: ServiceConfig,
    client: PagerDutyClient,
}

impl PagerDutyServiceProvider {
    pub fn new(raw: &RawConfig) -> Result<Self, AppError> {
        Self::from_config(ServiceConfig::parse(raw))
    }

    pub fn from_config(cfg: ServiceConfig) -> Result<Self, AppError> {
        cfg.validate()?;
        let client = PagerDutyClient::new(&cfg.api_url, &cfg.api_token, cfg.timeout);
        Ok(Self { cfg, client })
    }
}

impl ServiceProvider for PagerDutyServiceProvider {
    fn query(&self, ctx: &RequestContext, query: &ServiceQuery) -> Result<Vec<Service>, AppError> {
        let params = translate_service_query(ctx, query, &self.client)?;
        if params.matches_nothing() {
            tracing::debug!("team scope resolved to no ids; skipping service listing");
            return Ok(Vec::new());
        }

        let list: ServiceList = self.client.list_json(ctx, "/services", &params)?;
        Ok(list
            .services
            .iter()
            .map(|svc| to_host_service(svc, &self.cfg.source))
            .collect())
    }

    fn get(&self, ctx: &RequestContext, id: &str) -> Result<Service, AppError> {
        let envelope: ServiceEnvelope = self.client.get_json(
            ctx,
            &entity_path("service", "/services", id)?,
            &[],
            NotFound::Entity("service"),
        )?;
        Ok(to_host_service(&envelope.service, &self.cfg.source))
    }
}
