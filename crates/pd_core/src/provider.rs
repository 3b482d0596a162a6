use crate::context::RequestContext;
use crate::domain::{
    CreateIncidentInput, Incident, IncidentQuery, Service, ServiceQuery, TimelineAppendInput,
    TimelineEntry, UpdateIncidentInput,
};
use crate::error::AppError;

/// Incident operations exposed to the host.
///
/// `get`, `update`, `get_timeline` and `append_timeline` return an error with
/// [`ErrorKind::NotFound`](crate::error::ErrorKind::NotFound) when the id does not exist; a query
/// that matches nothing is an empty `Vec`, not an error.
pub trait IncidentProvider {
    fn query(&self, ctx: &RequestContext, query: &IncidentQuery) -> Result<Vec<Incident>, AppError>;
    fn list(&self, ctx: &RequestContext) -> Result<Vec<Incident>, AppError>;
    fn get(&self, ctx: &RequestContext, id: &str) -> Result<Incident, AppError>;
    fn create(&self, ctx: &RequestContext, input: &CreateIncidentInput)
        -> Result<Incident, AppError>;
    fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        input: &UpdateIncidentInput,
    ) -> Result<Incident, AppError>;
    fn get_timeline(&self, ctx: &RequestContext, id: &str) -> Result<Vec<TimelineEntry>, AppError>;
    fn append_timeline(
        &self,
        ctx: &RequestContext,
        id: &str,
        entry: &TimelineAppendInput,
    ) -> Result<(), AppError>;
}

pub trait ServiceProvider {
    fn query(&self, ctx: &RequestContext, query: &ServiceQuery) -> Result<Vec<Service>, AppError>;
    fn get(&self, ctx: &RequestContext, id: &str) -> Result<Service, AppError>;
}
