pub mod client;
pub mod incident;
pub mod service;

pub use client::PagerDutyClient;
pub use incident::PagerDutyIncidentProvider;
pub use service::PagerDutyServiceProvider;
