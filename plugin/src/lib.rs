//! Stdio plugin glue: one JSON request per line in, one JSON response per line out.

pub mod host;
pub mod incident;
pub mod logging;
pub mod rpc;
pub mod service;

pub use host::PluginHost;
pub use incident::IncidentPlugin;
pub use rpc::{serve, Handler, RpcRequest, RpcResponse};
pub use service::ServicePlugin;
