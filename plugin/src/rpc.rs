use std::io::{self, BufRead, Write};

use pd_core::config::RawConfig;
use pd_core::context::RequestContext;
use pd_core::error::{AppError, ErrorKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcRequest {
    pub method: String,
    /// Decrypted adapter config; sent with every request.
    #[serde(default)]
    pub config: RawConfig,
    #[serde(default)]
    pub payload: Value,
}

/// Exactly one of `result` or `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RpcResponse {
    pub fn ok(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// The structured error is flattened to its display string at this boundary.
    pub fn err(error: &AppError) -> Self {
        Self {
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// One plugin's method table.
pub trait Handler {
    fn handle(&mut self, ctx: &RequestContext, request: RpcRequest) -> Result<Value, AppError>;
}

/// Id-only payload used by `get` style methods.
#[derive(Debug, Deserialize)]
pub struct IdPayload {
    #[serde(default)]
    pub id: String,
}

/// Id plus an input object, used by update and append methods.
#[derive(Debug, Deserialize)]
pub struct IdInputPayload<T> {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub input: T,
}

/// Decodes a method payload; a missing payload reads as `{}`.
pub fn decode_payload<T: DeserializeOwned>(method: &str, payload: Value) -> Result<T, AppError> {
    let payload = match payload {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| {
        AppError::invalid_request(format!("invalid payload for {method}")).with_details(e.to_string())
    })
}

pub fn encode_result<T: Serialize>(result: &T) -> Result<Value, AppError> {
    serde_json::to_value(result).map_err(|e| {
        AppError::new(ErrorKind::Decode, "ENCODE_FAILED", "Failed to encode result")
            .with_details(e.to_string())
    })
}

pub fn unknown_method(method: &str) -> AppError {
    AppError::invalid_request(format!("unknown method: {method}"))
}

fn respond(handler: &mut impl Handler, line: &str) -> RpcResponse {
    let request: RpcRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            let err = AppError::invalid_request("Failed to decode request line")
                .with_details(e.to_string());
            tracing::warn!(error = %err, "rejecting request line");
            return RpcResponse::err(&err);
        }
    };

    let method = request.method.clone();
    let ctx = RequestContext::background();
    match handler.handle(&ctx, request) {
        Ok(result) => {
            tracing::debug!(%method, "request handled");
            RpcResponse::ok(result)
        }
        Err(err) => {
            tracing::warn!(%method, error = %err, "request failed");
            RpcResponse::err(&err)
        }
    }
}

/// Runs the request loop until `reader` is exhausted.
///
/// Blank lines are skipped. A line that is not a request gets an error response and the loop
/// moves on to the next line. Only I/O failures on the streams end the loop early.
pub fn serve<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    handler: &mut impl Handler,
) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                respond(handler, line)
            }
            Err(e) => {
                let err = AppError::invalid_request("Request line is not valid UTF-8")
                    .with_details(e.to_string());
                tracing::warn!(error = %err, "rejecting request line");
                RpcResponse::err(&err)
            }
        };
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
}
