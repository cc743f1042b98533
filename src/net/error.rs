//! Failure classification for request lifecycles.
//!
//! ERROR HANDLING
//! ==============
//! Everything that can go wrong below the controller is built as a
//! `RequestError` and then flattened into the serializable [`ErrorInfo`]
//! before it reaches state. Views never see the raw error.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use super::transport::{HttpResponse, TransportError};
use crate::state::request::{ErrorInfo, FailureKind};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("failed to encode request body: {0}")]
    Encoding(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{message}")]
    Application { status: u16, message: String, body: Option<Value> },
    #[error("failed to decode response: {source}")]
    Decoding {
        status: u16,
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl RequestError {
    /// Classify a non-2xx response, preferring the server's `message` field.
    pub fn from_status(response: &HttpResponse) -> Self {
        let body = parse_body(&response.body);
        let message = body
            .as_ref()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
            .map_or_else(|| status_failed_message(response.status), str::to_owned);
        Self::Application { status: response.status, message, body }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Encoding(_) => FailureKind::Encoding,
            Self::Transport(_) => FailureKind::Transport,
            Self::Application { .. } => FailureKind::Application,
            Self::Decoding { .. } => FailureKind::Decoding,
        }
    }
}

impl From<RequestError> for ErrorInfo {
    fn from(err: RequestError) -> Self {
        let info = Self::new(err.kind(), err.to_string());
        match err {
            RequestError::Encoding(_) | RequestError::Transport(_) => info,
            RequestError::Application { status, body, .. } => {
                let info = info.with_status(status);
                match body {
                    Some(body) => info.with_raw(body),
                    None => info,
                }
            }
            RequestError::Decoding { status, body, .. } => {
                let info = info.with_status(status);
                if body.is_empty() { info } else { info.with_raw(Value::String(body)) }
            }
        }
    }
}

fn status_failed_message(status: u16) -> String {
    format!("request failed with status {status}")
}

/// JSON body if it parses, the raw text if it does not, nothing if empty.
fn parse_body(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned())))
}
