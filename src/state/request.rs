//! Per-call-site request lifecycle values.
//!
//! DESIGN
//! ======
//! `RequestState` is an enum rather than a `{status, data, error}` record so a
//! success can never carry an error and vice versa. The flat accessors exist
//! for view code that wants the three-field shape.

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a single request controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Which side of the boundary a request failed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The exchange never produced a response.
    Transport,
    /// The server answered with a non-2xx status.
    Application,
    /// A 2xx body did not match the expected shape.
    Decoding,
    /// The request body could not be serialized.
    Encoding,
}

/// Normalized failure shape handed to views.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
    pub kind: FailureKind,
}

impl ErrorInfo {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self { message: message.into(), status_code: None, raw: None, kind }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status_code = Some(status);
        self
    }

    #[must_use]
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "{} ({status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// The one live state of a request controller.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(ErrorInfo),
}

impl<T> RequestState<T> {
    pub fn status(&self) -> RequestStatus {
        match self {
            Self::Idle => RequestStatus::Idle,
            Self::Loading => RequestStatus::Loading,
            Self::Success(_) => RequestStatus::Success,
            Self::Error(_) => RequestStatus::Error,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Error(_))
    }

    /// Collapse a finished exchange into a terminal state.
    pub fn from_result(result: Result<T, ErrorInfo>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error) => Self::Error(error),
        }
    }
}
