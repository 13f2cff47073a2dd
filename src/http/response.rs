use std::fmt::{self, Display};

use serde_json::Value;

/// Decoded response body. JSON when the payload parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// The text a rejection message would live in: the `error` field of an
    /// object body, or the body itself when it is a string.
    pub fn error_message(&self) -> Option<String> {
        match self {
            ResponseBody::Json(Value::Object(map)) => map.get("error").map(|error| match error {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            }),
            ResponseBody::Json(Value::String(message)) => Some(message.clone()),
            ResponseBody::Text(text) => Some(text.clone()),
            ResponseBody::Json(_) => None,
        }
    }
}

impl Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(Value::String(text)) | ResponseBody::Text(text) => write!(f, "{text}"),
            ResponseBody::Json(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    ConnectionRefused,
    Timeout,
    Other,
}

impl Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportFailureKind::ConnectionRefused => "connection refused",
            TransportFailureKind::Timeout => "timeout",
            TransportFailureKind::Other => "other",
        };
        write!(f, "{label}")
    }
}

/// Result of a single probe. Transport problems are data, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Responded {
        status: u16,
        body: ResponseBody,
    },
    TransportFailure {
        kind: TransportFailureKind,
        detail: String,
    },
}

impl ProbeOutcome {
    pub fn responded(status: u16, body: ResponseBody) -> Self {
        ProbeOutcome::Responded { status, body }
    }

    pub fn transport_failure(kind: TransportFailureKind, detail: impl Into<String>) -> Self {
        ProbeOutcome::TransportFailure {
            kind,
            detail: detail.into(),
        }
    }
}
