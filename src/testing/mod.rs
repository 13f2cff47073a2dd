//! # Auth Conformance Oracle
//!
//! Decides whether an observed response satisfies a declared expectation and
//! aggregates the verdicts of a run.
//!
//! - `classify` is the only decision logic; it is pure.
//! - [`report`] accumulates verdicts in declared order.
//! - [`reporter`] renders them; rendering never feeds back into decisions.
//! - [`runner`] drives cases through prober, classifier and report.

pub mod report;
pub mod reporter;
pub mod runner;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::http::{ProbeOutcome, ResponseBody, TransportFailureKind};

/// Keywords that mark a rejection message as authentication related.
pub const AUTH_KEYWORDS: [&str; 3] = ["unauthorized", "forbidden", "session"];

/// One declarative expectation about an endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub endpoint: String,
    #[serde(default)]
    pub payload: Map<String, Value>,
    pub should_succeed: bool,
    #[serde(default)]
    pub check_auth_error: bool,
}

impl TestCase {
    /// A call that must come back with 200.
    pub fn expect_success(name: impl Into<String>, endpoint: impl Into<String>, payload: Value) -> Self {
        Self::new(name, endpoint, payload, true, false)
    }

    /// A call that must be rejected, ideally with an auth message.
    pub fn expect_auth_rejection(name: impl Into<String>, endpoint: impl Into<String>, payload: Value) -> Self {
        Self::new(name, endpoint, payload, false, true)
    }

    /// A call that must be rejected for any reason.
    pub fn expect_rejection(name: impl Into<String>, endpoint: impl Into<String>, payload: Value) -> Self {
        Self::new(name, endpoint, payload, false, false)
    }

    fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        payload: Value,
        should_succeed: bool,
        check_auth_error: bool,
    ) -> Self {
        let payload = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            payload,
            should_succeed,
            check_auth_error,
        }
    }

    pub fn expectation_label(&self) -> &'static str {
        match (self.should_succeed, self.check_auth_error) {
            (true, _) => "expect 200",
            (false, true) => "expect auth rejection",
            (false, false) => "expect rejection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub passed: bool,
    pub explanation: String,
}

impl Verdict {
    pub fn pass(explanation: impl Into<String>) -> Self {
        Self {
            passed: true,
            explanation: explanation.into(),
        }
    }

    pub fn fail(explanation: impl Into<String>) -> Self {
        Self {
            passed: false,
            explanation: explanation.into(),
        }
    }
}

/// Heuristic: does the body read like an authentication rejection?
pub fn is_auth_error(body: &ResponseBody) -> bool {
    body.error_message()
        .map(|message| {
            let message = message.to_lowercase();
            AUTH_KEYWORDS.iter().any(|keyword| message.contains(keyword))
        })
        .unwrap_or(false)
}

/// Judge a probe outcome against a case's expectation. Order of checks matters.
pub fn classify(case: &TestCase, outcome: &ProbeOutcome) -> Verdict {
    let (status, body) = match outcome {
        ProbeOutcome::TransportFailure { kind, detail } => {
            return Verdict::fail(transport_explanation(*kind, detail));
        }
        ProbeOutcome::Responded { status, body } => (*status, body),
    };

    let auth_error = is_auth_error(body);

    if case.should_succeed {
        return if status == 200 {
            Verdict::pass(format!("Status: {status}"))
        } else {
            Verdict::fail(format!("Expected 200, got {status}. Response: {body}"))
        };
    }

    if case.check_auth_error && auth_error {
        Verdict::pass(format!("Correctly rejected with auth error: {body}"))
    } else if status >= 400 {
        Verdict::pass(format!("Correctly rejected with status {status}"))
    } else {
        Verdict::fail(format!("Expected failure but got {status}. Response: {body}"))
    }
}

fn transport_explanation(kind: TransportFailureKind, detail: &str) -> String {
    match kind {
        TransportFailureKind::ConnectionRefused => {
            format!("Connection error - is the server running? ({detail})")
        }
        TransportFailureKind::Timeout => format!("Request timed out ({detail})"),
        TransportFailureKind::Other => format!("Unexpected error: {detail}"),
    }
}
