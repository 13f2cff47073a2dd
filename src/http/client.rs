use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;

use super::request::ProbeRequest;
use super::response::{ProbeOutcome, ResponseBody, TransportFailureKind};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can POST a payload to an endpoint and report what happened.
#[allow(async_fn_in_trait)]
pub trait Prober {
    async fn probe(&self, endpoint: &str, payload: &Value) -> ProbeOutcome;
}

/// Prober backed by a real HTTP client. One attempt per call, never retried.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    base_url: String,
}

impl HttpProber {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Prober for HttpProber {
    async fn probe(&self, endpoint: &str, payload: &Value) -> ProbeOutcome {
        let request = ProbeRequest::new(&self.base_url, endpoint, payload.clone());
        send_probe(&self.client, request).await
    }
}

/// One-shot probe with a throwaway client.
pub async fn probe(base_url: &str, endpoint: &str, payload: &Value, timeout: Duration) -> ProbeOutcome {
    let client = match build_client(timeout) {
        Ok(client) => client,
        Err(err) => return ProbeOutcome::transport_failure(TransportFailureKind::Other, err.to_string()),
    };
    send_probe(&client, ProbeRequest::new(base_url, endpoint, payload.clone())).await
}

fn build_client(timeout: Duration) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(timeout)
        .build()
}

async fn send_probe(client: &Client, request: ProbeRequest) -> ProbeOutcome {
    let started = Instant::now();
    let result = client
        .post(&request.url)
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .json(&request.payload)
        .send()
        .await;

    let response = match result {
        Ok(response) => response,
        Err(err) => return transport_failure(&request.url, &err),
    };

    let status = response.status().as_u16();
    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => return transport_failure(&request.url, &err),
    };

    debug!(
        url = %request.url,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        size = bytes.len(),
        "probe completed"
    );

    ProbeOutcome::responded(status, ResponseBody::from_bytes(&bytes))
}

fn transport_failure(url: &str, err: &reqwest::Error) -> ProbeOutcome {
    let kind = classify_reqwest_error(err);
    warn!(url, %kind, error = %err, "probe failed before a response arrived");
    ProbeOutcome::transport_failure(kind, err.to_string())
}

/// A connect timeout is both `is_connect` and `is_timeout`; it counts as a
/// connection failure.
fn classify_reqwest_error(err: &reqwest::Error) -> TransportFailureKind {
    if err.is_connect() {
        return TransportFailureKind::ConnectionRefused;
    }
    if err.is_timeout() {
        return TransportFailureKind::Timeout;
    }
    TransportFailureKind::Other
}
