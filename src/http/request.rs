use serde_json::Value;

/// A single POST about to be sent to the backend.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub url: String,
    pub payload: Value,
}

impl ProbeRequest {
    pub fn new(base_url: &str, endpoint: &str, payload: Value) -> Self {
        Self {
            url: endpoint_url(base_url, endpoint),
            payload,
        }
    }
}

/// Join `<base_url>/<service>/<method>` without doubling or dropping the slash.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = endpoint.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_with_single_slash() {
        let expected = "http://localhost:8000/api/SwipeSessions/start";
        assert_eq!(endpoint_url("http://localhost:8000/api", "SwipeSessions/start"), expected);
        assert_eq!(endpoint_url("http://localhost:8000/api/", "SwipeSessions/start"), expected);
        assert_eq!(endpoint_url("http://localhost:8000/api", "/SwipeSessions/start"), expected);
    }
}
