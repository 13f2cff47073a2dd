//! End-to-end runs of the built-in suite against stub backends.

use std::time::Duration;

use authprobe::cli::{self, Cli, ExitCode};
use authprobe::collections::builtin_suite;
use authprobe::environment::Variables;
use authprobe::http::HttpProber;
use authprobe::testing::reporter::ConsoleReporter;
use authprobe::testing::runner::run_suite;
use clap::Parser;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PUBLIC_ROUTES: [&str; 3] = [
    "/api/LibraryCache/getLiked",
    "/api/TrackScoring/preview",
    "/api/PlaylistHealth/getReport",
];

/// Backend that enforces `session:<userId>` tokens on everything but the public routes.
async fn conforming_backend() -> MockServer {
    let server = MockServer::start().await;

    for route in PUBLIC_ROUTES {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tracks": []})))
            .with_priority(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path("/api/PlatformLink/completeAuth"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid or expired state"})))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"sessionToken": "session:user:test123", "userId": "user:test123"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .with_priority(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"sessionToken": "session:user:test123"})))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"error": "Forbidden: Session userId does not match requested userId"})),
        )
        .with_priority(3)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/api/.+/.+$"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized: Invalid or missing session token"))
        .with_priority(4)
        .mount(&server)
        .await;

    server
}

/// Backend that forgot to protect anything.
async fn open_backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;
    server
}

async fn run_builtin(server: &MockServer) -> (authprobe::testing::report::FinalizedReport, String) {
    let base_url = format!("{}/api", server.uri());
    let prober = HttpProber::new(base_url.clone(), Duration::from_secs(5)).expect("client");
    let suite = builtin_suite();
    let variables = Variables::resolve(&suite.variables, &[]);
    let mut reporter = ConsoleReporter::new(Vec::new(), false);

    let report = run_suite(&prober, &mut reporter, &suite, &variables, &base_url).await;
    let output = String::from_utf8(reporter.into_inner()).expect("utf8 output");
    (report, output)
}

#[tokio::test]
async fn conforming_backend_passes_every_case() {
    let server = conforming_backend().await;

    let (report, output) = run_builtin(&server).await;

    assert!(report.all_passed(), "{output}");
    assert_eq!(report.total, 16);
    assert!(output.contains("✓ SwipeSessions/start (invalid token)"));
    assert!(output.contains("Correctly rejected with auth error: Unauthorized"));
    assert!(output.contains("All authentication tests passed!"));
}

#[tokio::test]
async fn open_backend_fails_every_rejection_case() {
    let server = open_backend().await;

    let (report, output) = run_builtin(&server).await;

    assert!(!report.all_passed());
    assert_eq!(report.passed, 6);
    assert_eq!(report.failed, 10);
    for result in &report.results {
        let expected_pass = result.section.starts_with("1.") || result.section.starts_with("5.");
        assert_eq!(result.verdict.passed, expected_pass, "{}", result.name);
    }
    assert!(output.contains("Expected failure but got 200"));
}

#[tokio::test]
async fn cli_writes_report_and_maps_exit_code() {
    let server = open_backend().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let report_path = dir.path().join("report.json");
    let base_url = format!("{}/api", server.uri());

    let args = Cli::try_parse_from([
        "authprobe",
        "--base-url",
        base_url.as_str(),
        "--format",
        "json",
        "--filter",
        "no token",
        "--report",
        report_path.to_str().expect("utf8 path"),
    ])
    .expect("valid arguments");

    assert_eq!(cli::run(args).await, ExitCode::FAILURE);

    let raw = std::fs::read_to_string(&report_path).expect("report written");
    let value: Value = serde_json::from_str(&raw).expect("report is JSON");
    assert_eq!(value["success"], false);
    assert_eq!(value["total"], 8);
    assert_eq!(value["passed"], 3);
    assert_eq!(value["results"][0]["name"], "LibraryCache/getLiked (no token)");
}

#[tokio::test]
async fn cli_succeeds_against_conforming_backend() {
    let server = conforming_backend().await;
    let base_url = format!("{}/api", server.uri());

    let args = Cli::try_parse_from(["authprobe", "--base-url", base_url.as_str(), "--no-color"])
        .expect("valid arguments");

    assert_eq!(cli::run(args).await, ExitCode::SUCCESS);
}
