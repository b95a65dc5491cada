//! Mock Kafka Connect REST server.
//!
//! Wraps wiremock with the routes and response conventions of the Connect
//! REST API.

use serde_json::Value;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// A wiremock server that speaks the Kafka Connect REST API.
pub struct MockConnectServer {
    server: MockServer,
}

impl MockConnectServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the mock server.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server for custom matchers.
    #[must_use]
    pub const fn inner(&self) -> &MockServer {
        &self.server
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Response Setup
    // ─────────────────────────────────────────────────────────────────────────────

    /// Answer `http_method request_path` with a JSON body.
    pub async fn respond(&self, http_method: &str, request_path: &str, status: u16, body: Value) {
        Mock::given(method(http_method))
            .and(path(request_path))
            .respond_with(json_response(status, body))
            .mount(&self.server)
            .await;
    }

    /// Answer `http_method request_path` with an empty body.
    pub async fn respond_empty(&self, http_method: &str, request_path: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answer `http_method request_path` with a plain-text body.
    pub async fn respond_text(
        &self,
        http_method: &str,
        request_path: &str,
        status: u16,
        body: &str,
    ) {
        Mock::given(method(http_method))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `GET /connectors` for one `expand` value (`None` means no parameter).
    pub async fn listing(&self, expand: Option<&str>, body: Value) {
        let mock = Mock::given(method("GET")).and(path("/connectors"));
        let mock = match expand {
            Some(expand) => mock.and(query_param("expand", expand)),
            None => mock.and(query_param_is_missing("expand")),
        };
        mock.respond_with(json_response(200, body))
            .mount(&self.server)
            .await;
    }

    /// Answer `http_method request_path` and require exactly `times` calls.
    ///
    /// The count is checked when the server is dropped.
    pub async fn expect_calls(
        &self,
        http_method: &str,
        request_path: &str,
        status: u16,
        times: u64,
    ) {
        Mock::given(method(http_method))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────────

    /// All requests received so far.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Number of requests received for `http_method request_path`, any query.
    pub async fn count(&self, http_method: &str, request_path: &str) -> usize {
        self.received_requests()
            .await
            .iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path() == request_path)
            .count()
    }

    /// Verify the total number of requests received.
    ///
    /// # Panics
    ///
    /// Panics if the count doesn't match.
    pub async fn assert_request_count(&self, expected: usize) {
        let received = self.received_requests().await;
        assert_eq!(
            received.len(),
            expected,
            "expected {expected} requests but received {}: {:?}",
            received.len(),
            received
                .iter()
                .map(|r| format!("{} {}", r.method, r.url))
                .collect::<Vec<_>>()
        );
    }

    /// Verify that no request reached `http_method request_path`.
    ///
    /// # Panics
    ///
    /// Panics if a matching request was received.
    pub async fn assert_not_received(&self, http_method: &str, request_path: &str) {
        let hits = self.count(http_method, request_path).await;
        assert_eq!(hits, 0, "unexpected {http_method} {request_path}");
    }
}

fn json_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status)
        .set_body_json(body)
        .insert_header("content-type", "application/json")
}
