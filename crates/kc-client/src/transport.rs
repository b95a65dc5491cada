//! Transport abstraction for the Kafka Connect REST API.
//!
//! [`Transport`] is the only way requests leave the client. [`HttpTransport`]
//! talks to a real cluster through reqwest; [`MockTransport`] serves scripted
//! responses from memory and records every request so tests can assert how
//! many round-trips an operation made.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{BasicAuth, ConnectConfig};
use crate::error::{ConnectError, ConnectResult, TransportErrorInfo};

/// HTTP methods used by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Method name as sent on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    const fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the configured base endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Unencoded path segments (`["connectors", "my-sink", "status"]`).
    pub segments: Vec<String>,
    /// Query parameters in send order.
    pub query: Vec<(String, String)>,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Value>,
}

impl ConnectRequest {
    /// Create a request.
    pub fn new<I, S>(method: HttpMethod, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    /// GET request.
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Get, segments)
    }

    /// POST request.
    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Post, segments)
    }

    /// PUT request.
    pub fn put<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Put, segments)
    }

    /// DELETE request.
    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(HttpMethod::Delete, segments)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Path as `/a/b/c`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Path plus query string, e.g. `/connectors?expand=status`.
    #[must_use]
    pub fn target(&self) -> String {
        let path = self.path();
        if self.query.is_empty() {
            return path;
        }
        let query = self
            .query
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{path}?{query}")
    }
}

/// Status code and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text (may be empty).
    pub body: String,
}

impl RawResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body.
    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// Response without a body.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, String::new())
    }
}

/// Sends requests to a Kafka Connect cluster.
///
/// Implementations return `Err` only when no HTTP response was received.
/// Every status code, including errors, comes back as a [`RawResponse`].
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Send one request and wait for the response.
    async fn send(&self, request: &ConnectRequest) -> ConnectResult<RawResponse>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base: Url,
    auth: Option<BasicAuth>,
}

impl HttpTransport {
    /// Build a transport from configuration.
    ///
    /// Fails on a malformed endpoint or auth string before any request is made.
    pub fn new(config: &ConnectConfig) -> ConnectResult<Self> {
        let base = parse_endpoint(&config.endpoint)?;
        let auth = config.basic_auth()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()?;
        Ok(Self { http, base, auth })
    }

    /// The base endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, request: &ConnectRequest) -> ConnectResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ConnectError::InvalidEndpoint {
                endpoint: self.base.to_string(),
                reason: "endpoint cannot carry request paths".into(),
            })?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

fn parse_endpoint(endpoint: &str) -> ConnectResult<Url> {
    let url = Url::parse(endpoint).map_err(|e| ConnectError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConnectError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: "endpoint cannot carry request paths".into(),
        });
    }
    Ok(url)
}

impl Transport for HttpTransport {
    async fn send(&self, request: &ConnectRequest) -> ConnectResult<RawResponse> {
        let url = self.url_for(request)?;
        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self.http.request(request.method.to_reqwest(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(auth) = &self.auth {
            builder = builder.basic_auth(auth.username(), Some(auth.password()));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "received response");
        Ok(RawResponse { status, body })
    }
}

/// In-memory transport for tests.
///
/// Routes match on method plus [`ConnectRequest::target`]. A request with no
/// route gets the 404 body the cluster uses for unknown resources.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    routes: Vec<MockRoute>,
    requests: Vec<ConnectRequest>,
}

#[derive(Debug)]
struct MockRoute {
    method: HttpMethod,
    target: String,
    reply: Result<RawResponse, TransportErrorInfo>,
}

impl MockTransport {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn route(&self, method: HttpMethod, target: &str, reply: Result<RawResponse, TransportErrorInfo>) {
        let mut state = self.inner.lock();
        state
            .routes
            .retain(|route| !(route.method == method && route.target == target));
        state.routes.push(MockRoute {
            method,
            target: target.to_string(),
            reply,
        });
    }

    /// Answer `method target` with a JSON body.
    pub fn respond(&self, method: HttpMethod, target: &str, status: u16, body: Value) -> &Self {
        self.route(method, target, Ok(RawResponse::json(status, &body)));
        self
    }

    /// Answer `method target` with a raw text body.
    pub fn respond_text(
        &self,
        method: HttpMethod,
        target: &str,
        status: u16,
        body: impl Into<String>,
    ) -> &Self {
        self.route(method, target, Ok(RawResponse::new(status, body)));
        self
    }

    /// Answer `method target` with an empty body.
    pub fn respond_empty(&self, method: HttpMethod, target: &str, status: u16) -> &Self {
        self.route(method, target, Ok(RawResponse::empty(status)));
        self
    }

    /// Fail `method target` at the transport level.
    pub fn fail(&self, method: HttpMethod, target: &str, message: impl Into<String>) -> &Self {
        self.route(
            method,
            target,
            Err(TransportErrorInfo {
                message: message.into(),
                is_timeout: false,
                is_connect: true,
            }),
        );
        self
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ConnectRequest> {
        self.inner.lock().requests.clone()
    }

    /// Number of requests received for `method target`.
    #[must_use]
    pub fn count(&self, method: HttpMethod, target: &str) -> usize {
        self.inner
            .lock()
            .requests
            .iter()
            .filter(|request| request.method == method && request.target() == target)
            .count()
    }

    /// Total number of requests received.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inner.lock().requests.len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: &ConnectRequest) -> ConnectResult<RawResponse> {
        let mut state = self.inner.lock();
        state.requests.push(request.clone());
        let target = request.target();
        let reply = state
            .routes
            .iter()
            .find(|route| route.method == request.method && route.target == target)
            .map(|route| route.reply.clone());
        drop(state);

        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(info)) => Err(ConnectError::Transport(info)),
            None => Ok(RawResponse::json(
                404,
                &serde_json::json!({
                    "error_code": 404,
                    "message": format!("HTTP 404 Not Found: {} {target}", request.method),
                }),
            )),
        }
    }
}
