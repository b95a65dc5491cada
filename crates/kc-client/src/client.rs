//! Kafka Connect REST client and single-connector operations.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{info, instrument, warn};

use crate::config::ConnectConfig;
use crate::error::ConnectResult;
use crate::response::{Outcome, StatusTable};
use crate::transport::{ConnectRequest, HttpTransport, RawResponse, Transport};

/// Connector configuration: a key to value mapping defined by the plugin.
pub type ConnectorConfig = Map<String, Value>;

/// Body of `POST /connectors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConnector {
    /// Connector name.
    pub name: String,
    /// Connector configuration.
    pub config: ConnectorConfig,
}

impl NewConnector {
    /// Create a request body.
    pub fn new(name: impl Into<String>, config: ConnectorConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Query flags for `POST /connectors/{name}/restart`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestartOptions {
    /// Restart the connector's tasks too.
    pub include_tasks: bool,
    /// Only restart instances that are FAILED.
    pub only_failed: bool,
}

impl RestartOptions {
    /// Restart the connector and its tasks.
    #[must_use]
    pub const fn with_tasks(mut self, include_tasks: bool) -> Self {
        self.include_tasks = include_tasks;
        self
    }

    /// Restrict the restart to failed instances.
    #[must_use]
    pub const fn only_failed(mut self, only_failed: bool) -> Self {
        self.only_failed = only_failed;
        self
    }
}

/// Builder for an HTTP-backed [`ConnectClient`].
#[derive(Debug, Clone, Default)]
pub struct ConnectClientBuilder {
    config: ConnectConfig,
}

impl ConnectClientBuilder {
    /// Start from the default configuration with a different endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            config: ConnectConfig {
                endpoint: endpoint.into(),
                ..ConnectConfig::default()
            },
        }
    }

    /// Basic-auth credentials as `username:password`.
    #[must_use]
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.config.auth = Some(auth.into());
        self
    }

    /// Toggle server certificate verification.
    #[must_use]
    pub const fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.config.ssl_verify = ssl_verify;
        self
    }

    /// Request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Number of connectors a bulk operation works on at once.
    #[must_use]
    pub const fn with_bulk_concurrency(mut self, concurrency: usize) -> Self {
        self.config.bulk_concurrency = concurrency;
        self
    }

    /// Validate the configuration and build the client.
    pub fn build(self) -> ConnectResult<ConnectClient> {
        ConnectClient::from_config(&self.config)
    }
}

/// Kafka Connect REST client.
///
/// Holds only immutable endpoint and credential configuration, so one client
/// can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ConnectClient<T = HttpTransport> {
    transport: T,
    bulk_concurrency: usize,
}

impl ConnectClient<HttpTransport> {
    /// Builder starting from `endpoint`.
    pub fn builder(endpoint: impl Into<String>) -> ConnectClientBuilder {
        ConnectClientBuilder::new(endpoint)
    }

    /// Build a reqwest-backed client.
    ///
    /// # Errors
    /// Returns [`ConnectError::InvalidAuth`](crate::ConnectError::InvalidAuth)
    /// or [`ConnectError::InvalidEndpoint`](crate::ConnectError::InvalidEndpoint)
    /// before any request is made.
    pub fn from_config(config: &ConnectConfig) -> ConnectResult<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(transport).with_bulk_concurrency(config.bulk_concurrency))
    }
}

impl<T: Transport> ConnectClient<T> {
    /// Wrap an existing transport.
    pub const fn with_transport(transport: T) -> Self {
        Self {
            transport,
            bulk_concurrency: 1,
        }
    }

    /// Set bulk concurrency. Zero is treated as one.
    #[must_use]
    pub fn with_bulk_concurrency(mut self, concurrency: usize) -> Self {
        self.bulk_concurrency = concurrency.max(1);
        self
    }

    /// Number of connectors a bulk operation works on at once.
    #[must_use]
    pub const fn bulk_concurrency(&self) -> usize {
        self.bulk_concurrency
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) async fn call(
        &self,
        request: ConnectRequest,
        table: StatusTable,
    ) -> ConnectResult<Outcome> {
        let response = self.transport.send(&request).await?;
        table.normalize(response)
    }

    async fn send(&self, request: ConnectRequest) -> ConnectResult<RawResponse> {
        self.transport.send(&request).await
    }

    /// `GET /`: cluster version and Kafka cluster id.
    #[instrument(skip(self))]
    pub async fn cluster_info(&self) -> ConnectResult<Outcome> {
        info!("fetching cluster info");
        self.call(ConnectRequest::get(Vec::<String>::new()), StatusTable::READ)
            .await
    }

    /// `GET /connectors/{name}`.
    #[instrument(skip(self))]
    pub async fn get_connector(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "fetching connector");
        self.call(ConnectRequest::get(["connectors", name]), StatusTable::READ)
            .await
    }

    /// `POST /connectors`.
    ///
    /// A 409 (name taken or rebalance in progress) is returned as
    /// [`Outcome::Conflict`] with the cluster's body.
    #[instrument(skip(self, connector), fields(connector = %connector.name))]
    pub async fn create_connector(&self, connector: &NewConnector) -> ConnectResult<Outcome> {
        info!(connector = %connector.name, "creating connector");
        let body = json!({"name": connector.name, "config": connector.config});
        self.call(
            ConnectRequest::post(["connectors"]).with_body(body),
            StatusTable::CREATE,
        )
        .await
    }

    /// `PUT /connectors/{name}/config`; creates the connector when it does not exist.
    ///
    /// `config` is the bare configuration map. A top-level `"config"` key is
    /// sent as-is and only logged.
    #[instrument(skip(self, config))]
    pub async fn update_connector(
        &self,
        name: &str,
        config: &ConnectorConfig,
    ) -> ConnectResult<Outcome> {
        if config.contains_key("config") {
            warn!(
                connector = name,
                "payload has a top-level \"config\" key; the endpoint expects the bare configuration map"
            );
        }
        info!(connector = name, "updating connector config");
        self.call(
            ConnectRequest::put(["connectors", name, "config"])
                .with_body(Value::Object(config.clone())),
            StatusTable::UPDATE,
        )
        .await
    }

    /// `GET /connectors/{name}/config`.
    #[instrument(skip(self))]
    pub async fn get_connector_config(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "fetching connector config");
        self.call(
            ConnectRequest::get(["connectors", name, "config"]),
            StatusTable::READ,
        )
        .await
    }

    /// `GET /connectors/{name}/status`.
    #[instrument(skip(self))]
    pub async fn get_connector_status(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "fetching connector status");
        self.call(
            ConnectRequest::get(["connectors", name, "status"]),
            StatusTable::READ,
        )
        .await
    }

    /// `POST /connectors/{name}/restart?includeTasks=..&onlyFailed=..`.
    ///
    /// # Errors
    /// 404 raises `NotFound`, 409 raises `Conflict` and 500 raises
    /// `ServerTimeout`, each carrying the raw response text.
    #[instrument(skip(self))]
    pub async fn restart_connector(
        &self,
        name: &str,
        options: RestartOptions,
    ) -> ConnectResult<Outcome> {
        info!(
            connector = name,
            include_tasks = options.include_tasks,
            only_failed = options.only_failed,
            "restarting connector"
        );
        let request = ConnectRequest::post(["connectors", name, "restart"])
            .with_query("includeTasks", options.include_tasks.to_string())
            .with_query("onlyFailed", options.only_failed.to_string());
        let response = self.send(request).await?;
        match response.status {
            200 => info!(connector = name, "connector restarted"),
            202 => info!(connector = name, "restart accepted; instances are restarting"),
            204 => info!(connector = name, "connector restarted without a response body"),
            _ => {}
        }
        StatusTable::RESTART.normalize(response)
    }

    /// `PUT /connectors/{name}/pause`.
    #[instrument(skip(self))]
    pub async fn pause_connector(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "pausing connector");
        self.call(
            ConnectRequest::put(["connectors", name, "pause"]),
            StatusTable::PAUSE,
        )
        .await
    }

    /// `PUT /connectors/{name}/resume`.
    #[instrument(skip(self))]
    pub async fn resume_connector(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "resuming connector");
        self.call(
            ConnectRequest::put(["connectors", name, "resume"]),
            StatusTable::RESUME,
        )
        .await
    }

    /// `DELETE /connectors/{name}`.
    #[instrument(skip(self))]
    pub async fn delete_connector(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "deleting connector");
        self.call(
            ConnectRequest::delete(["connectors", name]),
            StatusTable::DELETE,
        )
        .await
    }

    /// `GET /connectors/{name}/tasks`.
    #[instrument(skip(self))]
    pub async fn list_connector_tasks(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "listing connector tasks");
        self.call(
            ConnectRequest::get(["connectors", name, "tasks"]),
            StatusTable::READ,
        )
        .await
    }

    /// `GET /connectors/{name}/tasks/{id}/status`.
    #[instrument(skip(self))]
    pub async fn get_task_status(&self, name: &str, task_id: u32) -> ConnectResult<Outcome> {
        info!(connector = name, task_id, "fetching task status");
        let task = task_id.to_string();
        self.call(
            ConnectRequest::get(["connectors", name, "tasks", task.as_str(), "status"]),
            StatusTable::READ,
        )
        .await
    }

    /// `POST /connectors/{name}/tasks/{id}/restart`.
    #[instrument(skip(self))]
    pub async fn restart_task(&self, name: &str, task_id: u32) -> ConnectResult<Outcome> {
        info!(connector = name, task_id, "restarting task");
        let task = task_id.to_string();
        self.call(
            ConnectRequest::post(["connectors", name, "tasks", task.as_str(), "restart"]),
            StatusTable::RESTART_TASK,
        )
        .await
    }

    /// `GET /connectors/{name}/topics`.
    #[instrument(skip(self))]
    pub async fn list_connector_topics(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "listing active topics");
        self.call(
            ConnectRequest::get(["connectors", name, "topics"]),
            StatusTable::READ,
        )
        .await
    }

    /// `PUT /connectors/{name}/topics/reset`.
    #[instrument(skip(self))]
    pub async fn reset_connector_topics(&self, name: &str) -> ConnectResult<Outcome> {
        info!(connector = name, "resetting active topics");
        self.call(
            ConnectRequest::put(["connectors", name, "topics", "reset"]),
            StatusTable::RESET_TOPICS,
        )
        .await
    }

    /// `GET /connector-plugins`.
    #[instrument(skip(self))]
    pub async fn list_connector_plugins(&self) -> ConnectResult<Outcome> {
        info!("listing connector plugins");
        self.call(
            ConnectRequest::get(["connector-plugins"]),
            StatusTable::READ,
        )
        .await
    }

    /// `PUT /connector-plugins/{plugin}/config/validate`.
    #[instrument(skip(self, config))]
    pub async fn validate_connector_config(
        &self,
        plugin: &str,
        config: &ConnectorConfig,
    ) -> ConnectResult<Outcome> {
        info!(plugin, "validating connector config");
        self.call(
            ConnectRequest::put(["connector-plugins", plugin, "config", "validate"])
                .with_body(Value::Object(config.clone())),
            StatusTable::READ,
        )
        .await
    }
}
