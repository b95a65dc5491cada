//! Shared command-line arguments.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args};
use kc_client::{ConnectConfig, ConnectorFilter, DEFAULT_ENDPOINT};
use serde_json::Value;

/// Connection and logging flags accepted by every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// The base URL for the Kafka Connect REST API
    #[arg(long, global = true, env = "KAFKA_CONNECT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Basic auth credentials as `username:password`
    #[arg(long, global = true, env = "KAFKA_CONNECT_BASIC_AUTH", hide_env_values = true)]
    pub auth: Option<String>,

    /// Verify the server's TLS certificate
    #[arg(
        long,
        global = true,
        env = "KAFKA_CONNECT_SSL_VERIFY",
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    pub ssl_verify: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "KAFKA_CONNECT_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "KAFKA_CONNECT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Connectors a bulk command works on at once
    #[arg(long, global = true, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: u16,
}

impl GlobalArgs {
    /// Client configuration from the flags.
    pub fn connect_config(&self) -> ConnectConfig {
        ConnectConfig {
            endpoint: self.endpoint.clone(),
            auth: self.auth.clone(),
            ssl_verify: self.ssl_verify,
            timeout: Duration::from_secs(self.timeout),
            bulk_concurrency: usize::from(self.concurrency),
        }
    }
}

/// One connector by name, or every connector matching a filter.
#[derive(Args, Debug)]
pub struct Target {
    /// Connector name
    #[arg(
        required_unless_present_any = ["all_connectors", "connector_pattern"],
        conflicts_with_all = ["all_connectors", "connector_pattern", "state"]
    )]
    pub connector: Option<String>,

    /// Apply to every connector
    #[arg(long)]
    pub all_connectors: bool,

    /// Apply to connectors whose name matches this regex from the start
    #[arg(long, value_name = "REGEX")]
    pub connector_pattern: Option<String>,

    /// Apply only to connectors in this state (case-insensitive)
    #[arg(long, value_name = "STATE")]
    pub state: Option<String>,
}

/// Where a command should be sent.
#[derive(Debug)]
pub enum Resolved {
    /// A single named connector.
    One(String),
    /// Every connector matching the filter.
    Many(ConnectorFilter),
}

impl Target {
    /// Decide between the single-connector and bulk paths.
    pub fn resolve(&self) -> Result<Resolved> {
        if let Some(name) = &self.connector {
            return Ok(Resolved::One(name.clone()));
        }
        if !self.all_connectors && self.connector_pattern.is_none() {
            bail!("a connector name, --all-connectors or --connector-pattern is required");
        }
        Ok(Resolved::Many(filter(
            self.connector_pattern.as_deref(),
            self.state.as_deref(),
        )?))
    }
}

/// Build a filter from optional pattern and state flags.
pub fn filter(pattern: Option<&str>, state: Option<&str>) -> Result<ConnectorFilter> {
    let mut filter = ConnectorFilter::new();
    if let Some(pattern) = pattern {
        filter = filter.with_pattern(pattern)?;
    }
    if let Some(state) = state {
        filter = filter.with_state(state);
    }
    Ok(filter)
}

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read JSON from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Read a JSON object from `path`.
pub fn read_json_object(path: &Path) -> Result<serde_json::Map<String, Value>> {
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        other => bail!(
            "expected a JSON object in {}, found {}",
            path.display(),
            json_kind(&other)
        ),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
