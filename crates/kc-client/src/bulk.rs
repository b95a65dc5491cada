//! Bulk operations over every connector matching a filter.
//!
//! The target set is always resolved from one status-expanded listing, so an
//! explicit state filter costs no extra request. Pause and resume add an
//! implicit gate on top of that filter: only RUNNING connectors are paused and
//! only PAUSED ones are resumed. Every selected connector gets exactly one
//! call, and its result (success or error) lands under its name in a
//! [`BulkReport`] in listing order.

use std::fmt;

use futures_util::{StreamExt, stream};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use tracing::{info, instrument, trace, warn};

use crate::client::{ConnectClient, RestartOptions};
use crate::error::ConnectResult;
use crate::listing::{ConnectorFilter, ConnectorListing, Expand, LifecycleState, connector_state};
use crate::response::Outcome;
use crate::transport::Transport;

/// Single-connector operation applied by [`ConnectClient::apply_to_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOperation {
    /// `GET /connectors/{name}`.
    Get,
    /// `GET /connectors/{name}/config`.
    Config,
    /// Connector status, taken from the listing used to resolve targets.
    Status,
    /// `POST /connectors/{name}/restart`.
    Restart(RestartOptions),
    /// `PUT /connectors/{name}/pause`, RUNNING connectors only.
    Pause,
    /// `PUT /connectors/{name}/resume`, PAUSED connectors only.
    Resume,
    /// `DELETE /connectors/{name}`.
    Delete,
    /// `GET /connectors/{name}/tasks`.
    Tasks,
    /// `GET /connectors/{name}/topics`.
    Topics,
    /// `PUT /connectors/{name}/topics/reset`.
    ResetTopics,
}

impl BulkOperation {
    /// State a connector must be in for this operation to apply to it.
    #[must_use]
    pub fn implicit_state(self) -> Option<LifecycleState> {
        match self {
            Self::Pause => Some(LifecycleState::running()),
            Self::Resume => Some(LifecycleState::paused()),
            _ => None,
        }
    }

    /// Short name used in log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Config => "config",
            Self::Status => "status",
            Self::Restart(_) => "restart",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Delete => "delete",
            Self::Tasks => "tasks",
            Self::Topics => "topics",
            Self::ResetTopics => "reset_topics",
        }
    }
}

impl fmt::Display for BulkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-connector results of a bulk operation, in listing order.
#[derive(Debug, Clone, Default)]
pub struct BulkReport {
    entries: IndexMap<String, ConnectResult<Outcome>>,
}

impl BulkReport {
    /// Result for `name`, if it was targeted.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConnectResult<Outcome>> {
        self.entries.get(name)
    }

    /// Iterate over `(name, result)` in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConnectResult<Outcome>)> {
        self.entries.iter().map(|(name, result)| (name.as_str(), result))
    }

    /// Connector names in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of connectors targeted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names whose operation succeeded.
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, result)| result.is_ok())
            .map(|(name, _)| name)
    }

    /// Names whose operation failed.
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, result)| result.is_err())
            .map(|(name, _)| name)
    }

    /// Returns `true` when at least one connector failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.entries.values().any(Result::is_err)
    }

    /// Object keyed by connector name; failures render as `{"error": {...}}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(name, result)| {
                let value = match result {
                    Ok(outcome) => outcome.to_json(),
                    Err(err) => json!({ "error": err.to_json() }),
                };
                (name.clone(), value)
            })
            .collect();
        Value::Object(map)
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, ConnectResult<Outcome>> {
        self.entries
    }
}

impl From<IndexMap<String, ConnectResult<Outcome>>> for BulkReport {
    fn from(entries: IndexMap<String, ConnectResult<Outcome>>) -> Self {
        Self { entries }
    }
}

impl<T: Transport> ConnectClient<T> {
    /// Apply `operation` to every connector matching `filter`.
    ///
    /// # Errors
    /// Only when the target set cannot be resolved (listing request failed).
    /// Failures of individual connectors are recorded in the report.
    #[instrument(skip(self))]
    pub async fn apply_to_all(
        &self,
        operation: BulkOperation,
        filter: &ConnectorFilter,
    ) -> ConnectResult<BulkReport> {
        let listing = self.list_connectors(Some(Expand::Status), filter).await?;
        let targets = gate(operation, listing);
        info!(
            operation = operation.name(),
            targets = targets.len(),
            concurrency = self.bulk_concurrency(),
            "applying operation to connectors"
        );

        let entries: IndexMap<String, ConnectResult<Outcome>> = stream::iter(targets)
            .map(|(name, entry)| async move {
                let result = self.apply_to_entry(operation, &name, entry).await;
                if let Err(err) = &result {
                    warn!(
                        connector = %name,
                        operation = operation.name(),
                        error = %err,
                        "operation failed"
                    );
                }
                (name, result)
            })
            .buffered(self.bulk_concurrency())
            .collect()
            .await;

        Ok(BulkReport::from(entries))
    }

    /// Apply `operation` to the connector `name` with exactly one request.
    ///
    /// No state gate applies: a named connector is paused or resumed as asked.
    #[instrument(skip(self))]
    pub async fn apply_to_one(
        &self,
        operation: BulkOperation,
        name: &str,
    ) -> ConnectResult<Outcome> {
        match operation {
            BulkOperation::Get => self.get_connector(name).await,
            BulkOperation::Config => self.get_connector_config(name).await,
            BulkOperation::Status => self.get_connector_status(name).await,
            BulkOperation::Restart(options) => self.restart_connector(name, options).await,
            BulkOperation::Pause => self.pause_connector(name).await,
            BulkOperation::Resume => self.resume_connector(name).await,
            BulkOperation::Delete => self.delete_connector(name).await,
            BulkOperation::Tasks => self.list_connector_tasks(name).await,
            BulkOperation::Topics => self.list_connector_topics(name).await,
            BulkOperation::ResetTopics => self.reset_connector_topics(name).await,
        }
    }

    async fn apply_to_entry(
        &self,
        operation: BulkOperation,
        name: &str,
        entry: Option<Value>,
    ) -> ConnectResult<Outcome> {
        if operation == BulkOperation::Status {
            if let Some(Value::Object(mut entry)) = entry {
                if let Some(status) = entry.remove("status") {
                    return Ok(Outcome::Body(status));
                }
            }
        }
        self.apply_to_one(operation, name).await
    }

    /// Connector details for every match.
    pub async fn get_all_connectors(&self, filter: &ConnectorFilter) -> ConnectResult<BulkReport> {
        self.apply_to_all(BulkOperation::Get, filter).await
    }

    /// Configuration of every match.
    pub async fn get_all_connector_configs(
        &self,
        filter: &ConnectorFilter,
    ) -> ConnectResult<BulkReport> {
        self.apply_to_all(BulkOperation::Config, filter).await
    }

    /// Status of every match, from a single listing request.
    pub async fn get_all_connector_statuses(
        &self,
        filter: &ConnectorFilter,
    ) -> ConnectResult<BulkReport> {
        self.apply_to_all(BulkOperation::Status, filter).await
    }

    /// Restart every match.
    pub async fn restart_all_connectors(
        &self,
        filter: &ConnectorFilter,
        options: RestartOptions,
    ) -> ConnectResult<BulkReport> {
        self.apply_to_all(BulkOperation::Restart(options), filter).await
    }

    /// Pause every RUNNING match.
    pub async fn pause_all_connectors(&self, filter: &ConnectorFilter) -> ConnectResult<BulkReport> {
        self.apply_to_all(BulkOperation::Pause, filter).await
    }

    /// Resume every PAUSED match.
    pub async fn resume_all_connectors(&self, filter: &ConnectorFilter) -> ConnectResult<BulkReport> {
        self.apply_to_all(BulkOperation::Resume, filter).await
    }

    /// Delete every match.
    pub async fn delete_all_connectors(&self, filter: &ConnectorFilter) -> ConnectResult<BulkReport> {
        self.apply_to_all(BulkOperation::Delete, filter).await
    }
}

fn gate(operation: BulkOperation, listing: ConnectorListing) -> Vec<(String, Option<Value>)> {
    let required = operation.implicit_state();
    let entries: Vec<(String, Option<Value>)> = match listing {
        ConnectorListing::Names(names) => names.into_iter().map(|name| (name, None)).collect(),
        ConnectorListing::Expanded { entries, .. } => entries
            .into_iter()
            .map(|(name, entry)| (name, Some(entry)))
            .collect(),
    };

    let Some(required) = required else {
        return entries;
    };

    entries
        .into_iter()
        .filter(|(name, entry)| {
            let state = entry.as_ref().and_then(connector_state);
            let keep = state.is_some_and(|s| required.matches(s));
            if !keep {
                trace!(
                    connector = %name,
                    state = state.unwrap_or("unknown"),
                    required = required.as_str(),
                    "skipping connector not in required state"
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConnectError;

    fn listing(states: &[(&str, &str)]) -> ConnectorListing {
        let entries = states
            .iter()
            .map(|(name, state)| {
                (
                    (*name).to_string(),
                    json!({"status": {"name": name, "connector": {"state": state}, "tasks": []}}),
                )
            })
            .collect();
        ConnectorListing::Expanded {
            expand: Expand::Status,
            entries,
        }
    }

    fn names(targets: &[(String, Option<Value>)]) -> Vec<&str> {
        targets.iter().map(|(name, _)| name.as_str()).collect()
    }

    #[test]
    fn pause_only_targets_running() {
        let targets = gate(
            BulkOperation::Pause,
            listing(&[("a", "RUNNING"), ("b", "PAUSED"), ("c", "FAILED"), ("d", "running")]),
        );
        assert_eq!(names(&targets), vec!["a", "d"]);
    }

    #[test]
    fn resume_only_targets_paused() {
        let targets = gate(
            BulkOperation::Resume,
            listing(&[("a", "RUNNING"), ("b", "PAUSED")]),
        );
        assert_eq!(names(&targets), vec!["b"]);
    }

    #[test]
    fn other_operations_have_no_gate() {
        let targets = gate(
            BulkOperation::Delete,
            listing(&[("a", "RUNNING"), ("b", "FAILED")]),
        );
        assert_eq!(names(&targets), vec!["a", "b"]);
        assert!(BulkOperation::Restart(RestartOptions::default())
            .implicit_state()
            .is_none());
    }

    #[test]
    fn report_renders_failures_under_error_key() {
        let mut entries = IndexMap::new();
        entries.insert("ok".to_string(), Ok(Outcome::Empty));
        entries.insert(
            "bad".to_string(),
            Err(ConnectError::Status {
                status: 500,
                text: "boom".into(),
            }),
        );
        let report = BulkReport::from(entries);

        assert!(report.has_failures());
        assert_eq!(report.succeeded().collect::<Vec<_>>(), vec!["ok"]);
        assert_eq!(report.failed().collect::<Vec<_>>(), vec!["bad"]);

        let rendered = report.to_json();
        assert_eq!(rendered["ok"], Value::Null);
        assert_eq!(rendered["bad"]["error"]["status"], 500);
        assert_eq!(rendered["bad"]["error"]["body"], "boom");
    }
}
