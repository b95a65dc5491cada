//! Connector listings and the filters applied to them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ConnectError, ConnectResult};
use crate::response::Outcome;

/// Value of the `expand` query parameter on `GET /connectors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expand {
    /// Each entry carries `status.connector.state` and `status.tasks`.
    Status,
    /// Each entry carries `info.config` and `info.tasks`.
    Info,
}

impl Expand {
    /// Query parameter value.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Expand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for Expand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "status" => Ok(Self::Status),
            "info" => Ok(Self::Info),
            other => Err(format!("unknown expand value `{other}` (expected status or info)")),
        }
    }
}

/// Connector name pattern.
///
/// Matches at the start of the name but not necessarily to its end, so
/// `prod-` matches `prod-orders-sink` and `.*-sink$` matches `beta-sink`.
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> ConnectResult<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})"))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns `true` when `name` matches from its first character.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Pattern as written by the caller.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for NamePattern {}

/// Connector or task lifecycle state.
///
/// The set of states belongs to the cluster; the client only compares them,
/// ignoring ASCII case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LifecycleState(String);

impl LifecycleState {
    /// Create a state from any string.
    pub fn new(state: impl Into<String>) -> Self {
        Self(state.into())
    }

    /// `RUNNING`.
    #[must_use]
    pub fn running() -> Self {
        Self::new("RUNNING")
    }

    /// `PAUSED`.
    #[must_use]
    pub fn paused() -> Self {
        Self::new("PAUSED")
    }

    /// Case-insensitive comparison against a reported state.
    #[must_use]
    pub fn matches(&self, reported: &str) -> bool {
        self.0.eq_ignore_ascii_case(reported)
    }

    /// State as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LifecycleState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Name and state criteria for selecting connectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectorFilter {
    /// Start-anchored name pattern.
    pub name: Option<NamePattern>,
    /// Required lifecycle state.
    pub state: Option<LifecycleState>,
}

impl ConnectorFilter {
    /// Filter that keeps everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require names matching `pattern`.
    pub fn with_pattern(mut self, pattern: &str) -> ConnectResult<Self> {
        self.name = Some(NamePattern::new(pattern)?);
        Ok(self)
    }

    /// Require connectors in `state`.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(LifecycleState::new(state));
        self
    }

    /// Returns `true` when no criteria are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.state.is_none()
    }
}

/// Result of `GET /connectors`.
///
/// The shape follows the `expand` value that was requested: a flat list of
/// names without expansion, otherwise an object keyed by connector name in
/// the order the cluster returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorListing {
    /// Plain connector names.
    Names(Vec<String>),
    /// Name-keyed entries from an expanded listing.
    Expanded {
        /// Expansion the entries carry.
        expand: Expand,
        /// Entries in cluster order.
        entries: Map<String, Value>,
    },
}

impl ConnectorListing {
    /// Interpret a listing response requested with `expand`.
    pub fn from_outcome(expand: Option<Expand>, outcome: Outcome) -> ConnectResult<Self> {
        let Some(body) = outcome.into_body() else {
            return Err(unexpected("listing response had no JSON body"));
        };

        match (expand, body) {
            (None, Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(unexpected(format!("connector name is not a string: {other}"))),
                })
                .collect::<ConnectResult<Vec<_>>>()
                .map(Self::Names),
            (Some(expand), Value::Object(entries)) => Ok(Self::Expanded { expand, entries }),
            (None, _) => Err(unexpected("expected an array of connector names")),
            (Some(expand), _) => Err(unexpected(format!(
                "expected an object keyed by connector name for expand={expand}"
            ))),
        }
    }

    /// Expansion carried by the entries.
    #[must_use]
    pub const fn expand(&self) -> Option<Expand> {
        match self {
            Self::Names(_) => None,
            Self::Expanded { expand, .. } => Some(*expand),
        }
    }

    /// Returns `true` when every entry carries `status.connector.state`.
    #[must_use]
    pub const fn carries_status(&self) -> bool {
        matches!(
            self,
            Self::Expanded {
                expand: Expand::Status,
                ..
            }
        )
    }

    /// Connector names in listing order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Names(names) => names.iter().map(String::as_str).collect(),
            Self::Expanded { entries, .. } => entries.keys().map(String::as_str).collect(),
        }
    }

    /// Number of connectors.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Names(names) => names.len(),
            Self::Expanded { entries, .. } => entries.len(),
        }
    }

    /// Returns `true` when the listing has no connectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry for `name` in an expanded listing.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Names(_) => None,
            Self::Expanded { entries, .. } => entries.get(name),
        }
    }

    /// Keep connectors for which `keep(name, entry)` holds, preserving shape and order.
    #[must_use]
    pub fn retain<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&str, Option<&Value>) -> bool,
    {
        match &mut self {
            Self::Names(names) => names.retain(|name| keep(name, None)),
            Self::Expanded { entries, .. } => {
                entries.retain(|name, entry| keep(name, Some(&*entry)));
            }
        }
        self
    }

    /// Keep connectors whose name matches `pattern`.
    #[must_use]
    pub fn filter_by_name(self, pattern: &NamePattern) -> Self {
        self.retain(|name, _| pattern.matches(name))
    }

    /// Reported state of `name`, for listings that carry status.
    #[must_use]
    pub fn state_of(&self, name: &str) -> Option<&str> {
        self.entry(name).and_then(connector_state)
    }

    /// Name to reported state, for listings that carry status.
    #[must_use]
    pub fn state_lookup(&self) -> HashMap<String, String> {
        match self {
            Self::Expanded {
                expand: Expand::Status,
                entries,
            } => entries
                .iter()
                .filter_map(|(name, entry)| {
                    connector_state(entry).map(|state| (name.clone(), state.to_string()))
                })
                .collect(),
            _ => HashMap::new(),
        }
    }

    /// Keep connectors whose own status entry reports `state`.
    ///
    /// Only meaningful when [`carries_status`](Self::carries_status) holds;
    /// any other listing loses every entry.
    #[must_use]
    pub fn filter_by_own_state(self, state: &LifecycleState) -> Self {
        self.retain(|_, entry| entry.and_then(connector_state).is_some_and(|s| state.matches(s)))
    }

    /// Keep connectors that `lookup` reports in `state`. Names absent from the
    /// lookup are dropped.
    #[must_use]
    pub fn filter_by_lookup(self, state: &LifecycleState, lookup: &HashMap<String, String>) -> Self {
        self.retain(|name, _| lookup.get(name).is_some_and(|s| state.matches(s)))
    }

    /// JSON rendering in the cluster's shape.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Names(names) => Value::Array(names.iter().cloned().map(Value::String).collect()),
            Self::Expanded { entries, .. } => Value::Object(entries.clone()),
        }
    }
}

impl Serialize for ConnectorListing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Names(names) => names.serialize(serializer),
            Self::Expanded { entries, .. } => entries.serialize(serializer),
        }
    }
}

/// `status.connector.state` of a status-expanded entry.
#[must_use]
pub fn connector_state(entry: &Value) -> Option<&str> {
    entry.pointer("/status/connector/state").and_then(Value::as_str)
}

fn unexpected(message: impl Into<String>) -> ConnectError {
    ConnectError::UnexpectedResponse {
        operation: "list_connectors",
        message: message.into(),
    }
}
