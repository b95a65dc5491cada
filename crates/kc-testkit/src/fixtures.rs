//! Response bodies shaped like a Kafka Connect cluster's.

use serde_json::{Map, Value, json};

/// Worker id used in status fixtures.
pub const WORKER_ID: &str = "10.0.0.162:8083";

// ─────────────────────────────────────────────────────────────────────────────
// Listings
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /connectors` without expansion.
#[must_use]
pub fn names(names: &[&str]) -> Value {
    json!(names)
}

/// Status object as returned by `GET /connectors/{name}/status`.
#[must_use]
pub fn status(name: &str, state: &str) -> Value {
    json!({
        "name": name,
        "connector": {"state": state, "worker_id": WORKER_ID},
        "tasks": [{"id": 0, "state": state, "worker_id": WORKER_ID}],
        "type": connector_type(name),
    })
}

/// `GET /connectors?expand=status` for `(name, state)` pairs, in order.
#[must_use]
pub fn status_listing(states: &[(&str, &str)]) -> Value {
    let entries: Map<String, Value> = states
        .iter()
        .map(|(name, state)| ((*name).to_string(), json!({ "status": status(name, state) })))
        .collect();
    Value::Object(entries)
}

/// Info object as returned by `GET /connectors/{name}`.
#[must_use]
pub fn info(name: &str) -> Value {
    json!({
        "name": name,
        "config": config(name),
        "tasks": [{"connector": name, "task": 0}],
        "type": connector_type(name),
    })
}

/// `GET /connectors?expand=info` for `names`, in order.
#[must_use]
pub fn info_listing(names: &[&str]) -> Value {
    let entries: Map<String, Value> = names
        .iter()
        .map(|name| ((*name).to_string(), json!({ "info": info(name) })))
        .collect();
    Value::Object(entries)
}

// ─────────────────────────────────────────────────────────────────────────────
// Single resources
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration of a file-stream connector named `name`.
#[must_use]
pub fn config(name: &str) -> Value {
    let class = if connector_type(name) == "sink" {
        "org.apache.kafka.connect.file.FileStreamSinkConnector"
    } else {
        "org.apache.kafka.connect.file.FileStreamSourceConnector"
    };
    json!({
        "connector.class": class,
        "tasks.max": "1",
        "topics": "orders",
        "name": name,
    })
}

/// `GET /`.
#[must_use]
pub fn cluster_info() -> Value {
    json!({
        "version": "3.7.0",
        "commit": "2ae524ed625438c5",
        "kafka_cluster_id": "HXn6Gm4vQEWb3pf6p4ZmzA",
    })
}

/// `GET /connector-plugins`.
#[must_use]
pub fn plugins() -> Value {
    json!([
        {"class": "org.apache.kafka.connect.file.FileStreamSinkConnector", "type": "sink", "version": "3.7.0"},
        {"class": "org.apache.kafka.connect.file.FileStreamSourceConnector", "type": "source", "version": "3.7.0"},
    ])
}

/// `GET /connectors/{name}/topics`.
#[must_use]
pub fn topics(name: &str, topics: &[&str]) -> Value {
    let mut body = Map::new();
    body.insert(name.to_string(), json!({ "topics": topics }));
    Value::Object(body)
}

/// Error body the cluster sends with non-2xx responses.
#[must_use]
pub fn error(code: u16, message: &str) -> Value {
    json!({"error_code": code, "message": message})
}

fn connector_type(name: &str) -> &'static str {
    if name.ends_with("sink") { "sink" } else { "source" }
}
