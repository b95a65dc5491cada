//! Bulk operations against a scripted transport.

use kc_client::{
    BulkOperation, ConnectClient, ConnectError, ConnectorFilter, HttpMethod, MockTransport,
    Outcome, RestartOptions,
};
use kc_testkit::fixtures;

fn client() -> (ConnectClient<MockTransport>, MockTransport) {
    kc_testkit::init_test_tracing();
    let mock = MockTransport::new();
    (ConnectClient::with_transport(mock.clone()), mock)
}

fn script_states(mock: &MockTransport, states: &[(&str, &str)]) {
    mock.respond(
        HttpMethod::Get,
        "/connectors?expand=status",
        200,
        fixtures::status_listing(states),
    );
}

#[tokio::test]
async fn pause_all_skips_connectors_that_are_not_running() {
    let (client, mock) = client();
    script_states(
        &mock,
        &[("a", "RUNNING"), ("b", "PAUSED"), ("c", "FAILED"), ("d", "RUNNING")],
    );
    for name in ["a", "b", "c", "d"] {
        mock.respond_empty(HttpMethod::Put, &format!("/connectors/{name}/pause"), 202);
    }

    let filter = ConnectorFilter::new().with_state("RUNNING");
    let report = client.pause_all_connectors(&filter).await.unwrap();

    assert_eq!(report.names().collect::<Vec<_>>(), vec!["a", "d"]);
    assert_eq!(mock.count(HttpMethod::Put, "/connectors/b/pause"), 0);
    assert_eq!(mock.count(HttpMethod::Put, "/connectors/c/pause"), 0);
    assert!(matches!(report.get("a"), Some(Ok(Outcome::Empty))));
}

#[tokio::test]
async fn pause_all_gate_applies_without_explicit_state() {
    let (client, mock) = client();
    script_states(&mock, &[("a", "RUNNING"), ("b", "PAUSED")]);
    mock.respond_empty(HttpMethod::Put, "/connectors/a/pause", 202);

    let report = client
        .pause_all_connectors(&ConnectorFilter::new())
        .await
        .unwrap();
    assert_eq!(report.names().collect::<Vec<_>>(), vec!["a"]);
    assert_eq!(mock.count(HttpMethod::Put, "/connectors/b/pause"), 0);
}

#[tokio::test]
async fn pause_all_with_conflicting_state_filter_does_nothing() {
    let (client, mock) = client();
    script_states(&mock, &[("a", "RUNNING"), ("b", "PAUSED")]);

    let filter = ConnectorFilter::new().with_state("PAUSED");
    let report = client.pause_all_connectors(&filter).await.unwrap();
    assert!(report.is_empty());
    assert_eq!(mock.total(), 1);
}

#[tokio::test]
async fn resume_all_only_touches_paused_connectors() {
    let (client, mock) = client();
    script_states(&mock, &[("a", "RUNNING"), ("b", "paused")]);
    mock.respond_empty(HttpMethod::Put, "/connectors/b/resume", 202);

    let report = client
        .resume_all_connectors(&ConnectorFilter::new())
        .await
        .unwrap();
    assert_eq!(report.names().collect::<Vec<_>>(), vec!["b"]);
    assert_eq!(mock.count(HttpMethod::Put, "/connectors/a/resume"), 0);
}

#[tokio::test]
async fn one_failure_does_not_stop_the_rest() {
    let (client, mock) = client();
    script_states(
        &mock,
        &[("first", "RUNNING"), ("second", "RUNNING"), ("third", "RUNNING")],
    );
    mock.respond_empty(HttpMethod::Delete, "/connectors/first", 204);
    mock.respond_text(HttpMethod::Delete, "/connectors/second", 500, "worker busy");
    mock.respond_empty(HttpMethod::Delete, "/connectors/third", 204);

    let report = client
        .delete_all_connectors(&ConnectorFilter::new())
        .await
        .unwrap();

    assert_eq!(report.len(), 3);
    assert_eq!(report.succeeded().collect::<Vec<_>>(), vec!["first", "third"]);
    assert_eq!(report.failed().collect::<Vec<_>>(), vec!["second"]);
    match report.get("second") {
        Some(Err(ConnectError::Status { status, text })) => {
            assert_eq!(*status, 500);
            assert_eq!(text, "worker busy");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
    assert_eq!(mock.count(HttpMethod::Delete, "/connectors/third"), 1);
}

#[tokio::test]
async fn transport_failure_is_isolated_per_connector() {
    let (client, mock) = client();
    script_states(&mock, &[("a", "RUNNING"), ("b", "RUNNING")]);
    mock.fail(
        HttpMethod::Post,
        "/connectors/a/restart?includeTasks=false&onlyFailed=false",
        "connection reset",
    );
    mock.respond_empty(
        HttpMethod::Post,
        "/connectors/b/restart?includeTasks=false&onlyFailed=false",
        204,
    );

    let report = client
        .restart_all_connectors(&ConnectorFilter::new(), RestartOptions::default())
        .await
        .unwrap();
    assert!(matches!(report.get("a"), Some(Err(err)) if err.is_transport()));
    assert!(matches!(report.get("b"), Some(Ok(Outcome::Empty))));
}

#[tokio::test]
async fn restart_all_passes_options_and_keeps_per_status_errors() {
    let (client, mock) = client();
    script_states(&mock, &[("a", "FAILED"), ("b", "FAILED")]);
    mock.respond_empty(
        HttpMethod::Post,
        "/connectors/a/restart?includeTasks=true&onlyFailed=true",
        204,
    );
    mock.respond_text(
        HttpMethod::Post,
        "/connectors/b/restart?includeTasks=true&onlyFailed=true",
        409,
        "rebalance in progress",
    );

    let options = RestartOptions::default().with_tasks(true).only_failed(true);
    let filter = ConnectorFilter::new().with_state("failed");
    let report = client.restart_all_connectors(&filter, options).await.unwrap();

    assert!(matches!(report.get("a"), Some(Ok(Outcome::Empty))));
    assert!(matches!(report.get("b"), Some(Err(ConnectError::Conflict { .. }))));
}

#[tokio::test]
async fn report_follows_listing_order() {
    let (client, mock) = client();
    script_states(&mock, &[("zeta", "RUNNING"), ("alpha", "RUNNING"), ("mu", "RUNNING")]);
    for name in ["zeta", "alpha", "mu"] {
        mock.respond(
            HttpMethod::Get,
            &format!("/connectors/{name}/config"),
            200,
            fixtures::config(name),
        );
    }

    let report = client
        .get_all_connector_configs(&ConnectorFilter::new())
        .await
        .unwrap();
    assert_eq!(report.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mu"]);
}

#[tokio::test]
async fn concurrent_fan_out_keeps_order_and_isolation() {
    let (client, mock) = client();
    let client = client.with_bulk_concurrency(4);
    let names = ["n0", "n1", "n2", "n3", "n4", "n5"];
    let states: Vec<(&str, &str)> = names.iter().map(|name| (*name, "RUNNING")).collect();
    script_states(&mock, &states);
    for name in names {
        if name == "n3" {
            mock.respond_text(HttpMethod::Get, "/connectors/n3", 500, "boom");
        } else {
            mock.respond(
                HttpMethod::Get,
                &format!("/connectors/{name}"),
                200,
                fixtures::info(name),
            );
        }
    }

    let report = client
        .get_all_connectors(&ConnectorFilter::new())
        .await
        .unwrap();
    assert_eq!(report.names().collect::<Vec<_>>(), names.to_vec());
    assert_eq!(report.failed().collect::<Vec<_>>(), vec!["n3"]);
    assert_eq!(mock.total(), 1 + names.len());
}

#[tokio::test]
async fn bulk_status_reuses_the_listing() {
    let (client, mock) = client();
    script_states(&mock, &[("a-sink", "RUNNING"), ("b-sink", "FAILED")]);

    let report = client
        .get_all_connector_statuses(&ConnectorFilter::new().with_pattern("a-").unwrap())
        .await
        .unwrap();

    assert_eq!(report.len(), 1);
    let status = report.get("a-sink").unwrap().as_ref().unwrap();
    assert_eq!(status.body().unwrap()["connector"]["state"], "RUNNING");
    assert_eq!(mock.total(), 1);
}

#[tokio::test]
async fn resolution_failure_is_an_error() {
    let (client, mock) = client();
    mock.fail(HttpMethod::Get, "/connectors?expand=status", "connection refused");

    let err = client
        .apply_to_all(BulkOperation::Delete, &ConnectorFilter::new())
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert_eq!(mock.count(HttpMethod::Get, "/connectors?expand=status"), 1);
}

#[tokio::test]
async fn topic_operations_fan_out() {
    let (client, mock) = client();
    script_states(&mock, &[("orders-sink", "RUNNING")]);
    mock.respond(
        HttpMethod::Get,
        "/connectors/orders-sink/topics",
        200,
        fixtures::topics("orders-sink", &["orders"]),
    );
    mock.respond_empty(HttpMethod::Put, "/connectors/orders-sink/topics/reset", 200);

    let topics = client
        .apply_to_all(BulkOperation::Topics, &ConnectorFilter::new())
        .await
        .unwrap();
    assert_eq!(
        topics.to_json()["orders-sink"]["orders-sink"]["topics"][0],
        "orders"
    );

    let reset = client
        .apply_to_all(BulkOperation::ResetTopics, &ConnectorFilter::new())
        .await
        .unwrap();
    assert_eq!(reset.to_json()["orders-sink"], serde_json::Value::Null);
}
