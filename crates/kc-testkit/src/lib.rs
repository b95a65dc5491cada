//! Test kit for the Kafka Connect client and CLI.
//!
//! - [`MockConnectServer`] - wiremock server preloaded with REST API conventions
//! - [`fixtures`] - response bodies shaped like a real cluster's
//! - [`init_test_tracing`] - one-time tracing setup for test output
//!
//! # Example
//!
//! ```rust,ignore
//! use kc_testkit::{MockConnectServer, fixtures};
//!
//! #[tokio::test]
//! async fn lists_connectors() {
//!     kc_testkit::init_test_tracing();
//!
//!     let server = MockConnectServer::start().await;
//!     server
//!         .listing(None, fixtures::names(&["alpha-source", "beta-sink"]))
//!         .await;
//!
//!     let client = ConnectClient::builder(server.base_url()).build().unwrap();
//!     // ...
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
mod mock_server;
mod tracing_config;

pub use mock_server::MockConnectServer;
pub use tracing_config::{init_test_tracing, init_test_tracing_with_filter};
