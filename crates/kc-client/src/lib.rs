//! Kafka Connect REST client.
//!
//! This crate provides:
//! - One method per REST endpoint, with per-endpoint status handling.
//! - Connector listings filtered by name pattern and lifecycle state.
//! - Bulk operations that isolate per-connector failures.
//!
//! # Example
//!
//! ```rust,no_run
//! use kc_client::{ConnectClient, ConnectorFilter};
//!
//! # async fn run() -> kc_client::ConnectResult<()> {
//! let client = ConnectClient::builder("http://localhost:8083").build()?;
//! let filter = ConnectorFilter::new().with_pattern("prod-")?.with_state("running");
//! let report = client.pause_all_connectors(&filter).await?;
//! for name in report.failed() {
//!     eprintln!("could not pause {name}");
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

mod bulk;
mod client;
mod config;
mod directory;
mod error;
mod listing;
mod response;
mod transport;

pub use bulk::{BulkOperation, BulkReport};
pub use client::{
    ConnectClient, ConnectClientBuilder, ConnectorConfig, NewConnector, RestartOptions,
};
pub use config::{BasicAuth, ConnectConfig, DEFAULT_ENDPOINT};
pub use error::{ConnectError, ConnectResult, TransportErrorInfo};
pub use listing::{
    ConnectorFilter, ConnectorListing, Expand, LifecycleState, NamePattern, connector_state,
};
pub use response::{Disposition, Outcome, StatusTable};
pub use transport::{
    ConnectRequest, HttpMethod, HttpTransport, MockTransport, RawResponse, Transport,
};
