//! `kc` subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use kc_client::{BulkOperation, ConnectClient, Expand, NewConnector, RestartOptions};
use tracing::debug;

use crate::args::{self, Resolved, Target};
use crate::output::Output;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get the version and other details of the Kafka Connect cluster
    GetCluster,

    /// Get a list of active connectors
    GetConnectors {
        /// Retrieve additional information about each connector (status or info)
        #[arg(long, env = "KAFKA_CONNECT_EXPAND")]
        expand: Option<Expand>,

        /// Keep connectors whose name matches this regex from the start
        #[arg(long, value_name = "REGEX")]
        connector_pattern: Option<String>,

        /// Keep connectors in this state (case-insensitive)
        #[arg(long, value_name = "STATE")]
        state: Option<String>,
    },

    /// Get the details of a connector
    GetConnector(Target),

    /// Create a new connector from a JSON file with `name` and `config`
    ///
    /// Exits non-zero on 409, when the connector already exists or a
    /// rebalance is in progress.
    CreateConnector {
        /// JSON file, or `-` for stdin
        config: PathBuf,
    },

    /// Create or update a connector's configuration
    ///
    /// Exits non-zero on 409, when a rebalance is in progress.
    PutConnector {
        /// Connector name
        connector: String,
        /// JSON file holding the configuration map, or `-` for stdin
        config: PathBuf,
    },

    /// Get the configuration of a connector
    GetConnectorConfig(Target),

    /// Get the status of a connector
    GetConnectorStatus(Target),

    /// Restart a connector
    RestartConnector {
        #[command(flatten)]
        target: Target,

        /// Also restart the connector's tasks
        #[arg(long, env = "KAFKA_CONNECT_INCLUDE_TASKS")]
        include_tasks: bool,

        /// Only restart instances that have failed
        #[arg(long, env = "KAFKA_CONNECT_ONLY_FAILED")]
        only_failed: bool,
    },

    /// Pause a connector; bulk mode only pauses RUNNING connectors
    PauseConnector(Target),

    /// Resume a connector; bulk mode only resumes PAUSED connectors
    ResumeConnector(Target),

    /// Delete a connector
    DeleteConnector(Target),

    /// Get the tasks of a connector
    GetConnectorTasks(Target),

    /// Get the status of one task of a connector
    GetConnectorTaskStatus {
        /// Connector name
        connector: String,
        /// Task id
        task_id: u32,
    },

    /// Restart one task of a connector
    RestartConnectorTask {
        /// Connector name
        connector: String,
        /// Task id
        task_id: u32,
    },

    /// Get the topics a connector is using
    GetConnectorTopics(Target),

    /// Reset the set of topics a connector is using
    ResetConnectorTopics(Target),

    /// Get the connector plugins installed on the worker
    GetConnectorPlugins,

    /// Validate a configuration against a connector plugin
    ValidateConnectorConfig {
        /// Plugin class name
        plugin: String,
        /// JSON file holding the configuration map, or `-` for stdin
        config: PathBuf,
    },
}

/// Run `command` against `client`.
pub async fn run(command: Command, client: &ConnectClient) -> Result<Output> {
    let output = match command {
        Command::GetCluster => client.cluster_info().await?.into(),
        Command::GetConnectors {
            expand,
            connector_pattern,
            state,
        } => {
            let filter = args::filter(connector_pattern.as_deref(), state.as_deref())?;
            client.list_connectors(expand, &filter).await?.into()
        }
        Command::GetConnector(target) => dispatch(client, &target, BulkOperation::Get).await?,
        Command::CreateConnector { config } => {
            let body = args::read_json(&config)?;
            let connector: NewConnector = serde_json::from_value(body).with_context(|| {
                format!(
                    "{} must be an object with `name` and `config`",
                    config.display()
                )
            })?;
            client.create_connector(&connector).await?.into()
        }
        Command::PutConnector { connector, config } => {
            let config = args::read_json_object(&config)?;
            client.update_connector(&connector, &config).await?.into()
        }
        Command::GetConnectorConfig(target) => {
            dispatch(client, &target, BulkOperation::Config).await?
        }
        Command::GetConnectorStatus(target) => {
            dispatch(client, &target, BulkOperation::Status).await?
        }
        Command::RestartConnector {
            target,
            include_tasks,
            only_failed,
        } => {
            let options = RestartOptions {
                include_tasks,
                only_failed,
            };
            dispatch(client, &target, BulkOperation::Restart(options)).await?
        }
        Command::PauseConnector(target) => dispatch(client, &target, BulkOperation::Pause).await?,
        Command::ResumeConnector(target) => {
            dispatch(client, &target, BulkOperation::Resume).await?
        }
        Command::DeleteConnector(target) => {
            dispatch(client, &target, BulkOperation::Delete).await?
        }
        Command::GetConnectorTasks(target) => {
            dispatch(client, &target, BulkOperation::Tasks).await?
        }
        Command::GetConnectorTaskStatus { connector, task_id } => {
            client.get_task_status(&connector, task_id).await?.into()
        }
        Command::RestartConnectorTask { connector, task_id } => {
            client.restart_task(&connector, task_id).await?.into()
        }
        Command::GetConnectorTopics(target) => {
            dispatch(client, &target, BulkOperation::Topics).await?
        }
        Command::ResetConnectorTopics(target) => {
            dispatch(client, &target, BulkOperation::ResetTopics).await?
        }
        Command::GetConnectorPlugins => client.list_connector_plugins().await?.into(),
        Command::ValidateConnectorConfig { plugin, config } => {
            let config = args::read_json_object(&config)?;
            client.validate_connector_config(&plugin, &config).await?.into()
        }
    };
    Ok(output)
}

async fn dispatch(
    client: &ConnectClient,
    target: &Target,
    operation: BulkOperation,
) -> Result<Output> {
    match target.resolve()? {
        Resolved::One(name) => Ok(client.apply_to_one(operation, &name).await?.into()),
        Resolved::Many(filter) => {
            debug!(%operation, ?filter, "running bulk command");
            Ok(client.apply_to_all(operation, &filter).await?.into())
        }
    }
}
