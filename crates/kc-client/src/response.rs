//! Response normalization.
//!
//! The REST API does not use one status scheme across endpoints: 409 means
//! "already exists" on create but "rebalance needed" on restart, 500 on restart
//! means the coordinator timed out, and so on. Each operation therefore owns a
//! [`StatusTable`] naming how its documented codes are treated. Codes missing
//! from a table fall back to: any 2xx is a success, anything else is an error
//! carrying the raw text.

use serde_json::Value;
use tracing::{error, warn};

use crate::error::{ConnectError, ConnectResult};
use crate::transport::RawResponse;

/// Successful (or tolerated) result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Response carried a JSON body.
    Body(Value),
    /// Success without a body (202/204, or a body that is not JSON).
    Empty,
    /// 409 on create/update: returned to the caller rather than raised.
    Conflict {
        /// Decoded body, when the cluster sent JSON.
        body: Option<Value>,
        /// Raw response text.
        text: String,
    },
}

impl Outcome {
    /// Returns `true` for [`Outcome::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` for [`Outcome::Conflict`].
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Decoded body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Body(body) | Self::Conflict { body: Some(body), .. } => Some(body),
            _ => None,
        }
    }

    /// Consume into the decoded body, if any.
    #[must_use]
    pub fn into_body(self) -> Option<Value> {
        match self {
            Self::Body(body) | Self::Conflict { body: Some(body), .. } => Some(body),
            _ => None,
        }
    }

    /// JSON rendering: the body, `null` when empty, the body or raw text on conflict.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Body(body) => body.clone(),
            Self::Empty => Value::Null,
            Self::Conflict { body: Some(body), .. } => body.clone(),
            Self::Conflict { body: None, text } => Value::String(text.clone()),
        }
    }
}

/// How one status code is treated by one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Success; decode the body, or [`Outcome::Empty`] when it is not JSON.
    Decode,
    /// Success; the body is ignored.
    Empty,
    /// Tolerated conflict returned as [`Outcome::Conflict`].
    Conflict,
    /// Conflict raised as [`ConnectError::Conflict`].
    RejectConflict,
    /// Raised as [`ConnectError::NotFound`].
    NotFound,
    /// Raised as [`ConnectError::ServerTimeout`].
    ServerTimeout,
}

/// Per-operation status code table.
#[derive(Debug, Clone, Copy)]
pub struct StatusTable {
    operation: &'static str,
    entries: &'static [(u16, Disposition)],
}

impl StatusTable {
    /// Plain reads and validation: 200 carries a body.
    pub const READ: Self = Self::new("read", &[(200, Disposition::Decode)]);

    /// `POST /connectors`.
    pub const CREATE: Self = Self::new(
        "create",
        &[(201, Disposition::Decode), (409, Disposition::Conflict)],
    );

    /// `PUT /connectors/{name}/config`. 201 when the PUT created the connector.
    pub const UPDATE: Self = Self::new(
        "update",
        &[
            (200, Disposition::Decode),
            (201, Disposition::Decode),
            (409, Disposition::Conflict),
        ],
    );

    /// `POST /connectors/{name}/restart`.
    pub const RESTART: Self = Self::new(
        "restart",
        &[
            (200, Disposition::Decode),
            (202, Disposition::Decode),
            (204, Disposition::Empty),
            (404, Disposition::NotFound),
            (409, Disposition::RejectConflict),
            (500, Disposition::ServerTimeout),
        ],
    );

    /// `PUT /connectors/{name}/pause`.
    pub const PAUSE: Self = Self::new("pause", &[(202, Disposition::Empty)]);

    /// `PUT /connectors/{name}/resume`.
    pub const RESUME: Self = Self::new("resume", &[(202, Disposition::Empty)]);

    /// `DELETE /connectors/{name}`.
    pub const DELETE: Self = Self::new("delete", &[(204, Disposition::Empty)]);

    /// `POST /connectors/{name}/tasks/{id}/restart`.
    pub const RESTART_TASK: Self = Self::new(
        "restart_task",
        &[(200, Disposition::Empty), (204, Disposition::Empty)],
    );

    /// `PUT /connectors/{name}/topics/reset`.
    pub const RESET_TOPICS: Self = Self::new("reset_topics", &[(200, Disposition::Empty)]);

    const fn new(operation: &'static str, entries: &'static [(u16, Disposition)]) -> Self {
        Self {
            operation,
            entries,
        }
    }

    /// Operation name, used in log lines.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }

    /// Disposition for `status`, or `None` when it is a plain error.
    #[must_use]
    pub fn disposition(&self, status: u16) -> Option<Disposition> {
        self.entries
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, disposition)| *disposition)
            .or_else(|| (200..300).contains(&status).then_some(Disposition::Decode))
    }

    /// Turn a raw response into an outcome or an error.
    pub fn normalize(&self, response: RawResponse) -> ConnectResult<Outcome> {
        let RawResponse { status, body } = response;
        let Some(disposition) = self.disposition(status) else {
            return Err(ConnectError::Status { status, text: body });
        };

        match disposition {
            Disposition::Decode => Ok(decode(&body).map_or(Outcome::Empty, Outcome::Body)),
            Disposition::Empty => Ok(Outcome::Empty),
            Disposition::Conflict => {
                warn!(
                    operation = self.operation,
                    "conflict: connector already exists or a rebalance is in progress"
                );
                Ok(Outcome::Conflict {
                    body: decode(&body),
                    text: body,
                })
            }
            Disposition::RejectConflict => {
                warn!(
                    operation = self.operation,
                    "conflict: rebalance needed before the request can be served"
                );
                Err(ConnectError::Conflict { text: body })
            }
            Disposition::NotFound => {
                error!(operation = self.operation, "connector not found");
                Err(ConnectError::NotFound { text: body })
            }
            Disposition::ServerTimeout => {
                error!(operation = self.operation, "request timed out on the cluster");
                Err(ConnectError::ServerTimeout { text: body })
            }
        }
    }
}

fn decode(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn restart(status: u16, body: &str) -> ConnectResult<Outcome> {
        StatusTable::RESTART.normalize(RawResponse::new(status, body))
    }

    #[test]
    fn restart_200_returns_body() {
        let outcome = restart(200, r#"{"name":"sink"}"#).unwrap();
        assert_eq!(outcome, Outcome::Body(json!({"name": "sink"})));
    }

    #[test]
    fn restart_202_returns_body() {
        let outcome = restart(202, r#"{"connector":{"state":"RESTARTING"}}"#).unwrap();
        assert_eq!(outcome.body().unwrap()["connector"]["state"], "RESTARTING");
    }

    #[test]
    fn restart_204_is_empty() {
        assert_eq!(restart(204, "").unwrap(), Outcome::Empty);
    }

    #[test]
    fn restart_404_is_not_found() {
        let err = restart(404, "Unknown connector sink").unwrap_err();
        match err {
            ConnectError::NotFound { text } => assert_eq!(text, "Unknown connector sink"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn restart_409_is_raised_conflict() {
        assert!(matches!(
            restart(409, "rebalance").unwrap_err(),
            ConnectError::Conflict { .. }
        ));
    }

    #[test]
    fn restart_500_is_server_timeout() {
        assert!(matches!(
            restart(500, "Request timed out").unwrap_err(),
            ConnectError::ServerTimeout { .. }
        ));
    }

    #[test]
    fn create_409_is_returned_with_body() {
        let body = r#"{"error_code":409,"message":"Connector sink already exists"}"#;
        let outcome = StatusTable::CREATE
            .normalize(RawResponse::new(409, body))
            .unwrap();
        assert!(outcome.is_conflict());
        assert_eq!(
            outcome.body().unwrap()["message"],
            "Connector sink already exists"
        );
    }

    #[test]
    fn pause_500_is_generic_error_with_raw_text() {
        let err = StatusTable::PAUSE
            .normalize(RawResponse::new(500, "boom"))
            .unwrap_err();
        match err {
            ConnectError::Status { status, text } => {
                assert_eq!(status, 500);
                assert_eq!(text, "boom");
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn read_404_is_generic_error() {
        let err = StatusTable::READ
            .normalize(RawResponse::new(404, "missing"))
            .unwrap_err();
        assert!(matches!(err, ConnectError::Status { status: 404, .. }));
    }

    #[test]
    fn undecodable_success_body_is_empty() {
        let outcome = StatusTable::READ
            .normalize(RawResponse::new(200, "not json"))
            .unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn unlisted_success_status_still_succeeds() {
        let outcome = StatusTable::PAUSE
            .normalize(RawResponse::new(200, ""))
            .unwrap();
        assert!(outcome.is_empty());
    }

    #[test]
    fn outcome_json_rendering() {
        assert_eq!(Outcome::Empty.to_json(), Value::Null);
        let conflict = Outcome::Conflict {
            body: None,
            text: "busy".into(),
        };
        assert_eq!(conflict.to_json(), json!("busy"));
        assert!(conflict.into_body().is_none());
    }
}
