//! JSON rendering of command results.

use anyhow::Result;
use kc_client::{BulkReport, ConnectorListing, Outcome};
use serde_json::Value;

/// Result of one command.
#[derive(Debug)]
pub enum Output {
    /// Single-connector or cluster-level result.
    Outcome(Outcome),
    /// Connector listing.
    Listing(ConnectorListing),
    /// Per-connector results of a bulk command.
    Report(BulkReport),
}

impl Output {
    /// JSON printed on stdout.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Outcome(outcome) => outcome.to_json(),
            Self::Listing(listing) => listing.to_json(),
            Self::Report(report) => report.to_json(),
        }
    }

    /// `false` for conflicts and for reports with a failed entry.
    pub fn is_success(&self) -> bool {
        match self {
            Self::Outcome(outcome) => !outcome.is_conflict(),
            Self::Listing(_) => true,
            Self::Report(report) => !report.has_failures(),
        }
    }
}

impl From<Outcome> for Output {
    fn from(outcome: Outcome) -> Self {
        Self::Outcome(outcome)
    }
}

impl From<ConnectorListing> for Output {
    fn from(listing: ConnectorListing) -> Self {
        Self::Listing(listing)
    }
}

impl From<BulkReport> for Output {
    fn from(report: BulkReport) -> Self {
        Self::Report(report)
    }
}

/// Print `output` as pretty JSON on stdout.
pub fn print(output: &Output) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&output.to_json())?);
    Ok(())
}
