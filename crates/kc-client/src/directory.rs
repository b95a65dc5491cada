//! Connector listing with name and state filters.

use tracing::{debug, info, instrument};

use crate::client::ConnectClient;
use crate::error::ConnectResult;
use crate::listing::{ConnectorFilter, ConnectorListing, Expand, LifecycleState};
use crate::response::StatusTable;
use crate::transport::{ConnectRequest, Transport};

impl<T: Transport> ConnectClient<T> {
    /// `GET /connectors`, optionally expanded, then filtered.
    ///
    /// The name filter is applied first. A state filter on a listing that
    /// does not carry status costs exactly one extra status-expanded fetch;
    /// the result keeps the shape that `expand` asked for.
    #[instrument(skip(self))]
    pub async fn list_connectors(
        &self,
        expand: Option<Expand>,
        filter: &ConnectorFilter,
    ) -> ConnectResult<ConnectorListing> {
        let mut listing = self.fetch_listing(expand).await?;

        if let Some(pattern) = &filter.name {
            let before = listing.len();
            listing = listing.filter_by_name(pattern);
            debug!(
                pattern = pattern.as_str(),
                before,
                after = listing.len(),
                "filtered connectors by name"
            );
        }

        if let Some(state) = &filter.state {
            listing = self.filter_by_state(listing, state).await?;
        }

        Ok(listing)
    }

    /// Keep connectors currently in `state`.
    ///
    /// Filters in place when `listing` carries status. Otherwise fetches the
    /// status-expanded listing once and filters `listing` by it; connectors
    /// missing from that fetch are dropped.
    pub async fn filter_by_state(
        &self,
        listing: ConnectorListing,
        state: &LifecycleState,
    ) -> ConnectResult<ConnectorListing> {
        let before = listing.len();
        let filtered = if listing.carries_status() {
            listing.filter_by_own_state(state)
        } else {
            let lookup = self.fetch_listing(Some(Expand::Status)).await?.state_lookup();
            listing.filter_by_lookup(state, &lookup)
        };
        debug!(
            state = state.as_str(),
            before,
            after = filtered.len(),
            "filtered connectors by state"
        );
        Ok(filtered)
    }

    async fn fetch_listing(&self, expand: Option<Expand>) -> ConnectResult<ConnectorListing> {
        info!(expand = expand.map(Expand::as_query), "listing connectors");
        let mut request = ConnectRequest::get(["connectors"]);
        if let Some(expand) = expand {
            request = request.with_query("expand", expand.as_query());
        }
        let outcome = self.call(request, StatusTable::READ).await?;
        ConnectorListing::from_outcome(expand, outcome)
    }
}
