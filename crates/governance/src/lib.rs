//! Client for the Decentraland governance API.
//!
//! Fetches passed POI proposals and turns them into [`PendingChange`]s, the
//! input of the transaction encoder.

mod client;
mod errors;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub use client::MockGovernanceApi;
pub use client::{
    fetch_passed_poi_proposals, GovernanceApi, GovernanceClient, ProposalQuery,
    DEFAULT_GOVERNANCE_URL,
};
pub use errors::FetchError;
pub use types::{GovernanceResponse, PendingChange, PoiAction, PoiConfiguration, ProposalRecord};
