//! Encodes POI changes into calls on the POI registry contract.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use alloy_primitives::{address, Address};
use alloy_sol_types::{sol, SolInterface};
use poi_governance::{PendingChange, PoiAction};
use poi_safe::MetaTransaction;
use thiserror::Error;
use tracing::debug;

/// Registry contract the DAO Safe administers on Polygon.
pub const DEFAULT_REGISTRY_ADDRESS: Address = address!("FEC09d5C192aaf7Ec7E2C89Cc8D3224138391B2E");

sol! {
    interface IPoiRegistry {
        function add(string coordinates) external;
        function remove(string coordinates) external;
    }
}

pub use IPoiRegistry::IPoiRegistryCalls as PoiCall;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("unsupported POI action '{0}' for coordinates {1}")]
    UnsupportedAction(String, String),
}

impl PoiCall {
    /// Resolves the registry function for `action`.
    pub fn for_action(action: &PoiAction, coordinates: String) -> Result<Self, EncodingError> {
        match action {
            PoiAction::AddPoi => Ok(PoiCall::add(IPoiRegistry::addCall { coordinates })),
            PoiAction::RemovePoi => Ok(PoiCall::remove(IPoiRegistry::removeCall { coordinates })),
            PoiAction::Unsupported(tag) => {
                Err(EncodingError::UnsupportedAction(tag.clone(), coordinates))
            }
        }
    }
}

/// Handle on a deployed POI registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoiRegistry {
    address: Address,
}

impl PoiRegistry {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Builds the call for one action. The payload never carries value.
    pub fn encode_call(
        &self,
        action: &PoiAction,
        coordinates: &str,
    ) -> Result<MetaTransaction, EncodingError> {
        let call = PoiCall::for_action(action, coordinates.to_owned())?;
        debug!(%action, %coordinates, registry = %self.address, "encoded POI call");
        Ok(MetaTransaction::call(self.address, call.abi_encode()))
    }

    pub fn encode(&self, change: &PendingChange) -> Result<MetaTransaction, EncodingError> {
        self.encode_call(&change.action, &change.coordinates)
    }

    /// Encodes every change in order, failing on the first unsupported one.
    pub fn encode_all(
        &self,
        changes: &[PendingChange],
    ) -> Result<Vec<MetaTransaction>, EncodingError> {
        changes.iter().map(|change| self.encode(change)).collect()
    }
}

impl Default for PoiRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_ADDRESS)
    }
}
