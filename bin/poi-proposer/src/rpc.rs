use alloy::providers::{Provider, ProviderBuilder};
use reqwest::Url;
use tracing::{debug, info};

use crate::errors::{AppError, Result};

/// Asks the RPC node for its chain id and makes sure it is the one the Safe
/// proposal will be hashed for.
pub(crate) async fn verify_chain_id(rpc_url: &str, expected: u64) -> Result<u64> {
    let url = Url::parse(rpc_url).map_err(|e| AppError::Rpc(format!("invalid RPC url: {e}")))?;
    debug!(%url, "querying chain id");

    let provider = ProviderBuilder::new().connect_http(url);
    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| AppError::Rpc(e.to_string()))?;

    check_chain_id(expected, actual)?;
    info!(chain_id = %actual, "connected to rpc");
    Ok(actual)
}

fn check_chain_id(expected: u64, actual: u64) -> Result<()> {
    if expected != actual {
        return Err(AppError::ChainMismatch { expected, actual });
    }
    Ok(())
}
