use std::{env, fmt, path::PathBuf};

use argh::FromArgs;
use zeroize::Zeroizing;

/// Configs overridable by environment. Mostly for sensitive data.
///
/// Variable names follow the `.env` files the DAO operators already keep.
#[derive(Clone, Default)]
pub(crate) struct EnvArgs {
    /// EVM JSON-RPC endpoint
    pub(crate) rpc_url: Option<String>,
    /// Hex private key of the proposing Safe owner
    pub(crate) private_key: Option<Zeroizing<String>>,
    /// Safe multisig address
    pub(crate) safe_address: Option<String>,
    /// Safe Transaction Service base URL
    pub(crate) tx_service_url: Option<String>,
    /// Governance API base URL
    pub(crate) governance_url: Option<String>,
    /// Directory for file logging
    pub(crate) log_dir: Option<PathBuf>,
    /// Emit JSON log lines
    pub(crate) log_json: Option<bool>,
    /// Service label to include in service name
    pub(crate) service_label: Option<String>,
}

impl EnvArgs {
    pub(crate) fn from_env() -> Self {
        Self {
            rpc_url: env::var("RPC").ok(),
            private_key: env::var("PRIVATE_KEY").ok().map(Zeroizing::new),
            safe_address: env::var("SAFE_ADDRESS").ok(),
            tx_service_url: env::var("TX_SERVICE_URL").ok(),
            governance_url: env::var("GOVERNANCE_URL").ok(),
            log_dir: env::var("POI_LOG_DIR").ok().map(PathBuf::from),
            log_json: env::var("POI_LOG_JSON").ok().map(|v| parse_flag(&v)),
            service_label: env::var("POI_SVC_LABEL").ok(),
        }
    }
}

impl fmt::Debug for EnvArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvArgs")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("safe_address", &self.safe_address)
            .field("tx_service_url", &self.tx_service_url)
            .field("governance_url", &self.governance_url)
            .field("log_dir", &self.log_dir)
            .field("log_json", &self.log_json)
            .field("service_label", &self.service_label)
            .finish()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[derive(Debug, Clone, FromArgs)]
#[argh(description = "Proposes passed Decentraland POI changes to the DAO Safe")]
pub(crate) struct Args {
    #[argh(option, short = 'c', description = "path to a TOML config file")]
    pub(crate) config: Option<PathBuf>,

    #[argh(
        switch,
        short = 'n',
        description = "build and sign the proposal without submitting it"
    )]
    pub(crate) dry_run: bool,
}
