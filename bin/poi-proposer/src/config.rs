use std::{fs, io, path::Path};

use alloy_primitives::Address;
use poi_governance::DEFAULT_GOVERNANCE_URL;
use poi_registry::DEFAULT_REGISTRY_ADDRESS;
use poi_safe::{SafeContext, DEFAULT_TX_SERVICE_URL, MULTI_SEND_CALL_ONLY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::args::{Args, EnvArgs};

/// Polygon mainnet, where the DAO Safe lives.
const DEFAULT_CHAIN_ID: u64 = 137;

/// Tag the tx service stores with proposals made by this tool.
const PROPOSAL_ORIGIN: &str = "poi-proposer";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid address in {name}: '{value}'")]
    InvalidAddress { name: &'static str, value: String },

    #[error("reading config file: {0}")]
    Read(#[from] io::Error),

    #[error("parsing config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings deserialized from the optional config file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ConfigFile {
    /// EVM JSON-RPC endpoint.
    pub(crate) rpc_url: Option<String>,
    /// Safe multisig address.
    pub(crate) safe_address: Option<Address>,
    /// Safe Transaction Service base URL.
    pub(crate) tx_service_url: Option<String>,
    /// Governance API base URL.
    pub(crate) governance_url: Option<String>,
    /// POI registry contract.
    pub(crate) registry_address: Option<Address>,
    /// `MultiSendCallOnly` deployment used for batches.
    pub(crate) multisend_address: Option<Address>,
    /// Chain the Safe is deployed on; checked against the RPC.
    pub(crate) chain_id: Option<u64>,
}

impl ConfigFile {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Settings filled with either environment, config file values or
/// opinionated defaults.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) rpc_url: String,
    pub(crate) safe_address: Address,
    pub(crate) tx_service_url: String,
    pub(crate) governance_url: String,
    pub(crate) registry_address: Address,
    pub(crate) multisend_address: Address,
    pub(crate) chain_id: u64,
    pub(crate) dry_run: bool,
}

impl Config {
    pub(crate) fn from_args(args: &Args, env: &EnvArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(args, env, file)
    }

    /// Environment wins over the file; the file wins over defaults.
    pub(crate) fn resolve(
        args: &Args,
        env: &EnvArgs,
        file: ConfigFile,
    ) -> Result<Self, ConfigError> {
        let safe_address = match &env.safe_address {
            Some(raw) => raw
                .trim()
                .parse::<Address>()
                .map_err(|_| ConfigError::InvalidAddress {
                    name: "SAFE_ADDRESS",
                    value: raw.clone(),
                })?,
            None => file
                .safe_address
                .ok_or(ConfigError::Missing("SAFE_ADDRESS"))?,
        };

        Ok(Self {
            rpc_url: env
                .rpc_url
                .clone()
                .or(file.rpc_url)
                .ok_or(ConfigError::Missing("RPC"))?,
            safe_address,
            tx_service_url: env
                .tx_service_url
                .clone()
                .or(file.tx_service_url)
                .unwrap_or_else(|| DEFAULT_TX_SERVICE_URL.to_owned()),
            governance_url: env
                .governance_url
                .clone()
                .or(file.governance_url)
                .unwrap_or_else(|| DEFAULT_GOVERNANCE_URL.to_owned()),
            registry_address: file.registry_address.unwrap_or(DEFAULT_REGISTRY_ADDRESS),
            multisend_address: file.multisend_address.unwrap_or(MULTI_SEND_CALL_ONLY),
            chain_id: file.chain_id.unwrap_or(DEFAULT_CHAIN_ID),
            dry_run: args.dry_run,
        })
    }

    pub(crate) fn safe_context(&self) -> SafeContext {
        SafeContext {
            safe: self.safe_address,
            chain_id: self.chain_id,
            multisend: self.multisend_address,
            origin: Some(PROPOSAL_ORIGIN.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAFE: &str = "0x89205A3A3b2A69De6Dbf7f01ED13B2108B2c43e7";

    fn args() -> Args {
        Args {
            config: None,
            dry_run: false,
        }
    }

    fn env() -> EnvArgs {
        EnvArgs {
            rpc_url: Some("https://polygon-rpc.example.org".to_string()),
            safe_address: Some(SAFE.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_defaults() {
        let config = Config::resolve(&args(), &env(), ConfigFile::default()).unwrap();
        assert_eq!(config.safe_address, SAFE.parse::<Address>().unwrap());
        assert_eq!(config.tx_service_url, DEFAULT_TX_SERVICE_URL);
        assert_eq!(config.governance_url, DEFAULT_GOVERNANCE_URL);
        assert_eq!(config.registry_address, DEFAULT_REGISTRY_ADDRESS);
        assert_eq!(config.multisend_address, MULTI_SEND_CALL_ONLY);
        assert_eq!(config.chain_id, 137);
        assert!(!config.dry_run);

        let ctx = config.safe_context();
        assert_eq!(ctx.safe, config.safe_address);
        assert_eq!(ctx.origin.as_deref(), Some("poi-proposer"));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = ConfigFile {
            rpc_url: Some("https://file.example.org".to_string()),
            safe_address: Some(Address::repeat_byte(0x01)),
            governance_url: Some("https://gov.example.org/api".to_string()),
            chain_id: Some(80002),
            ..Default::default()
        };
        let config = Config::resolve(&args(), &env(), file).unwrap();

        assert_eq!(config.rpc_url, "https://polygon-rpc.example.org");
        assert_eq!(config.safe_address, SAFE.parse::<Address>().unwrap());
        assert_eq!(config.governance_url, "https://gov.example.org/api");
        assert_eq!(config.chain_id, 80002);
    }

    #[test]
    fn test_missing_required_values() {
        let err = Config::resolve(&args(), &EnvArgs::default(), ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SAFE_ADDRESS")));

        let only_safe = EnvArgs {
            safe_address: Some(SAFE.to_string()),
            ..Default::default()
        };
        let err = Config::resolve(&args(), &only_safe, ConfigFile::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("RPC")));
    }

    #[test]
    fn test_invalid_safe_address() {
        let bad = EnvArgs {
            safe_address: Some("0x1234".to_string()),
            ..env()
        };
        let err = Config::resolve(&args(), &bad, ConfigFile::default()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidAddress {
                name: "SAFE_ADDRESS",
                ..
            }
        ));
    }

    #[test]
    fn test_config_file_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            rpc_url = "https://polygon-rpc.example.org"
            safe_address = "{SAFE}"
            registry_address = "0x0000000000000000000000000000000000000042"
            chain_id = 137
            "#
        )
        .unwrap();

        let loaded = ConfigFile::load(file.path()).unwrap();
        assert_eq!(loaded.safe_address, Some(SAFE.parse().unwrap()));
        assert_eq!(
            loaded.registry_address,
            Some(Address::with_last_byte(0x42))
        );
        assert!(loaded.tx_service_url.is_none());

        let args = Args {
            config: Some(file.path().to_path_buf()),
            dry_run: true,
        };
        let config = Config::from_args(&args, &EnvArgs::default()).unwrap();
        assert_eq!(config.registry_address, Address::with_last_byte(0x42));
        assert!(config.dry_run);
    }

    #[test]
    fn test_config_file_serde_roundtrip() {
        let original = ConfigFile {
            rpc_url: Some("https://polygon-rpc.example.org".to_string()),
            safe_address: Some(SAFE.parse().unwrap()),
            multisend_address: Some(MULTI_SEND_CALL_ONLY),
            ..Default::default()
        };

        let serialized = toml::to_string(&original).expect("serialize ConfigFile");
        let reparsed: ConfigFile = toml::from_str(&serialized).expect("reparse ConfigFile");

        assert_eq!(original.rpc_url, reparsed.rpc_url);
        assert_eq!(original.safe_address, reparsed.safe_address);
        assert_eq!(original.multisend_address, reparsed.multisend_address);
        assert_eq!(reparsed.chain_id, None);
    }
}
