//! POI proposer
//!
//! Reads passed "poi" proposals from the Decentraland governance API, encodes
//! the matching POI registry calls and proposes them, signed by one owner, to
//! the DAO Safe through the Safe Transaction Service. Remaining owners confirm
//! and execute through the usual Safe tooling.

mod args;
mod config;
mod errors;
mod pipeline;
mod rpc;

use args::{Args, EnvArgs};
use config::{Config, ConfigError};
use errors::Result;
use pipeline::{Outcome, Pipeline};
use poi_common::logging::{self, LoggingInitConfig};
use poi_governance::GovernanceClient;
use poi_registry::PoiRegistry;
use poi_safe::{ProposalSigner, TxServiceClient};
use tracing::info;
use zeroize::Zeroizing;

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    if let Err(e) = main_inner(args) {
        eprintln!("FATAL ERROR: {e}");

        return Err(e);
    }

    Ok(())
}

fn main_inner(args: Args) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("poi-rt")
        .build()
        .expect("init: build rt");

    let mut env_args = EnvArgs::from_env();

    // Init the logging before we do anything else.
    init_logging(&env_args);

    let config = Config::from_args(&args, &env_args)?;
    let signer = load_signer(env_args.private_key.take())?;
    info!(
        safe = %config.safe_address,
        proposer = %signer.address(),
        dry_run = config.dry_run,
        "starting poi proposer"
    );

    runtime.block_on(run(config, signer))
}

async fn run(config: Config, signer: ProposalSigner) -> Result<()> {
    rpc::verify_chain_id(&config.rpc_url, config.chain_id).await?;

    let pipeline = Pipeline {
        governance: GovernanceClient::new(config.governance_url.clone()),
        tx_service: TxServiceClient::new(config.tx_service_url.clone()),
        registry: PoiRegistry::new(config.registry_address),
        signer,
        ctx: config.safe_context(),
        dry_run: config.dry_run,
    };

    match pipeline.run().await? {
        Outcome::NothingPending => info!("done, nothing proposed"),
        Outcome::DryRun(proposal) => info!(
            nonce = %proposal.nonce,
            safe_tx_hash = %proposal.contract_transaction_hash,
            "done, dry run"
        ),
        Outcome::Proposed(proposal) => info!(
            nonce = %proposal.nonce,
            safe_tx_hash = %proposal.contract_transaction_hash,
            "done, proposal awaiting confirmations"
        ),
    }

    Ok(())
}

/// Consumes the key so it is zeroized once the signer exists.
fn load_signer(key: Option<Zeroizing<String>>) -> Result<ProposalSigner> {
    let key = key.ok_or(ConfigError::Missing("PRIVATE_KEY"))?;
    Ok(ProposalSigner::from_hex(key)?)
}

fn init_logging(env_args: &EnvArgs) {
    logging::init_logging_from_config(LoggingInitConfig {
        service_base_name: "poi-proposer",
        service_label: env_args.service_label.as_deref(),
        log_dir: env_args.log_dir.as_ref(),
        log_file_prefix: None,
        json_format: env_args.log_json,
    });
}
