//! FETCH -> ENCODE -> SUBMIT, each stage run once.

use poi_governance::{fetch_passed_poi_proposals, GovernanceApi};
use poi_registry::PoiRegistry;
use poi_safe::{
    prepare_proposal, submit, ProposalSigner, SafeContext, TransactionProposal, TxServiceApi,
};
use tracing::{info, instrument};

use crate::errors::Result;

/// How a run ended.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// The governance API had no passed POI proposals.
    NothingPending,
    /// Signed but, as requested, not sent.
    DryRun(TransactionProposal),
    /// Accepted by the tx service, awaiting co-signatures.
    Proposed(TransactionProposal),
}

pub(crate) struct Pipeline<G, T> {
    pub(crate) governance: G,
    pub(crate) tx_service: T,
    pub(crate) registry: PoiRegistry,
    pub(crate) signer: ProposalSigner,
    pub(crate) ctx: SafeContext,
    pub(crate) dry_run: bool,
}

impl<G: GovernanceApi, T: TxServiceApi> Pipeline<G, T> {
    #[instrument(skip_all, fields(safe = %self.ctx.safe, dry_run = self.dry_run))]
    pub(crate) async fn run(&self) -> Result<Outcome> {
        info!("fetching passed POI proposals");
        let changes = fetch_passed_poi_proposals(&self.governance).await?;
        if changes.is_empty() {
            info!("no passed POI proposals, nothing to propose");
            return Ok(Outcome::NothingPending);
        }

        let payloads = self.registry.encode_all(&changes)?;
        info!(count = %payloads.len(), registry = %self.registry.address(), "encoded POI calls");

        if self.dry_run {
            let proposal =
                prepare_proposal(&self.tx_service, &self.signer, &self.ctx, &payloads).await?;
            info!(
                nonce = %proposal.nonce,
                safe_tx_hash = %proposal.contract_transaction_hash,
                "dry run, proposal not submitted"
            );
            return Ok(Outcome::DryRun(proposal));
        }

        let proposal = submit(&self.tx_service, &self.signer, &self.ctx, &payloads).await?;
        Ok(Outcome::Proposed(proposal))
    }
}
