use alloy_primitives::Address;
use tracing::info;

use crate::{
    build_batch, safe_tx_hash, MetaTransaction, ProposalSigner, SafeTransaction, SubmissionError,
    TransactionProposal, TxServiceApi,
};

/// Where proposals go: the Safe, its chain, and the batching library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeContext {
    pub safe: Address,
    pub chain_id: u64,
    pub multisend: Address,
    /// Free-form tag the tx service stores alongside the proposal.
    pub origin: Option<String>,
}

/// Batches `payloads`, resolves the nonce, hashes and signs the result.
///
/// Nothing is sent to the tx service besides the nonce lookup.
pub async fn prepare_proposal(
    api: &impl TxServiceApi,
    signer: &ProposalSigner,
    ctx: &SafeContext,
    payloads: &[MetaTransaction],
) -> Result<TransactionProposal, SubmissionError> {
    let (batched, operation) = build_batch(payloads, ctx.multisend)?;

    let nonce = api.next_nonce(ctx.safe).await?;

    let tx = SafeTransaction::new(batched.to, batched.value, batched.data, operation, nonce);
    let hash = safe_tx_hash(&tx, ctx.chain_id, ctx.safe);
    let signature = signer.sign_safe_tx_hash(hash)?;

    info!(
        safe = %ctx.safe,
        calls = %payloads.len(),
        ?operation,
        %nonce,
        safe_tx_hash = %hash,
        "prepared safe transaction"
    );

    let proposal = TransactionProposal::new(ctx.safe, &tx, hash, signer.address(), signature);
    Ok(match &ctx.origin {
        Some(origin) => proposal.with_origin(origin.clone()),
        None => proposal,
    })
}

/// Prepares a proposal for `payloads` and hands it to the tx service.
///
/// There is no deduplication: submitting the same payloads twice proposes
/// twice.
pub async fn submit(
    api: &impl TxServiceApi,
    signer: &ProposalSigner,
    ctx: &SafeContext,
    payloads: &[MetaTransaction],
) -> Result<TransactionProposal, SubmissionError> {
    let proposal = prepare_proposal(api, signer, ctx, payloads).await?;
    api.propose_transaction(&proposal).await?;
    Ok(proposal)
}
