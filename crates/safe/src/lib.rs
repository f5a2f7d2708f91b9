//! Safe multisig plumbing: batching meta-transactions into one Safe
//! transaction, hashing and signing it, and proposing it to the Safe
//! Transaction Service for co-signing.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod errors;
mod hash;
mod multisend;
mod service;
mod signer;
mod submit;
mod types;

pub use errors::{BatchError, SubmissionError};
pub use hash::{safe_domain, safe_tx_hash};
pub use multisend::{build_batch, encode_multisend, MULTI_SEND_CALL_ONLY};
#[cfg(any(test, feature = "test-utils"))]
pub use service::MockTxServiceApi;
pub use service::{
    select_next_nonce, SafeInfo, TransactionProposal, TxServiceApi, TxServiceClient,
    DEFAULT_TX_SERVICE_URL,
};
pub use signer::ProposalSigner;
pub use submit::{prepare_proposal, submit, SafeContext};
pub use types::{MetaTransaction, Operation, SafeTransaction};
