use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use tracing::{debug, info};

use crate::{Operation, SafeTransaction, SubmissionError};

/// Safe Transaction Service for Polygon.
pub const DEFAULT_TX_SERVICE_URL: &str = "https://safe-transaction-polygon.safe.global/api";

/// Subset of `GET /v1/safes/{address}/` the proposer relies on.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SafeInfo {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub nonce: u64,
    #[serde(default)]
    pub threshold: u64,
    #[serde(default)]
    pub owners: Vec<Address>,
}

#[serde_as]
#[derive(Clone, Debug, Deserialize)]
struct PendingTransaction {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    nonce: u64,
}

#[derive(Clone, Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
}

/// Body of `POST /v1/safes/{address}/multisig-transactions/`.
///
/// Addresses go out checksummed; the service rejects lowercase ones.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionProposal {
    #[serde(skip)]
    pub safe: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub to: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
    #[serde_as(as = "DisplayFromStr")]
    pub safe_tx_gas: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub base_gas: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub gas_price: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub gas_token: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub refund_receiver: Address,
    pub nonce: u64,
    pub contract_transaction_hash: B256,
    #[serde_as(as = "DisplayFromStr")]
    pub sender: Address,
    pub signature: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl TransactionProposal {
    pub fn new(
        safe: Address,
        tx: &SafeTransaction,
        safe_tx_hash: B256,
        sender: Address,
        signature: Bytes,
    ) -> Self {
        Self {
            safe,
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
            operation: tx.operation,
            safe_tx_gas: tx.safe_tx_gas,
            base_gas: tx.base_gas,
            gas_price: tx.gas_price,
            gas_token: tx.gas_token,
            refund_receiver: tx.refund_receiver,
            nonce: tx.nonce,
            contract_transaction_hash: safe_tx_hash,
            sender,
            signature,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// Picks the nonce for a new proposal.
///
/// Proposals already queued at or above the Safe's nonce occupy their slots,
/// so the new one goes right after the highest of them.
pub fn select_next_nonce(safe_nonce: u64, pending: &[u64]) -> Result<u64, SubmissionError> {
    match pending.iter().copied().filter(|n| *n >= safe_nonce).max() {
        Some(highest) => highest
            .checked_add(1)
            .ok_or(SubmissionError::NonceOverflow(highest)),
        None => Ok(safe_nonce),
    }
}

/// Operations of the Safe Transaction Service the proposer uses.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait TxServiceApi: Send + Sync {
    /// Returns the nonce a new proposal for `safe` should use.
    async fn next_nonce(&self, safe: Address) -> Result<u64, SubmissionError>;

    /// Stores a signed proposal awaiting co-signatures.
    async fn propose_transaction(
        &self,
        proposal: &TransactionProposal,
    ) -> Result<(), SubmissionError>;
}

/// HTTP implementation of [`TxServiceApi`].
#[derive(Debug, Clone)]
pub struct TxServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl TxServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn safe_url(&self, safe: Address) -> String {
        format!("{}/v1/safes/{}/", self.base_url, safe.to_checksum(None))
    }

    fn multisig_url(&self, safe: Address) -> String {
        format!("{}multisig-transactions/", self.safe_url(safe))
    }

    pub async fn safe_info(&self, safe: Address) -> Result<SafeInfo, SubmissionError> {
        self.get_json(self.http.get(self.safe_url(safe))).await
    }

    async fn pending_nonces(&self, safe: Address, from: u64) -> Result<Vec<u64>, SubmissionError> {
        let req = self.http.get(self.multisig_url(safe)).query(&[
            ("executed", "false".to_string()),
            ("nonce__gte", from.to_string()),
            ("ordering", "-nonce".to_string()),
        ]);
        let page: Page<PendingTransaction> = self.get_json(req).await?;
        Ok(page.results.into_iter().map(|tx| tx.nonce).collect())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, SubmissionError> {
        let body = check_status(req.send().await?).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl Default for TxServiceClient {
    fn default() -> Self {
        Self::new(DEFAULT_TX_SERVICE_URL)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<Vec<u8>, SubmissionError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        return Err(SubmissionError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(body.to_vec())
}

#[async_trait]
impl TxServiceApi for TxServiceClient {
    async fn next_nonce(&self, safe: Address) -> Result<u64, SubmissionError> {
        let info = self.safe_info(safe).await?;
        let pending = self.pending_nonces(safe, info.nonce).await?;
        let nonce = select_next_nonce(info.nonce, &pending)?;
        debug!(
            %safe,
            safe_nonce = %info.nonce,
            threshold = %info.threshold,
            owners = %info.owners.len(),
            pending = %pending.len(),
            %nonce,
            "resolved next nonce"
        );
        Ok(nonce)
    }

    async fn propose_transaction(
        &self,
        proposal: &TransactionProposal,
    ) -> Result<(), SubmissionError> {
        let resp = self
            .http
            .post(self.multisig_url(proposal.safe))
            .json(proposal)
            .send()
            .await?;
        check_status(resp).await?;

        info!(
            safe = %proposal.safe,
            safe_tx_hash = %proposal.contract_transaction_hash,
            nonce = %proposal.nonce,
            "proposal accepted by tx service"
        );
        Ok(())
    }
}
