use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("cannot build a Safe transaction from an empty batch")]
    Empty,
}

/// Failure while turning payloads into a proposal accepted by the relay.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("tx service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tx service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed tx service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("batch: {0}")]
    Batch(#[from] BatchError),

    #[error("signing failed: {0}")]
    Signing(#[from] alloy::signers::Error),

    #[error("no nonce left after pending nonce {0}")]
    NonceOverflow(u64),

    #[error("invalid private key: {0}")]
    InvalidKey(String),
}
