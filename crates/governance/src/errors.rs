use thiserror::Error;

/// Failure to obtain the list of passed POI proposals.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("governance request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("governance API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed governance response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("governance API reported failure")]
    NotOk,
}
