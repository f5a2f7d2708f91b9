use poi_governance::FetchError;
use poi_registry::EncodingError;
use poi_safe::SubmissionError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("rpc: {0}")]
    Rpc(String),

    #[error("rpc reports chain id {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("encode: {0}")]
    Encoding(#[from] EncodingError),

    #[error("submit: {0}")]
    Submission(#[from] SubmissionError),
}

pub(crate) type Result<T> = std::result::Result<T, AppError>;
