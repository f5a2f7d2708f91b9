use std::{fmt, str::FromStr};

use alloy::signers::{local::PrivateKeySigner, SignerSync};
use alloy_primitives::{Address, Bytes, B256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::SubmissionError;

/// Offset Safe adds to `v` to tell an `eth_sign` signature from an EIP-712 one.
const ETH_SIGN_V_OFFSET: u8 = 4;

/// Local key of the Safe owner proposing the transaction.
#[derive(Clone)]
pub struct ProposalSigner {
    inner: PrivateKeySigner,
}

impl fmt::Debug for ProposalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProposalSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl ProposalSigner {
    pub fn new(inner: PrivateKeySigner) -> Self {
        Self { inner }
    }

    /// Parses a hex private key, with or without `0x`. The input is zeroized
    /// once the signer is built.
    pub fn from_hex(key: Zeroizing<String>) -> Result<Self, SubmissionError> {
        let signer = PrivateKeySigner::from_str(key.trim())
            .map_err(|e| SubmissionError::InvalidKey(e.to_string()))?;
        Ok(Self::new(signer))
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }

    /// Signs a Safe transaction hash the way `eth_sign` would.
    ///
    /// Returns `r | s | v` with `v` in `{31, 32}`.
    pub fn sign_safe_tx_hash(&self, hash: B256) -> Result<Bytes, SubmissionError> {
        let sig = self.inner.sign_message_sync(hash.as_slice())?;

        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&sig.r().to_be_bytes::<32>());
        out.extend_from_slice(&sig.s().to_be_bytes::<32>());
        out.push(27 + u8::from(sig.v()) + ETH_SIGN_V_OFFSET);

        debug!(signer = %self.address(), %hash, "signed safe tx hash");
        Ok(out.into())
    }
}
