use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// How the Safe dispatches its transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Operation {
    Call = 0,
    DelegateCall = 1,
}

impl From<Operation> for u8 {
    fn from(op: Operation) -> Self {
        op as u8
    }
}

impl TryFrom<u8> for Operation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Operation::Call),
            1 => Ok(Operation::DelegateCall),
            other => Err(format!("unknown Safe operation {other}")),
        }
    }
}

/// A single contract call to be executed by the Safe.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MetaTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl MetaTransaction {
    /// A call that transfers no native currency.
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            value: U256::ZERO,
            data: data.into(),
        }
    }
}

/// The `SafeTx` a multisig owner signs.
///
/// Gas refund fields stay zero: owners execute the transaction themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeTransaction {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub operation: Operation,
    pub safe_tx_gas: U256,
    pub base_gas: U256,
    pub gas_price: U256,
    pub gas_token: Address,
    pub refund_receiver: Address,
    pub nonce: u64,
}

impl SafeTransaction {
    pub fn new(to: Address, value: U256, data: Bytes, operation: Operation, nonce: u64) -> Self {
        Self {
            to,
            value,
            data,
            operation,
            safe_tx_gas: U256::ZERO,
            base_gas: U256::ZERO,
            gas_price: U256::ZERO,
            gas_token: Address::ZERO,
            refund_receiver: Address::ZERO,
            nonce,
        }
    }
}
