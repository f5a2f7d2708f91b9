use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::{sol, Eip712Domain, SolStruct};

use crate::SafeTransaction;

sol! {
    struct SafeTx {
        address to;
        uint256 value;
        bytes data;
        uint8 operation;
        uint256 safeTxGas;
        uint256 baseGas;
        uint256 gasPrice;
        address gasToken;
        address refundReceiver;
        uint256 nonce;
    }
}

impl From<&SafeTransaction> for SafeTx {
    fn from(tx: &SafeTransaction) -> Self {
        SafeTx {
            to: tx.to,
            value: tx.value,
            data: tx.data.clone(),
            operation: tx.operation.into(),
            safeTxGas: tx.safe_tx_gas,
            baseGas: tx.base_gas,
            gasPrice: tx.gas_price,
            gasToken: tx.gas_token,
            refundReceiver: tx.refund_receiver,
            nonce: U256::from(tx.nonce),
        }
    }
}

/// EIP-712 domain of a Safe >= 1.3.0.
pub fn safe_domain(chain_id: u64, safe: Address) -> Eip712Domain {
    Eip712Domain::new(None, None, Some(U256::from(chain_id)), Some(safe), None)
}

/// Hash the owners sign and the tx service indexes the proposal by.
pub fn safe_tx_hash(tx: &SafeTransaction, chain_id: u64, safe: Address) -> B256 {
    SafeTx::from(tx).eip712_signing_hash(&safe_domain(chain_id, safe))
}
