use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::{BatchError, MetaTransaction, Operation};

/// Canonical `MultiSendCallOnly` v1.3.0 deployment.
pub const MULTI_SEND_CALL_ONLY: Address = address!("40A2aCCbd92BCA938b02010E17A5b8929b49130D");

sol! {
    function multiSend(bytes transactions) external payable;
}

/// Packs meta-transactions into the `transactions` argument of `multiSend`.
///
/// Each entry is `uint8 operation | address to | uint256 value | uint256 len | bytes data`
/// with no padding. Only plain calls are packed; `MultiSendCallOnly` reverts
/// on delegate calls.
pub fn encode_multisend(txs: &[MetaTransaction]) -> Bytes {
    let len = txs.iter().map(|tx| 1 + 20 + 32 + 32 + tx.data.len()).sum();
    let mut buf = Vec::with_capacity(len);

    for tx in txs {
        buf.push(u8::from(Operation::Call));
        buf.extend_from_slice(tx.to.as_slice());
        buf.extend_from_slice(&tx.value.to_be_bytes::<32>());
        buf.extend_from_slice(&U256::from(tx.data.len()).to_be_bytes::<32>());
        buf.extend_from_slice(&tx.data);
    }

    buf.into()
}

/// Collapses meta-transactions into the single call a Safe will execute.
///
/// A lone transaction is executed directly. Several are routed through a
/// delegate call to `multisend`.
pub fn build_batch(
    txs: &[MetaTransaction],
    multisend: Address,
) -> Result<(MetaTransaction, Operation), BatchError> {
    match txs {
        [] => Err(BatchError::Empty),
        [single] => Ok((single.clone(), Operation::Call)),
        many => {
            let call = multiSendCall {
                transactions: encode_multisend(many),
            };
            Ok((
                MetaTransaction::call(multisend, call.abi_encode()),
                Operation::DelegateCall,
            ))
        }
    }
}
