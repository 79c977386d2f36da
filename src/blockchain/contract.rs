//! Binding for the deployed ReadWrite contract.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;
use std::sync::Arc;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainReader};

sol! {
    /// Single string store: anyone may read, anyone may overwrite.
    interface IReadWrite {
        function getMessage() external view returns (string memory);
        function setMessage(string calldata message) external;
    }
}

/// A read-only handle bound to one contract address.
#[derive(Clone)]
pub struct MessageContract {
    address: Address,
    reader: Arc<dyn ChainReader>,
}

impl MessageContract {
    pub fn new(address: Address, reader: Arc<dyn ChainReader>) -> Self {
        Self { address, reader }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Call `getMessage()` and decode the returned string.
    pub async fn get_message(&self) -> BlockchainResult<String> {
        let tx = TransactionRequest::default()
            .with_to(self.address)
            .with_input(IReadWrite::getMessageCall {}.abi_encode());

        let data = self.reader.call(tx).await?;
        IReadWrite::getMessageCall::abi_decode_returns(&data)
            .map_err(|e| BlockchainError::Decode(e.to_string()))
    }

    /// ABI-encoded calldata for `setMessage(message)`.
    pub fn set_message_calldata(message: &str) -> Bytes {
        IReadWrite::setMessageCall {
            message: message.to_string(),
        }
        .abi_encode()
        .into()
    }
}

impl std::fmt::Debug for MessageContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageContract")
            .field("address", &self.address)
            .finish()
    }
}
