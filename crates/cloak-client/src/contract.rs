//! Contract bindings: callable-by-name with automatic receipt waiting

use std::sync::Arc;
use std::time::Duration;

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, B256};
use alloy_rpc_types::TransactionReceipt;
use serde_json::json;

use crate::error::ChainError;
use crate::provider::EvmProvider;

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const RECEIPT_POLL_ATTEMPTS: usize = 120;

/// A deployed contract bound to a provider and a sending account.
///
/// Calls are encoded from the JSON ABI by function name, submitted via
/// `eth_sendTransaction` and confirmed by polling for the receipt; a
/// reverted transaction is an error, not a receipt.
pub struct Contract {
    provider: Arc<dyn EvmProvider>,
    address: Address,
    abi: JsonAbi,
    from: Address,
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field("address", &self.address)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

impl Contract {
    pub(crate) fn new(
        provider: Arc<dyn EvmProvider>,
        address: Address,
        abi: JsonAbi,
        from: Address,
    ) -> Self {
        Self {
            provider,
            address,
            abi,
            from,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Invoke `function` with positional `args` and wait for the
    /// transaction to be mined.
    pub async fn call(
        &self,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<TransactionReceipt, ChainError> {
        let func = self
            .abi
            .function(function)
            .and_then(|overloads| overloads.first())
            .ok_or_else(|| ChainError::UnknownFunction(function.to_string()))?;
        let calldata = func.abi_encode_input(args)?;

        let tx = json!({
            "from": self.from,
            "to": self.address,
            "data": format!("0x{}", hex::encode(&calldata)),
        });
        let resp = self
            .provider
            .raw_request("eth_sendTransaction", json!([tx]))
            .await?;
        let tx_hash: B256 = serde_json::from_value(resp)?;
        tracing::debug!(function, tx_hash = %tx_hash, "transaction submitted");

        self.wait_for_receipt(tx_hash).await
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TransactionReceipt, ChainError> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let resp = self
                .provider
                .raw_request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if !resp.is_null() {
                let receipt: TransactionReceipt = serde_json::from_value(resp)?;
                if !receipt.status() {
                    return Err(ChainError::Reverted { tx_hash });
                }
                return Ok(receipt);
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
        Err(ChainError::ReceiptTimeout { tx_hash })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;
    use crate::signer::EvmSigner;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const COUNTER_ABI: &str = r#"[
        {
            "type": "function",
            "name": "increment",
            "inputs": [{ "name": "by", "type": "uint256" }],
            "outputs": [],
            "stateMutability": "nonpayable"
        }
    ]"#;

    /// Provider stub that replays queued responses and records requests
    struct ScriptedProvider {
        responses: Mutex<VecDeque<Value>>,
        requests: Mutex<Vec<(String, Value)>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(String, Value)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EvmProvider for ScriptedProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::External
        }

        async fn chain_id(&self) -> Result<u64, ChainError> {
            Ok(31337)
        }

        async fn signer(&self) -> Result<Arc<dyn EvmSigner>, ChainError> {
            Err(ChainError::NoAccounts)
        }

        async fn raw_request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
            self.requests
                .lock()
                .unwrap()
                .push((method.to_string(), params));
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Value::Null))
        }
    }

    fn tx_hash_json() -> Value {
        json!(format!("0x{}", "ab".repeat(32)))
    }

    fn receipt_json(status: &str) -> Value {
        json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x5208",
            "logs": [],
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": format!("0x{}", "ab".repeat(32)),
            "transactionIndex": "0x0",
            "blockHash": format!("0x{}", "cd".repeat(32)),
            "blockNumber": "0x1",
            "gasUsed": "0x5208",
            "effectiveGasPrice": "0x3b9aca00",
            "from": format!("0x{}", "11".repeat(20)),
            "to": format!("0x{}", "22".repeat(20)),
            "contractAddress": null
        })
    }

    fn test_contract(provider: Arc<ScriptedProvider>) -> Contract {
        let abi: JsonAbi = serde_json::from_str(COUNTER_ABI).unwrap();
        Contract::new(
            provider,
            Address::repeat_byte(0x22),
            abi,
            Address::repeat_byte(0x11),
        )
    }

    #[tokio::test]
    async fn test_call_encodes_sends_and_waits() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tx_hash_json(),
            Value::Null,
            receipt_json("0x1"),
        ]));
        let contract = test_contract(provider.clone());

        let receipt = contract
            .call("increment", &[DynSolValue::Uint(alloy_primitives::U256::from(5u64), 256)])
            .await
            .unwrap();
        assert!(receipt.status());

        let requests = provider.requests();
        assert_eq!(requests[0].0, "eth_sendTransaction");
        // selector for increment(uint256) plus one word of arguments
        let data = requests[0].1[0]["data"].as_str().unwrap();
        assert_eq!(data.len(), 2 + 2 * (4 + 32));
        assert_eq!(requests[1].0, "eth_getTransactionReceipt");
        assert_eq!(requests[2].0, "eth_getTransactionReceipt");
    }

    #[tokio::test]
    async fn test_reverted_transaction_is_an_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            tx_hash_json(),
            receipt_json("0x0"),
        ]));
        let contract = test_contract(provider);

        let err = contract
            .call("increment", &[DynSolValue::Uint(alloy_primitives::U256::from(1u64), 256)])
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Reverted { .. }));
    }

    #[tokio::test]
    async fn test_unknown_function_fails_without_rpc() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let contract = test_contract(provider.clone());

        let err = contract.call("missing", &[]).await.unwrap_err();
        assert!(matches!(err, ChainError::UnknownFunction(_)));
        assert!(provider.requests().is_empty());
    }
}
