//! Provider seam: the chain-client collaborator behind a trait
//!
//! The client consumes Ethereum access through [`EvmProvider`]. Two
//! production implementations exist: [`HttpProvider`] over an alloy RPC
//! client, and [`InjectedProvider`] over an EIP-1193-style request
//! transport (the injected-wallet shape). Callers that already hold a
//! provider pass it through [`ProviderConfig::Handle`] unchanged.

use std::sync::Arc;

use alloy_primitives::{Address, U64};
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::ProviderConfig;
use crate::error::{ChainError, ClientError, RpcFault};
use crate::signer::{EvmSigner, InjectedSigner, LocalSigner, RpcSigner};

/// Which of the three recognized provider shapes a normalized provider
/// came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Constructed from an RPC URL string
    Http,
    /// Constructed from an injected request-style handle
    Injected,
    /// Supplied pre-built by the caller
    External,
}

/// An injected wallet handle: anything exposing a JSON-RPC request
/// method. This is the seam a browser extension or embedded wallet plugs
/// into.
#[async_trait]
pub trait RequestTransport: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcFault>;
}

/// The chain-client collaborator as consumed by the facade
#[async_trait]
pub trait EvmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Chain id reported by the node or wallet
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Obtain a signer. For injected providers this may prompt the wallet
    /// for account access.
    async fn signer(&self) -> Result<Arc<dyn EvmSigner>, ChainError>;

    /// Raw JSON-RPC call, used by contract bindings
    async fn raw_request(&self, method: &str, params: Value) -> Result<Value, ChainError>;
}

/// Discriminate the provider input once and normalize it.
///
/// String => HTTP provider; request-style handle => injected provider;
/// anything else is trusted as a ready provider. Construction failures
/// surface as the wrapped initialization failure.
pub(crate) async fn resolve_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn EvmProvider>, ClientError> {
    match config {
        ProviderConfig::Url(url) => {
            let provider =
                HttpProvider::connect(url)
                    .await
                    .map_err(|e| ClientError::Initialization {
                        stage: "provider",
                        source: Box::new(e),
                    })?;
            Ok(Arc::new(provider))
        }
        ProviderConfig::Injected(transport) => {
            Ok(Arc::new(InjectedProvider::new(transport.clone())))
        }
        ProviderConfig::Handle(provider) => Ok(provider.clone()),
    }
}

/// Provider over a plain JSON-RPC endpoint.
///
/// Signing defaults to node-managed accounts (`eth_accounts` +
/// `eth_signTypedData_v4`); attach a local key with
/// [`HttpProvider::with_signer`] to sign without node support.
pub struct HttpProvider {
    client: RpcClient,
    local_signer: Option<Arc<LocalSigner>>,
}

impl HttpProvider {
    pub async fn connect(url: &str) -> Result<Self, ChainError> {
        let client = ClientBuilder::default().connect(url).await?;
        Ok(Self {
            client,
            local_signer: None,
        })
    }

    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Self {
        self.local_signer = Some(Arc::new(LocalSigner::new(signer)));
        self
    }
}

#[async_trait]
impl EvmProvider for HttpProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Http
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        let id: U64 = self.client.request_noparams("eth_chainId").await?;
        Ok(id.to::<u64>())
    }

    async fn signer(&self) -> Result<Arc<dyn EvmSigner>, ChainError> {
        if let Some(signer) = &self.local_signer {
            return Ok(signer.clone());
        }
        let accounts: Vec<Address> = self.client.request_noparams("eth_accounts").await?;
        let address = *accounts.first().ok_or(ChainError::NoAccounts)?;
        Ok(Arc::new(RpcSigner::new(self.client.clone(), address)))
    }

    async fn raw_request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        Ok(self.client.request(method.to_string(), params).await?)
    }
}

/// Provider over an injected wallet handle
pub struct InjectedProvider {
    transport: Arc<dyn RequestTransport>,
}

impl InjectedProvider {
    pub fn new(transport: Arc<dyn RequestTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl EvmProvider for InjectedProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Injected
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        let resp = self.transport.request("eth_chainId", json!([])).await?;
        parse_quantity(&resp)
    }

    async fn signer(&self) -> Result<Arc<dyn EvmSigner>, ChainError> {
        // eth_requestAccounts is the wallet permission prompt; the user
        // sees it and can decline
        let resp = self
            .transport
            .request("eth_requestAccounts", json!([]))
            .await?;
        let accounts: Vec<Address> = serde_json::from_value(resp)?;
        let address = *accounts.first().ok_or(ChainError::NoAccounts)?;
        tracing::debug!(address = %address, "injected wallet granted account access");
        Ok(Arc::new(InjectedSigner::new(self.transport.clone(), address)))
    }

    async fn raw_request(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        Ok(self.transport.request(method, params).await?)
    }
}

/// Parse a JSON-RPC quantity (hex string or bare number) into a u64
fn parse_quantity(value: &Value) -> Result<u64, ChainError> {
    match value {
        Value::String(s) => {
            let digits = s.trim_start_matches("0x");
            u64::from_str_radix(digits, 16)
                .map_err(|_| ChainError::InvalidQuantity(s.clone()))
        }
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ChainError::InvalidQuantity(n.to_string())),
        other => Err(ChainError::InvalidQuantity(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubTransport;

    #[async_trait]
    impl RequestTransport for StubTransport {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, RpcFault> {
            match method {
                "eth_chainId" => Ok(json!("0xaa36a7")),
                "eth_requestAccounts" => {
                    Ok(json!(["0x00000000000000000000000000000000000000aa"]))
                }
                other => Err(RpcFault::new(None, format!("unexpected method {other}"))),
            }
        }
    }

    struct StubProvider;

    #[async_trait]
    impl EvmProvider for StubProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::External
        }

        async fn chain_id(&self) -> Result<u64, ChainError> {
            Ok(31337)
        }

        async fn signer(&self) -> Result<Arc<dyn EvmSigner>, ChainError> {
            Err(ChainError::NoAccounts)
        }

        async fn raw_request(&self, _method: &str, _params: Value) -> Result<Value, ChainError> {
            Ok(Value::Null)
        }
    }

    #[tokio::test]
    async fn test_url_shape_builds_http_provider() {
        let config = ProviderConfig::from("https://rpc.example/1");
        let provider = resolve_provider(&config).await.unwrap();
        assert_eq!(provider.kind(), ProviderKind::Http);
    }

    #[tokio::test]
    async fn test_injected_shape_builds_injected_provider() {
        let config = ProviderConfig::Injected(Arc::new(StubTransport));
        let provider = resolve_provider(&config).await.unwrap();
        assert_eq!(provider.kind(), ProviderKind::Injected);
        assert_eq!(provider.chain_id().await.unwrap(), 11155111);
    }

    #[tokio::test]
    async fn test_prebuilt_provider_passes_through() {
        let prebuilt: Arc<dyn EvmProvider> = Arc::new(StubProvider);
        let config = ProviderConfig::Handle(prebuilt.clone());
        let provider = resolve_provider(&config).await.unwrap();
        assert_eq!(provider.kind(), ProviderKind::External);
        assert!(Arc::ptr_eq(&provider, &prebuilt));
    }

    #[tokio::test]
    async fn test_injected_signer_uses_request_accounts() {
        let provider = InjectedProvider::new(Arc::new(StubTransport));
        let signer = provider.signer().await.unwrap();
        assert_eq!(
            signer.address(),
            "0x00000000000000000000000000000000000000aa"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn test_parse_quantity_shapes() {
        assert_eq!(parse_quantity(&json!("0x10")).unwrap(), 16);
        assert_eq!(parse_quantity(&json!(42)).unwrap(), 42);
        assert!(parse_quantity(&json!("zz")).is_err());
        assert!(parse_quantity(&json!(null)).is_err());
    }
}
