//! The encryption client facade

use std::sync::Arc;

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::JsonAbi;
use alloy_primitives::{Address, U256};
use alloy_rpc_types::TransactionReceipt;

use cloak_core::{Ciphertext, CiphertextHandle, FheType, PlaintextValue};

use crate::backend::FheBackend;
use crate::config::ClientConfig;
use crate::contract::Contract;
use crate::error::{ClientError, SignerError};
use crate::gateway::GatewayBackend;
use crate::provider::{resolve_provider, EvmProvider};
use crate::signer::EvmSigner;

/// Everything a usable client holds; present only after initialization.
/// All fields are shared read-only references, so concurrent operations
/// on one client are safe.
struct ClientInner {
    provider: Arc<dyn EvmProvider>,
    signer: Arc<dyn EvmSigner>,
    backend: Arc<dyn FheBackend>,
}

/// Client facade over the FHE gateway and an Ethereum provider.
///
/// Created uninitialized; every operation except the accessors requires a
/// successful [`initialize`](Self::initialize) first. One client is bound
/// to one chain and one signer; the uninitialized-to-initialized
/// transition is one-way.
pub struct EncryptionClient {
    config: ClientConfig,
    inner: Option<ClientInner>,
}

impl EncryptionClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            inner: None,
        }
    }

    /// Resolve the provider, obtain a signer (this may prompt a connected
    /// wallet for account access) and connect the gateway backend.
    ///
    /// A single attempt, no retries: any construction failure propagates
    /// as [`ClientError::Initialization`] and the client stays
    /// uninitialized; re-invoke to retry.
    pub async fn initialize(&mut self) -> Result<(), ClientError> {
        self.config.validate()?;
        let (provider, signer) = self.resolve_chain().await?;
        let gateway_url = self.config.resolved_gateway_url();
        let acl_address = self.config.resolved_acl_address();
        let backend = GatewayBackend::connect(self.config.chain_id, &gateway_url, acl_address)
            .await
            .map_err(|e| ClientError::Initialization {
                stage: "backend",
                source: Box::new(e),
            })?;
        self.install(provider, signer, Arc::new(backend));
        Ok(())
    }

    /// Initialize with a caller-supplied backend instead of connecting a
    /// [`GatewayBackend`]. This is how embedded backends (and tests)
    /// plug in; provider and signer construction behave exactly as in
    /// [`initialize`](Self::initialize).
    pub async fn initialize_with_backend(
        &mut self,
        backend: Arc<dyn FheBackend>,
    ) -> Result<(), ClientError> {
        self.config.validate()?;
        let (provider, signer) = self.resolve_chain().await?;
        self.install(provider, signer, backend);
        Ok(())
    }

    /// Provider discrimination and signer acquisition, in that order, so
    /// a wallet prompt happens before any gateway traffic
    async fn resolve_chain(
        &self,
    ) -> Result<(Arc<dyn EvmProvider>, Arc<dyn EvmSigner>), ClientError> {
        let provider = resolve_provider(&self.config.provider).await?;
        let signer = provider
            .signer()
            .await
            .map_err(|e| ClientError::Initialization {
                stage: "signer",
                source: Box::new(e),
            })?;
        Ok((provider, signer))
    }

    fn install(
        &mut self,
        provider: Arc<dyn EvmProvider>,
        signer: Arc<dyn EvmSigner>,
        backend: Arc<dyn FheBackend>,
    ) {
        tracing::info!(
            chain_id = self.config.chain_id,
            provider = ?provider.kind(),
            signer = %signer.address(),
            "encryption client initialized"
        );
        self.inner = Some(ClientInner {
            provider,
            signer,
            backend,
        });
    }

    /// Encrypt a plaintext under the given type label.
    ///
    /// `fhe_type` defaults to `"uint32"` when absent. An unrecognized
    /// label fails synchronously with no backend call. Numeric range is
    /// not checked here; the backend owns that.
    pub async fn encrypt(
        &self,
        value: impl Into<PlaintextValue>,
        fhe_type: Option<&str>,
    ) -> Result<Ciphertext, ClientError> {
        let inner = self.inner()?;
        let label = fhe_type.unwrap_or(FheType::default().label());
        let ty: FheType = label.parse().map_err(|_| ClientError::UnsupportedType {
            label: label.to_string(),
        })?;
        let value = value.into();
        tracing::debug!(fhe_type = %ty, "encrypting value");
        let result = match (ty, value) {
            (FheType::Uint8, PlaintextValue::Uint(v)) => inner.backend.encrypt8(v).await,
            (FheType::Uint16, PlaintextValue::Uint(v)) => inner.backend.encrypt16(v).await,
            (FheType::Uint32, PlaintextValue::Uint(v)) => inner.backend.encrypt32(v).await,
            (FheType::Uint64, PlaintextValue::Uint(v)) => inner.backend.encrypt64(v).await,
            (FheType::Address, PlaintextValue::Address(a)) => inner.backend.encrypt_address(a).await,
            (FheType::Bool, PlaintextValue::Bool(b)) => inner.backend.encrypt_bool(b).await,
            (ty, value) => {
                return Err(ClientError::UnsupportedType {
                    label: format!("{ty} with {} value", value.kind()),
                })
            }
        };
        result.map_err(ClientError::Encryption)
    }

    /// Decrypt a ciphertext handle for this client's account.
    ///
    /// Strictly ordered: token fetch, typed-data construction, signature
    /// request, gateway decrypt. A declined signing prompt surfaces as
    /// [`ClientError::SignatureRejected`] and the gateway is never
    /// contacted for the decrypt; re-invoke the whole operation to retry.
    pub async fn user_decrypt(
        &self,
        contract_address: Address,
        handle: CiphertextHandle,
    ) -> Result<U256, ClientError> {
        let inner = self.inner()?;

        let token = inner
            .backend
            .generate_token(contract_address)
            .await
            .map_err(|e| ClientError::Decryption {
                op: "token",
                source: Box::new(e),
            })?;

        let typed_data = inner
            .backend
            .create_eip712(contract_address, handle, &token.public_key)
            .map_err(|e| ClientError::Decryption {
                op: "eip712",
                source: Box::new(e),
            })?;

        let signature = match inner.signer.sign_typed_data(&typed_data).await {
            Ok(sig) => sig,
            Err(SignerError::Rejected) => return Err(ClientError::SignatureRejected),
            Err(e) => {
                return Err(ClientError::Decryption {
                    op: "sign",
                    source: Box::new(e),
                })
            }
        };

        let plaintext = inner
            .backend
            .decrypt(handle, &signature)
            .await
            .map_err(|e| ClientError::Decryption {
                op: "decrypt",
                source: Box::new(e),
            })?;

        tracing::debug!(
            contract = %contract_address,
            handle = %handle,
            "user decryption complete"
        );
        Ok(plaintext)
    }

    /// Invoke a named function on a contract binding and wait for the
    /// receipt. The on-chain contract and the gateway relay do the actual
    /// decryption work; this is a plain forwarding call.
    pub async fn public_decrypt(
        &self,
        contract: &Contract,
        function: &str,
        args: &[DynSolValue],
    ) -> Result<TransactionReceipt, ClientError> {
        contract
            .call(function, args)
            .await
            .map_err(|e| ClientError::Transaction {
                function: function.to_string(),
                source: e,
            })
    }

    /// Build a contract binding bound to this client's provider and
    /// signing account.
    pub fn contract(&self, address: Address, abi_json: &str) -> Result<Contract, ClientError> {
        let inner = self.inner()?;
        let abi: JsonAbi = serde_json::from_str(abi_json)
            .map_err(|e| ClientError::Configuration(format!("invalid contract ABI: {e}")))?;
        Ok(Contract::new(
            inner.provider.clone(),
            address,
            abi,
            inner.signer.address(),
        ))
    }

    /// The signing account's address
    pub fn address(&self) -> Result<Address, ClientError> {
        Ok(self.inner()?.signer.address())
    }

    /// The chain this client was configured for
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Whether initialization has completed. Pure accessor.
    pub fn is_initialized(&self) -> bool {
        self.inner.is_some()
    }

    fn inner(&self) -> Result<&ClientInner, ClientError> {
        self.inner.as_ref().ok_or(ClientError::NotInitialized)
    }
}
