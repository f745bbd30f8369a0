//! Signer seam: EIP-712 typed-data signing
//!
//! Three flavors behind one trait: node-managed accounts over RPC,
//! injected wallets over the request transport (where a human approves or
//! declines the prompt), and local private keys for scripts and tests.
//! Rejection is surfaced distinctly so callers can tell "the user said
//! no" from "the network broke".

use std::sync::Arc;

use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, Bytes};
use alloy_rpc_client::RpcClient;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::TransportError;
use async_trait::async_trait;
use serde_json::json;

use crate::error::{RpcFault, SignerError};
use crate::provider::RequestTransport;

/// The signing collaborator as consumed by the facade
#[async_trait]
pub trait EvmSigner: Send + Sync {
    /// The account this signer signs for
    fn address(&self) -> Address;

    /// Produce an EIP-712 signature over `typed_data`. May block on a
    /// human approving a prompt; fails with [`SignerError::Rejected`]
    /// when they decline.
    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, SignerError>;
}

/// Signer over node-managed accounts (`eth_signTypedData_v4`)
pub struct RpcSigner {
    client: RpcClient,
    address: Address,
}

impl RpcSigner {
    pub fn new(client: RpcClient, address: Address) -> Self {
        Self { client, address }
    }
}

#[async_trait]
impl EvmSigner for RpcSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, SignerError> {
        let payload = serde_json::to_value(typed_data).map_err(boxed)?;
        let signature: String = self
            .client
            .request("eth_signTypedData_v4".to_string(), (self.address, payload))
            .await
            .map_err(from_transport)?;
        decode_signature(&signature)
    }
}

/// Signer over an injected wallet handle
pub struct InjectedSigner {
    transport: Arc<dyn RequestTransport>,
    address: Address,
}

impl InjectedSigner {
    pub fn new(transport: Arc<dyn RequestTransport>, address: Address) -> Self {
        Self { transport, address }
    }
}

#[async_trait]
impl EvmSigner for InjectedSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, SignerError> {
        let payload = serde_json::to_value(typed_data).map_err(boxed)?;
        let result = self
            .transport
            .request("eth_signTypedData_v4", json!([self.address, payload]))
            .await
            .map_err(from_fault)?;
        let signature: String = serde_json::from_value(result).map_err(boxed)?;
        decode_signature(&signature)
    }
}

/// Signer over a local private key; never prompts
pub struct LocalSigner {
    inner: PrivateKeySigner,
}

impl LocalSigner {
    pub fn new(inner: PrivateKeySigner) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EvmSigner for LocalSigner {
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn sign_typed_data(&self, typed_data: &TypedData) -> Result<Bytes, SignerError> {
        let signature = self
            .inner
            .sign_dynamic_typed_data(typed_data)
            .await
            .map_err(|e| SignerError::Other(Box::new(e)))?;
        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }
}

fn decode_signature(hex_sig: &str) -> Result<Bytes, SignerError> {
    let bytes = hex::decode(hex_sig.trim_start_matches("0x")).map_err(boxed)?;
    Ok(Bytes::from(bytes))
}

fn boxed<E: std::error::Error + Send + Sync + 'static>(err: E) -> SignerError {
    SignerError::Other(Box::new(err))
}

fn from_fault(fault: RpcFault) -> SignerError {
    if fault.is_user_rejection() {
        SignerError::Rejected
    } else {
        SignerError::Other(Box::new(fault))
    }
}

fn from_transport(err: TransportError) -> SignerError {
    match err.as_error_resp() {
        Some(payload) if payload.code == RpcFault::USER_REJECTED => SignerError::Rejected,
        _ => SignerError::Other(Box::new(err)),
    }
}
