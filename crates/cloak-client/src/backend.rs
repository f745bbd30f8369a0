//! FHE backend seam
//!
//! The encryption/decryption collaborator as consumed by the facade. The
//! production implementation is [`GatewayBackend`](crate::GatewayBackend);
//! tests plug in stubs. Ciphertext construction, proof generation and
//! threshold decryption all live behind this trait, never in this crate.

use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use cloak_core::{Ciphertext, CiphertextHandle};

use crate::error::BackendError;

/// Token/public-key pair returned by the backend for one decryption
/// request, scoped to a verifying contract.
#[derive(Debug, Clone)]
pub struct DecryptionToken {
    /// Gateway attestation over the ephemeral key
    pub signature: Bytes,
    /// Ephemeral public key the decryption result is bound to
    pub public_key: Bytes,
}

#[async_trait]
pub trait FheBackend: Send + Sync {
    async fn encrypt8(&self, value: u64) -> Result<Ciphertext, BackendError>;
    async fn encrypt16(&self, value: u64) -> Result<Ciphertext, BackendError>;
    async fn encrypt32(&self, value: u64) -> Result<Ciphertext, BackendError>;
    async fn encrypt64(&self, value: u64) -> Result<Ciphertext, BackendError>;
    async fn encrypt_address(&self, value: Address) -> Result<Ciphertext, BackendError>;
    async fn encrypt_bool(&self, value: bool) -> Result<Ciphertext, BackendError>;

    /// Fetch a decryption token scoped to `verifying_contract`
    async fn generate_token(
        &self,
        verifying_contract: Address,
    ) -> Result<DecryptionToken, BackendError>;

    /// Build the EIP-712 payload binding `handle` to `public_key`. Pure;
    /// the verifying contract must match the one the token was scoped to.
    fn create_eip712(
        &self,
        verifying_contract: Address,
        handle: CiphertextHandle,
        public_key: &[u8],
    ) -> Result<TypedData, BackendError>;

    /// Exchange a signed authorization for the plaintext
    async fn decrypt(
        &self,
        handle: CiphertextHandle,
        signature: &[u8],
    ) -> Result<U256, BackendError>;
}
