//! cloak-core: chain-independent types for the cloak FHE client SDK
//!
//! This crate defines the plaintext/ciphertext data model shared by the
//! client facade and its collaborators:
//! - the six supported encryption types and their wire labels
//! - opaque ciphertexts and their 32-byte on-chain handles
//! - the default gateway URL derivation
//! - EIP-712 payload construction for user-decryption authorization
//!
//! Everything here is pure: no network access, no global state.

mod error;
mod gateway;
mod types;

pub mod eip712;

pub use error::Error;
pub use gateway::default_gateway_url;
pub use types::{Ciphertext, FheType, PlaintextValue};

pub type Result<T> = std::result::Result<T, Error>;

/// 32-byte reference to an encrypted value, as stored on-chain
pub type CiphertextHandle = alloy_primitives::B256;
