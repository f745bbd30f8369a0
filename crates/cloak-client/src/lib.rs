//! cloak-client: client facade for FHE-enabled Ethereum contracts
//!
//! Wraps a remote FHE gateway and an Ethereum JSON-RPC provider behind
//! [`EncryptionClient`]: initialize once per chain/signer, then encrypt
//! typed plaintexts, run the user-decryption protocol (token, EIP-712
//! signature, gateway decrypt) and call contracts by name.
//!
//! ## Usage
//!
//! ```no_run
//! use cloak_client::{ClientConfig, EncryptionClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cloak_client::ClientError> {
//!     let config = ClientConfig::new("https://rpc.sepolia.org", 11155111);
//!     let mut client = EncryptionClient::new(config);
//!     client.initialize().await?;
//!
//!     let ciphertext = client.encrypt(42u64, Some("uint32")).await?;
//!     println!("ciphertext: {ciphertext}");
//!     Ok(())
//! }
//! ```

mod backend;
mod client;
mod config;
mod contract;
mod error;
mod gateway;
mod provider;
mod signer;

pub use backend::{DecryptionToken, FheBackend};
pub use client::EncryptionClient;
pub use config::{ClientConfig, ProviderConfig};
pub use contract::Contract;
pub use error::{BackendError, ChainError, ClientError, RpcFault, SignerError};
pub use gateway::GatewayBackend;
pub use provider::{EvmProvider, HttpProvider, InjectedProvider, ProviderKind, RequestTransport};
pub use signer::{EvmSigner, InjectedSigner, LocalSigner, RpcSigner};

// Core types callers need alongside the client
pub use cloak_core::{Ciphertext, CiphertextHandle, FheType, PlaintextValue};
