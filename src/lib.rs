//! cloak-sdk: umbrella crate re-exporting the cloak client SDK
//!
//! Most callers only need [`EncryptionClient`] and [`ClientConfig`]; the
//! member crates are re-exported whole for everything else.

pub use cloak_client;
pub use cloak_core;

pub use cloak_client::{
    ClientConfig, ClientError, EncryptionClient, GatewayBackend, ProviderConfig,
};
pub use cloak_core::{Ciphertext, CiphertextHandle, FheType, PlaintextValue};
