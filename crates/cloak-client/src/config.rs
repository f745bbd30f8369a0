//! Client configuration

use std::fmt;
use std::sync::Arc;

use alloy_primitives::Address;
use cloak_core::default_gateway_url;

use crate::error::ClientError;
use crate::provider::{EvmProvider, RequestTransport};

/// The polymorphic provider input, resolved exactly once at
/// initialization into a normalized [`EvmProvider`].
#[derive(Clone)]
pub enum ProviderConfig {
    /// An RPC endpoint URL; an HTTP provider is constructed from it
    Url(String),
    /// An injected wallet handle exposing a request-style method
    Injected(Arc<dyn RequestTransport>),
    /// An already-constructed provider, used as-is
    Handle(Arc<dyn EvmProvider>),
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderConfig::Url(url) => f.debug_tuple("Url").field(url).finish(),
            ProviderConfig::Injected(_) => f.write_str("Injected(..)"),
            ProviderConfig::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

impl From<&str> for ProviderConfig {
    fn from(url: &str) -> Self {
        ProviderConfig::Url(url.to_string())
    }
}

impl From<String> for ProviderConfig {
    fn from(url: String) -> Self {
        ProviderConfig::Url(url)
    }
}

/// Configuration for an [`EncryptionClient`](crate::EncryptionClient).
///
/// Immutable once handed to the client; one config describes one chain
/// and one gateway.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub provider: ProviderConfig,
    pub chain_id: u64,
    /// Decryption gateway URL; derived from `chain_id` when absent
    pub gateway_url: Option<String>,
    /// ACL contract address; the zero address when absent
    pub acl_address: Option<Address>,
}

impl ClientConfig {
    pub fn new(provider: impl Into<ProviderConfig>, chain_id: u64) -> Self {
        Self {
            provider: provider.into(),
            chain_id,
            gateway_url: None,
            acl_address: None,
        }
    }

    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = Some(url.into());
        self
    }

    pub fn with_acl_address(mut self, address: Address) -> Self {
        self.acl_address = Some(address);
        self
    }

    /// The gateway URL this config resolves to
    pub fn resolved_gateway_url(&self) -> String {
        self.gateway_url
            .clone()
            .unwrap_or_else(|| default_gateway_url(self.chain_id))
    }

    /// The ACL address this config resolves to
    pub fn resolved_acl_address(&self) -> Address {
        self.acl_address.unwrap_or(Address::ZERO)
    }

    /// Shape checks that need no network access
    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if self.chain_id == 0 {
            return Err(ClientError::Configuration(
                "chain_id is required and must be non-zero".to_string(),
            ));
        }
        if let ProviderConfig::Url(url) = &self.provider {
            if url.trim().is_empty() {
                return Err(ClientError::Configuration(
                    "provider URL must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
