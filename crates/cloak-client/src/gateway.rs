//! Gateway-backed FHE backend
//!
//! Speaks the gateway's small JSON API: a keys probe at connect time,
//! then `/encrypt`, `/token` and `/decrypt`. Non-success statuses map to
//! [`BackendError::Gateway`] with the response body preserved.

use std::time::Duration;

use alloy_dyn_abi::TypedData;
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

use cloak_core::{eip712, Ciphertext, CiphertextHandle, FheType};

use crate::backend::{DecryptionToken, FheBackend};
use crate::error::BackendError;

const GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from `GET /keys/{chain_id}`
#[derive(Debug, Deserialize)]
pub struct KeysResponse {
    pub public_key: String,
}

/// Request to `POST /encrypt`
#[derive(Debug, Serialize)]
struct EncryptRequest {
    chain_id: u64,
    acl_address: Address,
    fhe_type: String,
    value: Value,
}

/// Response from `POST /encrypt`
#[derive(Debug, Deserialize)]
struct EncryptResponse {
    ciphertext: String,
}

/// Request to `POST /token`
#[derive(Debug, Serialize)]
struct TokenRequest {
    chain_id: u64,
    verifying_contract: Address,
}

/// Response from `POST /token`
#[derive(Debug, Deserialize)]
struct TokenResponse {
    signature: String,
    public_key: String,
}

/// Request to `POST /decrypt`
#[derive(Debug, Serialize)]
struct DecryptRequest {
    chain_id: u64,
    handle: CiphertextHandle,
    signature: String,
}

/// Response from `POST /decrypt`
#[derive(Debug, Deserialize)]
struct DecryptResponse {
    plaintext: U256,
}

/// FHE backend over a remote decryption gateway
pub struct GatewayBackend {
    http: reqwest::Client,
    gateway_url: String,
    chain_id: u64,
    acl_address: Address,
}

impl GatewayBackend {
    /// Connect to a gateway and probe its key material for `chain_id`.
    /// An unreachable gateway or an unsupported chain fails here, not on
    /// the first encrypt call.
    pub async fn connect(
        chain_id: u64,
        gateway_url: &str,
        acl_address: Address,
    ) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(GATEWAY_TIMEOUT).build()?;
        let backend = Self {
            http,
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            chain_id,
            acl_address,
        };
        let keys: KeysResponse = backend.get(&format!("keys/{chain_id}")).await?;
        tracing::debug!(
            chain_id,
            public_key_len = keys.public_key.len(),
            "connected to FHE gateway"
        );
        Ok(backend)
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = format!("{}/{}", self.gateway_url, path);
        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(BackendError::Gateway {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.json().await?)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let url = format!("{}/{}", self.gateway_url, path);
        let resp = self.http.post(&url).json(body).send().await?;
        if !resp.status().is_success() {
            return Err(BackendError::Gateway {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.json().await?)
    }

    async fn encrypt_value(
        &self,
        fhe_type: FheType,
        value: Value,
    ) -> Result<Ciphertext, BackendError> {
        let request = EncryptRequest {
            chain_id: self.chain_id,
            acl_address: self.acl_address,
            fhe_type: fhe_type.to_string(),
            value,
        };
        let resp: EncryptResponse = self.post("encrypt", &request).await?;
        let bytes = hex::decode(resp.ciphertext.trim_start_matches("0x"))?;
        Ok(Ciphertext::new(bytes))
    }
}

#[async_trait]
impl FheBackend for GatewayBackend {
    async fn encrypt8(&self, value: u64) -> Result<Ciphertext, BackendError> {
        self.encrypt_value(FheType::Uint8, json!(value)).await
    }

    async fn encrypt16(&self, value: u64) -> Result<Ciphertext, BackendError> {
        self.encrypt_value(FheType::Uint16, json!(value)).await
    }

    async fn encrypt32(&self, value: u64) -> Result<Ciphertext, BackendError> {
        self.encrypt_value(FheType::Uint32, json!(value)).await
    }

    async fn encrypt64(&self, value: u64) -> Result<Ciphertext, BackendError> {
        self.encrypt_value(FheType::Uint64, json!(value)).await
    }

    async fn encrypt_address(&self, value: Address) -> Result<Ciphertext, BackendError> {
        self.encrypt_value(FheType::Address, json!(value)).await
    }

    async fn encrypt_bool(&self, value: bool) -> Result<Ciphertext, BackendError> {
        self.encrypt_value(FheType::Bool, json!(value)).await
    }

    async fn generate_token(
        &self,
        verifying_contract: Address,
    ) -> Result<DecryptionToken, BackendError> {
        let request = TokenRequest {
            chain_id: self.chain_id,
            verifying_contract,
        };
        let resp: TokenResponse = self.post("token", &request).await?;
        Ok(DecryptionToken {
            signature: Bytes::from(hex::decode(resp.signature.trim_start_matches("0x"))?),
            public_key: Bytes::from(hex::decode(resp.public_key.trim_start_matches("0x"))?),
        })
    }

    fn create_eip712(
        &self,
        verifying_contract: Address,
        handle: CiphertextHandle,
        public_key: &[u8],
    ) -> Result<TypedData, BackendError> {
        Ok(eip712::reencryption_request(
            self.chain_id,
            verifying_contract,
            handle,
            public_key,
        )?)
    }

    async fn decrypt(
        &self,
        handle: CiphertextHandle,
        signature: &[u8],
    ) -> Result<U256, BackendError> {
        let request = DecryptRequest {
            chain_id: self.chain_id,
            handle,
            signature: format!("0x{}", hex::encode(signature)),
        };
        let resp: DecryptResponse = self.post("decrypt", &request).await?;
        Ok(resp.plaintext)
    }
}
