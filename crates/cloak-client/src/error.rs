//! Error taxonomy for the client facade
//!
//! Every operation on [`EncryptionClient`](crate::EncryptionClient) fails
//! with exactly one `ClientError` variant; collaborator failures are
//! wrapped with the operation that produced them and never swallowed.

use alloy_primitives::B256;
use thiserror::Error;

/// Boxed collaborator failure carried inside a tagged variant
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// A required config field is missing or has an unrecognized shape.
    /// Detected synchronously, before any network call.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An operation was invoked before `initialize` completed. This is a
    /// programming error in the caller, not a transport failure.
    #[error("Client is not initialized; call initialize() first")]
    NotInitialized,

    /// An encryption type label outside the six supported ones.
    #[error("Unsupported encryption type: {label}")]
    UnsupportedType { label: String },

    /// Provider, signer or backend construction failed during
    /// `initialize`. The single wrapped initialization failure; `stage`
    /// names which construction step broke.
    #[error("Initialization failed at {stage}: {source}")]
    Initialization {
        stage: &'static str,
        #[source]
        source: BoxedSource,
    },

    /// The backend refused or failed an encryption call.
    #[error("Encryption failed: {0}")]
    Encryption(#[source] BackendError),

    /// A user-decryption step failed for a reason other than signer
    /// rejection. `op` names the protocol step.
    #[error("Decryption failed during {op}: {source}")]
    Decryption {
        op: &'static str,
        #[source]
        source: BoxedSource,
    },

    /// The operator declined the EIP-712 signing prompt. Expected
    /// behavior, distinct from transport failures so callers can ask the
    /// user to approve instead of reporting a network error.
    #[error("Signature request was rejected by the signer")]
    SignatureRejected,

    /// A contract invocation failed or reverted.
    #[error("Transaction failed in {function}: {source}")]
    Transaction {
        function: String,
        #[source]
        source: ChainError,
    },
}

/// Failures from the FHE gateway backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Gateway HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway returned status {status}: {message}")]
    Gateway { status: u16, message: String },

    #[error("Invalid gateway payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hex in gateway payload: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Backend error: {0}")]
    Other(String),
}

impl From<cloak_core::Error> for BackendError {
    fn from(err: cloak_core::Error) -> Self {
        match err {
            cloak_core::Error::Json(e) => BackendError::Json(e),
            other => BackendError::Other(other.to_string()),
        }
    }
}

/// Failures from the Ethereum provider / contract seam
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC transport error: {0}")]
    Transport(#[from] alloy_transport::TransportError),

    #[error("Injected provider error: {0}")]
    Injected(#[from] RpcFault),

    #[error("No accounts available from provider")]
    NoAccounts,

    #[error("Invalid quantity in RPC response: {0}")]
    InvalidQuantity(String),

    #[error("Unknown contract function: {0}")]
    UnknownFunction(String),

    #[error("ABI encoding failed: {0}")]
    AbiEncode(#[from] alloy_dyn_abi::Error),

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: B256 },

    #[error("Timed out waiting for receipt of {tx_hash}")]
    ReceiptTimeout { tx_hash: B256 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures from the typed-data signing seam
#[derive(Error, Debug)]
pub enum SignerError {
    /// EIP-1193 code 4001: the user declined the request
    #[error("Signature request rejected by user")]
    Rejected,

    #[error("Signing failed: {0}")]
    Other(#[source] BoxedSource),
}

/// A structured JSON-RPC error returned through an injected provider.
///
/// Kept separate from alloy's transport errors because injected handles
/// speak EIP-1193, where the error code (4001 = user rejection) is the
/// only way to tell a declined prompt from a broken transport.
#[derive(Error, Debug, Clone)]
#[error("{message} (code {code:?})")]
pub struct RpcFault {
    pub code: Option<i64>,
    pub message: String,
}

impl RpcFault {
    /// EIP-1193 userRejectedRequest
    pub const USER_REJECTED: i64 = 4001;

    pub fn new(code: impl Into<Option<i64>>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == Some(Self::USER_REJECTED)
    }
}
