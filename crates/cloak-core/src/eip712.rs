//! EIP-712 payload construction for user-decryption authorization
//!
//! A user decryption is authorized by signing a `Reencrypt` struct that
//! binds the ciphertext handle to the ephemeral public key the gateway
//! returned for this request. The domain pins the chain id and the
//! verifying contract, so a signature cannot be replayed against another
//! chain or another contract's ciphertexts.

use alloy_dyn_abi::TypedData;
use alloy_primitives::Address;
use serde_json::json;

use crate::{CiphertextHandle, Result};

/// Domain name expected by the gateway's signature verification
pub const DOMAIN_NAME: &str = "Authorization token";

/// Domain version expected by the gateway's signature verification
pub const DOMAIN_VERSION: &str = "1";

/// Build the typed data for a user-decryption request.
///
/// The result is what both signer flavors consume: RPC signers serialize
/// it back to JSON for `eth_signTypedData_v4`, local signers hash it
/// directly.
pub fn reencryption_request(
    chain_id: u64,
    verifying_contract: Address,
    handle: CiphertextHandle,
    public_key: &[u8],
) -> Result<TypedData> {
    let payload = json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" },
            ],
            "Reencrypt": [
                { "name": "publicKey", "type": "bytes" },
                { "name": "ciphertextHandle", "type": "bytes32" },
            ],
        },
        "primaryType": "Reencrypt",
        "domain": {
            "name": DOMAIN_NAME,
            "version": DOMAIN_VERSION,
            "chainId": chain_id,
            "verifyingContract": verifying_contract,
        },
        "message": {
            "publicKey": format!("0x{}", hex::encode(public_key)),
            "ciphertextHandle": handle,
        },
    });
    Ok(serde_json::from_value(payload)?)
}
