//! Plaintext and ciphertext types

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

use crate::{CiphertextHandle, Error};

/// The six encryption types the gateway understands.
///
/// Labels match the Solidity-style names used on the wire and in contract
/// ABIs (`uint8` .. `uint64`, `address`, `bool`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FheType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Address,
    Bool,
}

impl FheType {
    /// All supported types, in label order
    pub const ALL: [FheType; 6] = [
        FheType::Uint8,
        FheType::Uint16,
        FheType::Uint32,
        FheType::Uint64,
        FheType::Address,
        FheType::Bool,
    ];

    /// The wire label for this type
    pub fn label(&self) -> &'static str {
        match self {
            FheType::Uint8 => "uint8",
            FheType::Uint16 => "uint16",
            FheType::Uint32 => "uint32",
            FheType::Uint64 => "uint64",
            FheType::Address => "address",
            FheType::Bool => "bool",
        }
    }
}

impl Default for FheType {
    /// The type used when a caller does not specify one
    fn default() -> Self {
        FheType::Uint32
    }
}

impl fmt::Display for FheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FheType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uint8" => Ok(FheType::Uint8),
            "uint16" => Ok(FheType::Uint16),
            "uint32" => Ok(FheType::Uint32),
            "uint64" => Ok(FheType::Uint64),
            "address" => Ok(FheType::Address),
            "bool" => Ok(FheType::Bool),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

/// An untyped plaintext value, before it is paired with an [`FheType`]
/// label for encryption.
///
/// Numeric values are carried as `u64` regardless of the label they end up
/// encrypted under; range enforcement is the gateway's job, not ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaintextValue {
    Uint(u64),
    Address(Address),
    Bool(bool),
}

impl PlaintextValue {
    /// Short name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PlaintextValue::Uint(_) => "numeric",
            PlaintextValue::Address(_) => "address",
            PlaintextValue::Bool(_) => "boolean",
        }
    }
}

impl From<u8> for PlaintextValue {
    fn from(v: u8) -> Self {
        PlaintextValue::Uint(v as u64)
    }
}

impl From<u16> for PlaintextValue {
    fn from(v: u16) -> Self {
        PlaintextValue::Uint(v as u64)
    }
}

impl From<u32> for PlaintextValue {
    fn from(v: u32) -> Self {
        PlaintextValue::Uint(v as u64)
    }
}

impl From<u64> for PlaintextValue {
    fn from(v: u64) -> Self {
        PlaintextValue::Uint(v)
    }
}

impl From<bool> for PlaintextValue {
    fn from(v: bool) -> Self {
        PlaintextValue::Bool(v)
    }
}

impl From<Address> for PlaintextValue {
    fn from(v: Address) -> Self {
        PlaintextValue::Address(v)
    }
}

/// An opaque ciphertext returned by the encryption backend.
///
/// The byte layout is owned entirely by the backend; this layer only moves
/// the bytes around and derives handles from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub fn new(bytes: Vec<u8>) -> Self {
        Ciphertext(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Derive the 32-byte handle for this ciphertext (keccak-256 of the
    /// raw bytes), matching how the coprocessor references it on-chain.
    pub fn handle(&self) -> CiphertextHandle {
        let mut hasher = Keccak::v256();
        hasher.update(&self.0);
        let mut out = [0u8; 32];
        hasher.finalize(&mut out);
        CiphertextHandle::from(out)
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for ty in FheType::ALL {
            let parsed: FheType = ty.label().parse().unwrap();
            assert_eq!(parsed, ty);
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = "uint128".parse::<FheType>().unwrap_err();
        match err {
            Error::UnsupportedType(label) => assert_eq!(label, "uint128"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_type_is_uint32() {
        assert_eq!(FheType::default(), FheType::Uint32);
    }

    #[test]
    fn test_ciphertext_handle_is_stable() {
        let ct = Ciphertext::new(vec![1, 2, 3, 4]);
        assert_eq!(ct.handle(), Ciphertext::new(vec![1, 2, 3, 4]).handle());
        assert_ne!(ct.handle(), Ciphertext::new(vec![1, 2, 3, 5]).handle());
    }

    #[test]
    fn test_ciphertext_display_is_hex() {
        let ct = Ciphertext::new(vec![0xab, 0xcd]);
        assert_eq!(ct.to_string(), "0xabcd");
    }

    #[test]
    fn test_plaintext_conversions() {
        assert_eq!(PlaintextValue::from(7u8), PlaintextValue::Uint(7));
        assert_eq!(PlaintextValue::from(7u64), PlaintextValue::Uint(7));
        assert_eq!(PlaintextValue::from(true), PlaintextValue::Bool(true));
        assert_eq!(PlaintextValue::from(Address::ZERO).kind(), "address");
    }
}
