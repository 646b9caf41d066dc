//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifiers that flow through the submission
//! pipeline. You cannot pass a `TxHash` where a `NullifierHash` is expected,
//! or a pincode where a region name is expected.
//!
//! All 32-byte and address types serialize as `0x`-prefixed lowercase hex,
//! matching the JSON-RPC wire format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::IdentifierError;

// ─── Hex helpers ─────────────────────────────────────────────────────

fn decode_fixed<const N: usize>(kind: &'static str, s: &str) -> Result<[u8; N], IdentifierError> {
    let trimmed = s.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let invalid = || IdentifierError::InvalidHex {
        kind,
        expected: N * 2,
        actual: s.to_string(),
    };
    if body.len() != N * 2 {
        return Err(invalid());
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(body, &mut out).map_err(|_| invalid())?;
    Ok(out)
}

// ─── Bytes32 ─────────────────────────────────────────────────────────

/// A 32-byte value (`bytes32` in the contract ABI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Bytes32(pub [u8; 32]);

impl Bytes32 {
    pub const ZERO: Bytes32 = Bytes32([0u8; 32]);

    /// Parse from 64 hex chars, with or without `0x`.
    pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
        decode_fixed::<32>("bytes32", s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Bytes32 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Bytes32 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Bytes32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Bytes32 {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Bytes32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Bytes32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Pseudonymous per-credential tag: the keccak-256 hash of a proof's
/// nullifier. The same credential always maps to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NullifierHash(pub Bytes32);

impl std::fmt::Display for NullifierHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A finalized transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub Bytes32);

impl TxHash {
    pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
        Bytes32::from_hex(s).map(Self)
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ─── AccountAddress ──────────────────────────────────────────────────

/// A 20-byte externally owned account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountAddress(pub [u8; 20]);

impl AccountAddress {
    pub fn from_hex(s: &str) -> Result<Self, IdentifierError> {
        decode_fixed::<20>("address", s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Abbreviated form for display: `0x1234…abcd`.
    pub fn short(&self) -> String {
        let full = self.to_hex();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }
}

impl std::fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for AccountAddress {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Region / Pincode ────────────────────────────────────────────────

/// Name of an eligibility region (an Indian state, as revealed by the
/// identity proof).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Construct a region name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty { kind: "region" });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A location code (Indian postal pincode).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pincode(String);

impl Pincode {
    /// Construct a pincode, trimming surrounding whitespace.
    pub fn new(code: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = code.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty { kind: "pincode" });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Pincode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes32_hex_roundtrip_with_and_without_prefix() {
        let hex64 = "ab".repeat(32);
        let a = Bytes32::from_hex(&hex64).unwrap();
        let b = Bytes32::from_hex(&format!("0x{hex64}")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_hex(), format!("0x{hex64}"));
    }

    #[test]
    fn test_bytes32_rejects_wrong_length() {
        let err = Bytes32::from_hex("0x1234").unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidHex { expected: 64, .. }));
    }

    #[test]
    fn test_bytes32_rejects_non_hex() {
        assert!(Bytes32::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_tx_hash_serde_is_hex_string() {
        let tx = TxHash(Bytes32([0x11; 32]));
        let json = serde_json::to_string(&tx).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "11".repeat(32)));
        let back: TxHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_address_short_form() {
        let addr = AccountAddress::from_hex("0x95c1AE6Ad8F7821F257C5E618B913C9be3077a3B").unwrap();
        assert_eq!(addr.short(), "0x95c1…7a3b");
    }

    #[test]
    fn test_region_trims_and_rejects_empty() {
        assert_eq!(Region::new("  Maharashtra ").unwrap().as_str(), "Maharashtra");
        assert_eq!(
            Region::new("   ").unwrap_err(),
            IdentifierError::Empty { kind: "region" }
        );
    }

    #[test]
    fn test_pincode_rejects_empty() {
        assert!(Pincode::new("").is_err());
        assert_eq!(Pincode::new(" 400002").unwrap().as_str(), "400002");
    }
}
