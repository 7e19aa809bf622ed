//! Private and public key value types over secp256k1.

use crate::error::{Error, Result};
use crate::hash::hash160;
use num_bigint::BigUint;
use secp256k1::Secp256k1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chain code shared between a node and its children, keyed-hash material
/// for derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainCode(pub [u8; 32]);

impl ChainCode {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Key fingerprint (first 4 bytes of HASH160 of the compressed public key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub [u8; 4]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Calculate fingerprint from a public key, always over its compressed form.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let hash = hash160(&public_key.compressed().serialize());
        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&hash[0..4]);
        Fingerprint(fingerprint)
    }
}

/// A private key: a scalar in [1, n-1] over the curve order n.
///
/// Immutable once constructed; values of 0 or >= n are rejected with
/// [`Error::InvalidKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey {
    inner: secp256k1::SecretKey,
}

impl PrivateKey {
    /// Construct from exactly 32 big-endian bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::KeyFormatNotFound(format!(
                "expected 32 key bytes, got {}",
                bytes.len()
            )));
        }
        let inner = secp256k1::SecretKey::from_slice(bytes)
            .map_err(|_| Error::InvalidKey("scalar must lie in [1, n-1]".to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Construct from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| Error::KeyFormatNotFound(format!("invalid key hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Construct from a decimal integer string.
    pub fn from_decimal(s: &str) -> Result<Self> {
        let value = s
            .parse::<BigUint>()
            .map_err(|e| Error::KeyFormatNotFound(format!("invalid decimal key: {}", e)))?;
        let raw = value.to_bytes_be();
        if raw.len() > 32 {
            return Err(Error::InvalidKey("scalar must lie in [1, n-1]".to_string()));
        }
        let mut buf = [0u8; 32];
        buf[32 - raw.len()..].copy_from_slice(&raw);
        Self::from_bytes(&buf)
    }

    /// The scalar as 32 big-endian bytes.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.inner.secret_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.secret_bytes())
    }

    /// The scalar as a decimal integer string.
    pub fn to_decimal(&self) -> String {
        BigUint::from_bytes_be(&self.secret_bytes()).to_string()
    }

    /// The public key for this scalar (generator multiplication), in
    /// compressed view.
    pub fn public_key(&self) -> PublicKey {
        let secp = Secp256k1::new();
        PublicKey::from_point(self.inner.public_key(&secp))
    }

    pub(crate) fn from_secret(inner: secp256k1::SecretKey) -> Self {
        PrivateKey { inner }
    }

    pub(crate) fn secret(&self) -> secp256k1::SecretKey {
        self.inner
    }
}

impl FromStr for PrivateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// A public key: an elliptic-curve point plus a compression-view flag.
///
/// The point is immutable; [`compressed`](PublicKey::compressed) and
/// [`uncompressed`](PublicKey::uncompressed) are pure projections returning
/// a new view over the same point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    point: secp256k1::PublicKey,
    compressed: bool,
}

impl PublicKey {
    /// Parse a serialized point: 33 bytes with an 0x02/0x03 prefix, or 65
    /// bytes with an 0x04 prefix. The view flag follows the input form.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let compressed = match (bytes.len(), bytes.first()) {
            (33, Some(0x02)) | (33, Some(0x03)) => true,
            (65, Some(0x04)) => false,
            _ => {
                return Err(Error::KeyFormatNotFound(format!(
                    "bad point prefix or length ({} bytes)",
                    bytes.len()
                )))
            }
        };
        let point = secp256k1::PublicKey::from_slice(bytes)
            .map_err(|e| Error::KeyFormatNotFound(format!("invalid curve point: {}", e)))?;
        Ok(PublicKey { point, compressed })
    }

    /// Parse from hex in either serialized form.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)
            .map_err(|e| Error::KeyFormatNotFound(format!("invalid key hex: {}", e)))?;
        Self::from_slice(&bytes)
    }

    pub fn from_private_key(private_key: &PrivateKey) -> Self {
        private_key.public_key()
    }

    /// The same point viewed compressed. Pure and idempotent.
    pub fn compressed(&self) -> PublicKey {
        PublicKey { compressed: true, ..*self }
    }

    /// The same point viewed uncompressed. Pure and idempotent.
    pub fn uncompressed(&self) -> PublicKey {
        PublicKey { compressed: false, ..*self }
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Serialize per the current view: 33 bytes compressed, 65 uncompressed.
    pub fn serialize(&self) -> Vec<u8> {
        if self.compressed {
            self.point.serialize().to_vec()
        } else {
            self.point.serialize_uncompressed().to_vec()
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }

    /// HASH160 of the serialized bytes per the current view.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.serialize())
    }

    /// First 4 bytes of the compressed-view identifier.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_public_key(self)
    }

    pub(crate) fn from_point(point: secp256k1::PublicKey) -> Self {
        PublicKey { point, compressed: true }
    }

    pub(crate) fn point(&self) -> secp256k1::PublicKey {
        self.point
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
