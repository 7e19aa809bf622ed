//! Hashing utilities shared across the crate.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// Compute SHA256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// A standard Double-SHA256 is SHA256(SHA256(data)), used for checksums.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// A standard Hash160 is RIPEMD160(SHA256(data)).
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut ripemd160 = Ripemd160::new();
    ripemd160.update(sha256(data));
    ripemd160.finalize().into()
}

/// Compute HMAC-SHA512, the keyed hash behind child-key derivation.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac =
        Hmac::<Sha512>::new_from_slice(key).expect("HMAC can take a key of any size");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let hash = sha256(b"hello world");
        assert_eq!(
            hex::encode(hash),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_hash160_length() {
        assert_eq!(hash160(b"").len(), 20);
        assert_eq!(hash160(&[0u8; 65]).len(), 20);
    }

    #[test]
    fn test_sha256d_differs_from_single() {
        let data = b"checksum input";
        assert_ne!(sha256d(data), sha256(data));
        assert_eq!(sha256d(data), sha256(&sha256(data)));
    }

    #[test]
    fn test_hmac_sha512_output_width() {
        let out = hmac_sha512(b"key", b"message");
        assert_eq!(out.len(), 64);
        // Keyed with different material the output must change.
        assert_ne!(hmac_sha512(b"other", b"message"), out);
    }
}
