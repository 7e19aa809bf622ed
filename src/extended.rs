//! Extended-key wire format: the 78-byte blob and its checksummed string.

use crate::error::{Error, Result};
use crate::keys::{ChainCode, Fingerprint, PrivateKey, PublicKey};
use crate::network::Network;
use crate::node::HdNode;

/// Serialized length before the 4-byte checksum: version(4) + depth(1) +
/// parent fingerprint(4) + index(4) + chain code(32) + key data(33).
const EXTENDED_KEY_LEN: usize = 78;

/// Serialize a node as an extended-key string for `network`.
///
/// `private` selects the private layout (0x00-prefixed scalar) and fails
/// with [`Error::PrivatePublicMismatch`] on a public-only node.
pub fn encode(node: &HdNode, network: Network, private: bool) -> Result<String> {
    let mut data = Vec::with_capacity(EXTENDED_KEY_LEN);

    let version = if private {
        network.private_version_bytes()
    } else {
        network.public_version_bytes()
    };
    data.extend_from_slice(&version);
    data.push(node.depth());
    data.extend_from_slice(node.parent_fingerprint().as_bytes());
    data.extend_from_slice(&node.index().to_be_bytes());
    data.extend_from_slice(node.chain_code().as_bytes());

    if private {
        let private_key = node.private_key().ok_or(Error::PrivatePublicMismatch)?;
        data.push(0x00);
        data.extend_from_slice(&private_key.secret_bytes());
    } else {
        data.extend_from_slice(&node.public_key().compressed().serialize());
    }
    debug_assert_eq!(data.len(), EXTENDED_KEY_LEN);

    Ok(bs58::encode(data).with_check().into_string())
}

/// Decode an extended-key string tagged with `network`.
///
/// The version must match the network's private or public table entry; every
/// slice boundary of the blob is length-checked.
pub fn decode(s: &str, network: Network) -> Result<HdNode> {
    let data = bs58::decode(s)
        .with_check(None)
        .into_vec()
        .map_err(|e| Error::KeyFormatNotFound(format!("base58 decode failed: {}", e)))?;
    if data.len() != EXTENDED_KEY_LEN {
        return Err(Error::KeyFormatNotFound(format!(
            "extended key must be {} bytes, got {}",
            EXTENDED_KEY_LEN,
            data.len()
        )));
    }

    let version = [data[0], data[1], data[2], data[3]];
    let private = if version == network.private_version_bytes() {
        true
    } else if version == network.public_version_bytes() {
        false
    } else {
        return Err(Error::KeyFormatNotFound(format!(
            "version bytes {} do not belong to network {}",
            hex::encode(version),
            network
        )));
    };

    let depth = data[4];
    let mut parent_fingerprint = [0u8; 4];
    parent_fingerprint.copy_from_slice(&data[5..9]);
    let index = u32::from_be_bytes([data[9], data[10], data[11], data[12]]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&data[13..45]);
    let key_data = &data[45..78];

    let (private_key, public_key) = if private {
        if key_data[0] != 0x00 {
            return Err(Error::KeyFormatNotFound(
                "private key data must start with 0x00".to_string(),
            ));
        }
        let private_key = PrivateKey::from_bytes(&key_data[1..])?;
        let public_key = private_key.public_key();
        (Some(private_key), public_key)
    } else {
        (None, PublicKey::from_slice(key_data)?)
    };

    if depth == 0 && (index != 0 || parent_fingerprint != [0; 4]) {
        return Err(Error::Import(
            "root node must have index 0 and a zero parent fingerprint".to_string(),
        ));
    }

    Ok(HdNode::from_parts(
        depth,
        index,
        ChainCode(chain_code),
        private_key,
        public_key,
        Fingerprint(parent_fingerprint),
    ))
}
