//! Per-network version bytes for keys and addresses.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Version bytes for extended keys
const MAINNET_PRIVATE_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4]; // xprv
const MAINNET_PUBLIC_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E]; // xpub
const TESTNET_PRIVATE_VERSION: [u8; 4] = [0x04, 0x35, 0x83, 0x94]; // tprv
const TESTNET_PUBLIC_VERSION: [u8; 4] = [0x04, 0x35, 0x87, 0xCF]; // tpub

/// Network selector for key serialization and address rendering.
///
/// Each variant is a row in a fixed version-byte table; no entry is ever
/// mutated at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Network {
    Bitcoin,
    Testnet,
}

impl Network {
    /// Version bytes for serialized extended private keys.
    pub fn private_version_bytes(&self) -> [u8; 4] {
        match self {
            Network::Bitcoin => MAINNET_PRIVATE_VERSION,
            Network::Testnet => TESTNET_PRIVATE_VERSION,
        }
    }

    /// Version bytes for serialized extended public keys.
    pub fn public_version_bytes(&self) -> [u8; 4] {
        match self {
            Network::Bitcoin => MAINNET_PUBLIC_VERSION,
            Network::Testnet => TESTNET_PUBLIC_VERSION,
        }
    }

    /// Leading version byte for legacy pay-to-pubkey-hash addresses.
    pub fn pubkey_hash_version(&self) -> u8 {
        match self {
            Network::Bitcoin => 0x00,
            Network::Testnet => 0x6f,
        }
    }

    /// Leading version byte for pay-to-script-hash addresses.
    pub fn script_hash_version(&self) -> u8 {
        match self {
            Network::Bitcoin => 0x05,
            Network::Testnet => 0xc4,
        }
    }

    /// Human-readable prefix for native witness (bech32) addresses.
    pub fn bech32_hrp(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bc",
            Network::Testnet => "tb",
        }
    }
}

impl FromStr for Network {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "bitcoin" | "mainnet" => Ok(Network::Bitcoin),
            "testnet" => Ok(Network::Testnet),
            other => Err(Error::UnknownNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Bitcoin => write!(f, "bitcoin"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}
