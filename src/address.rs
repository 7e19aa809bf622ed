//! Address rendering for public keys.

use crate::hash::hash160;
use crate::keys::PublicKey;
use crate::network::Network;
use bech32::{segwit, Hrp};
use std::fmt;

/// Witness-program push size for a pay-to-witness-pubkey-hash redeem script.
const WITNESS_V0_KEYHASH_LEN: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressPayload {
    /// Pay-to-Pubkey-Hash
    P2pkh([u8; 20]),
    /// Pay-to-Witness-Pubkey-Hash wrapped in Pay-to-Script-Hash
    P2shWpkh([u8; 20]),
    /// Native Pay-to-Witness-Pubkey-Hash (witness version 0)
    P2wpkh([u8; 20]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub network: Network,
    pub payload: AddressPayload,
}

impl Address {
    /// Legacy address over the key's current compression view.
    pub fn p2pkh(public_key: &PublicKey, network: Network) -> Self {
        Address {
            network,
            payload: AddressPayload::P2pkh(hash160(&public_key.serialize())),
        }
    }

    /// P2SH-wrapped witness address. The redeem script is a witness-version-0
    /// push of the 20-byte program, which always hashes the compressed key.
    pub fn p2shwpkh(public_key: &PublicKey, network: Network) -> Self {
        let program = hash160(&public_key.compressed().serialize());
        let mut redeem_script = Vec::with_capacity(22);
        redeem_script.push(0x00);
        redeem_script.push(WITNESS_V0_KEYHASH_LEN);
        redeem_script.extend_from_slice(&program);
        Address {
            network,
            payload: AddressPayload::P2shWpkh(hash160(&redeem_script)),
        }
    }

    /// Native witness (bech32) address, witness version 0.
    pub fn p2wpkh(public_key: &PublicKey, network: Network) -> Self {
        Address {
            network,
            payload: AddressPayload::P2wpkh(hash160(&public_key.compressed().serialize())),
        }
    }

    pub fn is_segwit(&self) -> bool {
        !matches!(self.payload, AddressPayload::P2pkh(_))
    }

    pub fn address_type(&self) -> &'static str {
        match self.payload {
            AddressPayload::P2pkh(_) => "p2pkh",
            AddressPayload::P2shWpkh(_) => "p2sh-p2wpkh",
            AddressPayload::P2wpkh(_) => "p2wpkh",
        }
    }
}

fn base58check(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    bs58::encode(data).with_check().into_string()
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            AddressPayload::P2pkh(hash) => {
                f.write_str(&base58check(self.network.pubkey_hash_version(), hash))
            }
            AddressPayload::P2shWpkh(hash) => {
                f.write_str(&base58check(self.network.script_hash_version(), hash))
            }
            AddressPayload::P2wpkh(program) => {
                // A 20-byte program and a two-letter prefix are always
                // encodable, so these errors are unreachable in practice.
                let hrp = Hrp::parse(self.network.bech32_hrp()).map_err(|_| fmt::Error)?;
                let encoded = segwit::encode_v0(hrp, program).map_err(|_| fmt::Error)?;
                f.write_str(&encoded)
            }
        }
    }
}
