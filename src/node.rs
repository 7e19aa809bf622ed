//! HD tree nodes: master construction, child derivation, parent recovery.

use crate::address::Address;
use crate::error::{Error, Result, SeedError};
use crate::extended;
use crate::hash::hmac_sha512;
use crate::keys::{ChainCode, Fingerprint, PrivateKey, PublicKey};
use crate::network::Network;
use crate::path::{DerivationPath, HARDENED_KEY_LIMIT};
use log::trace;
use rand::RngCore;
use secp256k1::{Scalar, Secp256k1};

/// Domain-separation key for hashing a root seed.
const MASTER_SEED_KEY: &[u8] = b"Bitcoin seed";

/// Acceptable root seed lengths, in bytes.
const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;

/// Seed length drawn from the random source by [`HdNode::generate`].
const GENERATED_SEED_LEN: usize = 32;

/// Retry ceiling when a randomly drawn seed fails validation.
const MAX_SEED_ATTEMPTS: u32 = 8;

/// One node of the HD derivation tree.
///
/// A node always carries a public key and chain code; the private key is
/// optional, enabling watch-only trees. Nodes are immutable after
/// construction except for [`strip_private`](HdNode::strip_private), which
/// irreversibly clears the private key. The parent association is reduced to
/// the parent's 4-byte fingerprint, captured when the child is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HdNode {
    depth: u8,
    index: u32,
    chain_code: ChainCode,
    private_key: Option<PrivateKey>,
    public_key: PublicKey,
    parent_fingerprint: Fingerprint,
}

impl HdNode {
    /// Build a master node (depth 0, index 0) from raw seed bytes.
    ///
    /// The seed is hashed with HMAC-SHA512 under a fixed domain-separation
    /// key; the left half becomes the private scalar, the right half the
    /// chain code.
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(SeedError::Length(seed.len()).into());
        }
        let seed_hash = hmac_sha512(MASTER_SEED_KEY, seed);
        let private_key =
            PrivateKey::from_bytes(&seed_hash[..32]).map_err(|_| SeedError::Invalid)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&seed_hash[32..]);

        Ok(HdNode {
            depth: 0,
            index: 0,
            chain_code: ChainCode(chain_code),
            public_key: private_key.public_key(),
            private_key: Some(private_key),
            parent_fingerprint: Fingerprint([0; 4]),
        })
    }

    /// Build a master node from a freshly drawn random seed.
    ///
    /// Seed validity failures are retried against the random source up to a
    /// fixed ceiling; a degenerate source surfaces as
    /// [`SeedError::AttemptsExhausted`] instead of spinning forever.
    pub fn generate() -> Result<Self> {
        let mut rng = rand::thread_rng();
        for attempt in 1..=MAX_SEED_ATTEMPTS {
            let mut seed = [0u8; GENERATED_SEED_LEN];
            rng.try_fill_bytes(&mut seed).map_err(SeedError::Rng)?;
            match Self::from_seed(&seed) {
                Ok(node) => return Ok(node),
                Err(err) => trace!("seed attempt {} rejected: {}", attempt, err),
            }
        }
        Err(SeedError::AttemptsExhausted(MAX_SEED_ATTEMPTS).into())
    }

    /// Build a root node from explicit key material.
    ///
    /// A chain code plus at least one key is required. When a private key is
    /// given the public key is recomputed from it, so the two can never
    /// disagree.
    pub fn from_material(
        private_key: Option<PrivateKey>,
        public_key: Option<PublicKey>,
        chain_code: Option<ChainCode>,
    ) -> Result<Self> {
        let chain_code =
            chain_code.ok_or_else(|| Error::Import("a chain code is required".to_string()))?;
        let (private_key, public_key) = match (private_key, public_key) {
            (Some(private_key), _) => {
                let public_key = private_key.public_key();
                (Some(private_key), public_key)
            }
            (None, Some(public_key)) => (None, public_key.compressed()),
            (None, None) => {
                return Err(Error::Import(
                    "a private or public key is required".to_string(),
                ))
            }
        };

        Ok(HdNode {
            depth: 0,
            index: 0,
            chain_code,
            private_key,
            public_key,
            parent_fingerprint: Fingerprint([0; 4]),
        })
    }

    /// Reconstruct a node from an extended-key string tagged with a network.
    pub fn from_extended_str(s: &str, network: Network) -> Result<Self> {
        extended::decode(s, network)
    }

    pub(crate) fn from_parts(
        depth: u8,
        index: u32,
        chain_code: ChainCode,
        private_key: Option<PrivateKey>,
        public_key: PublicKey,
        parent_fingerprint: Fingerprint,
    ) -> Self {
        HdNode { depth, index, chain_code, private_key, public_key, parent_fingerprint }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// True when this node was produced by hardened derivation.
    pub fn is_hardened(&self) -> bool {
        self.index >= HARDENED_KEY_LIMIT
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_ref()
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn parent_fingerprint(&self) -> Fingerprint {
        self.parent_fingerprint
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.public_key.fingerprint()
    }

    /// HASH160 of the compressed public key.
    pub fn identifier(&self) -> [u8; 20] {
        self.public_key.compressed().identifier()
    }

    pub fn identifier_hex(&self) -> String {
        hex::encode(self.identifier())
    }

    /// Derive the child node at `index`.
    ///
    /// Indexes at or above 2^31 select hardened derivation, which needs this
    /// node's private key; lower indexes derive from the public key alone
    /// and work on watch-only nodes. The astronomically rare out-of-range
    /// results surface as [`Error::InvalidKeyForIndex`] so the caller can
    /// move on to the next index.
    pub fn subnode(&self, index: u32) -> Result<HdNode> {
        let depth = self.depth.checked_add(1).ok_or(Error::DepthExceeded)?;

        let mut message = Vec::with_capacity(37);
        if index >= HARDENED_KEY_LIMIT {
            let private_key = self.private_key.as_ref().ok_or(Error::PublicDerivationFailure)?;
            message.push(0x00);
            message.extend_from_slice(&private_key.secret_bytes());
        } else {
            message.extend_from_slice(&self.public_key.compressed().serialize());
        }
        message.extend_from_slice(&index.to_be_bytes());

        let derived = hmac_sha512(self.chain_code.as_bytes(), &message);
        let mut left = [0u8; 32];
        left.copy_from_slice(&derived[..32]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&derived[32..]);

        let tweak = Scalar::from_be_bytes(left).map_err(|_| Error::InvalidKeyForIndex {
            index,
            reason: "hash output not below the curve order",
        })?;

        let (private_key, public_key) = if let Some(parent_key) = &self.private_key {
            let child_secret =
                parent_key.secret().add_tweak(&tweak).map_err(|_| Error::InvalidKeyForIndex {
                    index,
                    reason: "derived scalar is zero",
                })?;
            let child_key = PrivateKey::from_secret(child_secret);
            let public_key = child_key.public_key();
            (Some(child_key), public_key)
        } else {
            let secp = Secp256k1::new();
            let point = self
                .public_key
                .point()
                .add_exp_tweak(&secp, &tweak)
                .map_err(|_| Error::InvalidKeyForIndex {
                    index,
                    reason: "derived point is at infinity",
                })?;
            (None, PublicKey::from_point(point))
        };

        Ok(HdNode {
            depth,
            index,
            chain_code: ChainCode(chain_code),
            private_key,
            public_key,
            parent_fingerprint: self.fingerprint(),
        })
    }

    /// Derive along a parsed path, left to right.
    ///
    /// A hardened step requested of a watch-only node fails with
    /// [`Error::PrivatePublicMismatch`]. A strip-private path performs every
    /// step with private keys, then clears private material from only the
    /// final node.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<HdNode> {
        let mut node = self.clone();
        for &step in path.steps() {
            if DerivationPath::is_hardened(step) && node.private_key.is_none() {
                return Err(Error::PrivatePublicMismatch);
            }
            node = node.subnode(step)?;
        }
        if path.strips_private() {
            node.strip_private();
        }
        Ok(node)
    }

    /// Parse and derive a path string such as `"0/0/458.pub"` or `"m/44'/0'"`.
    pub fn derive(&self, path: &str) -> Result<HdNode> {
        self.derive_path(&path.parse()?)
    }

    /// Irreversibly clear this node's private material.
    pub fn strip_private(&mut self) {
        self.private_key = None;
    }

    /// Recover the parent's private scalar from this child's private key and
    /// the parent's public key and chain code.
    ///
    /// Only a normally derived child can be inverted this way: the hardened
    /// message feeds the parent scalar itself into the hash, so recomputing
    /// it would already require the value being recovered.
    pub fn recover_parent_key(
        &self,
        parent_public: &PublicKey,
        parent_chain_code: &ChainCode,
    ) -> Result<PrivateKey> {
        if self.is_hardened() {
            return Err(Error::PublicDerivationFailure);
        }
        let child_key = self.private_key.as_ref().ok_or(Error::PrivatePublicMismatch)?;

        let mut message = Vec::with_capacity(37);
        message.extend_from_slice(&parent_public.compressed().serialize());
        message.extend_from_slice(&self.index.to_be_bytes());
        let derived = hmac_sha512(parent_chain_code.as_bytes(), &message);

        let offset = secp256k1::SecretKey::from_slice(&derived[..32]).map_err(|_| {
            Error::InvalidKeyForIndex {
                index: self.index,
                reason: "hash output is not an invertible scalar",
            }
        })?;
        let parent_secret = child_key
            .secret()
            .add_tweak(&Scalar::from(offset.negate()))
            .map_err(|_| Error::InvalidKeyForIndex {
                index: self.index,
                reason: "recovered scalar is zero",
            })?;
        Ok(PrivateKey::from_secret(parent_secret))
    }

    /// Serialize as an extended private key string for `network`.
    pub fn to_extended_private(&self, network: Network) -> Result<String> {
        extended::encode(self, network, true)
    }

    /// Serialize as an extended public key string for `network`.
    pub fn to_extended_public(&self, network: Network) -> Result<String> {
        extended::encode(self, network, false)
    }

    /// Legacy address over the node's public key.
    pub fn address(&self, network: Network) -> Address {
        Address::p2pkh(&self.public_key, network)
    }

    /// P2SH-wrapped witness address.
    pub fn p2shwpkh_address(&self, network: Network) -> Address {
        Address::p2shwpkh(&self.public_key, network)
    }

    /// Native witness (bech32) address.
    pub fn p2wpkh_address(&self, network: Network) -> Address {
        Address::p2wpkh(&self.public_key, network)
    }
}
