//! # keytree
//!
//! Hierarchical-deterministic key derivation and address encoding for the
//! secp256k1 key space.
//!
//! Given a root seed, the crate derives an unbounded tree of child key
//! pairs along BIP32-style paths and renders nodes into their canonical
//! string encodings: serialized extended keys, legacy base58check
//! addresses, P2SH-wrapped witness addresses, and native witness (bech32)
//! addresses.
//!
//! ## Quick Start
//!
//! ```rust
//! use keytree::{HdNode, Network};
//!
//! fn main() -> Result<(), keytree::Error> {
//!     let master = HdNode::from_seed(&[0x5e; 32])?;
//!
//!     // Derive hardened and normal children along a path, then strip
//!     // private material from the final node only.
//!     let leaf = master.derive("m/44'/0'/0'/0/0.pub")?;
//!     assert!(leaf.private_key().is_none());
//!
//!     println!("xpub:    {}", leaf.to_extended_public(Network::Bitcoin)?);
//!     println!("address: {}", leaf.p2wpkh_address(Network::Bitcoin));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture Overview
//!
//! - [`node`]: HD tree nodes — master construction, child derivation,
//!   parent recovery, private-material stripping
//! - [`path`]: derivation path parsing (`m/44'/0'`, `.pub` suffix)
//! - [`keys`]: private/public key value types and compression views
//! - [`extended`]: the 78-byte extended-key wire format
//! - [`address`]: legacy, wrapped-witness, and native-witness addresses
//! - [`network`]: per-network version bytes and bech32 prefixes
//! - [`hash`]: SHA256, HASH160, and HMAC-SHA512 helpers
//!
//! ## Error Handling
//!
//! All fallible APIs return [`Result<T, Error>`](error::Error). Failures
//! are local and synchronous; the crate never retries silently, and the
//! bounded seed-generation loop surfaces exhaustion as an error.
//!
//! ## Thread Safety
//!
//! Operations are CPU-bound and synchronous. Nodes are immutable after
//! construction apart from [`HdNode::strip_private`], so a derivation tree
//! can be shared read-only across threads; callers needing to strip a
//! shared node should work on a private clone.

pub mod address;
pub mod error;
pub mod extended;
pub mod hash;
pub mod keys;
pub mod network;
pub mod node;
pub mod path;

pub use address::{Address, AddressPayload};
pub use error::{Error, Result, SeedError};
pub use keys::{ChainCode, Fingerprint, PrivateKey, PublicKey};
pub use network::Network;
pub use node::HdNode;
pub use path::DerivationPath;

/// Initializes logging for the library. Call once per process; subsequent
/// calls have no effect.
pub fn init() {
    // It's ok if this fails, it just means logging was already initialized.
    let _ = env_logger::try_init();
    log::debug!("keytree initialized");
}
