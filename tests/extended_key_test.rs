//! Extended-key serialization round trips and failure modes.

use keytree::{Error, HdNode, Network};

const SEED_HEX: &str = "000102030405060708090a0b0c0d0e0f";
const MASTER_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
const MASTER_XPUB: &str = "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8";

fn master() -> HdNode {
    HdNode::from_seed(&hex::decode(SEED_HEX).unwrap()).unwrap()
}

#[test]
fn test_master_extended_key_strings() {
    let node = master();
    assert_eq!(node.to_extended_private(Network::Bitcoin).unwrap(), MASTER_XPRV);
    assert_eq!(node.to_extended_public(Network::Bitcoin).unwrap(), MASTER_XPUB);
}

#[test]
fn test_derived_extended_key_strings() {
    let leaf = master().derive("m/0/0/458").unwrap();
    assert_eq!(
        leaf.to_extended_private(Network::Bitcoin).unwrap(),
        "xprv9xm1LtRNKZnzFqyym6Q3tZaFA7diYp5UWzY9VYUgirEBShTc3gPgk8F7bsngxbCq67KZCKepV6hhtxo7wobj5fCSBwh3kFz2w6eZncDnVEe"
    );
    assert_eq!(
        leaf.to_extended_public(Network::Bitcoin).unwrap(),
        "xpub6BkMkPxG9wMHUL4Ss7w4FhWyi9UCxGoKtDTkHvtJHBmAKVnkbDhwHvZbT9T1bCEYKsEmc5dHN3L9SyzpszsW8uZDbzJWYKG9kvfxyzYq42W"
    );
}

#[test]
fn test_extended_key_round_trip() {
    let leaf = master().derive("m/44'/0'/0'/0/5").unwrap();

    let xprv = leaf.to_extended_private(Network::Bitcoin).unwrap();
    let restored = HdNode::from_extended_str(&xprv, Network::Bitcoin).unwrap();
    assert_eq!(restored, leaf);
    assert_eq!(restored.to_extended_private(Network::Bitcoin).unwrap(), xprv);

    let xpub = leaf.to_extended_public(Network::Bitcoin).unwrap();
    let watch_only = HdNode::from_extended_str(&xpub, Network::Bitcoin).unwrap();
    assert!(watch_only.private_key().is_none());
    assert_eq!(watch_only.public_key(), leaf.public_key());
    assert_eq!(watch_only.depth(), leaf.depth());
    assert_eq!(watch_only.index(), leaf.index());
    assert_eq!(watch_only.parent_fingerprint(), leaf.parent_fingerprint());
}

#[test]
fn test_restored_watch_only_node_keeps_deriving() {
    let account = master().derive("m/0'/0'").unwrap();
    let xpub = account.to_extended_public(Network::Bitcoin).unwrap();
    let watch_only = HdNode::from_extended_str(&xpub, Network::Bitcoin).unwrap();

    let expected = account.subnode(9).unwrap();
    let derived = watch_only.subnode(9).unwrap();
    assert_eq!(
        derived.public_key().serialize(),
        expected.public_key().serialize()
    );
    // Hardened steps stay out of reach for the restored public node.
    assert!(matches!(
        watch_only.derive("m/0'"),
        Err(Error::PrivatePublicMismatch)
    ));
}

#[test]
fn test_testnet_extended_keys() {
    let node = master();
    let tprv = node.to_extended_private(Network::Testnet).unwrap();
    let tpub = node.to_extended_public(Network::Testnet).unwrap();
    assert!(tprv.starts_with("tprv"));
    assert!(tpub.starts_with("tpub"));

    // Network tags are enforced on decode.
    assert!(HdNode::from_extended_str(&tprv, Network::Testnet).is_ok());
    assert!(matches!(
        HdNode::from_extended_str(&tprv, Network::Bitcoin),
        Err(Error::KeyFormatNotFound(_))
    ));
}

#[test]
fn test_malformed_strings_construct_nothing() {
    for garbage in [
        "",
        "not-an-extended-key",
        "xprv9s21ZrQH143K3QTDL4LXw2F7HEK",
        "0OIl",
    ] {
        assert!(HdNode::from_extended_str(garbage, Network::Bitcoin).is_err());
    }
}

#[test]
fn test_private_export_of_stripped_node_fails() {
    let mut node = master();
    node.strip_private();
    assert!(matches!(
        node.to_extended_private(Network::Bitcoin),
        Err(Error::PrivatePublicMismatch)
    ));
    assert_eq!(node.to_extended_public(Network::Bitcoin).unwrap(), MASTER_XPUB);
}
