// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::commitment::{commitment_hash, Commitment, DEFAULT_SALT_LEN, HASH_LEN};

#[test]
fn test_hash_matches_reveal_preimage() {
    let c = Commitment::generate("0xa1", 2, DEFAULT_SALT_LEN, Some(1));
    assert_eq!(c.salt.len(), DEFAULT_SALT_LEN);
    assert_eq!(c.hash.len(), HASH_LEN);
    // What the arena recomputes on reveal.
    assert_eq!(commitment_hash(c.move_value, &c.salt).to_vec(), c.hash);
    assert!(c.opens(&c.hash));
}

#[test]
fn test_wrong_move_does_not_open() {
    let c = Commitment::generate("0xa1", 1, DEFAULT_SALT_LEN, None);
    let forged = Commitment { move_value: 2, ..c.clone() };
    assert!(!forged.verify());
    assert!(!forged.opens(&c.hash));
    assert_ne!(commitment_hash(2, &c.salt).to_vec(), c.hash);
}

#[test]
fn test_salts_are_fresh() {
    let a = Commitment::generate("0xa1", 0, DEFAULT_SALT_LEN, None);
    let b = Commitment::generate("0xa1", 0, DEFAULT_SALT_LEN, None);
    assert_ne!(a.salt, b.salt);
    assert_ne!(a.hash, b.hash);
}

#[test]
fn test_known_preimage_layout() {
    // The original prototypes hashed [move, 1, 2, 3, 4]; the layout is unchanged.
    let explicit = commitment_hash(0, &[1, 2, 3, 4]);
    let c = Commitment::with_salt("0xa1", 0, vec![1, 2, 3, 4], None);
    assert_eq!(c.hash, explicit.to_vec());
    assert_ne!(explicit, commitment_hash(1, &[1, 2, 3, 4]));
}

#[test]
fn test_json_uses_hex() {
    let c = Commitment::with_salt("0xa1", 1, vec![0xde, 0xad], Some(4));
    let json = serde_json::to_string(&c).unwrap();
    assert!(json.contains("\"salt\":\"dead\""));
    let back: Commitment = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}
