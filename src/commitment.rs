// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Commit-reveal bookkeeping for one hidden move.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use rand::RngCore;
use serde::{Deserialize, Serialize};

type Blake2b256 = Blake2b<U32>;

pub const HASH_LEN: usize = 32;
pub const DEFAULT_SALT_LEN: usize = 16;

/// `blake2b-256(move || salt)`, the preimage layout the arena checks on reveal.
pub fn commitment_hash(move_value: u8, salt: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Blake2b256::new();
    hasher.update([move_value]);
    hasher.update(salt);
    let mut out = [0u8; HASH_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// A move hidden behind a hash. Must outlive the process between commit and
/// reveal since the ledger only ever sees the hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub arena_id: String,
    pub move_value: u8,
    #[serde(with = "hex_bytes")]
    pub salt: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
    /// Round the commitment was made for, when known.
    pub round: Option<u64>,
    /// Unix seconds.
    pub created_at: u64,
}

impl Commitment {
    /// New commitment with a fresh random salt of `salt_len` bytes.
    pub fn generate(arena_id: &str, move_value: u8, salt_len: usize, round: Option<u64>) -> Self {
        let mut salt = vec![0u8; salt_len.max(1)];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(arena_id, move_value, salt, round)
    }

    pub fn with_salt(arena_id: &str, move_value: u8, salt: Vec<u8>, round: Option<u64>) -> Self {
        let hash = commitment_hash(move_value, &salt).to_vec();
        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self {
            arena_id: arena_id.to_string(),
            move_value,
            salt,
            hash,
            round,
            created_at,
        }
    }

    /// True when `(move_value, salt)` still hashes to the recorded hash.
    pub fn verify(&self) -> bool {
        commitment_hash(self.move_value, &self.salt).as_slice() == self.hash.as_slice()
    }

    /// True when this commitment opens `onchain`, the hash stored by the arena.
    pub fn opens(&self, onchain: &[u8]) -> bool {
        self.verify() && self.hash.as_slice() == onchain
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(&self.hash)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom)
    }
}
