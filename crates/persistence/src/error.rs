// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use thiserror::Error;
use std::io;
use capymon_core::StoreError;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Invalid magic bytes in header")]
    InvalidMagic,
    #[error("Unsupported record version {0}")]
    UnsupportedVersion(u32),
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch {
        expected: u64,
        found: u64,
    },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

impl PersistenceError {
    pub fn into_store_error(self, key: &str) -> StoreError {
        match self {
            PersistenceError::IoError(e) => StoreError::Io(e.to_string()),
            other => StoreError::Corrupt {
                key: key.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
