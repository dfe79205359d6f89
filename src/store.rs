// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Key-value storage for pending commitments, keyed by arena id.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;
use crate::commitment::Commitment;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Corrupt commitment record for {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

pub trait CommitmentStore: Send + Sync {
    fn save(&self, commitment: &Commitment) -> Result<(), StoreError>;
    fn load(&self, arena_id: &str) -> Result<Option<Commitment>, StoreError>;
    fn clear(&self, arena_id: &str) -> Result<(), StoreError>;
    fn list(&self) -> Result<Vec<Commitment>, StoreError>;
}

impl<T: CommitmentStore + ?Sized> CommitmentStore for std::sync::Arc<T> {
    fn save(&self, commitment: &Commitment) -> Result<(), StoreError> {
        (**self).save(commitment)
    }
    fn load(&self, arena_id: &str) -> Result<Option<Commitment>, StoreError> {
        (**self).load(arena_id)
    }
    fn clear(&self, arena_id: &str) -> Result<(), StoreError> {
        (**self).clear(arena_id)
    }
    fn list(&self) -> Result<Vec<Commitment>, StoreError> {
        (**self).list()
    }
}

/// Process-local store. Does not survive a restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, Commitment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Commitment>>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Io("store lock poisoned".into()))
    }
}

impl CommitmentStore for MemoryStore {
    fn save(&self, commitment: &Commitment) -> Result<(), StoreError> {
        self.map()?.insert(commitment.arena_id.clone(), commitment.clone());
        Ok(())
    }

    fn load(&self, arena_id: &str) -> Result<Option<Commitment>, StoreError> {
        Ok(self.map()?.get(arena_id).cloned())
    }

    fn clear(&self, arena_id: &str) -> Result<(), StoreError> {
        self.map()?.remove(arena_id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Commitment>, StoreError> {
        let mut all: Vec<_> = self.map()?.values().cloned().collect();
        all.sort_by(|a, b| a.arena_id.cmp(&b.arena_id));
        Ok(all)
    }
}
