// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! capymon-core: canonical match types, the move catalogs, the pure action
//! selector and commit-reveal hashing. No I/O lives here.

pub mod error;
pub mod types;
pub mod catalog;
pub mod selector;
pub mod commitment;
pub mod store;

pub use commitment::Commitment;
pub use error::{GameError, GameResult};
pub use selector::{select, Action, WaitReason};
pub use store::{CommitmentStore, MemoryStore, StoreError};
pub use types::{ArenaRef, Element, MatchKind, MatchState, PlayerStats, TypeTable};

#[cfg(test)]
pub mod tests;
