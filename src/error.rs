// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The local account is neither of the arena's players.
    #[error("not a participant of this match")]
    NotParticipant,
    #[error("unknown move value {0}")]
    UnknownMove(u8),
    #[error("no moves available")]
    NoMoves,
}

pub type GameResult<T> = core::result::Result<T, GameError>;
