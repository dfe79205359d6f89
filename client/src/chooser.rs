// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Strategies for picking the move to attack or commit with.

use crate::errors::ClientError;
use capymon_core::catalog::GameMove;
use capymon_core::{MatchKind, PlayerStats};
use rand::seq::SliceRandom;
use std::future::Future;

pub struct MoveChoice<'a> {
    pub kind: MatchKind,
    pub round: u64,
    pub me: &'a PlayerStats,
    pub opponent: &'a PlayerStats,
    /// Never empty.
    pub moves: Vec<&'static GameMove>,
}

pub trait MoveChooser: Send {
    fn choose(&mut self, choice: MoveChoice<'_>) -> impl Future<Output = Result<u8, ClientError>> + Send;
}

/// Always plays the same move value if it is available, otherwise the first one.
#[derive(Debug, Clone, Copy)]
pub struct FixedMove(pub u8);

impl MoveChooser for FixedMove {
    async fn choose(&mut self, choice: MoveChoice<'_>) -> Result<u8, ClientError> {
        if choice.moves.iter().any(|m| m.value == self.0) {
            return Ok(self.0);
        }
        choice
            .moves
            .first()
            .map(|m| m.value)
            .ok_or_else(|| ClientError::Chooser("no moves available".into()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMove;

impl MoveChooser for RandomMove {
    async fn choose(&mut self, choice: MoveChoice<'_>) -> Result<u8, ClientError> {
        choice
            .moves
            .choose(&mut rand::thread_rng())
            .map(|m| m.value)
            .ok_or_else(|| ClientError::Chooser("no moves available".into()))
    }
}
