// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Decides the next step of a match from one snapshot.

use core::time::Duration;
use crate::error::{GameError, GameResult};
use crate::types::{MatchKind, PlayerStats};

/// Poll delay while the second seat is empty.
pub const OPPONENT_WAIT: Duration = Duration::from_millis(2500);
/// Poll delay after our commit while the opponent has not committed.
pub const REVEAL_WAIT: Duration = Duration::from_millis(1000);
/// Poll delay when no other rule applies.
pub const FALLBACK_WAIT: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitReason {
    Opponent,
    OpponentCommit,
    Fallback,
}

impl WaitReason {
    pub fn default_delay(&self) -> Duration {
        match self {
            WaitReason::Opponent => OPPONENT_WAIT,
            WaitReason::OpponentCommit => REVEAL_WAIT,
            WaitReason::Fallback => FALLBACK_WAIT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Loss,
    Win,
    Wait(WaitReason),
    Attack,
    Commit,
    Reveal,
}

impl Action {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Action::Loss | Action::Win)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Loss => "loss",
            Action::Win => "win",
            Action::Wait(_) => "wait",
            Action::Attack => "attack",
            Action::Commit => "commit",
            Action::Reveal => "reveal",
        }
    }
}

// An absent round never compares.
fn round_lt(a: Option<u64>, b: Option<u64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn round_le(a: Option<u64>, b: Option<u64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a <= b)
}

/// Picks the next action. Rules are checked in order and the first match wins;
/// a snapshot can satisfy several of the PvP rules at once, so the order matters.
pub fn select(
    me: Option<&PlayerStats>,
    opponent: Option<&PlayerStats>,
    kind: MatchKind,
) -> GameResult<Action> {
    if me.map(PlayerStats::is_defeated).unwrap_or(false) {
        return Ok(Action::Loss);
    }
    if opponent.map(PlayerStats::is_defeated).unwrap_or(false) {
        return Ok(Action::Win);
    }

    let me = me.ok_or(GameError::NotParticipant)?;
    let Some(opponent) = opponent else {
        return Ok(Action::Wait(WaitReason::Opponent));
    };

    if kind == MatchKind::Pvb {
        return Ok(Action::Attack);
    }

    let mine = me.has_committed();
    let theirs = opponent.has_committed();

    if (mine && theirs) || (mine && round_lt(me.next_round, opponent.next_round)) {
        return Ok(Action::Reveal);
    }
    if mine && !theirs {
        return Ok(Action::Wait(WaitReason::OpponentCommit));
    }
    if !mine && round_le(me.next_round, opponent.next_round) {
        return Ok(Action::Commit);
    }
    Ok(Action::Wait(WaitReason::Fallback))
}
