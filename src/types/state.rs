// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Serialize, Deserialize};
use super::player::PlayerStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Player vs bot: direct attacks, no commit-reveal.
    Pvb,
    /// Player vs player: commit-reveal rounds.
    Pvp,
    /// Matchmade battle kept in the host kiosk's game extension. Same
    /// commit-reveal rounds as `Pvp`; seats are identified by kiosk id.
    Kiosk,
}

impl MatchKind {
    pub fn module(&self) -> &'static str {
        match self {
            MatchKind::Pvb => "arena",
            MatchKind::Pvp => "arena_pvp",
            MatchKind::Kiosk => "the_game",
        }
    }
}

/// Address of a shared arena object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArenaRef {
    pub object_id: String,
    pub initial_shared_version: u64,
}

/// Snapshot of an arena as last read from the ledger. Never mutated locally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub arena_id: String,
    pub initial_shared_version: u64,
    pub round: u64,
    pub is_over: bool,
    pub winner: Option<String>,
    pub player_one: Option<PlayerStats>,
    pub player_two: Option<PlayerStats>,
}

impl MatchState {
    pub fn arena_ref(&self) -> ArenaRef {
        ArenaRef {
            object_id: self.arena_id.clone(),
            initial_shared_version: self.initial_shared_version,
        }
    }

    /// Splits the snapshot into `(me, opponent)`.
    ///
    /// In a bot arena the player always sits in slot one. In a PvP arena the
    /// slot whose account matches `me` is ours; if neither matches, `me` is
    /// `None` and the selector reports the caller as a non-participant.
    pub fn perspective(
        &self,
        me: &str,
        kind: MatchKind,
    ) -> (Option<&PlayerStats>, Option<&PlayerStats>) {
        let one = self.player_one.as_ref();
        let two = self.player_two.as_ref();
        match kind {
            MatchKind::Pvb => (one, two),
            MatchKind::Pvp => {
                if one.map(|p| p.is_account(me)).unwrap_or(false) {
                    (one, two)
                } else if two.map(|p| p.is_account(me)).unwrap_or(false) {
                    (two, one)
                } else {
                    (None, one.or(two))
                }
            }
            MatchKind::Kiosk => {
                // The host always sits in slot one; a guest seat may not name its kiosk.
                if one.map(|p| p.is_account(me)).unwrap_or(false) {
                    (one, two)
                } else if two.map(|p| p.account.is_none() || p.is_account(me)).unwrap_or(false) {
                    (two, one)
                } else {
                    (None, one.or(two))
                }
            }
        }
    }
}
