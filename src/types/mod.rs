// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod element;
pub mod player;
pub mod state;

pub use element::{Element, TypeTable};
pub use player::{format_hp, same_address, PlayerStats, HP_SCALE};
pub use state::{ArenaRef, MatchKind, MatchState};
