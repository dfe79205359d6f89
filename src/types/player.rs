// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Serialize, Deserialize};
use super::element::Element;

/// On-chain HP values carry 8 decimal places.
pub const HP_SCALE: u64 = 100_000_000;

/// Canonical per-player view of an arena, whatever layout it was decoded from.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub hp: u64,
    pub initial_hp: u64,
    pub attack: u64,
    pub defense: u64,
    pub special_attack: u64,
    pub special_defense: u64,
    pub speed: u64,
    pub level: u64,
    pub element: Option<Element>,
    /// Raw type indices as stored on chain.
    pub types: Vec<u8>,
    pub moves: Vec<u8>,
    pub account: Option<String>,
    /// Hash committed for `next_round`, if any.
    pub next_attack: Option<Vec<u8>>,
    pub next_round: Option<u64>,
}

impl PlayerStats {
    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    pub fn has_committed(&self) -> bool {
        self.next_attack.is_some()
    }

    /// Remaining health as a percentage of the starting value, for the health bar.
    pub fn hp_percent(&self) -> u8 {
        if self.initial_hp == 0 {
            return 0;
        }
        let pct = (self.hp.min(self.initial_hp) as u128 * 100) / self.initial_hp as u128;
        pct as u8
    }

    pub fn is_account(&self, address: &str) -> bool {
        self.account
            .as_deref()
            .map(|a| same_address(a, address))
            .unwrap_or(false)
    }
}

/// Formats a raw HP value with two decimals.
pub fn format_hp(hp: u64) -> String {
    let whole = hp / HP_SCALE;
    let frac = (hp % HP_SCALE) / (HP_SCALE / 100);
    format!("{}.{:02}", whole, frac)
}

/// Compares two addresses ignoring case and leading zero padding.
pub fn same_address(a: &str, b: &str) -> bool {
    fn norm(s: &str) -> String {
        let s = s.trim();
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        s.trim_start_matches('0').to_ascii_lowercase()
    }
    norm(a) == norm(b)
}
