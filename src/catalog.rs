// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Static move tables.

use crate::error::{GameError, GameResult};
use crate::types::{Element, TypeTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveCategory {
    Physical,
    Special,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameMove {
    pub name: &'static str,
    /// Wire-level identifier passed as `u8` to the entry functions.
    pub value: u8,
    pub element: Element,
    /// Keyboard shortcut shown in the move picker.
    pub key: char,
    pub category: Option<MoveCategory>,
    pub power: Option<u8>,
    /// Multipliers (x10) against Water, Fire, Air, Earth.
    pub effectiveness: Option<[u8; 4]>,
}

const fn arena_move(name: &'static str, value: u8, element: Element, key: char) -> GameMove {
    GameMove {
        name,
        value,
        element,
        key,
        category: None,
        power: None,
        effectiveness: None,
    }
}

const fn kiosk_move(
    name: &'static str,
    value: u8,
    element: Element,
    key: char,
    category: MoveCategory,
    power: u8,
    effectiveness: [u8; 4],
) -> GameMove {
    GameMove {
        name,
        value,
        element,
        key,
        category: Some(category),
        power: Some(power),
        effectiveness: Some(effectiveness),
    }
}

pub static ARENA_MOVES: [GameMove; 3] = [
    arena_move("Fire", 0, Element::Fire, 'q'),
    arena_move("Air", 1, Element::Air, 'w'),
    arena_move("Water", 2, Element::Water, 'e'),
];

pub static KIOSK_MOVES: [GameMove; 8] = [
    kiosk_move("Hydro Pump", 0, Element::Water, '1', MoveCategory::Physical, 90, [10, 20, 5, 10]),
    kiosk_move("Aqua Tail", 1, Element::Water, '2', MoveCategory::Special, 85, [10, 20, 5, 10]),
    kiosk_move("Inferno", 2, Element::Fire, '3', MoveCategory::Physical, 85, [5, 10, 20, 10]),
    kiosk_move("Flamethrower", 3, Element::Fire, '4', MoveCategory::Special, 90, [5, 10, 20, 10]),
    kiosk_move("Quake Strike", 4, Element::Earth, '5', MoveCategory::Physical, 80, [20, 5, 10, 10]),
    kiosk_move("Earthquake", 5, Element::Earth, '6', MoveCategory::Special, 85, [20, 5, 10, 10]),
    kiosk_move("Gust", 6, Element::Air, '7', MoveCategory::Physical, 75, [10, 5, 10, 20]),
    kiosk_move("Air Slash", 7, Element::Air, '8', MoveCategory::Special, 80, [10, 5, 10, 20]),
];

/// Looks a move up by its wire value.
pub fn find_move(table: &'static [GameMove], value: u8) -> GameResult<&'static GameMove> {
    table
        .iter()
        .find(|m| m.value == value)
        .ok_or(GameError::UnknownMove(value))
}

/// Moves a player may pick from: their own list when the arena carries one,
/// otherwise the whole table.
pub fn available_moves(table: &'static [GameMove], own: &[u8]) -> Vec<&'static GameMove> {
    if own.is_empty() {
        return table.iter().collect();
    }
    own.iter()
        .filter_map(|v| table.iter().find(|m| m.value == *v))
        .collect()
}

/// Move table matching a type table.
pub fn moves_for(table: TypeTable) -> &'static [GameMove] {
    match table {
        TypeTable::Arena => &ARENA_MOVES,
        TypeTable::Kiosk => &KIOSK_MOVES,
    }
}
