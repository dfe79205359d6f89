// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Elemental types and the per-variant index tables that map on-chain
//! `types[0]` values onto them.

use serde::{Serialize, Deserialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Air,
    Water,
    Earth,
}

impl Element {
    pub fn name(&self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Air => "Air",
            Element::Water => "Water",
            Element::Earth => "Earth",
        }
    }

    /// Hint shown next to the type when choosing one.
    pub fn description(&self) -> &'static str {
        match self {
            Element::Water => "Water is super effective against Fire",
            Element::Fire => "Fire is super effective against Air",
            Element::Air => "Air is super effective against Earth",
            Element::Earth => "Earth is super effective against Water",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which deployment of the game package we are talking to. The two variants
/// number their types differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeTable {
    /// `arena` / `arena_pvp` modules: Fire, Air, Water.
    #[default]
    Arena,
    /// `the_game` kiosk extension: Water, Fire, Air, Earth.
    Kiosk,
}

const ARENA_TYPES: [Element; 3] = [Element::Fire, Element::Air, Element::Water];
const KIOSK_TYPES: [Element; 4] = [Element::Water, Element::Fire, Element::Air, Element::Earth];

impl TypeTable {
    pub fn elements(&self) -> &'static [Element] {
        match self {
            TypeTable::Arena => &ARENA_TYPES,
            TypeTable::Kiosk => &KIOSK_TYPES,
        }
    }

    pub fn from_u8(&self, v: u8) -> Option<Element> {
        self.elements().get(v as usize).copied()
    }

    pub fn index_of(&self, element: Element) -> Option<u8> {
        self.elements().iter().position(|e| *e == element).map(|i| i as u8)
    }
}
