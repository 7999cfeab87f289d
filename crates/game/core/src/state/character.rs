//! Character view types.

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Playable classes as numbered by the ledger.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterClass {
    Warrior = 0,
    Guardian = 1,
    Rogue = 2,
    Mage = 3,
}

impl CharacterClass {
    pub const MAX_ID: u8 = 3;

    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Warrior),
            1 => Some(Self::Guardian),
            2 => Some(Self::Rogue),
            3 => Some(Self::Mage),
            _ => None,
        }
    }
}

/// Current and maximum endurance with the derived percentage.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endurance {
    pub current: u32,
    pub max: u32,
    /// `current / max * 100`, or 0 when `max` is 0.
    pub percentage: f64,
}

impl Endurance {
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current,
            max,
            percentage: percentage_of(current, max),
        }
    }
}

pub(crate) fn percentage_of(current: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        f64::from(current) / f64::from(max) * 100.0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub combat: u32,
    pub defense: u32,
    pub luck: u32,
}

/// Equipment bonuses, either equipped or freshly dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentData {
    pub name: Option<String>,
    pub combat: u32,
    pub endurance: u32,
    pub defense: u32,
    pub luck: u32,
}

impl EquipmentData {
    pub fn is_empty(&self) -> bool {
        self.combat == 0 && self.endurance == 0 && self.defense == 0 && self.luck == 0
    }
}

/// Ongoing fight as reported by the ledger.
///
/// Created when a fight begins, replaced every round and cleared once the
/// fight ends by victory, defeat or flight.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    pub enemy_id: u8,
    pub enemy_level: u32,
    pub enemy_current_endurance: u32,
    pub player_current_endurance: u32,
    pub rounds_elapsed: u32,
    pub player_start_endurance: u32,
    pub enemy_start_endurance: u32,
    /// Monotonic ledger marker, bumped every round.
    pub last_updated: u64,
    pub difficulty_multiplier: f64,
}

/// Derived character view.
///
/// When `exists` is false every other field holds a default and carries no
/// meaning.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterData {
    pub exists: bool,
    pub is_alive: bool,
    pub class_id: u8,
    pub class_name: String,
    pub level: u32,
    pub experience: u64,
    pub endurance: Endurance,
    pub stats: Stats,
    pub equipment: Vec<EquipmentData>,
    pub in_combat: bool,
    pub combat_state: Option<CombatState>,
    pub total_kills: u32,
}
