//! Snapshots built from ledger fight, drop, healing and resurrection events.

use super::character::EquipmentData;
use super::operation::TxHash;

/// Per-round combat log. Every vector has exactly `count` entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundsData {
    pub count: usize,
    pub numbers: Vec<i64>,
    pub player_damages: Vec<i64>,
    pub enemy_damages: Vec<i64>,
    pub player_criticals: Vec<bool>,
    pub enemy_criticals: Vec<bool>,
}

impl RoundsData {
    pub fn is_consistent(&self) -> bool {
        [
            self.numbers.len(),
            self.player_damages.len(),
            self.enemy_damages.len(),
            self.player_criticals.len(),
            self.enemy_criticals.len(),
        ]
        .iter()
        .all(|len| *len == self.count)
    }
}

/// Canonical record of one resolved (or timed out) fight.
///
/// Numeric fields are signed so that corrupt payloads stay representable and
/// can be reported by [`crate::validate_fight_summary`]. The only mutation
/// after creation is attaching a later equipment drop.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FightSummaryData {
    pub enemy_id: i64,
    pub enemy_level: i64,
    pub enemy_name: String,
    pub rounds_elapsed: i64,
    pub victory: bool,
    pub unresolved: bool,
    pub player_died: bool,
    pub enemy_died: bool,
    pub xp_gained: Option<i64>,
    pub equipment_dropped: Option<EquipmentData>,
    pub player_health_remaining: i64,
    pub enemy_health_remaining: i64,
    pub player_start_endurance: i64,
    pub enemy_start_endurance: i64,
    pub rounds: RoundsData,
    pub difficulty_multiplier: f64,
    /// Transaction that emitted the summary, used to pair equipment drops.
    pub transaction: Option<TxHash>,
}

impl FightSummaryData {
    /// Returns a copy with the drop attached; outcome fields are untouched.
    pub fn with_equipment_drop(&self, equipment: EquipmentData) -> Self {
        Self {
            equipment_dropped: Some(equipment),
            ..self.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentDropData {
    /// Raw bonuses in ledger order: combat, endurance, defense, luck.
    pub bonuses: Vec<i64>,
    pub description: String,
    pub transaction: Option<TxHash>,
}

impl EquipmentDropData {
    pub fn equipment(&self) -> EquipmentData {
        let bonus = |index: usize| {
            self.bonuses
                .get(index)
                .copied()
                .map(|value| u32::try_from(value).unwrap_or(0))
                .unwrap_or(0)
        };
        EquipmentData {
            name: None,
            combat: bonus(0),
            endurance: bonus(1),
            defense: bonus(2),
            luck: bonus(3),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealingData {
    pub new_endurance: u32,
    /// Fee paid in the smallest currency unit.
    pub cost: u128,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResurrectionData {
    pub new_endurance: u32,
    pub cost: u128,
}
