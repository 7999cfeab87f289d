//! Character view derivation from raw ledger records.

use crate::state::{CharacterClass, CharacterData, CombatState, Endurance, EquipmentData, Stats};

/// Character record as stored by the ledger.
///
/// A level of zero means the player never created a character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRecord {
    pub class_id: u8,
    pub level: u32,
    pub experience: u64,
    pub alive: bool,
    pub current_endurance: u32,
    pub max_endurance: u32,
    pub total_combat: u32,
    pub total_defense: u32,
    pub total_luck: u32,
    pub equipped_combat_bonus: u32,
    pub equipped_endurance_bonus: u32,
    pub equipped_defense_bonus: u32,
    pub equipped_luck_bonus: u32,
    pub total_kills: u32,
}

pub fn class_name(class_id: u8) -> String {
    CharacterClass::from_id(class_id)
        .map(|class| class.to_string())
        .unwrap_or_else(|| format!("Class {class_id}"))
}

/// Builds the character view.
///
/// `combat` is only consulted for living characters; a combat record with
/// `enemy_id == 0` means no fight is in progress.
pub fn character_from_record(
    record: &CharacterRecord,
    combat: Option<&CombatState>,
) -> CharacterData {
    let exists = record.level > 0;

    let mut current = record.current_endurance;
    if current > record.max_endurance {
        tracing::warn!(
            target: "game_core::derive",
            current,
            max = record.max_endurance,
            "current endurance exceeds maximum, capping"
        );
        current = record.max_endurance;
    }

    let combat_state = combat
        .filter(|_| exists && record.alive)
        .filter(|state| state.enemy_id > 0)
        .cloned();

    CharacterData {
        exists,
        is_alive: record.alive,
        class_id: record.class_id,
        class_name: class_name(record.class_id),
        level: record.level,
        experience: record.experience,
        endurance: Endurance::new(current, record.max_endurance),
        stats: Stats {
            combat: record.total_combat,
            defense: record.total_defense,
            luck: record.total_luck,
        },
        equipment: vec![EquipmentData {
            name: None,
            combat: record.equipped_combat_bonus,
            endurance: record.equipped_endurance_bonus,
            defense: record.equipped_defense_bonus,
            luck: record.equipped_luck_bonus,
        }],
        in_combat: combat_state.is_some(),
        combat_state,
        total_kills: record.total_kills,
    }
}

/// One-line status for the character panel.
pub fn character_status_message(character: Option<&CharacterData>) -> &'static str {
    let Some(character) = character.filter(|c| c.exists) else {
        return "Ready to create character";
    };

    if character.in_combat {
        "Character in combat"
    } else if !character.is_alive {
        "Character is dead - resurrection required"
    } else if character.endurance.percentage < 50.0 {
        "Character needs healing"
    } else {
        "Character ready for action"
    }
}
