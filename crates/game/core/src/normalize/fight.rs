//! Fight summary and equipment drop normalization.

use crate::state::{EquipmentDropData, FightSummaryData, HealingData, ResurrectionData, RoundsData};

use super::coerce::RawRecord;
use super::enemies::{ENEMY_NAMES, enemy_name};

/// Highest enemy level the ledger scales to.
const MAX_SUMMARY_ENEMY_LEVEL: i64 = 250;

/// Builds the canonical summary from a raw fight log.
///
/// `roundNumbers` decides the round count; the four per-round arrays are
/// truncated or padded (zero / `false`) to that count so the result always
/// satisfies [`RoundsData::is_consistent`].
pub fn normalize_fight_summary(raw: &RawRecord, drop: Option<&RawRecord>) -> FightSummaryData {
    let victory = raw.bool("victory");
    let unresolved = raw.bool("unresolved");
    let enemy_id = raw.i64("enemyId");

    let multiplier = raw.f64("difficultyMultiplier");
    let difficulty_multiplier = if multiplier > 0.0 { multiplier } else { 1.0 };

    FightSummaryData {
        enemy_id,
        enemy_level: raw.i64("enemyLevel"),
        enemy_name: enemy_name(enemy_id),
        rounds_elapsed: raw.i64("roundsElapsed"),
        victory,
        unresolved,
        player_died: !victory && !unresolved,
        enemy_died: victory,
        xp_gained: raw.opt_i64("xpGained"),
        equipment_dropped: drop.map(|drop| normalize_equipment_drop(drop).equipment()),
        player_health_remaining: raw.i64("playerEndurance"),
        enemy_health_remaining: raw.i64("enemyEndurance"),
        player_start_endurance: raw.i64("playerStartEndurance"),
        enemy_start_endurance: raw.i64("enemyStartEndurance"),
        rounds: normalize_rounds(raw),
        difficulty_multiplier,
        transaction: None,
    }
}

fn normalize_rounds(raw: &RawRecord) -> RoundsData {
    let numbers = raw.i64_list("roundNumbers");
    let count = numbers.len();

    RoundsData {
        count,
        numbers,
        player_damages: fit("playerDamages", raw.i64_list("playerDamages"), count),
        enemy_damages: fit("enemyDamages", raw.i64_list("enemyDamages"), count),
        player_criticals: fit("playerCriticals", raw.bool_list("playerCriticals"), count),
        enemy_criticals: fit("enemyCriticals", raw.bool_list("enemyCriticals"), count),
    }
}

fn fit<T: Default + Clone>(field: &str, mut values: Vec<T>, count: usize) -> Vec<T> {
    if values.len() != count {
        tracing::warn!(
            target: "game_core::normalize",
            field,
            len = values.len(),
            count,
            "round array length differs from round count"
        );
        values.resize(count, T::default());
    }
    values
}

/// Normalizes an `EquipmentDropped` log.
///
/// Missing bonuses default to four zeros.
pub fn normalize_equipment_drop(raw: &RawRecord) -> EquipmentDropData {
    let mut bonuses = raw.i64_list("bonuses");
    if bonuses.is_empty() {
        bonuses = vec![0; 4];
    }
    let description = raw
        .string("description")
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| describe_bonuses(&bonuses));

    EquipmentDropData {
        bonuses,
        description,
        transaction: None,
    }
}

fn describe_bonuses(bonuses: &[i64]) -> String {
    const LABELS: [&str; 4] = ["Combat", "Endurance", "Defense", "Luck"];
    let parts = LABELS
        .iter()
        .zip(bonuses)
        .filter(|(_, value)| **value != 0)
        .map(|(label, value)| format!("{label} +{value}"))
        .collect::<Vec<_>>();

    if parts.is_empty() {
        "Equipment drop".to_string()
    } else {
        format!("Equipment drop: {}", parts.join(", "))
    }
}

/// Normalizes a `CharacterHealed` log.
pub fn normalize_healing(raw: &RawRecord) -> HealingData {
    HealingData {
        new_endurance: endurance_field(raw),
        cost: raw.u128("cost"),
    }
}

/// Normalizes a `CharacterResurrected` log.
pub fn normalize_resurrection(raw: &RawRecord) -> ResurrectionData {
    ResurrectionData {
        new_endurance: endurance_field(raw),
        cost: raw.u128("cost"),
    }
}

fn endurance_field(raw: &RawRecord) -> u32 {
    u32::try_from(raw.i64("newEndurance").max(0)).unwrap_or(u32::MAX)
}

/// Outcome of [`validate_fight_summary`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FightSummaryReport {
    pub errors: Vec<String>,
}

impl FightSummaryReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Lists every problem with a summary without failing.
pub fn validate_fight_summary(data: &FightSummaryData) -> FightSummaryReport {
    let mut errors = Vec::new();

    let known_ids = 0..ENEMY_NAMES.len() as i64;
    if !known_ids.contains(&data.enemy_id) {
        errors.push(format!("Invalid enemy ID: {}", data.enemy_id));
    }
    if !(1..=MAX_SUMMARY_ENEMY_LEVEL).contains(&data.enemy_level) {
        errors.push(format!("Invalid enemy level: {}", data.enemy_level));
    }
    if data.rounds_elapsed < 0 {
        errors.push(format!("Invalid rounds elapsed: {}", data.rounds_elapsed));
    }
    if data.player_health_remaining < 0 {
        errors.push(format!(
            "Invalid player health: {}",
            data.player_health_remaining
        ));
    }
    if data.enemy_health_remaining < 0 {
        errors.push(format!(
            "Invalid enemy health: {}",
            data.enemy_health_remaining
        ));
    }

    let rounds = &data.rounds;
    let arrays = [
        ("round numbers", rounds.numbers.len()),
        ("player damages", rounds.player_damages.len()),
        ("enemy damages", rounds.enemy_damages.len()),
        ("player criticals", rounds.player_criticals.len()),
        ("enemy criticals", rounds.enemy_criticals.len()),
    ];
    for (name, len) in arrays {
        if len != rounds.count {
            errors.push(format!(
                "Round count mismatch ({name}): {} vs {len}",
                rounds.count
            ));
        }
    }

    FightSummaryReport { errors }
}
