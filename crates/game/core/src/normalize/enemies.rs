//! Canonical enemy names keyed by ledger enemy id.

/// Index 0 is reserved for "no enemy".
pub const ENEMY_NAMES: [&str; 16] = [
    "Unknown",
    "Goblin Warrior",
    "Orc Berserker",
    "Shadow Assassin",
    "Ice Troll",
    "Fire Elemental",
    "Stone Golem",
    "Dark Wizard",
    "Skeleton Knight",
    "Dragon Whelp",
    "Void Stalker",
    "Ancient Dragon",
    "Crystal Beast",
    "Shadow Demon",
    "Frost Giant",
    "Lava Dragon",
];

pub fn enemy_name(enemy_id: i64) -> String {
    usize::try_from(enemy_id)
        .ok()
        .and_then(|index| ENEMY_NAMES.get(index))
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| format!("Enemy {enemy_id}"))
}
