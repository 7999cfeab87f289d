//! View state owned by the runtime store.
//!
//! [`UxState`] is the aggregate root: one instance per session, replaced
//! wholesale on reset. Every nested type is a plain value so snapshots can be
//! cloned out of the store without aliasing its internals.
pub mod character;
pub mod economy;
pub mod fight;
pub mod menu;
pub mod operation;

pub use character::{CharacterClass, CharacterData, CombatState, Endurance, EquipmentData, Stats};
pub use economy::{
    ClaimableReward, ClaimsData, LeaderboardData, LeaderboardEntry, PoolEntry, PoolKind, PoolsData,
    RewardKind,
};
pub use fight::{EquipmentDropData, FightSummaryData, HealingData, ResurrectionData, RoundsData};
pub use menu::{MenuAction, MenuState};
pub use operation::{OperationKind, OperationState, OperationStatus, TxHash};

/// Status message shown before the session finishes initializing.
pub const INITIAL_STATUS_MESSAGE: &str = "Initializing...";

/// Aggregate view state for one player session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UxState {
    /// Session address, `0x`-prefixed.
    pub player_address: Option<String>,
    pub character: Option<CharacterData>,
    /// Always recomputed from character, operation and cooldown.
    pub menu: Option<MenuState>,
    pub operation: Option<OperationState>,
    pub pools: Option<PoolsData>,
    pub leaderboard: Option<LeaderboardData>,
    pub claims: Option<ClaimsData>,
    /// Seconds until the ledger allows another heal.
    pub healing_cooldown_remaining: u64,

    pub status_message: String,
    pub is_loading: bool,
    /// Session-level error slot.
    pub error: Option<String>,

    pub last_fight_summary: Option<FightSummaryData>,
    pub last_equipment_dropped: Option<EquipmentDropData>,
    pub last_healing: Option<HealingData>,
    pub last_resurrection: Option<ResurrectionData>,
}

impl UxState {
    /// Returns true while an operation is pending or processing.
    pub fn has_active_operation(&self) -> bool {
        self.operation.as_ref().is_some_and(|op| op.is_active)
    }

    /// Returns the character only when the ledger reports one.
    pub fn existing_character(&self) -> Option<&CharacterData> {
        self.character.as_ref().filter(|character| character.exists)
    }
}

impl Default for UxState {
    fn default() -> Self {
        Self {
            player_address: None,
            character: None,
            menu: None,
            operation: None,
            pools: None,
            leaderboard: None,
            claims: None,
            healing_cooldown_remaining: 0,
            status_message: INITIAL_STATUS_MESSAGE.to_string(),
            is_loading: true,
            error: None,
            last_fight_summary: None,
            last_equipment_dropped: None,
            last_healing: None,
            last_resurrection: None,
        }
    }
}
