//! Pure domain logic and view types for the brawler client.
//!
//! `game-core` defines the canonical UX state (character, menu, operation and
//! economy snapshots), the validation rules that gate every action, the
//! derived-state calculators and the normalizer that turns loosely-typed
//! ledger payloads into strict domain records. Nothing in this crate performs
//! I/O; the runtime owns the store and the ledger collaborator and calls into
//! these functions.
pub mod derive;
pub mod error;
pub mod normalize;
pub mod state;
pub mod validation;

pub use derive::{
    CharacterRecord, MenuInputs, calculate_menu_state, character_from_record,
    character_status_message, class_name,
};
pub use error::{DomainError, ErrorSeverity};
pub use normalize::{
    FightOutcome, FightSummaryReport, RawRecord, enemy_name, fight_outcome, format_amount,
    normalize_equipment_drop, normalize_fight_summary, normalize_healing, normalize_resurrection,
    validate_fight_summary,
};
pub use state::{
    CharacterClass, CharacterData, ClaimableReward, ClaimsData, CombatState, Endurance,
    EquipmentData, EquipmentDropData, FightSummaryData, HealingData, LeaderboardData,
    LeaderboardEntry, MenuAction, MenuState, OperationKind, OperationState, OperationStatus,
    PoolEntry, PoolKind, PoolsData, ResurrectionData, RewardKind, RoundsData, Stats, TxHash,
    UxState,
};
pub use validation::{
    ValidationError, ValidationResult, can_claim_prize, can_continue_fight, can_create_character,
    can_fight, can_flee, can_heal, can_resurrect, can_start_operation, can_view_claims,
    can_view_leaderboard, can_view_pools,
};
