//! Validation engine.
//!
//! Every check is a pure function of [`crate::UxState`] (plus the candidate
//! input) and returns the first failing reason. The runtime runs these before
//! any ledger call; a rejection never touches the store.
//!
//! - [`rules`]: per-action state predicates
//! - [`input`]: shape checks on user input
//! - [`consistency`]: whole-state sanity checks used for diagnostics
pub mod consistency;
pub mod input;
pub mod rules;

pub use consistency::{
    ConsistencyError, validate_character_state, validate_menu_consistency,
    validate_operation_state, validation_errors, validation_message,
};
pub use input::{
    MAX_ENEMY_ID, MAX_ENEMY_LEVEL, MIN_ENEMY_ID, validate_character_class, validate_enemy_id,
    validate_enemy_level, validate_merkle_proof, validate_player_address,
};
pub use rules::{
    can_claim_prize, can_continue_fight, can_create_character, can_fight, can_flee, can_heal,
    can_resurrect, can_start_operation, can_view_claims, can_view_leaderboard, can_view_pools,
};

use crate::error::{DomainError, ErrorSeverity};

pub type ValidationResult = Result<(), ValidationError>;

/// Reasons an action is refused before it reaches the ledger.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    // Character existence
    #[error("Character already exists")]
    CharacterAlreadyExists,
    #[error("Character does not exist")]
    CharacterMissing,

    // Alive / dead
    #[error("Character is dead")]
    CharacterDead,
    #[error("Character is already alive")]
    CharacterAlive,

    // Combat
    #[error("Character is already in combat")]
    AlreadyInCombat,
    #[error("Character is in combat")]
    InCombat,
    #[error("Character is not in combat")]
    NotInCombat,

    // Healing
    #[error("Character is already at full health")]
    FullHealth,
    #[error("Healing cooldown: {0}s remaining")]
    HealingCooldown(u64),

    // Claims
    #[error("Reward is not claimable")]
    RewardNotClaimable,
    #[error("Reward has already been claimed")]
    RewardAlreadyClaimed,

    // Ledger-side eligibility query answered no
    #[error("{0}")]
    LedgerRefused(String),

    // Session
    #[error("Another operation is in progress")]
    OperationInProgress,
    #[error("System is initializing")]
    SystemInitializing,
    #[error("System error occurred")]
    SystemError,

    // Input shape
    #[error("Player address is required")]
    PlayerAddressMissing,
    #[error("Player address must start with 0x")]
    PlayerAddressPrefix,
    #[error("Player address must be 42 characters long")]
    PlayerAddressLength,
    #[error("Player address must be a valid hexadecimal string")]
    PlayerAddressHex,
    #[error("Character class must be between 0 and {max}", max = crate::CharacterClass::MAX_ID)]
    InvalidCharacterClass(u8),
    #[error("Enemy ID must be between {min} and {max}", min = MIN_ENEMY_ID, max = MAX_ENEMY_ID)]
    InvalidEnemyId(u8),
    #[error("Enemy level must be between 1 and {max}", max = MAX_ENEMY_LEVEL)]
    InvalidEnemyLevel(u32),
    #[error("Merkle proof element {0} is not a 32-byte hex string")]
    InvalidProofElement(usize),
}

impl ValidationError {
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl DomainError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CharacterAlreadyExists => "character_already_exists",
            Self::CharacterMissing => "character_missing",
            Self::CharacterDead => "character_dead",
            Self::CharacterAlive => "character_alive",
            Self::AlreadyInCombat => "already_in_combat",
            Self::InCombat => "in_combat",
            Self::NotInCombat => "not_in_combat",
            Self::FullHealth => "full_health",
            Self::HealingCooldown(_) => "healing_cooldown",
            Self::RewardNotClaimable => "reward_not_claimable",
            Self::RewardAlreadyClaimed => "reward_already_claimed",
            Self::LedgerRefused(_) => "ledger_refused",
            Self::OperationInProgress => "operation_in_progress",
            Self::SystemInitializing => "system_initializing",
            Self::SystemError => "system_error",
            Self::PlayerAddressMissing => "player_address_missing",
            Self::PlayerAddressPrefix => "player_address_prefix",
            Self::PlayerAddressLength => "player_address_length",
            Self::PlayerAddressHex => "player_address_hex",
            Self::InvalidCharacterClass(_) => "invalid_character_class",
            Self::InvalidEnemyId(_) => "invalid_enemy_id",
            Self::InvalidEnemyLevel(_) => "invalid_enemy_level",
            Self::InvalidProofElement(_) => "invalid_proof_element",
        }
    }
}
