//! Ledger abstraction traits.
//!
//! - Layer 1: CharacterLedger, CombatLedger, EconomyLedger, LedgerEvents
//! - Layer 2: LedgerClient (composite trait)

use async_trait::async_trait;

use game_core::{CharacterRecord, CombatState, TxHash};

use crate::error::LedgerError;
use crate::types::{EnemyStats, Eligibility, LogCallback, MerkleProof, PoolBalances};
use crate::watch::WatchHandle;

// ============================================================================
// Layer 1: Game Domain Traits
// ============================================================================

/// Character reads, fees and the character-family writes.
///
/// Fees and `value` arguments are in the smallest currency unit.
#[async_trait]
pub trait CharacterLedger: Send + Sync {
    /// Raw character record; `None` when the adapter cannot decode one.
    async fn get_character(&self, player: &str) -> Result<Option<CharacterRecord>, LedgerError>;

    /// Combat record; `enemy_id == 0` means no fight in progress.
    async fn get_combat_state(&self, player: &str) -> Result<Option<CombatState>, LedgerError>;

    async fn is_character_in_combat(&self, player: &str) -> Result<bool, LedgerError>;

    /// Seconds until the player may heal again.
    async fn healing_cooldown_remaining(&self, player: &str) -> Result<u64, LedgerError>;

    async fn can_heal(&self, player: &str) -> Result<Eligibility, LedgerError>;

    async fn can_resurrect(&self, player: &str) -> Result<Eligibility, LedgerError>;

    async fn creation_fee(&self) -> Result<u128, LedgerError>;

    async fn healing_fee(&self) -> Result<u128, LedgerError>;

    async fn resurrection_fee(&self) -> Result<u128, LedgerError>;

    async fn create_character(&self, class_id: u8, value: u128) -> Result<TxHash, LedgerError>;

    async fn heal_character(&self, value: u128) -> Result<TxHash, LedgerError>;

    async fn resurrect_character(&self, value: u128) -> Result<TxHash, LedgerError>;
}

/// Combat reads and writes.
#[async_trait]
pub trait CombatLedger: Send + Sync {
    async fn get_scaled_enemy_stats(
        &self,
        enemy_id: u8,
        enemy_level: u32,
    ) -> Result<EnemyStats, LedgerError>;

    async fn fight_enemy(&self, enemy_id: u8, enemy_level: u32) -> Result<TxHash, LedgerError>;

    async fn continue_fight(&self) -> Result<TxHash, LedgerError>;

    async fn flee_round(&self) -> Result<TxHash, LedgerError>;
}

/// Treasury pools, epochs, scores and merkle reward claims.
#[async_trait]
pub trait EconomyLedger: Send + Sync {
    async fn get_pool_balances(&self) -> Result<PoolBalances, LedgerError>;

    async fn current_epoch(&self) -> Result<u64, LedgerError>;

    async fn epoch_score(&self, player: &str, epoch: u64) -> Result<u128, LedgerError>;

    async fn total_player_count(&self) -> Result<u64, LedgerError>;

    async fn player_by_index(&self, index: u64) -> Result<String, LedgerError>;

    /// Seconds until the current epoch closes.
    async fn epoch_time_remaining(&self) -> Result<u64, LedgerError>;

    async fn merkle_proof_for_player(
        &self,
        player: &str,
        epoch: u64,
    ) -> Result<Option<MerkleProof>, LedgerError>;

    async fn is_claimed(&self, epoch: u64, index: u64) -> Result<bool, LedgerError>;

    async fn claim_prize(
        &self,
        epoch: u64,
        index: u64,
        amount: u128,
        proof: &[String],
    ) -> Result<TxHash, LedgerError>;
}

/// Contract log subscriptions.
///
/// Callbacks receive batches at-least-once; there is no ordering guarantee
/// across streams.
pub trait LedgerEvents: Send + Sync {
    fn watch_fight_summary(&self, callback: LogCallback) -> Result<WatchHandle, LedgerError>;

    fn watch_character_healed(&self, callback: LogCallback) -> Result<WatchHandle, LedgerError>;

    fn watch_character_resurrected(
        &self,
        callback: LogCallback,
    ) -> Result<WatchHandle, LedgerError>;

    fn watch_equipment_dropped(&self, callback: LogCallback) -> Result<WatchHandle, LedgerError>;
}

// ============================================================================
// Layer 2: Composite Trait
// ============================================================================

/// Everything the runtime needs from a ledger adapter.
pub trait LedgerClient:
    CharacterLedger + CombatLedger + EconomyLedger + LedgerEvents + Send + Sync
{
    /// Adapter name (e.g., "Conflux eSpace", "Mock").
    fn name(&self) -> &str;

    /// Network name (e.g., "mainnet", "testnet", "local").
    fn network(&self) -> &str;
}
