//! Mock ledger client for tests and offline demos.
//!
//! Simulates the contract in memory: writes validate a small subset of the
//! contract rules (reverting with the real codes) and mutate the stored
//! records. Logs are never emitted implicitly; tests push them with
//! [`MockLedgerClient::emit`] to control interleaving.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use game_core::{CharacterRecord, CombatState, TxHash};

use crate::error::LedgerError;
use crate::traits::{CharacterLedger, CombatLedger, EconomyLedger, LedgerClient, LedgerEvents};
use crate::types::{
    EnemyStats, Eligibility, LedgerEventKind, LogBatch, LogCallback, MerkleProof, PoolBalances,
};
use crate::watch::WatchHandle;

pub const MOCK_CREATION_FEE: u128 = 10_000_000_000_000_000;
pub const MOCK_HEALING_FEE: u128 = 1_000_000_000_000_000;
pub const MOCK_RESURRECTION_FEE: u128 = 5_000_000_000_000_000;

type SharedCallback = Arc<dyn Fn(LogBatch) + Send + Sync>;

#[derive(Default)]
struct MockState {
    signer: String,
    characters: HashMap<String, CharacterRecord>,
    combat: HashMap<String, CombatState>,
    cooldowns: HashMap<String, u64>,
    pools: PoolBalances,
    epoch: u64,
    epoch_time_remaining: u64,
    scores: HashMap<(u64, String), u128>,
    players: Vec<String>,
    proofs: HashMap<(String, u64), MerkleProof>,
    claimed: HashSet<(u64, u64)>,
    failures: HashMap<&'static str, LedgerError>,
    calls: Vec<&'static str>,
    tx_counter: u64,
    watchers: HashMap<LedgerEventKind, Vec<(u64, SharedCallback)>>,
    next_watch_id: u64,
}

impl MockState {
    fn next_hash(&mut self) -> TxHash {
        self.tx_counter += 1;
        TxHash::new(format!("0x{:064x}", self.tx_counter))
    }

    fn signer_character(&self) -> Result<CharacterRecord, LedgerError> {
        self.characters
            .get(&self.signer)
            .filter(|record| record.level > 0)
            .cloned()
            .ok_or_else(|| LedgerError::reverted(1201))
    }

    fn in_combat(&self, player: &str) -> bool {
        self.combat.get(player).is_some_and(|state| state.enemy_id > 0)
    }
}

/// In-memory ledger. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct MockLedgerClient {
    inner: Arc<Mutex<MockState>>,
}

impl MockLedgerClient {
    /// Ledger whose writes are signed by `signer`.
    pub fn new(signer: impl Into<String>) -> Self {
        let state = MockState {
            signer: signer.into().to_lowercase(),
            epoch: 1,
            epoch_time_remaining: 86_400,
            ..MockState::default()
        };
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Logs the call and returns an injected failure, if one is armed.
    fn enter(&self, method: &'static str) -> Result<MutexGuard<'_, MockState>, LedgerError> {
        let mut state = self.state();
        state.calls.push(method);
        match state.failures.remove(method) {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    // ------------------------------------------------------------------
    // Fixture setup
    // ------------------------------------------------------------------

    pub fn set_character(&self, player: &str, record: CharacterRecord) {
        self.state().characters.insert(player.to_lowercase(), record);
    }

    pub fn set_combat_state(&self, player: &str, combat: Option<CombatState>) {
        let mut state = self.state();
        match combat {
            Some(combat) => state.combat.insert(player.to_lowercase(), combat),
            None => state.combat.remove(&player.to_lowercase()),
        };
    }

    pub fn set_healing_cooldown(&self, player: &str, seconds: u64) {
        self.state().cooldowns.insert(player.to_lowercase(), seconds);
    }

    pub fn set_pools(&self, pools: PoolBalances) {
        self.state().pools = pools;
    }

    pub fn set_epoch(&self, epoch: u64, time_remaining: u64) {
        let mut state = self.state();
        state.epoch = epoch;
        state.epoch_time_remaining = time_remaining;
    }

    /// Registers a player in index order with a score for `epoch`.
    pub fn add_player(&self, player: &str, epoch: u64, score: u128) {
        let mut state = self.state();
        let player = player.to_lowercase();
        if !state.players.contains(&player) {
            state.players.push(player.clone());
        }
        state.scores.insert((epoch, player), score);
    }

    pub fn set_merkle_proof(&self, player: &str, epoch: u64, proof: MerkleProof) {
        self.state().proofs.insert((player.to_lowercase(), epoch), proof);
    }

    pub fn mark_claimed(&self, epoch: u64, index: u64) {
        self.state().claimed.insert((epoch, index));
    }

    /// Makes the next call to `method` fail with `err`.
    pub fn fail_next(&self, method: &'static str, err: LedgerError) {
        self.state().failures.insert(method, err);
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state().calls.iter().filter(|call| **call == method).count()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn watcher_count(&self, kind: LedgerEventKind) -> usize {
        self.state().watchers.get(&kind).map_or(0, Vec::len)
    }

    pub fn character(&self, player: &str) -> Option<CharacterRecord> {
        self.state().characters.get(&player.to_lowercase()).cloned()
    }

    /// Delivers a batch to every subscriber of `kind`, outside the lock.
    pub fn emit(&self, kind: LedgerEventKind, batch: LogBatch) {
        let callbacks: Vec<SharedCallback> = self
            .state()
            .watchers
            .get(&kind)
            .map(|subs| subs.iter().map(|(_, cb)| Arc::clone(cb)).collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback(batch.clone());
        }
    }

    fn watch(
        &self,
        method: &'static str,
        kind: LedgerEventKind,
        callback: LogCallback,
    ) -> Result<WatchHandle, LedgerError> {
        let mut state = self.enter(method)?;
        state.next_watch_id += 1;
        let id = state.next_watch_id;
        state
            .watchers
            .entry(kind)
            .or_default()
            .push((id, Arc::from(callback)));
        drop(state);

        let inner = Arc::clone(&self.inner);
        Ok(WatchHandle::new(move || {
            let mut state = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(subs) = state.watchers.get_mut(&kind) {
                subs.retain(|(sub_id, _)| *sub_id != id);
            }
        }))
    }
}

#[async_trait]
impl CharacterLedger for MockLedgerClient {
    async fn get_character(&self, player: &str) -> Result<Option<CharacterRecord>, LedgerError> {
        let state = self.enter("get_character")?;
        // Unknown players read back as a zeroed record, like contract storage.
        Ok(Some(
            state
                .characters
                .get(&player.to_lowercase())
                .cloned()
                .unwrap_or_default(),
        ))
    }

    async fn get_combat_state(&self, player: &str) -> Result<Option<CombatState>, LedgerError> {
        let state = self.enter("get_combat_state")?;
        Ok(state.combat.get(&player.to_lowercase()).cloned())
    }

    async fn is_character_in_combat(&self, player: &str) -> Result<bool, LedgerError> {
        let state = self.enter("is_character_in_combat")?;
        Ok(state.in_combat(&player.to_lowercase()))
    }

    async fn healing_cooldown_remaining(&self, player: &str) -> Result<u64, LedgerError> {
        let state = self.enter("healing_cooldown_remaining")?;
        Ok(state.cooldowns.get(&player.to_lowercase()).copied().unwrap_or(0))
    }

    async fn can_heal(&self, player: &str) -> Result<Eligibility, LedgerError> {
        let state = self.enter("can_heal")?;
        let player = player.to_lowercase();
        let Some(record) = state.characters.get(&player).filter(|r| r.level > 0) else {
            return Ok(Eligibility::denied("Character does not exist"));
        };
        let eligibility = if !record.alive {
            Eligibility::denied("Character is not alive")
        } else if state.in_combat(&player) {
            Eligibility::denied("Character is in combat")
        } else if record.current_endurance >= record.max_endurance {
            Eligibility::denied("Already at full health")
        } else if state.cooldowns.get(&player).copied().unwrap_or(0) > 0 {
            Eligibility::denied("Healing on cooldown")
        } else {
            Eligibility::allowed()
        };
        Ok(eligibility)
    }

    async fn can_resurrect(&self, player: &str) -> Result<Eligibility, LedgerError> {
        let state = self.enter("can_resurrect")?;
        let eligibility = match state.characters.get(&player.to_lowercase()) {
            Some(record) if record.level > 0 && !record.alive => Eligibility::allowed(),
            Some(record) if record.level > 0 => Eligibility::denied("Character is already alive"),
            _ => Eligibility::denied("Character does not exist"),
        };
        Ok(eligibility)
    }

    async fn creation_fee(&self) -> Result<u128, LedgerError> {
        self.enter("creation_fee")?;
        Ok(MOCK_CREATION_FEE)
    }

    async fn healing_fee(&self) -> Result<u128, LedgerError> {
        self.enter("healing_fee")?;
        Ok(MOCK_HEALING_FEE)
    }

    async fn resurrection_fee(&self) -> Result<u128, LedgerError> {
        self.enter("resurrection_fee")?;
        Ok(MOCK_RESURRECTION_FEE)
    }

    async fn create_character(&self, class_id: u8, value: u128) -> Result<TxHash, LedgerError> {
        let mut state = self.enter("create_character")?;
        if value < MOCK_CREATION_FEE {
            return Err(LedgerError::reverted(1101));
        }
        if class_id > 3 {
            return Err(LedgerError::reverted(1207));
        }
        if state.signer_character().is_ok() {
            return Err(LedgerError::reverted(1206));
        }
        let record = CharacterRecord {
            class_id,
            level: 1,
            alive: true,
            current_endurance: 100,
            max_endurance: 100,
            total_combat: 10,
            total_defense: 10,
            total_luck: 5,
            ..CharacterRecord::default()
        };
        let signer = state.signer.clone();
        state.characters.insert(signer, record);
        Ok(state.next_hash())
    }

    async fn heal_character(&self, value: u128) -> Result<TxHash, LedgerError> {
        let mut state = self.enter("heal_character")?;
        let mut record = state.signer_character()?;
        if value < MOCK_HEALING_FEE {
            return Err(LedgerError::reverted(1101));
        }
        if !record.alive {
            return Err(LedgerError::reverted(1202));
        }
        let signer = state.signer.clone();
        if state.in_combat(&signer) {
            return Err(LedgerError::reverted(1204));
        }
        if record.current_endurance >= record.max_endurance {
            return Err(LedgerError::reverted(1102));
        }
        if state.cooldowns.get(&signer).copied().unwrap_or(0) > 0 {
            return Err(LedgerError::reverted(1103));
        }
        record.current_endurance = record.max_endurance;
        state.characters.insert(signer, record);
        Ok(state.next_hash())
    }

    async fn resurrect_character(&self, value: u128) -> Result<TxHash, LedgerError> {
        let mut state = self.enter("resurrect_character")?;
        let mut record = state.signer_character()?;
        if value < MOCK_RESURRECTION_FEE {
            return Err(LedgerError::reverted(1101));
        }
        if record.alive {
            return Err(LedgerError::reverted(1208));
        }
        record.alive = true;
        record.current_endurance = record.max_endurance;
        let signer = state.signer.clone();
        state.characters.insert(signer, record);
        Ok(state.next_hash())
    }
}

#[async_trait]
impl CombatLedger for MockLedgerClient {
    async fn get_scaled_enemy_stats(
        &self,
        enemy_id: u8,
        enemy_level: u32,
    ) -> Result<EnemyStats, LedgerError> {
        self.enter("get_scaled_enemy_stats")?;
        if enemy_id == 0 || enemy_id > 15 {
            return Err(LedgerError::reverted(1601));
        }
        let base = u32::from(enemy_id);
        Ok(EnemyStats {
            combat: base * 2 + enemy_level,
            endurance: base * 10 + enemy_level * 5,
            defense: base + enemy_level,
            luck: base,
            xp_reward: base * 10 * enemy_level,
        })
    }

    async fn fight_enemy(&self, enemy_id: u8, enemy_level: u32) -> Result<TxHash, LedgerError> {
        let mut state = self.enter("fight_enemy")?;
        let record = state.signer_character()?;
        if !record.alive {
            return Err(LedgerError::reverted(1202));
        }
        let signer = state.signer.clone();
        if state.in_combat(&signer) {
            return Err(LedgerError::reverted(1204));
        }
        if enemy_level == 0 {
            return Err(LedgerError::reverted(1301));
        }
        let combat = CombatState {
            enemy_id,
            enemy_level,
            enemy_current_endurance: 40,
            player_current_endurance: record.current_endurance,
            rounds_elapsed: 0,
            player_start_endurance: record.current_endurance,
            enemy_start_endurance: 40,
            last_updated: state.tx_counter + 1,
            difficulty_multiplier: 1.0,
        };
        state.combat.insert(signer, combat);
        Ok(state.next_hash())
    }

    async fn continue_fight(&self) -> Result<TxHash, LedgerError> {
        let mut state = self.enter("continue_fight")?;
        let signer = state.signer.clone();
        let marker = state.tx_counter + 1;
        let Some(combat) = state.combat.get_mut(&signer).filter(|c| c.enemy_id > 0) else {
            return Err(LedgerError::reverted(1205));
        };
        combat.rounds_elapsed += 1;
        combat.last_updated = marker;
        Ok(state.next_hash())
    }

    async fn flee_round(&self) -> Result<TxHash, LedgerError> {
        let mut state = self.enter("flee_round")?;
        let signer = state.signer.clone();
        if !state.in_combat(&signer) {
            return Err(LedgerError::reverted(1205));
        }
        state.combat.remove(&signer);
        Ok(state.next_hash())
    }
}

#[async_trait]
impl EconomyLedger for MockLedgerClient {
    async fn get_pool_balances(&self) -> Result<PoolBalances, LedgerError> {
        let state = self.enter("get_pool_balances")?;
        Ok(state.pools.clone())
    }

    async fn current_epoch(&self) -> Result<u64, LedgerError> {
        let state = self.enter("current_epoch")?;
        Ok(state.epoch)
    }

    async fn epoch_score(&self, player: &str, epoch: u64) -> Result<u128, LedgerError> {
        let state = self.enter("epoch_score")?;
        Ok(state
            .scores
            .get(&(epoch, player.to_lowercase()))
            .copied()
            .unwrap_or(0))
    }

    async fn total_player_count(&self) -> Result<u64, LedgerError> {
        let state = self.enter("total_player_count")?;
        Ok(state.players.len() as u64)
    }

    async fn player_by_index(&self, index: u64) -> Result<String, LedgerError> {
        let state = self.enter("player_by_index")?;
        usize::try_from(index)
            .ok()
            .and_then(|index| state.players.get(index))
            .cloned()
            .ok_or_else(|| LedgerError::reverted(1403))
    }

    async fn epoch_time_remaining(&self) -> Result<u64, LedgerError> {
        let state = self.enter("epoch_time_remaining")?;
        Ok(state.epoch_time_remaining)
    }

    async fn merkle_proof_for_player(
        &self,
        player: &str,
        epoch: u64,
    ) -> Result<Option<MerkleProof>, LedgerError> {
        let state = self.enter("merkle_proof_for_player")?;
        Ok(state.proofs.get(&(player.to_lowercase(), epoch)).cloned())
    }

    async fn is_claimed(&self, epoch: u64, index: u64) -> Result<bool, LedgerError> {
        let state = self.enter("is_claimed")?;
        Ok(state.claimed.contains(&(epoch, index)))
    }

    async fn claim_prize(
        &self,
        epoch: u64,
        index: u64,
        amount: u128,
        proof: &[String],
    ) -> Result<TxHash, LedgerError> {
        let mut state = self.enter("claim_prize")?;
        if state.claimed.contains(&(epoch, index)) {
            return Err(LedgerError::reverted(1711));
        }
        let expected = state.proofs.get(&(state.signer.clone(), epoch));
        let valid = expected.is_some_and(|leaf| {
            leaf.index == index && leaf.amount == amount && leaf.proof == proof
        });
        if !valid {
            return Err(LedgerError::reverted(1719));
        }
        state.claimed.insert((epoch, index));
        Ok(state.next_hash())
    }
}

impl LedgerEvents for MockLedgerClient {
    fn watch_fight_summary(&self, callback: LogCallback) -> Result<WatchHandle, LedgerError> {
        self.watch("watch_fight_summary", LedgerEventKind::FightSummary, callback)
    }

    fn watch_character_healed(&self, callback: LogCallback) -> Result<WatchHandle, LedgerError> {
        self.watch("watch_character_healed", LedgerEventKind::CharacterHealed, callback)
    }

    fn watch_character_resurrected(
        &self,
        callback: LogCallback,
    ) -> Result<WatchHandle, LedgerError> {
        self.watch("watch_character_resurrected", LedgerEventKind::CharacterResurrected, callback)
    }

    fn watch_equipment_dropped(&self, callback: LogCallback) -> Result<WatchHandle, LedgerError> {
        self.watch("watch_equipment_dropped", LedgerEventKind::EquipmentDropped, callback)
    }
}

impl LedgerClient for MockLedgerClient {
    fn name(&self) -> &str {
        "MockLedger"
    }

    fn network(&self) -> &str {
        "mock-network"
    }
}
