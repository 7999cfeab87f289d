//! High-level runtime orchestrator.
//!
//! The runtime owns the store, the event bus, the event handler and the
//! ingest worker, and exposes the action surface hosts drive the game
//! through. Every action returns an [`OperationResult`]; the full state is
//! always available through the read accessors or [`Runtime::subscribe`].

use std::sync::Arc;

use strum::IntoEnumIterator;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use client_ledger_core::{
    EnemyStats, LedgerClient, LedgerError, LedgerEventKind, LogCallback, WatchHandle,
};
use game_core::normalize::shorten_address;
use game_core::validation::{
    validate_enemy_id, validate_enemy_level, validate_player_address, validation_message,
};
use game_core::{
    CharacterData, ClaimsData, DomainError, FightSummaryData, LeaderboardData, MenuState,
    OperationState, PoolsData, TxHash, UxState, ValidationError, character_status_message,
};

use crate::api::{OperationResult, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{DomainEvent, EventBus, EventEnvelope, EventKind, ListenerResult, Subscription};
use crate::handlers::EventHandler;
use crate::operations::{
    CharacterOperations, ClaimsOperations, CombatOperations, LeaderboardOperations,
    OperationContext, PoolsOperations,
};
use crate::state::{StateStore, UxStatePatch};
use crate::workers::{IngestMessage, IngestWorker};

/// Main runtime that orchestrates one player session against the ledger.
///
/// Design: the store is the single source of truth. Operations write to it
/// directly; ledger logs reach it through the ingest worker and the event
/// handler. Store changes are re-published on the bus as `StateChanged`.
pub struct Runtime {
    ctx: OperationContext,

    // Action families
    character: CharacterOperations,
    combat: CombatOperations,
    pools: PoolsOperations,
    leaderboard: LeaderboardOperations,
    claims: ClaimsOperations,

    // Listeners owned by the runtime
    handler: Option<EventHandler>,
    state_events: Option<Subscription>,

    // Ledger log streams and their worker
    watches: Vec<WatchHandle>,
    ingest_tx: Option<mpsc::UnboundedSender<IngestMessage>>,
    ingest_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Starts the ledger log streams, loads the pools and computes the menu.
    ///
    /// Connects the configured player afterwards, when one is set. Failures
    /// land in the store's error slot and on the bus as `ErrorOccurred`.
    pub async fn initialize(&mut self) -> Result<()> {
        info!(
            target: "runtime",
            ledger = self.ctx.ledger.name(),
            network = self.ctx.ledger.network(),
            "initializing runtime"
        );
        self.ctx.store.set_status_message("Connecting to ledger...");

        if let Err(err) = self.start_watchers() {
            return Err(self.report(err.into()));
        }

        self.ctx.store.set_loading(false);
        if let Err(err) = self.pools.load_pools().await {
            return Err(self.report(err));
        }

        self.ctx.store.refresh_menu();
        self.ctx.store.set_status_message("Ready for action");

        if let Some(address) = self.ctx.config.player_address.clone() {
            self.connect_player(&address).await?;
        }
        Ok(())
    }

    /// Makes `address` the session player and loads its view.
    ///
    /// The character is loaded first; its failure is session-level. The
    /// leaderboard and claims follow one after the other so the single
    /// active operation rule holds; their failures are already recorded by
    /// their own operations and do not fail the connection.
    pub async fn connect_player(&self, address: &str) -> Result<Option<CharacterData>> {
        validate_player_address(address)?;
        if self.ctx.store.with_state(UxState::has_active_operation) {
            return Err(ValidationError::OperationInProgress.into());
        }

        info!(target: "runtime", player = %shorten_address(address), "connecting player");
        self.ctx.store.batch_update(
            UxStatePatch::new()
                .player_address(Some(address.to_string()))
                .character(None)
                .healing_cooldown_remaining(0)
                .leaderboard(None)
                .claims(None)
                .error(None)
                .status_message("Loading character..."),
        )?;

        let character = match self.ctx.refresh_character().await {
            Ok(character) => character,
            Err(err) => return Err(self.report(err.into())),
        };

        if let Err(err) = self.leaderboard.load_leaderboard().await {
            warn!(target: "runtime", error = %err, "leaderboard unavailable");
        }
        if character.is_some()
            && let Err(err) = self.claims.load_claims().await
        {
            warn!(target: "runtime", error = %err, "claims unavailable");
        }

        self.ctx
            .store
            .set_status_message(character_status_message(character.as_ref()));
        Ok(character)
    }

    /// Re-reads the character and every view, one after the other.
    ///
    /// Every read is attempted; the first failure is reported and returned.
    pub async fn refresh_all(&self) -> Result<()> {
        let mut first_error: Option<RuntimeError> = None;
        let mut keep = |result: Result<()>| {
            if let Err(err) = result
                && first_error.is_none()
            {
                first_error = Some(err);
            }
        };

        let has_player = self.ctx.store.player_address().is_some();
        if has_player {
            keep(self.ctx.refresh_character().await.map(drop).map_err(Into::into));
        }
        keep(self.pools.load_pools().await.map(drop));
        keep(self.leaderboard.load_leaderboard().await.map(drop));
        if has_player && self.ctx.store.character().is_some() {
            keep(self.claims.load_claims().await.map(drop));
        }

        match first_error {
            Some(err) => Err(self.report(err)),
            None => Ok(()),
        }
    }

    pub fn clear_error(&self) {
        self.ctx.store.set_error(None);
        let character = self.ctx.store.character();
        self.ctx
            .store
            .set_status_message(character_status_message(character.as_ref()));
    }

    /// Drops the session and every cached view. Listeners stay registered.
    pub fn reset(&self) {
        self.ctx.store.reset();
    }

    /// Waits until every ledger log delivered so far has been handled.
    pub async fn flush_events(&self) {
        let Some(tx) = &self.ingest_tx else {
            return;
        };
        let (reply, done) = oneshot::channel();
        if tx.send(IngestMessage::Flush { reply }).is_err() {
            return;
        }
        if done.await.is_err() {
            debug!(target: "runtime", "ingest worker stopped before flushing");
        }
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(mut self) -> Result<()> {
        self.watches.clear();
        drop(self.ingest_tx.take());

        if let Some(handle) = self.ingest_handle.take() {
            handle.await.map_err(RuntimeError::WorkerJoin)?;
        }

        self.release_listeners();
        info!(target: "runtime", "runtime stopped");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    pub async fn create_character(&self, class_id: u8) -> OperationResult<TxHash> {
        self.character.create_character(class_id).await.into()
    }

    pub async fn heal_character(&self) -> OperationResult<TxHash> {
        self.character.heal_character().await.into()
    }

    pub async fn resurrect_character(&self) -> OperationResult<TxHash> {
        self.character.resurrect_character().await.into()
    }

    pub async fn fight_enemy(&self, enemy_id: u8, enemy_level: u32) -> OperationResult<TxHash> {
        self.combat.fight_enemy(enemy_id, enemy_level).await.into()
    }

    pub async fn continue_fight(&self) -> OperationResult<TxHash> {
        self.combat.continue_fight().await.into()
    }

    pub async fn flee_round(&self) -> OperationResult<TxHash> {
        self.combat.flee_round().await.into()
    }

    pub async fn claim_prize(
        &self,
        epoch: u64,
        index: u64,
        amount: u128,
        proof: Vec<String>,
    ) -> OperationResult<TxHash> {
        self.claims
            .claim_prize(epoch, index, amount, proof)
            .await
            .into()
    }

    pub async fn load_pools(&self) -> OperationResult<PoolsData> {
        self.pools.load_pools().await.into()
    }

    pub async fn load_leaderboard(&self) -> OperationResult<LeaderboardData> {
        self.leaderboard.load_leaderboard().await.into()
    }

    pub async fn load_claims(&self) -> OperationResult<ClaimsData> {
        self.claims.load_claims().await.into()
    }

    /// Enemy stats scaled to `enemy_level`, read straight from the ledger.
    pub async fn scaled_enemy_stats(&self, enemy_id: u8, enemy_level: u32) -> Result<EnemyStats> {
        validate_enemy_id(enemy_id)?;
        validate_enemy_level(enemy_level)?;
        Ok(self
            .ctx
            .ledger
            .get_scaled_enemy_stats(enemy_id, enemy_level)
            .await?)
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn store(&self) -> &StateStore {
        &self.ctx.store
    }

    pub fn bus(&self) -> &EventBus {
        &self.ctx.bus
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.ctx.config
    }

    pub fn state(&self) -> UxState {
        self.ctx.store.snapshot()
    }

    pub fn player_address(&self) -> Option<String> {
        self.ctx.store.player_address()
    }

    pub fn character(&self) -> Option<CharacterData> {
        self.ctx.store.character()
    }

    pub fn menu(&self) -> Option<MenuState> {
        self.ctx.store.menu()
    }

    pub fn operation(&self) -> Option<OperationState> {
        self.ctx.store.operation()
    }

    pub fn pools(&self) -> Option<PoolsData> {
        self.ctx.store.pools()
    }

    pub fn leaderboard(&self) -> Option<LeaderboardData> {
        self.ctx.store.leaderboard()
    }

    pub fn claims(&self) -> Option<ClaimsData> {
        self.ctx.store.claims()
    }

    pub fn last_fight_summary(&self) -> Option<FightSummaryData> {
        self.ctx.store.last_fight_summary()
    }

    pub fn status_message(&self) -> String {
        self.ctx.store.status_message()
    }

    pub fn error(&self) -> Option<String> {
        self.ctx.store.error()
    }

    pub fn is_loading(&self) -> bool {
        self.ctx.store.is_loading()
    }

    /// `System is ready` or every consistency problem of the current state.
    pub fn validation_message(&self) -> String {
        self.ctx.store.with_state(validation_message)
    }

    pub fn ledger_name(&self) -> &str {
        self.ctx.ledger.name()
    }

    pub fn network(&self) -> &str {
        self.ctx.ledger.network()
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Registers a state listener; see [`StateStore::subscribe`].
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UxState) -> ListenerResult + Send + Sync + 'static,
    {
        self.ctx.store.subscribe(listener)
    }

    /// Registers an event listener; see [`EventBus::on`].
    pub fn on<F>(&self, kind: EventKind, listener: F) -> Subscription
    where
        F: Fn(&EventEnvelope) -> ListenerResult + Send + Sync + 'static,
    {
        self.ctx.bus.on(kind, listener)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn start_watchers(&mut self) -> std::result::Result<(), LedgerError> {
        if !self.watches.is_empty() {
            return Ok(());
        }
        let Some(tx) = self.ingest_tx.clone() else {
            return Ok(());
        };

        for kind in LedgerEventKind::iter() {
            let sender = tx.clone();
            let callback: LogCallback = Box::new(move |batch| {
                if sender.send(IngestMessage::Logs { kind, batch }).is_err() {
                    trace!(target: "runtime::ingest", stream = %kind, "batch after shutdown dropped");
                }
            });
            let ledger = &self.ctx.ledger;
            let handle = match kind {
                LedgerEventKind::FightSummary => ledger.watch_fight_summary(callback),
                LedgerEventKind::CharacterHealed => ledger.watch_character_healed(callback),
                LedgerEventKind::CharacterResurrected => {
                    ledger.watch_character_resurrected(callback)
                }
                LedgerEventKind::EquipmentDropped => ledger.watch_equipment_dropped(callback),
            }?;
            self.watches.push(handle);
        }

        debug!(target: "runtime", streams = self.watches.len(), "ledger streams watched");
        Ok(())
    }

    /// Records a session-level failure and hands it back.
    fn report(&self, err: RuntimeError) -> RuntimeError {
        warn!(target: "runtime", error = %err, code = err.error_code(), "session error");
        self.ctx.bus.emit(DomainEvent::ErrorOccurred {
            message: err.to_string(),
            code: Some(err.error_code()),
        });
        err
    }

    fn release_listeners(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.detach();
        }
        if let Some(subscription) = self.state_events.take() {
            subscription.unsubscribe();
        }
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.watches.clear();
        self.release_listeners();
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    ledger: Option<Arc<dyn LedgerClient>>,
    store: Option<StateStore>,
    bus: Option<EventBus>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            ledger: None,
            store: None,
            bus: None,
        }
    }

    /// Set runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the ledger client the runtime talks to
    pub fn ledger(mut self, ledger: impl LedgerClient + 'static) -> Self {
        self.ledger = Some(Arc::new(ledger));
        self
    }

    /// Share an already wrapped ledger client
    pub fn shared_ledger(mut self, ledger: Arc<dyn LedgerClient>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Use an existing store instead of a fresh one
    pub fn store(mut self, store: StateStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Use an existing event bus instead of a fresh one
    pub fn bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Build the runtime
    ///
    /// Spawns the ingest worker, so it must run inside a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let ledger = self.ledger.ok_or(RuntimeError::MissingLedger)?;
        let store = self.store.unwrap_or_default();
        let bus = self.bus.unwrap_or_default();

        let ctx = OperationContext::new(store.clone(), bus.clone(), ledger, Arc::new(self.config));

        let handler = EventHandler::attach(store.clone(), &bus);
        let forward = bus.clone();
        let state_events = store.subscribe(move |state: &UxState| {
            forward.emit(DomainEvent::StateChanged {
                status_message: state.status_message.clone(),
            });
            Ok(())
        });

        let (ingest_tx, ingest_rx) = mpsc::unbounded_channel();
        let worker = IngestWorker::new(ctx.clone(), ingest_rx);
        let ingest_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            character: CharacterOperations::new(ctx.clone()),
            combat: CombatOperations::new(ctx.clone()),
            pools: PoolsOperations::new(ctx.clone()),
            leaderboard: LeaderboardOperations::new(ctx.clone()),
            claims: ClaimsOperations::new(ctx.clone()),
            ctx,
            handler: Some(handler),
            state_events: Some(state_events),
            watches: Vec::new(),
            ingest_tx: Some(ingest_tx),
            ingest_handle: Some(ingest_handle),
        })
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
