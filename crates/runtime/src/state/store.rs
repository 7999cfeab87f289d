//! The single authoritative [`UxState`] holder.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use game_core::{
    CharacterData, ClaimsData, EquipmentDropData, FightSummaryData, HealingData, LeaderboardData,
    MenuInputs, MenuState, OperationState, PoolsData, ResurrectionData, UxState, ValidationError,
    ValidationResult, calculate_menu_state,
};

use super::patch::UxStatePatch;
use crate::events::{ListenerId, ListenerResult, Subscription, call_isolated};

type StateListener = Arc<dyn Fn(&UxState) -> ListenerResult + Send + Sync>;

struct StoreInner {
    state: RwLock<UxState>,
    listeners: Mutex<Vec<(ListenerId, StateListener)>>,
    next_id: AtomicU64,
}

/// Owns the session's [`UxState`].
///
/// Every setter applies its change under one write lock, then notifies the
/// subscribers synchronously with a copy of the resulting state. Getters
/// return copies; nothing outside the store can reach the live state.
///
/// Setters that change the character, the operation or the healing cooldown
/// recompute the menu in the same write, so the menu is never patched.
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<StoreInner>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(UxState::default()),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, UxState> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, UxState> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, StateListener)>> {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Subscription
    // ------------------------------------------------------------------

    /// Registers a listener that receives a copy of the state after every
    /// change. Failures are logged and never reach other listeners.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UxState) -> ListenerResult + Send + Sync + 'static,
    {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.listeners().push((id, Arc::new(listener)));

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(id, move || {
            if let Some(inner) = inner.upgrade() {
                inner
                    .listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners().len()
    }

    fn notify(&self, snapshot: &UxState) {
        let listeners: Vec<(ListenerId, StateListener)> = self
            .listeners()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        for (id, listener) in listeners {
            if let Err(failure) = call_isolated(listener.as_ref(), snapshot) {
                tracing::error!(
                    target: "runtime::store",
                    listener = id.0,
                    error = %failure,
                    "state listener failed"
                );
            }
        }
    }

    /// Applies `mutate` under the write lock, then notifies once.
    fn commit<R>(&self, recompute_menu: bool, mutate: impl FnOnce(&mut UxState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.write();
            let result = mutate(&mut state);
            if recompute_menu {
                recompute(&mut state);
            }
            (result, state.clone())
        };
        self.notify(&snapshot);
        result
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    /// Copy of the whole state.
    pub fn snapshot(&self) -> UxState {
        self.read().clone()
    }

    /// Runs `f` against the current state without copying it.
    pub fn with_state<R>(&self, f: impl FnOnce(&UxState) -> R) -> R {
        f(&self.read())
    }

    pub fn player_address(&self) -> Option<String> {
        self.read().player_address.clone()
    }

    pub fn character(&self) -> Option<CharacterData> {
        self.read().character.clone()
    }

    pub fn menu(&self) -> Option<MenuState> {
        self.read().menu.clone()
    }

    pub fn operation(&self) -> Option<OperationState> {
        self.read().operation.clone()
    }

    pub fn pools(&self) -> Option<PoolsData> {
        self.read().pools.clone()
    }

    pub fn leaderboard(&self) -> Option<LeaderboardData> {
        self.read().leaderboard.clone()
    }

    pub fn claims(&self) -> Option<ClaimsData> {
        self.read().claims.clone()
    }

    pub fn healing_cooldown_remaining(&self) -> u64 {
        self.read().healing_cooldown_remaining
    }

    pub fn status_message(&self) -> String {
        self.read().status_message.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn last_fight_summary(&self) -> Option<FightSummaryData> {
        self.read().last_fight_summary.clone()
    }

    pub fn last_equipment_dropped(&self) -> Option<EquipmentDropData> {
        self.read().last_equipment_dropped.clone()
    }

    pub fn last_healing(&self) -> Option<HealingData> {
        self.read().last_healing.clone()
    }

    pub fn last_resurrection(&self) -> Option<ResurrectionData> {
        self.read().last_resurrection.clone()
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    pub fn set_player_address(&self, address: Option<String>) {
        self.commit(false, |state| state.player_address = address);
    }

    pub fn update_character(&self, character: Option<CharacterData>) {
        self.commit(true, |state| state.character = character);
    }

    pub fn set_healing_cooldown(&self, seconds: u64) {
        self.commit(true, |state| state.healing_cooldown_remaining = seconds);
    }

    /// Recomputes the menu from the current character, operation and
    /// cooldown.
    pub fn refresh_menu(&self) {
        self.commit(true, |_| ());
    }

    /// Installs or clears the operation.
    ///
    /// Replacing an active operation with a different active one is refused,
    /// and so is clearing it; only [`StateStore::reset`] drops an operation
    /// in flight. Transitions of the same operation (same kind and start
    /// time) pass.
    pub fn set_operation(&self, operation: Option<OperationState>) -> ValidationResult {
        let snapshot = {
            let mut state = self.write();
            ensure_not_replacing(&state, operation.as_ref())?;
            state.operation = operation;
            recompute(&mut state);
            state.clone()
        };
        self.notify(&snapshot);
        Ok(())
    }

    /// Checks `precondition` and installs `operation` in one write.
    ///
    /// Two callers racing for the same slot cannot both succeed.
    pub fn begin_operation(
        &self,
        operation: OperationState,
        precondition: impl FnOnce(&UxState) -> ValidationResult,
    ) -> ValidationResult {
        let snapshot = {
            let mut state = self.write();
            precondition(&state)?;
            if state.has_active_operation() {
                return Err(ValidationError::OperationInProgress);
            }
            state.operation = Some(operation);
            recompute(&mut state);
            state.clone()
        };
        self.notify(&snapshot);
        Ok(())
    }

    /// Moves `current` to `next` if `current` is still the stored operation.
    ///
    /// Returns false when the operation was cleared or replaced in the
    /// meantime (for example by [`StateStore::reset`]); nothing is written.
    pub fn transition_operation(&self, current: &OperationState, next: OperationState) -> bool {
        let snapshot = {
            let mut state = self.write();
            let still_current = state
                .operation
                .as_ref()
                .is_some_and(|stored| same_operation(stored, current) && stored.is_active);
            if !still_current {
                return false;
            }
            state.operation = Some(next);
            recompute(&mut state);
            state.clone()
        };
        self.notify(&snapshot);
        true
    }

    pub fn set_pools(&self, pools: Option<PoolsData>) {
        self.commit(false, |state| state.pools = pools);
    }

    pub fn set_leaderboard(&self, leaderboard: Option<LeaderboardData>) {
        self.commit(false, |state| state.leaderboard = leaderboard);
    }

    pub fn set_claims(&self, claims: Option<ClaimsData>) {
        self.commit(false, |state| state.claims = claims);
    }

    pub fn set_status_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.commit(false, |state| state.status_message = message);
    }

    pub fn set_loading(&self, loading: bool) {
        self.commit(false, |state| state.is_loading = loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.commit(false, |state| state.error = error);
    }

    pub fn set_last_fight_summary(&self, summary: Option<FightSummaryData>) {
        self.commit(false, |state| state.last_fight_summary = summary);
    }

    pub fn set_last_equipment_dropped(&self, drop: Option<EquipmentDropData>) {
        self.commit(false, |state| state.last_equipment_dropped = drop);
    }

    pub fn set_last_healing(&self, healing: Option<HealingData>) {
        self.commit(false, |state| state.last_healing = healing);
    }

    pub fn set_last_resurrection(&self, resurrection: Option<ResurrectionData>) {
        self.commit(false, |state| state.last_resurrection = resurrection);
    }

    /// Records `drop` and, when it belongs to the stored fight summary (same
    /// transaction), appends it to that summary. Returns whether it attached.
    pub fn attach_equipment_drop(&self, drop: EquipmentDropData) -> bool {
        self.commit(false, |state| {
            let summary = state
                .last_fight_summary
                .as_mut()
                .filter(|summary| drop.transaction.is_some() && summary.transaction == drop.transaction);
            let attached = summary.is_some();
            if let Some(summary) = summary {
                *summary = summary.with_equipment_drop(drop.equipment());
            }
            state.last_equipment_dropped = Some(drop);
            attached
        })
    }

    /// Applies every field of `patch` with a single notification.
    ///
    /// Refused as a whole when it would replace or clear an active operation.
    pub fn batch_update(&self, patch: UxStatePatch) -> ValidationResult {
        let snapshot = {
            let mut state = self.write();
            if let Some(next) = patch.operation_change() {
                ensure_not_replacing(&state, next)?;
            }
            if patch.apply(&mut state) {
                recompute(&mut state);
            }
            state.clone()
        };
        self.notify(&snapshot);
        Ok(())
    }

    /// Restores the initial state. Subscribers stay registered.
    pub fn reset(&self) {
        self.commit(false, |state| *state = UxState::default());
        tracing::debug!(target: "runtime::store", "state reset");
    }
}

fn recompute(state: &mut UxState) {
    let menu = calculate_menu_state(
        state.character.as_ref(),
        MenuInputs {
            operation: state.operation.as_ref(),
            healing_cooldown_remaining: state.healing_cooldown_remaining,
        },
    );
    state.menu = Some(menu);
}

fn same_operation(a: &OperationState, b: &OperationState) -> bool {
    a.kind == b.kind && a.start_time == b.start_time
}

fn ensure_not_replacing(state: &UxState, next: Option<&OperationState>) -> ValidationResult {
    let Some(current) = state.operation.as_ref().filter(|op| op.is_active) else {
        return Ok(());
    };
    match next {
        None => Err(ValidationError::OperationInProgress),
        Some(next) if next.is_active && !same_operation(current, next) => {
            Err(ValidationError::OperationInProgress)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Endurance, OperationKind, TxHash};
    use std::sync::atomic::AtomicUsize;

    fn living_character() -> CharacterData {
        CharacterData {
            exists: true,
            is_alive: true,
            class_name: "Warrior".into(),
            level: 2,
            endurance: Endurance::new(60, 100),
            ..CharacterData::default()
        }
    }

    fn counting(store: &StateStore) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let subscription = store.subscribe(move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (count, subscription)
    }

    #[test]
    fn reset_is_idempotent() {
        let store = StateStore::new();
        store.update_character(Some(living_character()));
        store.set_error(Some("boom".into()));
        store.set_loading(false);

        store.reset();
        let once = store.snapshot();
        store.reset();
        let twice = store.snapshot();

        assert_eq!(once, twice);
        assert_eq!(once, UxState::default());
        assert!(once.is_loading);
        assert_eq!(once.status_message, "Initializing...");
        assert!(once.menu.is_none());
    }

    #[test]
    fn batch_update_notifies_once_with_all_fields() {
        let store = StateStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |state| {
            sink.lock().unwrap().push(state.clone());
            Ok(())
        });

        store
            .batch_update(
                UxStatePatch::new()
                    .character(Some(living_character()))
                    .loading(false)
                    .status_message("Ready for action"),
            )
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].is_loading);
        assert_eq!(seen[0].status_message, "Ready for action");
        assert!(seen[0].menu.as_ref().unwrap().can_fight);
    }

    #[test]
    fn character_change_recomputes_menu() {
        let store = StateStore::new();
        store.update_character(None);
        assert!(store.menu().unwrap().can_create_character);

        store.update_character(Some(living_character()));
        let menu = store.menu().unwrap();
        assert!(!menu.can_create_character);
        assert!(menu.can_heal);

        store.set_healing_cooldown(30);
        assert!(!store.menu().unwrap().can_heal);
    }

    #[test]
    fn snapshots_are_detached_copies() {
        let store = StateStore::new();
        let mut copy = store.snapshot();
        copy.status_message = "tampered".into();
        assert_eq!(store.status_message(), "Initializing...");
    }

    #[test]
    fn failing_subscriber_does_not_block_others() {
        let store = StateStore::new();
        let _bad = store.subscribe(|_| anyhow::bail!("nope"));
        let _panics = store.subscribe(|_| panic!("subscriber panic"));
        let (count, _sub) = counting(&store);

        store.set_status_message("hello");

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.status_message(), "hello");
    }

    #[test]
    fn unsubscribed_listener_stops_receiving() {
        let store = StateStore::new();
        let (count, sub) = counting(&store);
        store.set_loading(false);
        sub.unsubscribe();
        store.set_loading(true);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn second_active_operation_is_refused_without_mutation() {
        let store = StateStore::new();
        let first = OperationState::pending(OperationKind::FightEnemy, "Fighting...", 1);
        store.begin_operation(first.clone(), |_| Ok(())).unwrap();

        let second = OperationState::pending(OperationKind::HealCharacter, "Healing...", 2);
        assert_eq!(
            store.begin_operation(second.clone(), |_| Ok(())),
            Err(ValidationError::OperationInProgress)
        );
        assert_eq!(
            store.set_operation(Some(second)),
            Err(ValidationError::OperationInProgress)
        );
        assert_eq!(store.operation(), Some(first.clone()));

        let processing = first.processing("Waiting for confirmation...");
        assert!(store.transition_operation(&first, processing.clone()));
        assert!(store.transition_operation(&processing, processing.completed(None, "done")));
        assert!(!store.operation().unwrap().is_active);
    }

    #[test]
    fn active_operation_is_only_cleared_by_reset() {
        let store = StateStore::new();
        let fight = OperationState::pending(OperationKind::FightEnemy, "Fighting...", 1);
        store.begin_operation(fight.clone(), |_| Ok(())).unwrap();

        assert_eq!(store.set_operation(None), Err(ValidationError::OperationInProgress));
        assert_eq!(
            store.batch_update(UxStatePatch::new().operation(None)),
            Err(ValidationError::OperationInProgress)
        );
        assert_eq!(store.operation(), Some(fight.clone()));

        store.reset();
        assert!(store.operation().is_none());

        let done = fight.completed(None, "done");
        store.set_operation(Some(done)).unwrap();
        store.set_operation(None).unwrap();
        assert!(store.operation().is_none());
    }

    #[test]
    fn transition_after_reset_is_dropped() {
        let store = StateStore::new();
        let op = OperationState::pending(OperationKind::LoadPools, "Loading pools...", 5);
        store.begin_operation(op.clone(), |_| Ok(())).unwrap();
        store.reset();

        assert!(!store.transition_operation(&op, op.completed(None, "late")));
        assert!(store.operation().is_none());
    }

    #[test]
    fn equipment_drop_attaches_to_matching_summary_only() {
        let store = StateStore::new();
        let summary = FightSummaryData {
            enemy_id: 1,
            enemy_name: "Goblin Warrior".into(),
            victory: true,
            enemy_died: true,
            difficulty_multiplier: 1.0,
            transaction: Some(TxHash::new("0xaaa")),
            ..Default::default()
        };
        store.set_last_fight_summary(Some(summary));

        let stranger = EquipmentDropData {
            bonuses: vec![1, 0, 0, 0],
            description: "Equipment drop: Combat +1".into(),
            transaction: Some(TxHash::new("0xbbb")),
        };
        assert!(!store.attach_equipment_drop(stranger));
        assert!(store.last_fight_summary().unwrap().equipment_dropped.is_none());

        let matching = EquipmentDropData {
            bonuses: vec![2, 0, 1, 0],
            description: "Equipment drop: Combat +2, Defense +1".into(),
            transaction: Some(TxHash::new("0xaaa")),
        };
        assert!(store.attach_equipment_drop(matching));
        let summary = store.last_fight_summary().unwrap();
        assert_eq!(summary.equipment_dropped.unwrap().combat, 2);
        assert!(summary.victory);
        assert_eq!(
            store.last_equipment_dropped().unwrap().transaction,
            Some(TxHash::new("0xaaa"))
        );
    }
}
