use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use client_ledger_core::{CharacterRecord, LedgerError, MockLedgerClient};
use game_core::{MenuAction, OperationKind, OperationState, OperationStatus};
use runtime::{DomainEvent, EventKind, Runtime, Subscription};

const PLAYER: &str = "0x1111111111111111111111111111111111111111";

async fn started(ledger: &MockLedgerClient) -> Runtime {
    let mut runtime = Runtime::builder()
        .ledger(ledger.clone())
        .build()
        .await
        .expect("runtime should build");
    runtime.initialize().await.expect("initialize should succeed");
    runtime
}

fn living(current: u32, max: u32) -> CharacterRecord {
    CharacterRecord {
        class_id: 0,
        level: 3,
        alive: true,
        current_endurance: current,
        max_endurance: max,
        total_combat: 12,
        total_defense: 8,
        total_luck: 4,
        ..CharacterRecord::default()
    }
}

/// Records every event except `StateChanged`.
fn record(runtime: &Runtime) -> (Arc<Mutex<Vec<DomainEvent>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = runtime.bus().on_any(move |envelope| {
        if envelope.kind() != EventKind::StateChanged {
            sink.lock().unwrap().push(envelope.event.clone());
        }
        Ok(())
    });
    (seen, subscription)
}

fn count(events: &[DomainEvent], kind: EventKind) -> usize {
    events.iter().filter(|event| event.kind() == kind).count()
}

#[tokio::test]
async fn initialize_watches_every_stream_and_clears_loading() {
    let ledger = MockLedgerClient::new(PLAYER);
    let runtime = started(&ledger).await;

    assert!(!runtime.is_loading());
    assert_eq!(runtime.status_message(), "Ready for action");
    assert!(runtime.pools().is_some());
    assert_eq!(ledger.call_count("watch_fight_summary"), 1);
    assert_eq!(ledger.call_count("watch_equipment_dropped"), 1);

    runtime.shutdown().await.expect("shutdown should succeed");
    assert_eq!(
        ledger.watcher_count(client_ledger_core::LedgerEventKind::FightSummary),
        0
    );
}

#[tokio::test]
async fn player_without_character_can_only_create() {
    let ledger = MockLedgerClient::new(PLAYER);
    let runtime = started(&ledger).await;

    let character = runtime.connect_player(PLAYER).await.unwrap();
    assert!(character.is_none());

    let menu = runtime.menu().expect("menu is computed after connect");
    assert!(menu.can_create_character);
    assert!(!menu.can_fight);
    assert!(!menu.can_heal);
    assert!(!menu.can_resurrect);
    assert!(menu.available_actions.contains(&MenuAction::CreateCharacter));
    assert!(!menu.available_actions.contains(&MenuAction::Fight));
    assert_eq!(runtime.status_message(), "Ready to create character");
}

#[tokio::test]
async fn living_character_menu_allows_fight_and_heal() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(60, 100));
    let runtime = started(&ledger).await;

    let character = runtime.connect_player(PLAYER).await.unwrap().unwrap();
    assert!(character.exists);
    assert!(character.is_alive);

    let menu = runtime.menu().unwrap();
    assert!(menu.can_fight);
    assert!(menu.can_heal);
    assert!(!menu.can_resurrect);
    assert!(!menu.can_continue_fight);
    assert!(!menu.can_flee);
}

#[tokio::test]
async fn dead_character_menu_allows_only_resurrection() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(
        PLAYER,
        CharacterRecord {
            alive: false,
            current_endurance: 0,
            ..living(0, 100)
        },
    );
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();

    let menu = runtime.menu().unwrap();
    assert!(menu.can_resurrect);
    assert!(!menu.can_fight);
    assert!(!menu.can_heal);
}

#[tokio::test]
async fn create_character_runs_the_full_lifecycle() {
    let ledger = MockLedgerClient::new(PLAYER);
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();
    let (events, _recording) = record(&runtime);

    let result = runtime.create_character(2).await;

    assert!(result.success, "{:?}", result.error);
    let hash = result.data.unwrap();

    let operation = runtime.operation().unwrap();
    assert_eq!(operation.kind, OperationKind::CreateCharacter);
    assert_eq!(operation.status, OperationStatus::Completed);
    assert!(!operation.is_active);
    assert_eq!(operation.hash.as_ref(), Some(&hash));

    let character = runtime.character().expect("character is re-read after creation");
    assert_eq!(character.class_name, "Rogue");
    assert!(runtime.menu().unwrap().can_fight);
    assert_eq!(runtime.status_message(), "Character created successfully");

    let events = events.lock().unwrap();
    assert_eq!(events[0].kind(), EventKind::OperationStarted);
    assert_eq!(count(&events, EventKind::OperationCompleted), 1);
    assert_eq!(count(&events, EventKind::OperationFailed), 0);
    assert_eq!(count(&events, EventKind::CharacterCreated), 1);
    assert_eq!(count(&events, EventKind::CharacterUpdated), 1);
}

#[tokio::test]
async fn invalid_inputs_are_refused_before_any_ledger_call() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(100, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();
    ledger.clear_calls();
    let before = runtime.operation();

    let bad_enemy = runtime.fight_enemy(99, 1).await;
    let bad_level = runtime.fight_enemy(1, 0).await;
    let full_health = runtime.heal_character().await;
    let already_alive = runtime.resurrect_character().await;
    let not_fighting = runtime.flee_round().await;

    for result in [&bad_enemy, &bad_level, &full_health, &already_alive, &not_fighting] {
        assert!(!result.success);
    }
    assert_eq!(
        full_health.error.as_deref(),
        Some("Character is already at full health")
    );
    assert!(ledger.calls().is_empty(), "ledger was called: {:?}", ledger.calls());
    assert_eq!(runtime.operation(), before);
}

#[tokio::test]
async fn second_operation_is_refused_while_one_is_active() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(60, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();

    let active = OperationState::pending(OperationKind::HealCharacter, "Healing character...", 1);
    runtime
        .store()
        .begin_operation(active.clone(), |_| Ok(()))
        .unwrap();
    ledger.clear_calls();

    let fight = runtime.fight_enemy(1, 1).await;
    let pools = runtime.load_pools().await;

    assert_eq!(fight.error.as_deref(), Some("Another operation is in progress"));
    assert_eq!(pools.error.as_deref(), Some("Another operation is in progress"));
    assert_eq!(runtime.operation(), Some(active));
    assert!(ledger.calls().is_empty());
    assert!(
        runtime
            .menu()
            .unwrap()
            .disabled_actions
            .contains(&MenuAction::Fight)
    );
}

#[tokio::test]
async fn ledger_failure_is_recorded_in_store_and_on_the_bus() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(100, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();
    let (events, _recording) = record(&runtime);
    ledger.fail_next("fight_enemy", LedgerError::Network("connection reset".into()));

    let result = runtime.fight_enemy(1, 2).await;

    assert!(!result.success);
    let operation = runtime.operation().unwrap();
    assert_eq!(operation.status, OperationStatus::Error);
    assert!(!operation.is_active);
    assert_eq!(operation.error, result.error);

    let events = events.lock().unwrap();
    assert_eq!(count(&events, EventKind::OperationFailed), 1);
    assert_eq!(count(&events, EventKind::OperationCompleted), 0);
    assert_eq!(count(&events, EventKind::FightStarted), 0);

    // A failed operation does not block a retry.
    drop(events);
    assert!(runtime.fight_enemy(1, 2).await.success);
}

#[tokio::test]
async fn contract_revert_surfaces_its_message() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(40, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();
    ledger.fail_next("heal_character", LedgerError::reverted(1103));

    let result = runtime.heal_character().await;

    assert!(!result.success);
    let message = result.error.unwrap();
    assert_eq!(runtime.operation().unwrap().error.as_deref(), Some(message.as_str()));
    assert_eq!(runtime.status_message(), format!("Operation failed: {message}"));
}

#[tokio::test]
async fn fight_continue_and_flee_track_combat() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(100, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();

    assert!(runtime.fight_enemy(1, 3).await.success);
    let character = runtime.character().unwrap();
    assert!(character.in_combat);
    let menu = runtime.menu().unwrap();
    assert!(!menu.can_fight);
    assert!(menu.can_continue_fight);
    assert!(menu.can_flee);

    assert!(runtime.continue_fight().await.success);
    assert_eq!(
        runtime.character().unwrap().combat_state.unwrap().rounds_elapsed,
        1
    );

    assert!(runtime.flee_round().await.success);
    assert!(!runtime.character().unwrap().in_combat);
    assert!(runtime.menu().unwrap().can_fight);
}

#[tokio::test]
async fn heal_and_resurrect_pay_their_fees() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(30, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();

    assert!(runtime.heal_character().await.success);
    assert_eq!(ledger.call_count("healing_fee"), 1);
    assert_eq!(runtime.character().unwrap().endurance.current, 100);

    ledger.set_character(
        PLAYER,
        CharacterRecord {
            alive: false,
            ..living(0, 100)
        },
    );
    runtime.refresh_all().await.unwrap();
    assert!(runtime.resurrect_character().await.success);
    assert_eq!(ledger.call_count("resurrection_fee"), 1);
    assert!(runtime.character().unwrap().is_alive);
}

#[tokio::test]
async fn ledger_eligibility_refusal_is_a_local_failure() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(30, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();
    // The ledger knows about a cooldown the cached view has not seen yet.
    ledger.set_healing_cooldown(PLAYER, 120);

    let result = runtime.heal_character().await;

    assert_eq!(result.error.as_deref(), Some("Healing on cooldown"));
    assert_eq!(ledger.call_count("heal_character"), 0);
    assert!(runtime.operation().is_none_or(|op| op.kind != OperationKind::HealCharacter));
}

#[tokio::test]
async fn session_error_blocks_actions_until_cleared() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(100, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();
    ledger.fail_next("get_pool_balances", LedgerError::Network("timeout".into()));

    assert!(runtime.refresh_all().await.is_err());
    assert!(runtime.error().is_some());
    assert_eq!(
        runtime.fight_enemy(1, 1).await.error.as_deref(),
        Some("System error occurred")
    );

    runtime.clear_error();
    assert!(runtime.error().is_none());
    assert!(runtime.fight_enemy(1, 1).await.success);
}

#[tokio::test]
async fn connect_failure_goes_to_the_error_slot() {
    let ledger = MockLedgerClient::new(PLAYER);
    let runtime = started(&ledger).await;
    let (events, _recording) = record(&runtime);
    ledger.fail_next("get_character", LedgerError::Network("unreachable".into()));

    assert!(runtime.connect_player(PLAYER).await.is_err());

    assert!(runtime.error().unwrap().contains("unreachable"));
    assert_eq!(count(&events.lock().unwrap(), EventKind::ErrorOccurred), 1);
}

#[tokio::test]
async fn malformed_address_is_rejected() {
    let ledger = MockLedgerClient::new(PLAYER);
    let runtime = started(&ledger).await;

    let err = runtime.connect_player("1111").await.unwrap_err();

    assert!(err.is_validation());
    assert!(runtime.player_address().is_none());
}

#[tokio::test]
async fn reset_is_idempotent_and_keeps_subscribers() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(100, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();

    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);
    let _subscription = runtime.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    runtime.reset();
    let once = runtime.state();
    runtime.reset();
    let twice = runtime.state();

    assert_eq!(once, twice);
    assert!(once.player_address.is_none());
    assert!(once.character.is_none());
    assert_eq!(notified.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failing_listeners_do_not_disturb_the_session() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_character(PLAYER, living(100, 100));
    let runtime = started(&ledger).await;
    runtime.connect_player(PLAYER).await.unwrap();

    let _panicking = runtime.on(EventKind::OperationCompleted, |_| panic!("ui crashed"));
    let _failing_state = runtime.subscribe(|_| anyhow::bail!("render failed"));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let _healthy = runtime.on(EventKind::OperationCompleted, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let result = runtime.fight_enemy(2, 1).await;

    assert!(result.success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(runtime.character().unwrap().in_combat);
}

#[tokio::test]
async fn state_changes_are_forwarded_to_the_bus() {
    let ledger = MockLedgerClient::new(PLAYER);
    let runtime = started(&ledger).await;
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&statuses);
    let _subscription = runtime.on(EventKind::StateChanged, move |envelope| {
        if let DomainEvent::StateChanged { status_message } = &envelope.event {
            sink.lock().unwrap().push(status_message.clone());
        }
        Ok(())
    });

    runtime.store().set_status_message("hello");

    assert_eq!(*statuses.lock().unwrap(), vec!["hello".to_string()]);
}

#[tokio::test]
async fn building_without_a_ledger_fails() {
    let result = Runtime::builder().build().await;
    assert!(matches!(result, Err(runtime::RuntimeError::MissingLedger)));
}
