use std::sync::{Arc, Mutex};

use client_ledger_core::{CharacterRecord, LedgerError, MerkleProof, MockLedgerClient, PoolBalances};
use game_core::{OperationKind, OperationStatus, PoolKind};
use runtime::{DomainEvent, EventKind, Runtime, RuntimeConfig, Subscription};

const PLAYER: &str = "0x3333333333333333333333333333333333333333";
const RIVAL: &str = "0x4444444444444444444444444444444444444444";
const CHALLENGER: &str = "0x5555555555555555555555555555555555555555";
const NEWCOMER: &str = "0x6666666666666666666666666666666666666666";

const ETHER: u128 = 1_000_000_000_000_000_000;

fn proof() -> Vec<String> {
    vec![format!("0x{}", "ab".repeat(32)), format!("0x{}", "cd".repeat(32))]
}

fn hero() -> CharacterRecord {
    CharacterRecord {
        class_id: 3,
        level: 5,
        alive: true,
        current_endurance: 100,
        max_endurance: 100,
        total_kills: 4,
        ..CharacterRecord::default()
    }
}

async fn connected(ledger: &MockLedgerClient, config: RuntimeConfig) -> Runtime {
    ledger.set_character(PLAYER, hero());
    let mut runtime = Runtime::builder()
        .config(config)
        .ledger(ledger.clone())
        .build()
        .await
        .expect("runtime should build");
    runtime.initialize().await.expect("initialize should succeed");
    runtime
        .connect_player(PLAYER)
        .await
        .expect("connect should succeed");
    runtime
}

fn record(runtime: &Runtime) -> (Arc<Mutex<Vec<EventKind>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = runtime.bus().on_any(move |envelope| {
        if envelope.kind() != EventKind::StateChanged {
            sink.lock().unwrap().push(envelope.kind());
        }
        Ok(())
    });
    (seen, subscription)
}

/// Claims fixture: epoch 3 is claimable, epoch 2 was already claimed and
/// epoch 1 paid nothing.
fn seed_rewards(ledger: &MockLedgerClient) {
    ledger.set_epoch(3, 3_600);
    ledger.set_merkle_proof(
        PLAYER,
        3,
        MerkleProof {
            amount: 500,
            index: 3,
            proof: proof(),
        },
    );
    ledger.set_merkle_proof(
        PLAYER,
        2,
        MerkleProof {
            amount: 200,
            index: 1,
            proof: proof(),
        },
    );
    ledger.mark_claimed(2, 1);
    ledger.set_merkle_proof(
        PLAYER,
        1,
        MerkleProof {
            amount: 0,
            index: 0,
            proof: proof(),
        },
    );
}

#[tokio::test]
async fn pools_are_formatted_with_integer_shares() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_pools(PoolBalances {
        prize: 3 * ETHER,
        equipment: ETHER,
        ..PoolBalances::default()
    });
    let runtime = connected(&ledger, RuntimeConfig::default()).await;

    let result = runtime.load_pools().await;

    let pools = result.data.expect("pools loaded");
    assert_eq!(pools.total_value, 4 * ETHER);
    let prize = pools.get(PoolKind::Prize).unwrap();
    assert_eq!(prize.percentage, 75);
    assert_eq!(prize.formatted, "3.0000 CFX");
    assert_eq!(runtime.pools(), Some(pools));
}

#[tokio::test]
async fn leaderboard_ranks_the_session_player() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.add_player(PLAYER, 1, 50);
    ledger.add_player(RIVAL, 1, 120);
    ledger.add_player(CHALLENGER, 1, 80);
    ledger.add_player(NEWCOMER, 1, 10);
    ledger.set_character(
        RIVAL,
        CharacterRecord {
            level: 7,
            total_kills: 12,
            alive: true,
            ..CharacterRecord::default()
        },
    );
    let mut config = RuntimeConfig::default();
    config.leaderboard.top_players = 2;
    let runtime = connected(&ledger, config).await;

    let leaderboard = runtime.leaderboard().expect("loaded on connect");

    assert_eq!(leaderboard.current_epoch, 1);
    assert_eq!(leaderboard.player_score, 50);
    assert_eq!(leaderboard.player_rank, 3);
    assert_eq!(leaderboard.total_players, 4);
    assert_eq!(leaderboard.epoch_time_remaining, 86_400);

    let top = &leaderboard.top_players;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].address, RIVAL);
    assert_eq!((top[0].rank, top[0].level, top[0].kills), (1, 7, 12));
    assert_eq!(top[1].address, CHALLENGER);
    assert_eq!((top[1].level, top[1].kills), (0, 0));
    assert!(top.iter().all(|entry| !entry.is_current_player));
}

#[tokio::test]
async fn leaderboard_flags_the_session_player() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.add_player(PLAYER, 1, 90);
    ledger.add_player(RIVAL, 1, 20);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;

    let leaderboard = runtime.load_leaderboard().await.data.unwrap();

    assert_eq!(leaderboard.player_rank, 1);
    assert!(leaderboard.top_players[0].is_current_player);
    assert_eq!(leaderboard.top_players[0].kills, 4);
}

#[tokio::test]
async fn leaderboard_survives_a_failed_score_read() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.add_player(RIVAL, 1, 20);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;
    ledger.fail_next("epoch_score", LedgerError::Network("flaky".into()));

    let result = runtime.load_leaderboard().await;

    let leaderboard = result.data.expect("score failure is not fatal");
    assert_eq!(leaderboard.player_score, 0);
    assert_eq!(leaderboard.top_players.len(), 1);
}

#[tokio::test]
async fn claims_skip_empty_and_claimed_rewards() {
    let ledger = MockLedgerClient::new(PLAYER);
    seed_rewards(&ledger);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;

    let claims = runtime.claims().expect("loaded on connect");

    assert_eq!(claims.available.len(), 1);
    assert_eq!(claims.total_claimable, 500);
    let reward = &claims.available[0];
    assert_eq!((reward.epoch, reward.index), (Some(3), Some(3)));
    assert_eq!(reward.description, "Epoch 3 leaderboard reward");
    assert!(reward.can_claim);
}

#[tokio::test]
async fn claiming_removes_the_reward() {
    let ledger = MockLedgerClient::new(PLAYER);
    seed_rewards(&ledger);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;
    let (events, _recording) = record(&runtime);

    let result = runtime.claim_prize(3, 3, 500, proof()).await;

    assert!(result.success, "{:?}", result.error);
    let claims = runtime.claims().unwrap();
    assert!(claims.available.is_empty());
    assert_eq!(claims.total_claimable, 0);

    let operation = runtime.operation().unwrap();
    assert_eq!(operation.kind, OperationKind::ClaimPrize);
    assert_eq!(operation.status, OperationStatus::Completed);

    let events = events.lock().unwrap();
    for kind in [
        EventKind::OperationStarted,
        EventKind::ClaimStarted,
        EventKind::ClaimsUpdated,
        EventKind::ClaimCompleted,
        EventKind::OperationCompleted,
    ] {
        assert!(events.contains(&kind), "missing {kind}");
    }
    assert!(!events.contains(&EventKind::ClaimFailed));
}

#[tokio::test]
async fn claims_are_checked_locally_first() {
    let ledger = MockLedgerClient::new(PLAYER);
    seed_rewards(&ledger);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;
    ledger.clear_calls();

    let wrong_amount = runtime.claim_prize(3, 3, 501, proof()).await;
    let unknown = runtime.claim_prize(9, 0, 500, proof()).await;
    let bad_proof = runtime
        .claim_prize(3, 3, 500, vec!["0x1234".to_string()])
        .await;

    assert_eq!(wrong_amount.error.as_deref(), Some("Reward is not claimable"));
    assert_eq!(unknown.error.as_deref(), Some("Reward is not claimable"));
    assert!(!bad_proof.success);
    assert!(ledger.calls().is_empty());
}

#[tokio::test]
async fn single_leaf_reward_claims_with_an_empty_proof() {
    let ledger = MockLedgerClient::new(PLAYER);
    ledger.set_epoch(3, 3_600);
    ledger.set_merkle_proof(
        PLAYER,
        3,
        MerkleProof {
            amount: 500,
            index: 0,
            proof: Vec::new(),
        },
    );
    let runtime = connected(&ledger, RuntimeConfig::default()).await;
    let claims = runtime.claims().expect("loaded on connect");
    assert_eq!(claims.available.len(), 1);
    assert!(claims.available[0].can_claim);

    let result = runtime.claim_prize(3, 0, 500, Vec::new()).await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(ledger.call_count("claim_prize"), 1);
    assert!(runtime.claims().unwrap().available.is_empty());
}

#[tokio::test]
async fn claim_already_marked_on_the_ledger_is_refused() {
    let ledger = MockLedgerClient::new(PLAYER);
    seed_rewards(&ledger);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;
    ledger.mark_claimed(3, 3);

    let result = runtime.claim_prize(3, 3, 500, proof()).await;

    assert_eq!(result.error.as_deref(), Some("Reward has already been claimed"));
    assert_eq!(ledger.call_count("claim_prize"), 0);
}

#[tokio::test]
async fn failed_claim_emits_claim_failed() {
    let ledger = MockLedgerClient::new(PLAYER);
    seed_rewards(&ledger);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;
    let (events, _recording) = record(&runtime);
    ledger.fail_next("claim_prize", LedgerError::reverted(1719));

    let result = runtime.claim_prize(3, 3, 500, proof()).await;

    assert!(!result.success);
    assert_eq!(runtime.claims().unwrap().available.len(), 1);
    assert_eq!(runtime.operation().unwrap().status, OperationStatus::Error);

    let events = events.lock().unwrap();
    assert!(events.contains(&EventKind::ClaimFailed));
    assert!(events.contains(&EventKind::OperationFailed));
    assert!(!events.contains(&EventKind::ClaimCompleted));
}

#[tokio::test]
async fn claim_events_carry_epoch_and_index() {
    let ledger = MockLedgerClient::new(PLAYER);
    seed_rewards(&ledger);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;
    let completed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&completed);
    let _subscription = runtime.on(EventKind::ClaimCompleted, move |envelope| {
        if let DomainEvent::ClaimCompleted { epoch, index, .. } = &envelope.event {
            *sink.lock().unwrap() = Some((*epoch, *index));
        }
        Ok(())
    });

    runtime.claim_prize(3, 3, 500, proof()).await;

    assert_eq!(*completed.lock().unwrap(), Some((3, 3)));
}

#[tokio::test]
async fn scaled_enemy_stats_validate_before_reading() {
    let ledger = MockLedgerClient::new(PLAYER);
    let runtime = connected(&ledger, RuntimeConfig::default()).await;
    ledger.clear_calls();

    let stats = runtime.scaled_enemy_stats(2, 3).await.unwrap();
    assert_eq!(stats.combat, 7);

    let err = runtime.scaled_enemy_stats(0, 3).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(ledger.call_count("get_scaled_enemy_stats"), 1);
}
