//! Scripted session played by the binary.
//!
//! Each step asks the runtime's menu whether its action is available, the
//! same way an interactive frontend would gray out a button.

use anyhow::{Result, anyhow};
use serde_json::json;
use tracing::{info, warn};

use client_ledger_core::{LedgerEventKind, LogRecord, MerkleProof, PoolBalances};
use game_core::{MenuAction, TxHash};
use runtime::{MockLedgerClient, OperationResult, Runtime};

use crate::config::ClientConfig;

const ONE_CFX: u128 = 1_000_000_000_000_000_000;
const DEMO_REWARD: u128 = ONE_CFX / 4;
const DAMAGE_TAKEN: u32 = 33;

/// Fills the in-memory ledger with pools, rivals and one unclaimed reward.
pub fn seed_demo_ledger(ledger: &MockLedgerClient, player: &str) {
    ledger.set_pools(PoolBalances {
        prize: 12 * ONE_CFX,
        equipment: 4 * ONE_CFX,
        gas_refund: 2 * ONE_CFX,
        developer: ONE_CFX,
        next_epoch: ONE_CFX,
        emergency: 0,
    });

    let rivals = [
        ("0x1000000000000000000000000000000000000001", 420),
        ("0x1000000000000000000000000000000000000002", 180),
        ("0x1000000000000000000000000000000000000003", 35),
    ];
    for (address, score) in rivals {
        ledger.add_player(address, 1, score);
    }
    ledger.add_player(player, 1, 90);

    ledger.set_merkle_proof(
        player,
        1,
        MerkleProof {
            amount: DEMO_REWARD,
            index: 0,
            proof: vec![format!("0x{}", "5a".repeat(32))],
        },
    );
}

pub(crate) async fn play(
    runtime: &Runtime,
    ledger: &MockLedgerClient,
    config: &ClientConfig,
) -> Result<()> {
    if available(runtime, MenuAction::CreateCharacter) {
        required("create character", runtime.create_character(config.class_id).await)?;
    }
    if available(runtime, MenuAction::Resurrect) {
        required("resurrect", runtime.resurrect_character().await)?;
    }

    let stats = runtime
        .scaled_enemy_stats(config.enemy_id, config.enemy_level)
        .await?;
    info!(
        target: "brawler",
        enemy = config.enemy_id,
        combat = stats.combat,
        endurance = stats.endurance,
        "opponent scouted"
    );

    if available(runtime, MenuAction::Fight) {
        let tx = required(
            "fight",
            runtime.fight_enemy(config.enemy_id, config.enemy_level).await,
        )?;
        settle_fight_offline(ledger, config, &tx);
        runtime.flush_events().await;
    }

    if available(runtime, MenuAction::Heal) {
        optional("heal", runtime.heal_character().await);
    }

    optional("leaderboard", runtime.load_leaderboard().await);
    if let Some(claims) = optional("claims", runtime.load_claims().await) {
        for reward in claims.available {
            let (Some(epoch), Some(index)) = (reward.epoch, reward.index) else {
                continue;
            };
            optional(
                "claim",
                runtime
                    .claim_prize(epoch, index, reward.amount, reward.proof)
                    .await,
            );
        }
    }

    info!(target: "brawler", status = %runtime.status_message(), "session finished");
    Ok(())
}

/// Plays the contract's part of a fight: the enemy falls in three rounds,
/// the character keeps the damage and finds a piece of equipment.
fn settle_fight_offline(ledger: &MockLedgerClient, config: &ClientConfig, tx: &TxHash) {
    let player = config.player_address.as_str();
    let Some(mut record) = ledger.character(player) else {
        warn!(target: "brawler", "no character to settle the fight for");
        return;
    };
    record.current_endurance = record.current_endurance.saturating_sub(DAMAGE_TAKEN).max(1);
    record.total_kills += 1;
    ledger.set_character(player, record.clone());
    ledger.set_combat_state(player, None);

    let summary = json!({
        "enemyId": config.enemy_id,
        "enemyLevel": config.enemy_level,
        "victory": true,
        "unresolved": false,
        "roundsElapsed": 3,
        "roundNumbers": [1, 2, 3],
        "playerDamages": [14, 15, 11],
        "enemyDamages": [9, 12, 12],
        "playerCriticals": [false, true, false],
        "enemyCriticals": [false, false, false],
        "playerEndurance": record.current_endurance,
        "enemyEndurance": 0,
    });
    let drop = json!({ "bonuses": [2, 0, 1, 0], "description": "Dented buckler" });

    ledger.emit(
        LedgerEventKind::FightSummary,
        vec![LogRecord::new(tx.clone(), 0, Some(player.to_string()), summary)],
    );
    ledger.emit(
        LedgerEventKind::EquipmentDropped,
        vec![LogRecord::new(tx.clone(), 1, Some(player.to_string()), drop)],
    );
}

fn available(runtime: &Runtime, action: MenuAction) -> bool {
    runtime.menu().is_some_and(|menu| menu.is_available(action))
}

fn required<T>(step: &str, result: OperationResult<T>) -> Result<T> {
    match (result.success, result.data) {
        (true, Some(data)) => Ok(data),
        _ => Err(anyhow!(
            "{step} failed: {}",
            result.error.unwrap_or_else(|| "no result".to_string())
        )),
    }
}

fn optional<T>(step: &str, result: OperationResult<T>) -> Option<T> {
    if let Some(error) = &result.error {
        warn!(target: "brawler", step, %error, "step skipped");
    }
    result.data
}
