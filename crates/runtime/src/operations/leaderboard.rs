//! Leaderboard family: current epoch ranking.

use client_ledger_core::LedgerError;
use game_core::{
    LeaderboardData, LeaderboardEntry, OperationKind, can_view_leaderboard,
};

use super::lifecycle::{Completion, now_ms};
use super::OperationContext;
use crate::api::Result;
use crate::events::DomainEvent;

pub struct LeaderboardOperations {
    ctx: OperationContext,
}

struct ScannedPlayer {
    address: String,
    score: u128,
    level: u32,
    kills: u32,
}

impl LeaderboardOperations {
    pub(crate) fn new(ctx: OperationContext) -> Self {
        Self { ctx }
    }

    /// Builds the ranking for the current epoch.
    ///
    /// Up to the configured scan limit of registered players are read; the
    /// session player's rank is one plus the number of scanned players with
    /// a strictly higher score.
    pub async fn load_leaderboard(&self) -> Result<LeaderboardData> {
        self.ctx.store.with_state(can_view_leaderboard)?;

        let tracker = self.ctx.begin(
            OperationKind::LoadLeaderboard,
            "Loading leaderboard...",
            can_view_leaderboard,
        )?;
        let player = self.ctx.store.player_address();

        tracker
            .run(self.read(player.as_deref()), |leaderboard| {
                self.ctx.store.set_leaderboard(Some(leaderboard.clone()));
                self.ctx.bus.emit(DomainEvent::LeaderboardUpdated {
                    leaderboard: leaderboard.clone(),
                });
                Completion::read("Leaderboard loaded")
            })
            .await
    }

    async fn read(&self, player: Option<&str>) -> std::result::Result<LeaderboardData, LedgerError> {
        let ledger = &self.ctx.ledger;
        let config = &self.ctx.config.leaderboard;

        let current_epoch = ledger.current_epoch().await?;
        let player_score = match player {
            Some(player) => ledger
                .epoch_score(player, current_epoch)
                .await
                .unwrap_or_else(|err| {
                    tracing::warn!(target: "runtime::ops", error = %err, "player score read failed");
                    0
                }),
            None => 0,
        };
        let total_players = ledger.total_player_count().await?;

        let scan = total_players.min(config.scan_limit);
        let mut scanned = Vec::new();
        for index in 0..scan {
            let address = ledger.player_by_index(index).await?;
            let score = match ledger.epoch_score(&address, current_epoch).await {
                Ok(score) => score,
                Err(err) => {
                    tracing::debug!(target: "runtime::ops", %address, error = %err, "skipping unreadable score");
                    continue;
                }
            };
            let (level, kills) = match ledger.get_character(&address).await {
                Ok(Some(record)) => (record.level, record.total_kills),
                _ => (0, 0),
            };
            scanned.push(ScannedPlayer {
                address,
                score,
                level,
                kills,
            });
        }

        let player_rank = match player {
            Some(_) => 1 + scanned.iter().filter(|entry| entry.score > player_score).count() as u64,
            None => 0,
        };

        scanned.sort_by(|a, b| b.score.cmp(&a.score));
        let top_players = scanned
            .into_iter()
            .take(config.top_players)
            .enumerate()
            .map(|(position, entry)| LeaderboardEntry {
                is_current_player: player
                    .is_some_and(|player| player.eq_ignore_ascii_case(&entry.address)),
                address: entry.address,
                score: entry.score,
                rank: position as u64 + 1,
                level: entry.level,
                kills: entry.kills,
            })
            .collect();

        let epoch_time_remaining = ledger.epoch_time_remaining().await.unwrap_or(0);

        Ok(LeaderboardData {
            current_epoch,
            player_score,
            player_rank,
            total_players,
            top_players,
            epoch_time_remaining,
            last_updated: now_ms(),
        })
    }
}
