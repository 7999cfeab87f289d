//! Ledger log ingestion.
//!
//! Watch callbacks run on the adapter's polling task and must not block, so
//! they only forward batches into a channel. [`IngestWorker`] drains it on a
//! single task: logs for other players and redeliveries are dropped, the rest
//! are normalized and published as domain events.

use std::collections::{HashSet, VecDeque};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use client_ledger_core::{LedgerEventKind, LogBatch, LogRecord};
use game_core::{
    EquipmentDropData, TxHash, normalize_equipment_drop, normalize_fight_summary,
    normalize_healing, normalize_resurrection, validate_fight_summary,
};

use crate::events::DomainEvent;
use crate::operations::OperationContext;

/// Messages accepted by the ingest worker.
pub enum IngestMessage {
    Logs {
        kind: LedgerEventKind,
        batch: LogBatch,
    },
    /// Replies once every message queued before it has been handled.
    Flush { reply: oneshot::Sender<()> },
}

/// Bounded memory of `(transaction, log index)` pairs already handled.
struct RecentLogs {
    capacity: usize,
    order: VecDeque<(TxHash, u64)>,
    seen: HashSet<(TxHash, u64)>,
}

impl RecentLogs {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            seen: HashSet::new(),
        }
    }

    /// Returns `false` when `id` was already recorded.
    fn insert(&mut self, id: (TxHash, u64)) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        if self.order.len() == self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.seen.remove(&oldest);
        }
        self.order.push_back(id.clone());
        self.seen.insert(id);
        true
    }
}

/// Background task turning ledger logs into domain events.
pub struct IngestWorker {
    ctx: OperationContext,
    rx: mpsc::UnboundedReceiver<IngestMessage>,
    recent: RecentLogs,
    /// Drops that arrived before their fight summary.
    pending_drops: VecDeque<EquipmentDropData>,
}

impl IngestWorker {
    pub fn new(ctx: OperationContext, rx: mpsc::UnboundedReceiver<IngestMessage>) -> Self {
        let capacity = ctx.config.events.dedup_capacity;
        Self {
            ctx,
            rx,
            recent: RecentLogs::new(capacity),
            pending_drops: VecDeque::new(),
        }
    }

    /// Main worker loop; ends when every sender is gone.
    pub async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            match message {
                IngestMessage::Logs { kind, batch } => self.handle_batch(kind, batch).await,
                IngestMessage::Flush { reply } => {
                    if reply.send(()).is_err() {
                        debug!(target: "runtime::ingest", "flush reply channel closed");
                    }
                }
            }
        }
        debug!(target: "runtime::ingest", "ingest worker stopped");
    }

    async fn handle_batch(&mut self, kind: LedgerEventKind, batch: LogBatch) {
        trace!(target: "runtime::ingest", stream = %kind, logs = batch.len(), "batch received");

        let mut refresh = false;
        for log in batch {
            if !self.accept(&log) {
                continue;
            }
            match kind {
                LedgerEventKind::FightSummary => {
                    self.publish_fight_summary(&log);
                    refresh = true;
                }
                LedgerEventKind::EquipmentDropped => self.publish_drop(&log),
                LedgerEventKind::CharacterHealed => {
                    let healing = normalize_healing(&log.raw());
                    self.ctx.bus.emit(DomainEvent::HealingCompleted { healing });
                    refresh = true;
                }
                LedgerEventKind::CharacterResurrected => {
                    let resurrection = normalize_resurrection(&log.raw());
                    self.ctx
                        .bus
                        .emit(DomainEvent::ResurrectionCompleted { resurrection });
                    refresh = true;
                }
            }
        }

        if refresh {
            self.ctx.refresh_character_quietly().await;
        }
    }

    /// Session filter plus redelivery check.
    fn accept(&mut self, log: &LogRecord) -> bool {
        if self.ctx.config.events.filter_foreign {
            let Some(session) = self.ctx.store.player_address() else {
                trace!(target: "runtime::ingest", "no session, log ignored");
                return false;
            };
            if let Some(player) = &log.player
                && !player.eq_ignore_ascii_case(&session)
            {
                trace!(target: "runtime::ingest", %player, "foreign log ignored");
                return false;
            }
        }

        if !self.recent.insert(log.id()) {
            debug!(
                target: "runtime::ingest",
                transaction = %log.transaction_hash,
                log_index = log.log_index,
                "duplicate log ignored"
            );
            return false;
        }
        true
    }

    fn publish_fight_summary(&mut self, log: &LogRecord) {
        let mut summary = normalize_fight_summary(&log.raw(), None);
        summary.transaction = Some(log.transaction_hash.clone());

        let report = validate_fight_summary(&summary);
        if !report.is_valid() {
            warn!(
                target: "runtime::ingest",
                transaction = %log.transaction_hash,
                errors = ?report.errors,
                "fight summary failed validation"
            );
        }

        self.ctx.bus.emit(DomainEvent::FightCompleted {
            summary: Box::new(summary),
        });

        let (matching, rest): (VecDeque<_>, VecDeque<_>) = self
            .pending_drops
            .drain(..)
            .partition(|drop| drop.transaction.as_ref() == Some(&log.transaction_hash));
        self.pending_drops = rest;
        for drop in matching {
            self.ctx.bus.emit(DomainEvent::EquipmentDropped { drop });
        }
    }

    fn publish_drop(&mut self, log: &LogRecord) {
        let mut drop = normalize_equipment_drop(&log.raw());
        drop.transaction = Some(log.transaction_hash.clone());

        let summary_tx = self
            .ctx
            .store
            .last_fight_summary()
            .and_then(|summary| summary.transaction);
        if summary_tx.as_ref() == Some(&log.transaction_hash) {
            self.ctx.bus.emit(DomainEvent::EquipmentDropped { drop });
            return;
        }

        debug!(
            target: "runtime::ingest",
            transaction = %log.transaction_hash,
            "equipment drop held until its fight summary arrives"
        );
        if self.pending_drops.len() == self.recent.capacity
            && let Some(oldest) = self.pending_drops.pop_front()
        {
            debug!(
                target: "runtime::ingest",
                transaction = ?oldest.transaction,
                "equipment drop surfaced without its fight summary"
            );
            self.ctx.bus.emit(DomainEvent::EquipmentDropped { drop: oldest });
        }
        self.pending_drops.push_back(drop);
    }
}
