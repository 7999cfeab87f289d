//! Values exchanged with the ledger adapter.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

use game_core::{RawRecord, TxHash};

/// Contract event streams the client subscribes to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, Serialize, Deserialize,
)]
pub enum LedgerEventKind {
    FightSummary,
    CharacterHealed,
    CharacterResurrected,
    EquipmentDropped,
}

/// One raw log as delivered by a subscription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub transaction_hash: TxHash,
    pub log_index: u64,
    /// Indexed `player` topic, when the event carries one.
    pub player: Option<String>,
    /// Decoded event arguments, loosely typed.
    pub args: serde_json::Value,
}

impl LogRecord {
    pub fn new(
        transaction_hash: TxHash,
        log_index: u64,
        player: Option<String>,
        args: serde_json::Value,
    ) -> Self {
        Self {
            transaction_hash,
            log_index,
            player,
            args,
        }
    }

    /// `(transaction, log index)` uniquely identifies a log.
    pub fn id(&self) -> (TxHash, u64) {
        (self.transaction_hash.clone(), self.log_index)
    }

    pub fn raw(&self) -> RawRecord {
        RawRecord::from_value(self.args.clone())
    }
}

pub type LogBatch = Vec<LogRecord>;

/// Subscription callback. Must not block; adapters call it from their own
/// polling task.
pub type LogCallback = Box<dyn Fn(LogBatch) + Send + Sync>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub combat: u32,
    pub endurance: u32,
    pub defense: u32,
    pub luck: u32,
    pub xp_reward: u32,
}

/// Raw pool balances in the smallest currency unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolBalances {
    pub prize: u128,
    pub equipment: u128,
    pub gas_refund: u128,
    pub developer: u128,
    pub next_epoch: u128,
    pub emergency: u128,
}

/// Merkle leaf data for a player's epoch reward.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub amount: u128,
    pub index: u64,
    pub proof: Vec<String>,
}

/// Answer of an eligibility query such as `can_heal`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub allowed: bool,
    pub reason: String,
}

impl Eligibility {
    pub fn allowed() -> Self {
        Self {
            allowed: true,
            reason: String::new(),
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: reason.into(),
        }
    }
}
