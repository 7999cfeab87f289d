//! Pools, leaderboard and claims snapshots.

use strum::{AsRefStr, Display, EnumIter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum PoolKind {
    Prize,
    Equipment,
    GasRefund,
    Developer,
    NextEpoch,
    Emergency,
}

impl PoolKind {
    pub const fn description(self) -> &'static str {
        match self {
            Self::Prize => "Rewards for top players each epoch",
            Self::Equipment => "Funding for equipment drops",
            Self::GasRefund => "Gas fee reimbursements",
            Self::Developer => "Development funding",
            Self::NextEpoch => "Reserved for next epoch rewards",
            Self::Emergency => "Emergency funds and contingency",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolEntry {
    pub kind: PoolKind,
    pub value: u128,
    pub formatted: String,
    pub description: String,
    /// Integer share of the total, 0 when the total is 0.
    pub percentage: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolsData {
    pub entries: Vec<PoolEntry>,
    pub total_value: u128,
    pub last_updated: u64,
}

impl PoolsData {
    pub fn get(&self, kind: PoolKind) -> Option<&PoolEntry> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaderboardEntry {
    pub address: String,
    pub score: u128,
    pub rank: u64,
    pub level: u32,
    pub kills: u32,
    pub is_current_player: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeaderboardData {
    pub current_epoch: u64,
    pub player_score: u128,
    pub player_rank: u64,
    pub total_players: u64,
    pub top_players: Vec<LeaderboardEntry>,
    /// Seconds until the epoch closes.
    pub epoch_time_remaining: u64,
    pub last_updated: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RewardKind {
    Epoch,
    Equipment,
    GasRefund,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimableReward {
    pub kind: RewardKind,
    pub amount: u128,
    pub description: String,
    pub can_claim: bool,
    pub epoch: Option<u64>,
    pub index: Option<u64>,
    pub proof: Vec<String>,
}

impl ClaimableReward {
    pub fn matches(&self, epoch: u64, index: u64) -> bool {
        self.epoch == Some(epoch) && self.index == Some(index)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimsData {
    pub available: Vec<ClaimableReward>,
    pub total_claimable: u128,
    pub last_checked: u64,
}

impl ClaimsData {
    pub fn new(available: Vec<ClaimableReward>, last_checked: u64) -> Self {
        let total_claimable = available.iter().map(|reward| reward.amount).sum();
        Self {
            available,
            total_claimable,
            last_checked,
        }
    }

    /// Drops the reward for `(epoch, index)` and recomputes the total.
    pub fn without(&self, epoch: u64, index: u64, last_checked: u64) -> Self {
        let remaining = self
            .available
            .iter()
            .filter(|reward| !reward.matches(epoch, index))
            .cloned()
            .collect();
        Self::new(remaining, last_checked)
    }
}
