//! Operation lifecycle state.
//!
//! An operation moves `pending -> processing -> {completed | error}`. Only
//! pending and processing operations are active; the store refuses to start
//! a second one while one is active.

use std::fmt;

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Opaque transaction handle returned by the ledger on submission.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First ten characters followed by an ellipsis, for status lines.
    pub fn short(&self) -> String {
        let prefix: String = self.0.chars().take(10).collect();
        format!("{prefix}...")
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every tracked action, grouped by family.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum OperationKind {
    // Character family
    CreateCharacter,
    HealCharacter,
    ResurrectCharacter,
    // Combat family
    FightEnemy,
    ContinueFight,
    FleeRound,
    // Read families
    LoadPools,
    LoadLeaderboard,
    LoadClaims,
    // Claims family
    ClaimPrize,
}

impl OperationKind {
    /// Mutating operations submit a ledger transaction.
    pub const fn is_write(self) -> bool {
        !matches!(
            self,
            Self::LoadPools | Self::LoadLeaderboard | Self::LoadClaims
        )
    }

    /// Whether a successful run changes the character record on the ledger.
    pub const fn touches_character(self) -> bool {
        matches!(
            self,
            Self::CreateCharacter
                | Self::HealCharacter
                | Self::ResurrectCharacter
                | Self::FightEnemy
                | Self::ContinueFight
                | Self::FleeRound
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OperationStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl OperationStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationState {
    pub is_active: bool,
    pub kind: OperationKind,
    pub status: OperationStatus,
    pub hash: Option<TxHash>,
    /// Milliseconds since the Unix epoch.
    pub start_time: u64,
    pub progress: Option<String>,
    pub error: Option<String>,
    pub is_write: bool,
}

impl OperationState {
    /// Fresh pending operation.
    pub fn pending(kind: OperationKind, progress: impl Into<String>, start_time: u64) -> Self {
        Self {
            is_active: true,
            kind,
            status: OperationStatus::Pending,
            hash: None,
            start_time,
            progress: Some(progress.into()),
            error: None,
            is_write: kind.is_write(),
        }
    }

    pub fn processing(&self, progress: impl Into<String>) -> Self {
        Self {
            status: OperationStatus::Processing,
            progress: Some(progress.into()),
            ..self.clone()
        }
    }

    pub fn completed(&self, hash: Option<TxHash>, progress: impl Into<String>) -> Self {
        Self {
            is_active: false,
            status: OperationStatus::Completed,
            hash,
            progress: Some(progress.into()),
            ..self.clone()
        }
    }

    pub fn failed(&self, error: impl Into<String>) -> Self {
        Self {
            is_active: false,
            status: OperationStatus::Error,
            error: Some(error.into()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_only_terminal_states_are_inactive() {
        let pending = OperationState::pending(OperationKind::FightEnemy, "Fighting...", 7);
        assert!(pending.is_active);
        assert!(pending.is_write);

        let processing = pending.processing("Submitting...");
        assert!(processing.is_active);
        assert_eq!(processing.start_time, 7);

        let done = processing.completed(Some(TxHash::new("0xabc")), "Done");
        assert!(!done.is_active);
        assert!(done.status.is_terminal());
        assert_eq!(done.hash, Some(TxHash::new("0xabc")));

        let failed = processing.failed("boom");
        assert!(!failed.is_active);
        assert_eq!(failed.status, OperationStatus::Error);
        assert_eq!(failed.error.as_deref(), Some("boom"));
    }

    #[test]
    fn read_operations_are_not_writes() {
        assert!(!OperationKind::LoadPools.is_write());
        assert!(OperationKind::ClaimPrize.is_write());
        assert_eq!(OperationKind::FleeRound.to_string(), "fleeRound");
    }

    #[test]
    fn short_hash_keeps_prefix() {
        assert_eq!(TxHash::new("0x1234567890abcdef").short(), "0x12345678...");
    }
}
