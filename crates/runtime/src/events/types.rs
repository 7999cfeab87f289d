//! Domain events carried by the [`super::EventBus`].

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};

use game_core::{
    CharacterData, ClaimsData, EquipmentDropData, FightSummaryData, HealingData, LeaderboardData,
    OperationKind, PoolsData, ResurrectionData, TxHash,
};

/// Discriminant of [`DomainEvent`], used as the subscription key.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, AsRefStr, EnumIter, Serialize,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    CharacterCreated,
    CharacterUpdated,
    FightStarted,
    FightCompleted,
    EquipmentDropped,
    HealingStarted,
    HealingCompleted,
    ResurrectionStarted,
    ResurrectionCompleted,
    OperationStarted,
    OperationCompleted,
    OperationFailed,
    PoolsUpdated,
    LeaderboardUpdated,
    ClaimsUpdated,
    ClaimStarted,
    ClaimCompleted,
    ClaimFailed,
    StateChanged,
    ErrorOccurred,
}

/// Every event the runtime publishes, each with its own payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomainEvent {
    CharacterCreated {
        transaction: Option<TxHash>,
    },
    CharacterUpdated {
        character: Option<Box<CharacterData>>,
    },
    FightStarted {
        transaction: Option<TxHash>,
    },
    FightCompleted {
        summary: Box<FightSummaryData>,
    },
    EquipmentDropped {
        drop: EquipmentDropData,
    },
    HealingStarted {
        transaction: Option<TxHash>,
    },
    HealingCompleted {
        healing: HealingData,
    },
    ResurrectionStarted {
        transaction: Option<TxHash>,
    },
    ResurrectionCompleted {
        resurrection: ResurrectionData,
    },
    OperationStarted {
        kind: OperationKind,
        progress: String,
    },
    OperationCompleted {
        kind: OperationKind,
        transaction: Option<TxHash>,
    },
    OperationFailed {
        kind: OperationKind,
        error: String,
    },
    PoolsUpdated {
        pools: PoolsData,
    },
    LeaderboardUpdated {
        leaderboard: LeaderboardData,
    },
    ClaimsUpdated {
        claims: ClaimsData,
    },
    ClaimStarted {
        epoch: u64,
        index: u64,
    },
    ClaimCompleted {
        epoch: u64,
        index: u64,
        transaction: Option<TxHash>,
    },
    ClaimFailed {
        epoch: u64,
        index: u64,
        error: String,
    },
    StateChanged {
        status_message: String,
    },
    ErrorOccurred {
        message: String,
        code: Option<&'static str>,
    },
}

impl DomainEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CharacterCreated { .. } => EventKind::CharacterCreated,
            Self::CharacterUpdated { .. } => EventKind::CharacterUpdated,
            Self::FightStarted { .. } => EventKind::FightStarted,
            Self::FightCompleted { .. } => EventKind::FightCompleted,
            Self::EquipmentDropped { .. } => EventKind::EquipmentDropped,
            Self::HealingStarted { .. } => EventKind::HealingStarted,
            Self::HealingCompleted { .. } => EventKind::HealingCompleted,
            Self::ResurrectionStarted { .. } => EventKind::ResurrectionStarted,
            Self::ResurrectionCompleted { .. } => EventKind::ResurrectionCompleted,
            Self::OperationStarted { .. } => EventKind::OperationStarted,
            Self::OperationCompleted { .. } => EventKind::OperationCompleted,
            Self::OperationFailed { .. } => EventKind::OperationFailed,
            Self::PoolsUpdated { .. } => EventKind::PoolsUpdated,
            Self::LeaderboardUpdated { .. } => EventKind::LeaderboardUpdated,
            Self::ClaimsUpdated { .. } => EventKind::ClaimsUpdated,
            Self::ClaimStarted { .. } => EventKind::ClaimStarted,
            Self::ClaimCompleted { .. } => EventKind::ClaimCompleted,
            Self::ClaimFailed { .. } => EventKind::ClaimFailed,
            Self::StateChanged { .. } => EventKind::StateChanged,
            Self::ErrorOccurred { .. } => EventKind::ErrorOccurred,
        }
    }
}

/// A published event with its emission time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventEnvelope {
    pub event: DomainEvent,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl EventEnvelope {
    pub fn new(event: DomainEvent) -> Self {
        Self {
            event,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.event.kind()
    }
}
