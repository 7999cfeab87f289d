//! Client-side state orchestration for the brawler game.
//!
//! This crate keeps one player session's view of the ledger-backed game in a
//! single [`StateStore`], tracks every ledger interaction through one
//! operation lifecycle, and publishes what happened on a typed [`EventBus`].
//! Hosts embed [`Runtime`] to drive actions and read or subscribe to state.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the result and error types hosts interact with
//! - [`events`] provides the typed event bus
//! - [`state`] owns the UX state store
//! - [`operations`] drives the tracked ledger operations, one family per module
//! - [`handlers`] folds events back into the store
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod handlers;
pub mod operations;
pub mod runtime;
pub mod state;

mod workers;

pub use api::{OperationResult, Result, RuntimeError};
pub use config::{ClaimsConfig, CurrencyConfig, EventConfig, LeaderboardConfig, RuntimeConfig};
pub use events::{DomainEvent, EventBus, EventEnvelope, EventKind, ListenerId, ListenerResult, Subscription};
pub use handlers::EventHandler;
pub use operations::{
    CharacterOperations, ClaimsOperations, CombatOperations, LeaderboardOperations,
    OperationContext, PoolsOperations,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use state::{StateStore, UxStatePatch};

#[cfg(feature = "mock")]
pub use client_ledger_core::MockLedgerClient;
