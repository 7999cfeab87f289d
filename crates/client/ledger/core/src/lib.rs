//! Ledger collaborator contract for the brawler client.
//!
//! The authoritative game rules live in a remote contract. This crate
//! describes the adapter the runtime talks to, layered the same way as the
//! rest of the client:
//!
//! ```text
//! Layer 2: LedgerClient (composite trait)
//!          ├── CharacterLedger   (character reads, fees, create/heal/resurrect)
//!          ├── CombatLedger      (fight/continue/flee)
//!          ├── EconomyLedger     (pools, epochs, leaderboard, merkle claims)
//!          └── LedgerEvents      (log subscriptions)
//!
//! Layer 1: Domain traits (game concepts)
//! ```
//!
//! Reads return plain values or `None`; writes return an opaque [`TxHash`] or
//! a [`LedgerError`]; subscriptions deliver batches of raw [`LogRecord`]s
//! at-least-once with no ordering across streams.
//!
//! # Usage
//!
//! ```ignore
//! use client_ledger_core::{CombatLedger, LedgerClient};
//!
//! async fn brawl(ledger: &dyn LedgerClient) -> Result<(), LedgerError> {
//!     let hash = ledger.fight_enemy(1, 3).await?;
//!     tracing::info!(%hash, "fight submitted");
//!     Ok(())
//! }
//! ```

pub mod codes;
pub mod error;
pub mod traits;
pub mod types;
pub mod watch;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use codes::{ErrorCategory, UNKNOWN_ERROR_CODE, is_retryable, revert_category, revert_message};
pub use error::LedgerError;
pub use traits::{CharacterLedger, CombatLedger, EconomyLedger, LedgerClient, LedgerEvents};
pub use types::{
    EnemyStats, Eligibility, LedgerEventKind, LogBatch, LogCallback, LogRecord, MerkleProof,
    PoolBalances,
};
pub use watch::WatchHandle;

pub use game_core::{CharacterRecord, CombatState, TxHash};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockLedgerClient;
