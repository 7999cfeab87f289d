//! Tracked ledger operations, one module per action family.
//!
//! Every family drives the same lifecycle through [`lifecycle::Tracker`]:
//! local validation, ledger precondition, `pending`, `processing`, then
//! `completed` or `error` with exactly one terminal event.

mod character;
mod claims;
mod combat;
mod leaderboard;
mod lifecycle;
mod pools;

pub use character::CharacterOperations;
pub use claims::ClaimsOperations;
pub use combat::CombatOperations;
pub use leaderboard::LeaderboardOperations;
pub use pools::PoolsOperations;

use std::sync::Arc;

use client_ledger_core::{LedgerClient, LedgerError};
use game_core::{CharacterData, ValidationError, character_from_record};

use crate::config::RuntimeConfig;
use crate::events::{DomainEvent, EventBus};
use crate::state::{StateStore, UxStatePatch};

/// Shared handles every operation family works through.
#[derive(Clone)]
pub struct OperationContext {
    pub(crate) store: StateStore,
    pub(crate) bus: EventBus,
    pub(crate) ledger: Arc<dyn LedgerClient>,
    pub(crate) config: Arc<RuntimeConfig>,
}

impl OperationContext {
    pub(crate) fn new(
        store: StateStore,
        bus: EventBus,
        ledger: Arc<dyn LedgerClient>,
        config: Arc<RuntimeConfig>,
    ) -> Self {
        Self {
            store,
            bus,
            ledger,
            config,
        }
    }

    /// The session address, or the validation error for a missing session.
    pub(crate) fn require_player(&self) -> Result<String, ValidationError> {
        self.store
            .player_address()
            .ok_or(ValidationError::PlayerAddressMissing)
    }

    /// Reads the character view for `player` from the ledger.
    ///
    /// Combat state is only read for living characters; a failed cooldown
    /// read degrades to zero.
    pub(crate) async fn fetch_character(
        &self,
        player: &str,
    ) -> Result<(Option<CharacterData>, u64), LedgerError> {
        let Some(record) = self
            .ledger
            .get_character(player)
            .await?
            .filter(|record| record.level > 0)
        else {
            return Ok((None, 0));
        };

        let combat = if record.alive {
            self.ledger.get_combat_state(player).await?
        } else {
            None
        };

        let cooldown = match self.ledger.healing_cooldown_remaining(player).await {
            Ok(seconds) => seconds,
            Err(err) => {
                tracing::warn!(
                    target: "runtime::ops",
                    error = %err,
                    "healing cooldown read failed, assuming none"
                );
                0
            }
        };

        Ok((Some(character_from_record(&record, combat.as_ref())), cooldown))
    }

    /// Re-reads the session character and publishes it.
    pub(crate) async fn refresh_character(&self) -> Result<Option<CharacterData>, LedgerError> {
        let Some(player) = self.store.player_address() else {
            return Ok(None);
        };
        let (character, cooldown) = self.fetch_character(&player).await?;

        // The session may have been reset while the reads were in flight.
        if self.store.player_address().as_deref() != Some(player.as_str()) {
            return Ok(None);
        }

        let patch = UxStatePatch::new()
            .character(character.clone())
            .healing_cooldown_remaining(cooldown);
        if let Err(err) = self.store.batch_update(patch) {
            tracing::warn!(target: "runtime::ops", error = %err, "character update refused");
        }
        self.bus.emit(DomainEvent::CharacterUpdated {
            character: character.clone().map(Box::new),
        });
        Ok(character)
    }

    /// [`Self::refresh_character`] for follow-up reads whose failure must
    /// not fail the operation that triggered them.
    pub(crate) async fn refresh_character_quietly(&self) {
        if let Err(err) = self.refresh_character().await {
            tracing::warn!(target: "runtime::ops", error = %err, "character refresh failed");
        }
    }
}
