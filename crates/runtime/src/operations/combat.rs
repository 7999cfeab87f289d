//! Combat family: fight, continue, flee.

use game_core::validation::{validate_enemy_id, validate_enemy_level};
use game_core::{
    OperationKind, TxHash, UxState, ValidationError, ValidationResult, can_continue_fight,
    can_fight, can_flee, enemy_name,
};

use super::OperationContext;
use super::lifecycle::Completion;
use crate::api::Result;

pub struct CombatOperations {
    ctx: OperationContext,
}

impl CombatOperations {
    pub(crate) fn new(ctx: OperationContext) -> Self {
        Self { ctx }
    }

    /// Starts a fight against `enemy_id` at `enemy_level`.
    ///
    /// Inputs are checked before any ledger call; the ledger is then asked
    /// whether the character is already fighting.
    pub async fn fight_enemy(&self, enemy_id: u8, enemy_level: u32) -> Result<TxHash> {
        let kind = OperationKind::FightEnemy;
        let player = self.ctx.require_player()?;
        self.ctx.store.with_state(can_fight)?;
        validate_enemy_id(enemy_id)?;
        validate_enemy_level(enemy_level)?;

        let progress = format!(
            "Fighting {} (level {enemy_level})...",
            enemy_name(i64::from(enemy_id))
        );
        let in_combat = self
            .ctx
            .precheck(
                kind,
                &progress,
                can_fight,
                self.ctx.ledger.is_character_in_combat(&player),
            )
            .await?;
        if in_combat {
            return Err(ValidationError::AlreadyInCombat.into());
        }

        let tracker = self.ctx.begin(kind, progress, can_fight)?;
        tracker
            .run(self.ctx.ledger.fight_enemy(enemy_id, enemy_level), |hash| {
                Completion::submitted(hash, format!("Fight started! Transaction: {}", hash.short()))
            })
            .await
    }

    pub async fn continue_fight(&self) -> Result<TxHash> {
        let kind = OperationKind::ContinueFight;
        let progress = "Continuing fight...";
        self.require_ledger_combat(kind, progress, can_continue_fight)
            .await?;

        let tracker = self.ctx.begin(kind, progress, can_continue_fight)?;
        tracker
            .run(self.ctx.ledger.continue_fight(), |hash| {
                Completion::submitted(
                    hash,
                    format!("Fight continued! Transaction: {}", hash.short()),
                )
            })
            .await
    }

    pub async fn flee_round(&self) -> Result<TxHash> {
        let kind = OperationKind::FleeRound;
        let progress = "Fleeing from combat...";
        self.require_ledger_combat(kind, progress, can_flee).await?;

        let tracker = self.ctx.begin(kind, progress, can_flee)?;
        tracker
            .run(self.ctx.ledger.flee_round(), |hash| {
                Completion::submitted(
                    hash,
                    format!("Fled from combat! Transaction: {}", hash.short()),
                )
            })
            .await
    }

    async fn require_ledger_combat(
        &self,
        kind: OperationKind,
        progress: &str,
        predicate: fn(&UxState) -> ValidationResult,
    ) -> Result<()> {
        let player = self.ctx.require_player()?;
        self.ctx.store.with_state(predicate)?;

        let in_combat = self
            .ctx
            .precheck(
                kind,
                progress,
                predicate,
                self.ctx.ledger.is_character_in_combat(&player),
            )
            .await?;
        if in_combat {
            Ok(())
        } else {
            Err(ValidationError::NotInCombat.into())
        }
    }
}
