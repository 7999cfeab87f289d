//! Character family: create, heal, resurrect.

use game_core::validation::validate_character_class;
use game_core::{
    CharacterClass, OperationKind, TxHash, ValidationError, can_create_character, can_heal,
    can_resurrect,
};

use super::OperationContext;
use super::lifecycle::Completion;
use crate::api::Result;

pub struct CharacterOperations {
    ctx: OperationContext,
}

impl CharacterOperations {
    pub(crate) fn new(ctx: OperationContext) -> Self {
        Self { ctx }
    }

    /// Creates a character of `class_id` (0..=3), paying the creation fee.
    pub async fn create_character(&self, class_id: u8) -> Result<TxHash> {
        let kind = OperationKind::CreateCharacter;
        let player = self.ctx.require_player()?;
        self.ctx.store.with_state(can_create_character)?;
        validate_character_class(class_id)?;

        let class = CharacterClass::from_id(class_id)
            .map(|class| class.to_string())
            .unwrap_or_default();
        let progress = format!("Creating {class}...");

        let existing = self
            .ctx
            .precheck(
                kind,
                &progress,
                can_create_character,
                self.ctx.ledger.get_character(&player),
            )
            .await?;
        if existing.is_some_and(|record| record.level > 0) {
            return Err(ValidationError::CharacterAlreadyExists.into());
        }

        let tracker = self.ctx.begin(kind, progress, can_create_character)?;
        let ledger = &self.ctx.ledger;
        tracker
            .run(
                async {
                    let fee = ledger.creation_fee().await?;
                    ledger.create_character(class_id, fee).await
                },
                |hash| Completion::submitted(hash, format!("Character created! Transaction: {}", hash.short())),
            )
            .await
    }

    /// Restores full endurance, paying the healing fee.
    pub async fn heal_character(&self) -> Result<TxHash> {
        let kind = OperationKind::HealCharacter;
        let progress = "Healing character...";
        let player = self.ctx.require_player()?;
        self.ctx.store.with_state(can_heal)?;

        let eligibility = self
            .ctx
            .precheck(kind, progress, can_heal, self.ctx.ledger.can_heal(&player))
            .await?;
        if !eligibility.allowed {
            return Err(ledger_refusal(kind, eligibility.reason).into());
        }

        let tracker = self.ctx.begin(kind, progress, can_heal)?;
        let ledger = &self.ctx.ledger;
        tracker
            .run(
                async {
                    let fee = ledger.healing_fee().await?;
                    ledger.heal_character(fee).await
                },
                |hash| Completion::submitted(hash, format!("Character healed! Transaction: {}", hash.short())),
            )
            .await
    }

    /// Brings a dead character back, paying the resurrection fee.
    pub async fn resurrect_character(&self) -> Result<TxHash> {
        let kind = OperationKind::ResurrectCharacter;
        let progress = "Resurrecting character...";
        let player = self.ctx.require_player()?;
        self.ctx.store.with_state(can_resurrect)?;

        let eligibility = self
            .ctx
            .precheck(
                kind,
                progress,
                can_resurrect,
                self.ctx.ledger.can_resurrect(&player),
            )
            .await?;
        if !eligibility.allowed {
            return Err(ledger_refusal(kind, eligibility.reason).into());
        }

        let tracker = self.ctx.begin(kind, progress, can_resurrect)?;
        let ledger = &self.ctx.ledger;
        tracker
            .run(
                async {
                    let fee = ledger.resurrection_fee().await?;
                    ledger.resurrect_character(fee).await
                },
                |hash| {
                    Completion::submitted(
                        hash,
                        format!("Character resurrected! Transaction: {}", hash.short()),
                    )
                },
            )
            .await
    }
}

fn ledger_refusal(kind: OperationKind, reason: String) -> ValidationError {
    tracing::debug!(target: "runtime::ops", operation = %kind, %reason, "ledger refused precondition");
    ValidationError::LedgerRefused(reason)
}
