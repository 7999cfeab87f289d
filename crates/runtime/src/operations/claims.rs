//! Claims family: discover and claim epoch rewards.

use client_ledger_core::LedgerError;
use game_core::validation::validate_merkle_proof;
use game_core::{
    ClaimableReward, ClaimsData, OperationKind, RewardKind, TxHash, UxState, ValidationError,
    ValidationResult, can_claim_prize, can_view_claims,
};

use super::lifecycle::{Completion, now_ms};
use super::OperationContext;
use crate::api::Result;
use crate::events::DomainEvent;

pub struct ClaimsOperations {
    ctx: OperationContext,
}

impl ClaimsOperations {
    pub(crate) fn new(ctx: OperationContext) -> Self {
        Self { ctx }
    }

    /// Collects unclaimed rewards for the current epoch and the configured
    /// number of earlier ones.
    pub async fn load_claims(&self) -> Result<ClaimsData> {
        let player = self.ctx.require_player()?;
        self.ctx.store.with_state(can_view_claims)?;

        let tracker =
            self.ctx
                .begin(OperationKind::LoadClaims, "Checking rewards...", can_view_claims)?;

        tracker
            .run(self.read(&player), |claims| {
                self.ctx.store.set_claims(Some(claims.clone()));
                self.ctx.bus.emit(DomainEvent::ClaimsUpdated {
                    claims: claims.clone(),
                });
                Completion::read("Rewards checked")
            })
            .await
    }

    async fn read(&self, player: &str) -> std::result::Result<ClaimsData, LedgerError> {
        let ledger = &self.ctx.ledger;
        let current_epoch = ledger.current_epoch().await?;
        let oldest = current_epoch.saturating_sub(self.ctx.config.claims.lookback_epochs);

        let mut rewards = Vec::new();
        for epoch in (oldest..=current_epoch).rev() {
            let Some(leaf) = ledger.merkle_proof_for_player(player, epoch).await? else {
                continue;
            };
            if leaf.amount == 0 || ledger.is_claimed(epoch, leaf.index).await? {
                continue;
            }
            rewards.push(ClaimableReward {
                kind: RewardKind::Epoch,
                amount: leaf.amount,
                description: format!("Epoch {epoch} leaderboard reward"),
                can_claim: true,
                epoch: Some(epoch),
                index: Some(leaf.index),
                proof: leaf.proof,
            });
        }

        Ok(ClaimsData::new(rewards, now_ms()))
    }

    /// Claims the cached reward for `(epoch, index)`.
    ///
    /// The reward must be in the cached claims with the same amount, the
    /// proof must be well formed, and the ledger must not have it marked as
    /// claimed already.
    pub async fn claim_prize(
        &self,
        epoch: u64,
        index: u64,
        amount: u128,
        proof: Vec<String>,
    ) -> Result<TxHash> {
        let kind = OperationKind::ClaimPrize;
        let progress = format!("Claiming reward for epoch {epoch}...");
        self.ctx.require_player()?;

        let precondition = |state: &UxState| -> ValidationResult {
            let reward = cached_reward(state, epoch, index);
            can_claim_prize(state, reward)?;
            if reward.is_some_and(|reward| reward.amount != amount) {
                return Err(ValidationError::RewardNotClaimable);
            }
            Ok(())
        };
        self.ctx.store.with_state(precondition)?;
        validate_merkle_proof(&proof)?;

        let claimed = self
            .ctx
            .precheck(kind, &progress, precondition, self.ctx.ledger.is_claimed(epoch, index))
            .await?;
        if claimed {
            return Err(ValidationError::RewardAlreadyClaimed.into());
        }

        let tracker = self.ctx.begin(kind, progress, precondition)?;
        self.ctx.bus.emit(DomainEvent::ClaimStarted { epoch, index });

        let result = tracker
            .run(
                self.ctx.ledger.claim_prize(epoch, index, amount, &proof),
                |hash| {
                    if let Some(claims) = self.ctx.store.claims() {
                        let remaining = claims.without(epoch, index, now_ms());
                        self.ctx.store.set_claims(Some(remaining.clone()));
                        self.ctx.bus.emit(DomainEvent::ClaimsUpdated { claims: remaining });
                    }
                    self.ctx.bus.emit(DomainEvent::ClaimCompleted {
                        epoch,
                        index,
                        transaction: Some(hash.clone()),
                    });
                    Completion::submitted(
                        hash,
                        format!("Reward claimed! Transaction: {}", hash.short()),
                    )
                },
            )
            .await;

        if let Err(err) = &result {
            self.ctx.bus.emit(DomainEvent::ClaimFailed {
                epoch,
                index,
                error: err.to_string(),
            });
        }
        result
    }
}

fn cached_reward(state: &UxState, epoch: u64, index: u64) -> Option<&ClaimableReward> {
    state
        .claims
        .as_ref()?
        .available
        .iter()
        .find(|reward| reward.matches(epoch, index))
}
