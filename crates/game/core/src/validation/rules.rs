//! Per-action state predicates.
//!
//! Checks run in a fixed precedence and stop at the first failure:
//! existence, alive/dead, combat, action-specific (health, cooldown, reward),
//! active operation, loading, session error.

use crate::state::{CharacterData, ClaimableReward, OperationKind, UxState};

use super::{ValidationError, ValidationResult};

fn require_character(state: &UxState) -> Result<&CharacterData, ValidationError> {
    state
        .existing_character()
        .ok_or(ValidationError::CharacterMissing)
}

fn require_idle(state: &UxState) -> ValidationResult {
    if state.has_active_operation() {
        return Err(ValidationError::OperationInProgress);
    }
    if state.is_loading {
        return Err(ValidationError::SystemInitializing);
    }
    Ok(())
}

fn require_healthy_session(state: &UxState) -> ValidationResult {
    require_idle(state)?;
    if state.error.is_some() {
        return Err(ValidationError::SystemError);
    }
    Ok(())
}

pub fn can_create_character(state: &UxState) -> ValidationResult {
    if state.existing_character().is_some() {
        return Err(ValidationError::CharacterAlreadyExists);
    }
    require_healthy_session(state)
}

pub fn can_fight(state: &UxState) -> ValidationResult {
    let character = require_character(state)?;
    if !character.is_alive {
        return Err(ValidationError::CharacterDead);
    }
    if character.in_combat {
        return Err(ValidationError::AlreadyInCombat);
    }
    require_healthy_session(state)
}

pub fn can_heal(state: &UxState) -> ValidationResult {
    let character = require_character(state)?;
    if !character.is_alive {
        return Err(ValidationError::CharacterDead);
    }
    if character.in_combat {
        return Err(ValidationError::InCombat);
    }
    if character.endurance.percentage >= 100.0 {
        return Err(ValidationError::FullHealth);
    }
    if state.healing_cooldown_remaining > 0 {
        return Err(ValidationError::HealingCooldown(
            state.healing_cooldown_remaining,
        ));
    }
    require_healthy_session(state)
}

pub fn can_resurrect(state: &UxState) -> ValidationResult {
    let character = require_character(state)?;
    if character.is_alive {
        return Err(ValidationError::CharacterAlive);
    }
    if character.in_combat {
        return Err(ValidationError::InCombat);
    }
    require_healthy_session(state)
}

pub fn can_continue_fight(state: &UxState) -> ValidationResult {
    let character = require_character(state)?;
    if !character.in_combat {
        return Err(ValidationError::NotInCombat);
    }
    require_healthy_session(state)
}

pub fn can_flee(state: &UxState) -> ValidationResult {
    can_continue_fight(state)
}

pub fn can_view_pools(state: &UxState) -> ValidationResult {
    require_idle(state)
}

pub fn can_view_leaderboard(state: &UxState) -> ValidationResult {
    require_idle(state)
}

pub fn can_view_claims(state: &UxState) -> ValidationResult {
    require_character(state)?;
    require_idle(state)
}

/// `reward` is the cached entry the user picked, if any.
pub fn can_claim_prize(state: &UxState, reward: Option<&ClaimableReward>) -> ValidationResult {
    require_character(state)?;
    if !reward.is_some_and(|reward| reward.can_claim) {
        return Err(ValidationError::RewardNotClaimable);
    }
    require_healthy_session(state)
}

/// Gate for starting any tracked operation.
///
/// For `ClaimPrize` the first claimable cached reward stands in; the claims
/// operation checks the exact reward with [`can_claim_prize`].
pub fn can_start_operation(kind: OperationKind, state: &UxState) -> ValidationResult {
    match kind {
        OperationKind::CreateCharacter => can_create_character(state),
        OperationKind::FightEnemy => can_fight(state),
        OperationKind::ContinueFight => can_continue_fight(state),
        OperationKind::FleeRound => can_flee(state),
        OperationKind::HealCharacter => can_heal(state),
        OperationKind::ResurrectCharacter => can_resurrect(state),
        OperationKind::LoadPools => can_view_pools(state),
        OperationKind::LoadLeaderboard => can_view_leaderboard(state),
        OperationKind::LoadClaims => can_view_claims(state),
        OperationKind::ClaimPrize => {
            let reward = state
                .claims
                .as_ref()
                .and_then(|claims| claims.available.iter().find(|reward| reward.can_claim));
            can_claim_prize(state, reward)
        }
    }
}
