//! Whole-state consistency checks.
//!
//! These never gate actions; the runtime logs their findings and UIs can show
//! [`validation_message`] in a diagnostics panel.

use crate::state::{CharacterData, MenuState, OperationState, OperationStatus, UxState};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("Invalid character level")]
    CharacterLevel,
    #[error("Invalid endurance percentage")]
    EndurancePercentage,
    #[error("Current endurance exceeds maximum")]
    EnduranceOverflow,

    #[error("Active operation missing start time")]
    OperationStartTime,
    #[error("Error operation missing error message")]
    OperationErrorText,
    #[error("Active operation has terminal status")]
    OperationTerminalButActive,

    #[error("Menu allows character creation when character exists")]
    MenuCreateWithCharacter,
    #[error("Menu allows character actions when no character exists")]
    MenuActionsWithoutCharacter,
    #[error("Menu allows resurrection when character is alive")]
    MenuResurrectAlive,
    #[error("Menu allows actions when character is dead")]
    MenuActionsDead,
    #[error("Menu allows actions when character is in combat")]
    MenuActionsInCombat,
    #[error("Menu allows combat actions when character is not in combat")]
    MenuCombatOutsideCombat,
}

pub fn validate_character_state(character: Option<&CharacterData>) -> Result<(), ConsistencyError> {
    let Some(character) = character else {
        return Ok(());
    };
    let percentage = character.endurance.percentage;
    if !(0.0..=100.0).contains(&percentage) {
        return Err(ConsistencyError::EndurancePercentage);
    }
    if !character.exists {
        return Ok(());
    }
    if character.level < 1 {
        return Err(ConsistencyError::CharacterLevel);
    }
    if character.endurance.current > character.endurance.max {
        return Err(ConsistencyError::EnduranceOverflow);
    }
    Ok(())
}

pub fn validate_operation_state(operation: Option<&OperationState>) -> Result<(), ConsistencyError> {
    let Some(operation) = operation else {
        return Ok(());
    };
    if operation.is_active && operation.start_time == 0 {
        return Err(ConsistencyError::OperationStartTime);
    }
    if operation.is_active && operation.status.is_terminal() {
        return Err(ConsistencyError::OperationTerminalButActive);
    }
    if operation.status == OperationStatus::Error && operation.error.is_none() {
        return Err(ConsistencyError::OperationErrorText);
    }
    Ok(())
}

pub fn validate_menu_consistency(
    menu: &MenuState,
    character: Option<&CharacterData>,
) -> Result<(), ConsistencyError> {
    let character = character.filter(|c| c.exists);
    let exists = character.is_some();
    let alive = character.is_some_and(|c| c.is_alive);
    let in_combat = character.is_some_and(|c| c.in_combat);

    if exists && menu.can_create_character {
        return Err(ConsistencyError::MenuCreateWithCharacter);
    }
    if !exists && (menu.can_fight || menu.can_heal || menu.can_resurrect) {
        return Err(ConsistencyError::MenuActionsWithoutCharacter);
    }
    if alive && menu.can_resurrect {
        return Err(ConsistencyError::MenuResurrectAlive);
    }
    if !alive && (menu.can_fight || menu.can_heal) {
        return Err(ConsistencyError::MenuActionsDead);
    }
    if in_combat && (menu.can_fight || menu.can_heal || menu.can_resurrect) {
        return Err(ConsistencyError::MenuActionsInCombat);
    }
    if !in_combat && (menu.can_continue_fight || menu.can_flee) {
        return Err(ConsistencyError::MenuCombatOutsideCombat);
    }
    Ok(())
}

/// Every consistency failure, prefixed with the part of the state it concerns.
pub fn validation_errors(state: &UxState) -> Vec<String> {
    let mut errors = Vec::new();
    if let Err(err) = validate_character_state(state.character.as_ref()) {
        errors.push(format!("Character: {err}"));
    }
    if let Err(err) = validate_operation_state(state.operation.as_ref()) {
        errors.push(format!("Operation: {err}"));
    }
    if let Some(menu) = &state.menu {
        if let Err(err) = validate_menu_consistency(menu, state.character.as_ref()) {
            errors.push(format!("Menu: {err}"));
        }
    }
    errors
}

pub fn validation_message(state: &UxState) -> String {
    let errors = validation_errors(state);
    if errors.is_empty() {
        "System is ready".to_string()
    } else {
        format!("Validation errors: {}", errors.join(", "))
    }
}
