//! Menu (action availability) calculator.

use std::collections::BTreeMap;

use crate::state::{CharacterData, MenuAction, MenuState, OperationState};

/// Inputs besides the character that the menu depends on.
#[derive(Clone, Copy, Debug, Default)]
pub struct MenuInputs<'a> {
    pub operation: Option<&'a OperationState>,
    /// Seconds until healing is allowed again.
    pub healing_cooldown_remaining: u64,
}

const BUSY_REASON: &str = "Another operation is in progress";

/// Computes the menu from character, operation and cooldown.
///
/// Capability flags describe the character alone. An active operation does
/// not clear them; it moves every mutating action from the available list
/// into the disabled list with a reason.
pub fn calculate_menu_state(character: Option<&CharacterData>, inputs: MenuInputs<'_>) -> MenuState {
    let busy = inputs.operation.is_some_and(|op| op.is_active);

    let Some(character) = character.filter(|c| c.exists) else {
        let mut menu = MenuState {
            can_create_character: true,
            can_view_pools: true,
            can_view_leaderboard: true,
            available_actions: vec![MenuAction::CreateCharacter],
            ..MenuState::default()
        };
        if busy {
            mark_busy(&mut menu);
        }
        return menu;
    };

    let alive = character.is_alive;
    let in_combat = character.in_combat;
    let cooldown = inputs.healing_cooldown_remaining;
    let can_act = alive && !in_combat;

    let mut available = vec![
        MenuAction::ViewPools,
        MenuAction::ViewLeaderboard,
        MenuAction::ViewClaims,
    ];
    if can_act {
        available.extend([MenuAction::Fight, MenuAction::Heal]);
    }
    if in_combat {
        available.extend([MenuAction::ContinueFight, MenuAction::Flee]);
    }
    if !alive {
        available.push(MenuAction::Resurrect);
    }

    let mut disabled = Vec::new();
    let mut reasons = BTreeMap::new();
    if can_act && cooldown > 0 {
        disabled.push(MenuAction::Heal);
        reasons.insert(
            MenuAction::Heal,
            format!("Healing cooldown: {cooldown}s remaining"),
        );
    }

    let mut menu = MenuState {
        can_create_character: false,
        can_act,
        can_fight: can_act,
        can_heal: can_act && cooldown == 0,
        can_resurrect: !alive,
        can_continue_fight: in_combat,
        can_flee: in_combat,
        can_view_pools: true,
        can_view_leaderboard: true,
        can_view_claims: true,
        can_claim_prize: true,
        available_actions: available,
        disabled_actions: disabled,
        disabled_reasons: reasons,
        healing_cooldown_remaining: cooldown,
    };
    if busy {
        mark_busy(&mut menu);
    }
    menu
}

fn mark_busy(menu: &mut MenuState) {
    let mutating = menu
        .available_actions
        .iter()
        .copied()
        .filter(|action| is_mutating(*action))
        .collect::<Vec<_>>();

    for action in mutating {
        if !menu.disabled_actions.contains(&action) {
            menu.disabled_actions.push(action);
        }
        menu.disabled_reasons
            .entry(action)
            .or_insert_with(|| BUSY_REASON.to_string());
    }
}

fn is_mutating(action: MenuAction) -> bool {
    !matches!(
        action,
        MenuAction::ViewPools | MenuAction::ViewLeaderboard | MenuAction::ViewClaims
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{OperationKind, OperationState};

    fn character(is_alive: bool, in_combat: bool) -> CharacterData {
        CharacterData {
            exists: true,
            is_alive,
            in_combat,
            level: 1,
            ..CharacterData::default()
        }
    }

    #[test]
    fn no_character_only_allows_creation() {
        let menu = calculate_menu_state(None, MenuInputs::default());

        assert!(menu.can_create_character);
        assert!(!menu.can_fight);
        assert!(!menu.can_heal);
        assert!(!menu.can_resurrect);
        assert!(menu.can_view_pools);
        assert!(menu.can_view_leaderboard);
        assert!(!menu.can_view_claims);
        assert!(!menu.can_claim_prize);
        assert_eq!(menu.available_actions, vec![MenuAction::CreateCharacter]);
        assert!(menu.disabled_actions.is_empty());
        assert_eq!(menu.healing_cooldown_remaining, 0);
    }

    #[test]
    fn placeholder_character_counts_as_absent() {
        let placeholder = CharacterData::default();
        let menu = calculate_menu_state(Some(&placeholder), MenuInputs::default());
        assert_eq!(menu, calculate_menu_state(None, MenuInputs::default()));
    }

    #[test]
    fn idle_living_character_can_fight_and_heal() {
        let menu = calculate_menu_state(Some(&character(true, false)), MenuInputs::default());

        assert!(menu.can_act);
        assert!(menu.can_fight);
        assert!(menu.can_heal);
        assert!(!menu.can_resurrect);
        assert!(!menu.can_continue_fight);
        assert!(!menu.can_flee);
        assert!(!menu.can_create_character);
        assert_eq!(
            menu.available_actions,
            vec![
                MenuAction::ViewPools,
                MenuAction::ViewLeaderboard,
                MenuAction::ViewClaims,
                MenuAction::Fight,
                MenuAction::Heal,
            ]
        );
    }

    #[test]
    fn dead_character_can_only_resurrect() {
        let menu = calculate_menu_state(Some(&character(false, false)), MenuInputs::default());

        assert!(menu.can_resurrect);
        assert!(!menu.can_fight);
        assert!(!menu.can_heal);
        assert!(menu.available_actions.contains(&MenuAction::Resurrect));
    }

    #[test]
    fn in_combat_allows_continue_and_flee() {
        let menu = calculate_menu_state(Some(&character(true, true)), MenuInputs::default());

        assert!(!menu.can_fight);
        assert!(menu.can_continue_fight);
        assert!(menu.can_flee);
        assert!(!menu.available_actions.contains(&MenuAction::Fight));
    }

    #[test]
    fn cooldown_disables_heal_with_reason() {
        let inputs = MenuInputs {
            healing_cooldown_remaining: 42,
            ..MenuInputs::default()
        };
        let menu = calculate_menu_state(Some(&character(true, false)), inputs);

        assert!(menu.can_fight);
        assert!(!menu.can_heal);
        assert_eq!(menu.disabled_actions, vec![MenuAction::Heal]);
        assert_eq!(
            menu.disabled_reason(MenuAction::Heal),
            Some("Healing cooldown: 42s remaining")
        );
        assert!(!menu.is_available(MenuAction::Heal));
        assert_eq!(menu.healing_cooldown_remaining, 42);
    }

    #[test]
    fn active_operation_disables_mutating_actions_only() {
        let op = OperationState::pending(OperationKind::FightEnemy, "Fighting...", 1);
        let inputs = MenuInputs {
            operation: Some(&op),
            healing_cooldown_remaining: 0,
        };
        let menu = calculate_menu_state(Some(&character(true, false)), inputs);

        assert!(menu.can_fight);
        assert!(!menu.is_available(MenuAction::Fight));
        assert!(menu.is_available(MenuAction::ViewPools));
        assert_eq!(
            menu.disabled_reason(MenuAction::Heal),
            Some("Another operation is in progress")
        );
    }

    #[test]
    fn calculation_is_deterministic() {
        let hero = character(true, false);
        let inputs = MenuInputs {
            healing_cooldown_remaining: 5,
            ..MenuInputs::default()
        };
        assert_eq!(
            calculate_menu_state(Some(&hero), inputs),
            calculate_menu_state(Some(&hero), inputs)
        );
    }
}
