//! Action availability view.

use std::collections::BTreeMap;

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Action identifiers surfaced to the UI.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum MenuAction {
    CreateCharacter,
    Fight,
    Heal,
    Resurrect,
    ContinueFight,
    Flee,
    ViewPools,
    ViewLeaderboard,
    ViewClaims,
    ClaimPrize,
}

/// Capability flags and action lists.
///
/// Produced only by [`crate::calculate_menu_state`]; never patched in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuState {
    pub can_create_character: bool,
    pub can_act: bool,
    pub can_fight: bool,
    pub can_heal: bool,
    pub can_resurrect: bool,
    pub can_continue_fight: bool,
    pub can_flee: bool,
    pub can_view_pools: bool,
    pub can_view_leaderboard: bool,
    pub can_view_claims: bool,
    pub can_claim_prize: bool,
    pub available_actions: Vec<MenuAction>,
    pub disabled_actions: Vec<MenuAction>,
    pub disabled_reasons: BTreeMap<MenuAction, String>,
    pub healing_cooldown_remaining: u64,
}

impl MenuState {
    pub fn is_available(&self, action: MenuAction) -> bool {
        self.available_actions.contains(&action) && !self.disabled_actions.contains(&action)
    }

    pub fn disabled_reason(&self, action: MenuAction) -> Option<&str> {
        self.disabled_reasons.get(&action).map(String::as_str)
    }
}
