//! Multi-field updates applied as one store notification.

use game_core::{
    CharacterData, ClaimsData, EquipmentDropData, FightSummaryData, HealingData, LeaderboardData,
    OperationState, PoolsData, ResurrectionData, UxState,
};

/// A partial [`UxState`]. Unset fields are left untouched; for optional
/// fields `Some(None)` clears the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UxStatePatch {
    player_address: Option<Option<String>>,
    character: Option<Option<CharacterData>>,
    operation: Option<Option<OperationState>>,
    pools: Option<Option<PoolsData>>,
    leaderboard: Option<Option<LeaderboardData>>,
    claims: Option<Option<ClaimsData>>,
    healing_cooldown_remaining: Option<u64>,
    status_message: Option<String>,
    is_loading: Option<bool>,
    error: Option<Option<String>>,
    last_fight_summary: Option<Option<FightSummaryData>>,
    last_equipment_dropped: Option<Option<EquipmentDropData>>,
    last_healing: Option<Option<HealingData>>,
    last_resurrection: Option<Option<ResurrectionData>>,
}

impl UxStatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_address(mut self, address: Option<String>) -> Self {
        self.player_address = Some(address);
        self
    }

    pub fn character(mut self, character: Option<CharacterData>) -> Self {
        self.character = Some(character);
        self
    }

    pub fn operation(mut self, operation: Option<OperationState>) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn pools(mut self, pools: Option<PoolsData>) -> Self {
        self.pools = Some(pools);
        self
    }

    pub fn leaderboard(mut self, leaderboard: Option<LeaderboardData>) -> Self {
        self.leaderboard = Some(leaderboard);
        self
    }

    pub fn claims(mut self, claims: Option<ClaimsData>) -> Self {
        self.claims = Some(claims);
        self
    }

    pub fn healing_cooldown_remaining(mut self, seconds: u64) -> Self {
        self.healing_cooldown_remaining = Some(seconds);
        self
    }

    pub fn status_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.is_loading = Some(loading);
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = Some(error);
        self
    }

    pub fn last_fight_summary(mut self, summary: Option<FightSummaryData>) -> Self {
        self.last_fight_summary = Some(summary);
        self
    }

    pub fn last_equipment_dropped(mut self, drop: Option<EquipmentDropData>) -> Self {
        self.last_equipment_dropped = Some(drop);
        self
    }

    pub fn last_healing(mut self, healing: Option<HealingData>) -> Self {
        self.last_healing = Some(healing);
        self
    }

    pub fn last_resurrection(mut self, resurrection: Option<ResurrectionData>) -> Self {
        self.last_resurrection = Some(resurrection);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The operation slot this patch writes: `Some(None)` clears it.
    pub(crate) fn operation_change(&self) -> Option<Option<&OperationState>> {
        self.operation.as_ref().map(Option::as_ref)
    }

    /// Returns true when a menu input (character, operation, cooldown) changed.
    pub(crate) fn apply(self, state: &mut UxState) -> bool {
        let touches_menu = self.character.is_some()
            || self.operation.is_some()
            || self.healing_cooldown_remaining.is_some();

        macro_rules! assign {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    state.$field = value;
                })*
            };
        }
        assign!(
            player_address,
            character,
            operation,
            pools,
            leaderboard,
            claims,
            healing_cooldown_remaining,
            status_message,
            is_loading,
            error,
            last_fight_summary,
            last_equipment_dropped,
            last_healing,
            last_resurrection,
        );

        touches_menu
    }
}
