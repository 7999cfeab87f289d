//! Runtime configuration loaded from the process environment.

use std::env;

/// Session and presentation settings for [`crate::Runtime`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Address connected right after initialization, when set.
    pub player_address: Option<String>,
    pub leaderboard: LeaderboardConfig,
    pub claims: ClaimsConfig,
    pub events: EventConfig,
    pub currency: CurrencyConfig,
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BRAWLER_PLAYER_ADDRESS` - Session address to connect on start (default: unset)
    /// - `BRAWLER_TOP_PLAYERS` - Leaderboard size (default: 10)
    /// - `BRAWLER_LEADERBOARD_SCAN_LIMIT` - Max players scanned for ranking (default: 100)
    /// - `BRAWLER_CLAIM_LOOKBACK_EPOCHS` - Past epochs checked for rewards (default: 5)
    /// - `BRAWLER_EVENT_DEDUP_CAPACITY` - Remembered ledger log ids (default: 256)
    /// - `BRAWLER_FILTER_FOREIGN_EVENTS` - Drop logs of other players (default: true)
    /// - `BRAWLER_CURRENCY_SYMBOL` - Amount suffix (default: CFX)
    /// - `BRAWLER_CURRENCY_DECIMALS` - Amount decimals (default: 18)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(address) = env::var("BRAWLER_PLAYER_ADDRESS")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            config.player_address = Some(address);
        }

        if let Some(top) = read_env::<usize>("BRAWLER_TOP_PLAYERS") {
            config.leaderboard.top_players = top.max(1);
        }
        if let Some(limit) = read_env::<u64>("BRAWLER_LEADERBOARD_SCAN_LIMIT") {
            config.leaderboard.scan_limit = limit.max(1);
        }

        if let Some(epochs) = read_env::<u64>("BRAWLER_CLAIM_LOOKBACK_EPOCHS") {
            config.claims.lookback_epochs = epochs;
        }

        if let Some(capacity) = read_env::<usize>("BRAWLER_EVENT_DEDUP_CAPACITY") {
            config.events.dedup_capacity = capacity.max(1);
        }
        if let Some(filter) = read_env_bool("BRAWLER_FILTER_FOREIGN_EVENTS") {
            config.events.filter_foreign = filter;
        }

        if let Ok(symbol) = env::var("BRAWLER_CURRENCY_SYMBOL") {
            config.currency.symbol = symbol;
        }
        if let Some(decimals) = read_env::<u32>("BRAWLER_CURRENCY_DECIMALS") {
            config.currency.decimals = decimals;
        }

        config
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardConfig {
    pub top_players: usize,
    pub scan_limit: u64,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            top_players: 10,
            scan_limit: 100,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimsConfig {
    /// Epochs before the current one that are also checked.
    pub lookback_epochs: u64,
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self { lookback_epochs: 5 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventConfig {
    pub dedup_capacity: usize,
    pub filter_foreign: bool,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            dedup_capacity: 256,
            filter_foreign: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyConfig {
    pub symbol: String,
    pub decimals: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            symbol: "CFX".to_string(),
            decimals: 18,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
