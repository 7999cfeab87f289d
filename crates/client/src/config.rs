//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Address used when no player is configured.
pub const DEMO_PLAYER: &str = "0x00000000000000000000000000000000000b4a71";

/// Settings for the scripted session the binary plays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub player_address: String,
    /// Class used when the player has no character yet.
    pub class_id: u8,
    pub enemy_id: u8,
    pub enemy_level: u32,
    /// Directory for the log file; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            player_address: DEMO_PLAYER.to_string(),
            class_id: 1,
            enemy_id: 1,
            enemy_level: 1,
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BRAWLER_PLAYER_ADDRESS` - Session address (default: a fixed demo address)
    /// - `BRAWLER_CLASS_ID` - Class for a new character, 0-3 (default: 1)
    /// - `BRAWLER_ENEMY_ID` - Opponent id, 1-15 (default: 1)
    /// - `BRAWLER_ENEMY_LEVEL` - Opponent level (default: 1)
    /// - `BRAWLER_LOG_FILE` - Also write logs to a file (default: false)
    /// - `BRAWLER_LOG_DIR` - Log file directory (default: platform cache dir)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(address) = env::var("BRAWLER_PLAYER_ADDRESS")
            && !address.trim().is_empty()
        {
            config.player_address = address.trim().to_string();
        }

        if let Some(class_id) = read_env::<u8>("BRAWLER_CLASS_ID") {
            config.class_id = class_id;
        }
        if let Some(enemy_id) = read_env::<u8>("BRAWLER_ENEMY_ID") {
            config.enemy_id = enemy_id;
        }
        if let Some(level) = read_env::<u32>("BRAWLER_ENEMY_LEVEL") {
            config.enemy_level = level;
        }

        let explicit_dir = env::var("BRAWLER_LOG_DIR").ok().map(PathBuf::from);
        if read_env::<bool>("BRAWLER_LOG_FILE").unwrap_or(false) || explicit_dir.is_some() {
            config.log_dir = explicit_dir.or_else(default_log_directory);
        }

        config
    }
}

/// Platform cache directory for log files, e.g. `~/.cache/brawler/logs`.
pub fn default_log_directory() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "brawler").map(|dirs| dirs.cache_dir().join("logs"))
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.trim().parse().ok()
}
