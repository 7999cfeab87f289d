//! Contract revert codes.
//!
//! The contract reverts with numeric codes grouped in ranges of one hundred.

use strum::{AsRefStr, Display};

/// Code used when a failure carries no recognizable revert code.
pub const UNKNOWN_ERROR_CODE: u32 = 5000;

const REVERT_MESSAGES: &[(u32, &str)] = &[
    // Access control
    (1001, "Only owner"),
    (1002, "Only owner or test helper"),
    // Fees and payment
    (1101, "Insufficient fee"),
    (1102, "Already at full health"),
    (1103, "Healing on cooldown"),
    // Character
    (1201, "Character does not exist"),
    (1202, "Character is not alive"),
    (1203, "Invalid address"),
    (1204, "Character is in combat"),
    (1205, "Character is not in combat"),
    (1206, "Character already exists"),
    (1207, "Invalid class"),
    (1208, "Character is already alive"),
    // Combat
    (1301, "Invalid enemy level"),
    // Batch operations
    (1401, "Empty players array"),
    (1402, "Batch size too large"),
    (1403, "Invalid player address"),
    // Treasury
    (1501, "Drop rate too high"),
    (1502, "No funds to withdraw"),
    (1503, "Transfer failed"),
    (1504, "cached dropRate exceeds MAX_DROP_RATE_BP"),
    // Enemies
    (1601, "Enemy does not exist"),
    (1602, "No active combat state"),
    // Leaderboard and claims
    (1701, "Invalid epoch"),
    (1702, "No funds provided"),
    (1703, "Array length mismatch"),
    (1704, "Insufficient contract balance"),
    (1705, "Invalid root"),
    (1706, "Epoch already published"),
    (1707, "Unfunded epoch"),
    (1708, "No root available"),
    (1709, "Dispute window not expired"),
    (1710, "Claim window expired"),
    (1711, "Already claimed"),
    (1712, "Insufficient epoch funds"),
    (1713, "Not published"),
    (1714, "Claim window still active"),
    (1715, "No unclaimed funds"),
    (1716, "Invalid recipient address"),
    (1717, "Invalid treasury address"),
    (1718, "Transfer failed"),
    (1719, "Invalid proof"),
    (1720, "Withdraw failed"),
    // Bit-packed storage libraries
    (2001, "BitPackedCharacterLib: combat overflow"),
    (2002, "BitPackedCharacterLib: endurance overflow"),
    (2003, "BitPackedCharacterLib: defense overflow"),
    (2004, "BitPackedCharacterLib: luck overflow"),
    (2101, "BitPackedEnemyLib: baseCombat overflow"),
    (2102, "BitPackedEnemyLib: baseEndurance overflow"),
    (2103, "BitPackedEnemyLib: baseDefense overflow"),
    (2104, "BitPackedEnemyLib: baseLuck overflow"),
    (2105, "BitPackedEnemyLib: xpReward overflow"),
    (2106, "BitPackedEnemyLib: dropRate overflow"),
];

/// Codes that describe transient conditions.
const RETRYABLE_CODES: [u32; 3] = [1503, 1704, 1718];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Contract,
    Character,
    Pool,
    Leaderboard,
    Unknown,
}

pub fn revert_message(code: u32) -> String {
    REVERT_MESSAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, message)| (*message).to_string())
        .unwrap_or_else(|| format!("Unknown error: {code}"))
}

pub fn revert_category(code: u32) -> ErrorCategory {
    match code {
        UNKNOWN_ERROR_CODE => ErrorCategory::Unknown,
        1000..=1099 | 1400..=1499 => ErrorCategory::Validation,
        1100..=1199 | 1300..=1399 | 1600..=1699 => ErrorCategory::Contract,
        1200..=1299 => ErrorCategory::Character,
        1500..=1599 => ErrorCategory::Pool,
        1700..=1799 => ErrorCategory::Leaderboard,
        2000.. => ErrorCategory::Contract,
        _ => ErrorCategory::Unknown,
    }
}

pub fn is_retryable(code: u32) -> bool {
    RETRYABLE_CODES.contains(&code)
}
