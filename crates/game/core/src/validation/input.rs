//! Input-shape validators, usable before any operation is attempted.

use crate::normalize::ENEMY_NAMES;
use crate::state::CharacterClass;

use super::{ValidationError, ValidationResult};

pub const MIN_ENEMY_ID: u8 = 1;
/// Highest id with an entry in the canonical enemy table.
pub const MAX_ENEMY_ID: u8 = (ENEMY_NAMES.len() - 1) as u8;
pub const MAX_ENEMY_LEVEL: u32 = 100;

const ADDRESS_LEN: usize = 42;
const PROOF_ELEMENT_LEN: usize = 66;

pub fn validate_character_class(class_id: u8) -> ValidationResult {
    match CharacterClass::from_id(class_id) {
        Some(_) => Ok(()),
        None => Err(ValidationError::InvalidCharacterClass(class_id)),
    }
}

pub fn validate_enemy_id(enemy_id: u8) -> ValidationResult {
    if (MIN_ENEMY_ID..=MAX_ENEMY_ID).contains(&enemy_id) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEnemyId(enemy_id))
    }
}

pub fn validate_enemy_level(level: u32) -> ValidationResult {
    if (1..=MAX_ENEMY_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEnemyLevel(level))
    }
}

fn is_hex(digits: &str) -> bool {
    digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// `0x` followed by forty hex digits.
pub fn validate_player_address(address: &str) -> ValidationResult {
    if address.is_empty() {
        return Err(ValidationError::PlayerAddressMissing);
    }
    let Some(digits) = address.strip_prefix("0x") else {
        return Err(ValidationError::PlayerAddressPrefix);
    };
    if address.len() != ADDRESS_LEN {
        return Err(ValidationError::PlayerAddressLength);
    }
    if !is_hex(digits) {
        return Err(ValidationError::PlayerAddressHex);
    }
    Ok(())
}

/// Every element must be a `0x`-prefixed 32-byte hex word.
///
/// An empty proof is valid: a single-leaf tree has its leaf as the root.
pub fn validate_merkle_proof(proof: &[String]) -> ValidationResult {
    for (index, element) in proof.iter().enumerate() {
        let well_formed = element.len() == PROOF_ELEMENT_LEN
            && element.strip_prefix("0x").is_some_and(is_hex);
        if !well_formed {
            return Err(ValidationError::InvalidProofElement(index));
        }
    }
    Ok(())
}
