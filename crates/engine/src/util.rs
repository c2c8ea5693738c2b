//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They keep the rules
//! for names and notes in one place so every write path applies them.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine, accounts::MAX_NAME_LEN, expenses::EMPTY_NOTE};

/// Trim and NFC-normalize an account name, rejecting empty or oversized ones.
///
/// Normalizing keeps visually identical names (composed vs decomposed
/// accents) from slipping past the uniqueness check.
pub(crate) fn normalize_account_name(value: &str) -> ResultEngine<String> {
    let name: String = value.trim().nfc().collect();
    if name.is_empty() {
        return Err(EngineError::InvalidName(
            "account name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "account name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

/// Trim a note; blank input becomes the "no note" marker.
pub(crate) fn normalize_note(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        EMPTY_NOTE.to_string()
    } else {
        trimmed.to_string()
    }
}
