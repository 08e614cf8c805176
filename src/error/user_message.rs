//! Maps classified and foreign failures to user-facing sentences.
//!
//! Typed classification always wins: [`user_message`] dispatches on the
//! error kind and ignores the raw message for every recognized category.
//! The substring heuristics in [`user_message_for_foreign`] run only when
//! no typed error is available.

use anyhow::Error;

use crate::error::app_error::{AppError, ErrorKind};

/// Fallback shown when nothing better can be said about a failure.
pub const GENERIC_FALLBACK: &str = "Something went wrong. Please try again.";

/// Ordered substring rules for untyped failure messages. Matched
/// case-insensitively, first hit wins.
const MESSAGE_RULES: &[(&str, &str)] = &[
    ("user rejected", "Transaction was rejected in your wallet."),
    (
        "insufficient funds",
        "You don't have enough funds to complete this transaction.",
    ),
];

/// Returns the user-facing sentence for a classified error.
///
/// Total: every kind maps to a fixed sentence, or falls back to the raw
/// message (Auth, Unknown) and finally to [`GENERIC_FALLBACK`].
#[must_use]
pub fn user_message(error: &AppError) -> String {
    match error.kind {
        ErrorKind::Network => {
            "Network connection issue. Please check your internet connection and try again."
                .to_string()
        }
        ErrorKind::Wallet => {
            "Wallet connection issue. Please ensure your wallet is unlocked and try again."
                .to_string()
        }
        ErrorKind::Transaction => {
            "Transaction failed. Please check your wallet and try again.".to_string()
        }
        ErrorKind::Storage => "Data storage issue. Your progress might not be saved.".to_string(),
        ErrorKind::GameLogic => "Game issue detected. Please refresh the page.".to_string(),
        ErrorKind::Auth | ErrorKind::Unknown => {
            if error.message.is_empty() {
                GENERIC_FALLBACK.to_string()
            } else {
                error.message.clone()
            }
        }
    }
}

/// Returns the user-facing sentence for an untyped foreign failure.
///
/// Applies the ordered substring rules to the rendered message; with no
/// hit, the raw message is shown as-is, or [`GENERIC_FALLBACK`] if empty.
#[must_use]
pub fn user_message_for_foreign(error: &Error) -> String {
    let message = error.to_string();
    if let Some(canned) = match_rule(&message) {
        return canned.to_string();
    }
    if message.is_empty() {
        GENERIC_FALLBACK.to_string()
    } else {
        message
    }
}

fn match_rule(message: &str) -> Option<&'static str> {
    let lowered = message.to_lowercase();
    MESSAGE_RULES
        .iter()
        .find(|(pattern, _)| lowered.contains(pattern))
        .map(|(_, canned)| *canned)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use crate::error::{
        app_error::{AppError, ErrorKind},
        user_message::{GENERIC_FALLBACK, user_message, user_message_for_foreign},
    };

    #[test]
    fn test_typed_wallet_error_ignores_raw_message() {
        let error = AppError::wallet("eth_requestAccounts failed with code 4001");
        assert_eq!(
            user_message(&error),
            "Wallet connection issue. Please ensure your wallet is unlocked and try again."
        );
    }

    #[test]
    fn test_typed_kinds_have_fixed_sentences() {
        assert!(user_message(&AppError::network("x")).starts_with("Network connection issue"));
        assert!(user_message(&AppError::transaction("x")).starts_with("Transaction failed"));
        assert!(user_message(&AppError::storage("x")).starts_with("Data storage issue"));
        assert!(user_message(&AppError::game_logic("x")).starts_with("Game issue detected"));
    }

    #[test]
    fn test_unknown_kind_falls_through_to_raw_message() {
        let error = AppError::new("unexpected state", ErrorKind::Unknown);
        assert_eq!(user_message(&error), "unexpected state");
    }

    #[test]
    fn test_unknown_kind_with_empty_message_uses_fallback() {
        let error = AppError::new("", ErrorKind::Unknown);
        assert_eq!(user_message(&error), GENERIC_FALLBACK);
    }

    #[test]
    fn test_foreign_user_rejected_maps_to_rejection_sentence() {
        let error = anyhow!("user rejected the request");
        assert_eq!(
            user_message_for_foreign(&error),
            "Transaction was rejected in your wallet."
        );
    }

    #[test]
    fn test_foreign_rule_match_is_case_insensitive() {
        let error = anyhow!("MetaMask: User Rejected the signature");
        assert_eq!(
            user_message_for_foreign(&error),
            "Transaction was rejected in your wallet."
        );
    }

    #[test]
    fn test_foreign_insufficient_funds_maps_to_funds_sentence() {
        let error = anyhow!("err: insufficient funds for gas * price + value");
        assert_eq!(
            user_message_for_foreign(&error),
            "You don't have enough funds to complete this transaction."
        );
    }

    #[test]
    fn test_foreign_without_rule_uses_raw_message() {
        let error = anyhow!("socket hang up");
        assert_eq!(user_message_for_foreign(&error), "socket hang up");
    }

    #[test]
    fn test_typed_classification_beats_heuristics() {
        // A typed Storage error whose message would hit a rule still gets
        // the storage sentence.
        let error = AppError::storage("user rejected the request");
        assert_eq!(
            user_message(&error),
            "Data storage issue. Your progress might not be saved."
        );
    }
}
