//! Ledger failure taxonomy.

use game_core::{DomainError, ErrorSeverity};

use crate::codes::{ErrorCategory, is_retryable, revert_category, revert_message};

/// Errors raised by a ledger adapter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The contract reverted with a numeric code; `message` comes from the
    /// revert table.
    #[error("{message}")]
    Reverted { code: u32, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Subscription error: {0}")]
    Subscription(String),

    #[error("Backend-specific error: {0}")]
    Backend(String),
}

impl LedgerError {
    pub fn reverted(code: u32) -> Self {
        Self::Reverted {
            code,
            message: revert_message(code),
        }
    }

    pub fn code(&self) -> Option<u32> {
        match self {
            Self::Reverted { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.code().map(revert_category).unwrap_or(ErrorCategory::Unknown)
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Reverted { code, .. } => is_retryable(*code),
            Self::Network(_) => true,
            _ => false,
        }
    }
}

impl DomainError for LedgerError {
    fn severity(&self) -> ErrorSeverity {
        if self.is_retryable() {
            return ErrorSeverity::Recoverable;
        }
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Character => ErrorSeverity::Validation,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Reverted { .. } => "ledger_reverted",
            Self::Network(_) => "ledger_network",
            Self::TransactionFailed(_) => "ledger_transaction_failed",
            Self::Decode(_) => "ledger_decode",
            Self::Subscription(_) => "ledger_subscription",
            Self::Backend(_) => "ledger_backend",
        }
    }
}
