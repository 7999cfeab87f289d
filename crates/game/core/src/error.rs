//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (validation rejections here, ledger failures in the
//! ledger crate) implement [`DomainError`] so the runtime can classify them
//! uniformly when deciding how loudly to log and whether a retry makes sense.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: transient conditions that may succeed when retried
/// - **Validation**: invalid input or state, rejected before any ledger call
/// - **Internal**: unexpected failures of a collaborator or an invariant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Transient failure; the user may retry the same action.
    Recoverable,

    /// Invalid input or precondition; retrying without changes is pointless.
    Validation,

    /// Collaborator failure or broken invariant.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if retrying the same action may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for errors surfaced to the orchestration layer.
pub trait DomainError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and assertions in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
