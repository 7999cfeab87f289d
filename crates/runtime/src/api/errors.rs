//! Error and result types surfaced by the runtime API.
//!
//! Validation failures are local refusals; ledger failures have already been
//! recorded in the store and on the event bus by the time they reach callers.
use serde::Serialize;
use thiserror::Error;

use client_ledger_core::LedgerError;
use game_core::{DomainError, ErrorSeverity, ValidationError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("runtime requires a ledger client before building")]
    MissingLedger,

    #[error("ledger event worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl DomainError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation(err) => err.severity(),
            Self::Ledger(err) => err.severity(),
            Self::MissingLedger | Self::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
            Self::MissingLedger => "runtime_missing_ledger",
            Self::WorkerJoin(_) => "runtime_worker_join",
        }
    }
}

/// Uniform outcome of an action on the public surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(err.to_string()),
        }
    }
}
