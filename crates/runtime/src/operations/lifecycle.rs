//! The pending -> processing -> completed | error state machine.

use std::future::Future;

use client_ledger_core::LedgerError;
use game_core::{DomainError, OperationKind, OperationState, TxHash, UxState, ValidationResult};

use super::OperationContext;
use crate::api::{Result, RuntimeError};
use crate::events::DomainEvent;

pub(crate) fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

/// What a successful operation reports.
pub(crate) struct Completion {
    pub transaction: Option<TxHash>,
    pub message: String,
}

impl Completion {
    pub fn read(message: impl Into<String>) -> Self {
        Self {
            transaction: None,
            message: message.into(),
        }
    }

    pub fn submitted(hash: &TxHash, message: impl Into<String>) -> Self {
        Self {
            transaction: Some(hash.clone()),
            message: message.into(),
        }
    }
}

/// Owns the operation slot from `pending` to its terminal state.
pub(crate) struct Tracker<'a> {
    ctx: &'a OperationContext,
    current: OperationState,
}

impl OperationContext {
    /// Claims the operation slot for `kind`.
    ///
    /// `precondition` runs under the store lock together with the
    /// single-operation check, so it sees the state the operation starts
    /// from. A refusal leaves the store untouched.
    pub(crate) fn begin(
        &self,
        kind: OperationKind,
        progress: impl Into<String>,
        precondition: impl FnOnce(&UxState) -> ValidationResult,
    ) -> std::result::Result<Tracker<'_>, RuntimeError> {
        let progress = progress.into();
        let operation = OperationState::pending(kind, progress.clone(), now_ms());
        self.store.begin_operation(operation.clone(), precondition)?;

        tracing::debug!(target: "runtime::ops", operation = %kind, "pending");
        self.bus.emit(DomainEvent::OperationStarted { kind, progress });

        Ok(Tracker {
            ctx: self,
            current: operation,
        })
    }

    /// Awaits a ledger precondition read for `kind`.
    ///
    /// A transport failure is recorded like any other operation failure
    /// (error state plus `OperationFailed`) before it is returned.
    pub(crate) async fn precheck<T>(
        &self,
        kind: OperationKind,
        progress: &str,
        precondition: impl FnOnce(&UxState) -> ValidationResult,
        read: impl Future<Output = std::result::Result<T, LedgerError>>,
    ) -> Result<T> {
        match read.await {
            Ok(value) => Ok(value),
            Err(err) => Err(self.begin(kind, progress, precondition)?.fail(err)),
        }
    }
}

impl Tracker<'_> {
    pub fn kind(&self) -> OperationKind {
        self.current.kind
    }

    fn advance(&mut self, next: OperationState) -> bool {
        let applied = self.ctx.store.transition_operation(&self.current, next.clone());
        if applied {
            self.current = next;
        } else {
            tracing::debug!(
                target: "runtime::ops",
                operation = %self.current.kind,
                "operation was cleared before it finished"
            );
        }
        applied
    }

    pub fn processing(&mut self, progress: impl Into<String>) {
        let next = self.current.processing(progress);
        if self.advance(next) {
            tracing::debug!(target: "runtime::ops", operation = %self.current.kind, "processing");
        }
    }

    pub fn complete(mut self, completion: Completion) {
        let kind = self.current.kind;
        let next = self
            .current
            .completed(completion.transaction.clone(), completion.message);
        self.advance(next);
        tracing::debug!(target: "runtime::ops", operation = %kind, "completed");
        self.ctx.bus.emit(DomainEvent::OperationCompleted {
            kind,
            transaction: completion.transaction,
        });
    }

    /// Records `err` and hands it back as a [`RuntimeError`].
    pub fn fail(mut self, err: LedgerError) -> RuntimeError {
        let kind = self.current.kind;
        let message = err.to_string();
        let next = self.current.failed(message.clone());
        self.advance(next);
        tracing::warn!(
            target: "runtime::ops",
            operation = %kind,
            code = err.error_code(),
            severity = err.severity().as_str(),
            error = %message,
            "operation failed"
        );
        self.ctx.bus.emit(DomainEvent::OperationFailed {
            kind,
            error: message,
        });
        RuntimeError::Ledger(err)
    }

    /// Awaits `submit` and settles the operation with its outcome.
    ///
    /// On success `settle` applies the result to the store and describes the
    /// completion; it runs before `OperationCompleted` is emitted. Operations
    /// that change the character re-read it first; that refresh never fails
    /// the operation.
    pub async fn run<T>(
        mut self,
        submit: impl Future<Output = std::result::Result<T, LedgerError>>,
        settle: impl FnOnce(&T) -> Completion,
    ) -> Result<T> {
        let progress = if self.kind().is_write() {
            "Waiting for transaction confirmation..."
        } else {
            "Reading ledger state..."
        };
        self.processing(progress);

        match submit.await {
            Ok(value) => {
                if self.kind().touches_character() {
                    self.ctx.refresh_character_quietly().await;
                }
                let completion = settle(&value);
                self.complete(completion);
                Ok(value)
            }
            Err(err) => Err(self.fail(err)),
        }
    }
}
