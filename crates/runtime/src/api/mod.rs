//! Types exchanged with hosts embedding the runtime.
mod errors;

pub use errors::{OperationResult, Result, RuntimeError};
