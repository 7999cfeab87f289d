//! Worker tasks that back the runtime orchestration.
//!
//! The ingest worker owns the ledger log streams; everything else runs on
//! the caller's task.

mod ingest;

pub use ingest::{IngestMessage, IngestWorker};
