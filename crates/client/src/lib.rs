//! Top-level client driving one brawler session.
//!
//! # Architecture
//!
//! ```text
//! Client (Top-level container)
//!   ├─→ Runtime (session state, operations and event bus)
//!   └─→ Ledger (in-memory ledger standing in for the contracts)
//! ```
//!
//! The client owns composition and lifecycle only. Everything the session
//! shows comes from the runtime's store; the client reads the computed menu
//! to decide which action to take next.

mod builder;
pub mod config;
pub mod logging;
mod session;

pub use builder::ClientBuilder;
pub use config::ClientConfig;
pub use session::seed_demo_ledger;

use anyhow::Result;
use game_core::UxState;
use runtime::{EventKind, MockLedgerClient, Runtime};

/// Top-level client container.
///
/// # Lifecycle
///
/// 1. `Client::builder()` assembles the runtime against a ledger
/// 2. `Client::run()` initializes the runtime and connects the player
/// 3. The scripted session plays through the menu's actions
/// 4. The runtime shuts down and the final state snapshot is returned
pub struct Client {
    runtime: Runtime,
    ledger: MockLedgerClient,
    config: ClientConfig,
}

impl Client {
    /// Create a new ClientBuilder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Run the session and return the last state snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Runtime initialization or player connection fails
    /// - A step the session cannot continue without fails
    /// - The ingest worker cannot be joined on shutdown
    pub async fn run(self) -> Result<UxState> {
        let mut runtime = self.runtime;

        let events = runtime.bus().on_any(|envelope| {
            if envelope.kind() == EventKind::StateChanged {
                tracing::trace!(target: "brawler", "state changed");
            } else {
                tracing::info!(target: "brawler", event = %envelope.kind(), "event");
            }
            Ok(())
        });

        runtime.initialize().await?;
        let outcome = session::play(&runtime, &self.ledger, &self.config).await;

        let snapshot = runtime.state();
        events.unsubscribe();
        runtime.shutdown().await?;

        outcome?;
        Ok(snapshot)
    }
}
