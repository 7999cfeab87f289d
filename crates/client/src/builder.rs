//! Client builder with dependency injection pattern.

use anyhow::{Context, Result};
use runtime::{MockLedgerClient, Runtime, RuntimeConfig};

use crate::{Client, ClientConfig};

/// Builder for constructing a Client with proper validation.
///
/// The ledger is required; both configurations fall back to their defaults.
/// A player named by the runtime configuration wins over the client's.
#[derive(Default)]
pub struct ClientBuilder {
    runtime_config: Option<RuntimeConfig>,
    client_config: Option<ClientConfig>,
    ledger: Option<MockLedgerClient>,
}

impl ClientBuilder {
    /// Create a new ClientBuilder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = Some(config);
        self
    }

    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = Some(config);
        self
    }

    /// Set the ledger (required).
    ///
    /// The client keeps a handle of its own to settle fights offline.
    pub fn ledger(mut self, ledger: MockLedgerClient) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Build the Client.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger is not set or the runtime fails to build.
    pub async fn build(self) -> Result<Client> {
        let ledger = self
            .ledger
            .context("Ledger is required. Use .ledger() to set it.")?;
        let mut config = self.client_config.unwrap_or_default();

        let mut runtime_config = self.runtime_config.unwrap_or_default();
        match &runtime_config.player_address {
            Some(address) => config.player_address = address.clone(),
            None => runtime_config.player_address = Some(config.player_address.clone()),
        }

        let runtime = Runtime::builder()
            .config(runtime_config)
            .ledger(ledger.clone())
            .build()
            .await
            .context("failed to build runtime")?;

        Ok(Client {
            runtime,
            ledger,
            config,
        })
    }
}
