//! Brawler client binary.
//!
//! Composition root: loads configuration from the environment, sets up
//! logging, assembles the runtime against the in-memory ledger and plays one
//! scripted session.
//!
//! # Examples
//!
//! ```bash
//! # Offline session with the defaults
//! cargo run -p brawler-client
//!
//! # Verbose runtime logs, custom player and opponent
//! RUST_LOG=runtime=debug BRAWLER_PLAYER_ADDRESS=0x... BRAWLER_ENEMY_ID=4 cargo run -p brawler-client
//! ```

use anyhow::Result;

use brawler_client::{Client, ClientConfig, logging, seed_demo_ledger};
use runtime::{MockLedgerClient, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let runtime_config = RuntimeConfig::from_env();
    let client_config = ClientConfig::from_env();

    // 2. Setup logging
    let _guard = logging::setup_logging(client_config.log_dir.as_deref())?;

    tracing::info!("Starting brawler client");
    tracing::info!("Player: {}", client_config.player_address);

    // 3. Ledger
    let ledger = MockLedgerClient::new(client_config.player_address.clone());
    seed_demo_ledger(&ledger, &client_config.player_address);

    // 4. Build and run
    let client = Client::builder()
        .runtime_config(runtime_config)
        .client_config(client_config)
        .ledger(ledger)
        .build()
        .await?;

    tracing::info!("Client assembled, starting session...");
    let snapshot = client.run().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    tracing::info!("Client shutdown complete");
    Ok(())
}
